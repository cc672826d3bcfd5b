use bitflags::bitflags;

bitflags! {
    /// Per-node markers set by the transformers on the nodes they generate.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct NodeFlags: u8 {
        /// Skipped by every stage and analyzer.
        const IGNORED = 1 << 0;
        /// Storage declarations emitted by control-flow flattening. Only the
        /// control-flow stage skips them; later stages still see their keys.
        const CONTROL_FLOW_GENERATED = 1 << 1;
        /// Literal emitted as part of a string-array call. Never re-indirected.
        const STRING_ARRAY_CALL_LITERAL = 1 << 2;
    }
}
