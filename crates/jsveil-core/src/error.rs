use thiserror::Error;

/// Rejected configuration. Always reported before any rewriting starts.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("`{name}` must be a finite number in [0, 1], got {value}")]
    ThresholdOutOfRange { name: &'static str, value: f64 },

    #[error("`stringArrayWrappersParametersMaxCount` must be at least 2, got {0}")]
    TooFewWrapperParameters(usize),

    #[error("`stringArrayEncoding` must contain at least one encoding")]
    EmptyEncodingSet,

    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Fatal transform failure. The whole run is aborted and no tree is returned.
#[derive(Debug, Error)]
pub enum TransformError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("invariant violation: {0}")]
    InvariantViolation(String),

    #[error("cannot find current lexical scope body node")]
    MissingLexicalScope,

    #[error("transformer `{0}` takes part in a `runs_after` cycle")]
    TransformerCycle(&'static str),
}

impl TransformError {
    pub(crate) fn invariant(message: impl Into<String>) -> Self {
        TransformError::InvariantViolation(message.into())
    }
}

pub type Result<T> = std::result::Result<T, TransformError>;
