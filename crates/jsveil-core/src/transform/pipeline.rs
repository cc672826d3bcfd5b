use super::{traverse, NodeTransformer, TransformContext, TransformStage, Visitor, VisitorResult};
use crate::ast::NodeId;
use crate::error::{Result, TransformError};
use tracing::debug;

/// Registered transformers, run stage by stage over one shared tree.
#[derive(Default)]
pub struct StagePipeline {
    transformers: Vec<Box<dyn NodeTransformer>>,
}

impl StagePipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, transformer: Box<dyn NodeTransformer>) {
        self.transformers.push(transformer);
    }

    pub fn transformers_mut(&mut self) -> impl Iterator<Item = &mut Box<dyn NodeTransformer>> {
        self.transformers.iter_mut()
    }

    /// Transformer names of `stage` in run order.
    pub fn stage_order(&self, stage: TransformStage) -> Result<Vec<&'static str>> {
        Ok(self
            .ordered_indices(stage)?
            .into_iter()
            .map(|index| self.transformers[index].name())
            .collect())
    }

    /// One traversal per non-empty stage, in stage order.
    pub fn run(&mut self, cx: &mut TransformContext) -> Result<()> {
        for stage in TransformStage::ALL {
            let order = self.ordered_indices(stage)?;
            if order.is_empty() {
                continue;
            }

            let mut slots: Vec<Option<&mut Box<dyn NodeTransformer>>> =
                self.transformers.iter_mut().map(Some).collect();
            let transformers: Vec<&mut dyn NodeTransformer> = order
                .iter()
                .filter_map(|index| slots[*index].take())
                .map(|transformer| -> &mut dyn NodeTransformer { &mut **transformer })
                .collect();

            debug!(
                ?stage,
                transformers = ?transformers.iter().map(|t| t.name()).collect::<Vec<_>>(),
                "running stage"
            );
            let mut visitor = StageVisitor { transformers };
            let root = cx.ast.root();
            traverse(cx, root, None, &mut visitor)?;
        }
        Ok(())
    }

    /// Stable topological order of the transformers of `stage`. Dependencies
    /// on transformers that are not registered are ignored.
    fn ordered_indices(&self, stage: TransformStage) -> Result<Vec<usize>> {
        let members: Vec<usize> = (0..self.transformers.len())
            .filter(|index| self.transformers[*index].stage() == stage)
            .collect();
        let mut ordered: Vec<usize> = Vec::with_capacity(members.len());

        while ordered.len() < members.len() {
            let next = members.iter().copied().find(|candidate| {
                !ordered.contains(candidate)
                    && self.transformers[*candidate]
                        .runs_after()
                        .iter()
                        .all(|dependency| {
                            members
                                .iter()
                                .filter(|member| self.transformers[**member].name() == *dependency)
                                .all(|member| ordered.contains(member))
                        })
            });

            match next {
                Some(index) => ordered.push(index),
                None => {
                    let blocked = members
                        .iter()
                        .find(|member| !ordered.contains(*member))
                        .map_or("<unknown>", |member| self.transformers[*member].name());
                    return Err(TransformError::TransformerCycle(blocked));
                }
            }
        }
        Ok(ordered)
    }
}

/// Fans one traversal out to every transformer of a stage.
///
/// On enter, the first transformer asking to skip or replace wins. On leave,
/// every transformer sees the node, each one seeing the replacement made by
/// the previous one.
pub struct StageVisitor<'a> {
    transformers: Vec<&'a mut dyn NodeTransformer>,
}

impl Visitor for StageVisitor<'_> {
    fn enter(
        &mut self,
        cx: &mut TransformContext,
        node: NodeId,
        parent: Option<NodeId>,
    ) -> Result<VisitorResult> {
        for transformer in self.transformers.iter_mut() {
            match transformer.enter(cx, node, parent)? {
                VisitorResult::Continue => {}
                result => return Ok(result),
            }
        }
        Ok(VisitorResult::Continue)
    }

    fn leave(
        &mut self,
        cx: &mut TransformContext,
        node: NodeId,
        parent: Option<NodeId>,
    ) -> Result<VisitorResult> {
        let mut current = node;
        for transformer in self.transformers.iter_mut() {
            if let VisitorResult::Replace(replacement) = transformer.leave(cx, current, parent)? {
                current = replacement;
            }
        }
        if current == node {
            Ok(VisitorResult::Continue)
        } else {
            Ok(VisitorResult::Replace(current))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Ast, SourceType};
    use std::any::Any;

    struct Named {
        name: &'static str,
        stage: TransformStage,
        after: &'static [&'static str],
        entered: usize,
    }

    impl Named {
        fn boxed(
            name: &'static str,
            stage: TransformStage,
            after: &'static [&'static str],
        ) -> Box<dyn NodeTransformer> {
            Box::new(Named {
                name,
                stage,
                after,
                entered: 0,
            })
        }
    }

    impl Visitor for Named {
        fn enter(
            &mut self,
            _cx: &mut TransformContext,
            _node: NodeId,
            _parent: Option<NodeId>,
        ) -> Result<VisitorResult> {
            self.entered += 1;
            Ok(VisitorResult::Continue)
        }
    }

    impl NodeTransformer for Named {
        fn name(&self) -> &'static str {
            self.name
        }

        fn stage(&self) -> TransformStage {
            self.stage
        }

        fn runs_after(&self) -> &'static [&'static str] {
            self.after
        }

        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }
    }

    #[test]
    fn test_runs_after_orders_within_stage() {
        let mut pipeline = StagePipeline::new();
        pipeline.add(Named::boxed("wrappers", TransformStage::StringArray, &["strings"]));
        pipeline.add(Named::boxed("strings", TransformStage::StringArray, &[]));
        pipeline.add(Named::boxed("flatten", TransformStage::ControlFlowFlattening, &[]));

        assert_eq!(
            pipeline.stage_order(TransformStage::StringArray).unwrap(),
            vec!["strings", "wrappers"]
        );
        assert_eq!(
            pipeline
                .stage_order(TransformStage::ControlFlowFlattening)
                .unwrap(),
            vec!["flatten"]
        );
    }

    #[test]
    fn test_missing_dependency_is_ignored() {
        let mut pipeline = StagePipeline::new();
        pipeline.add(Named::boxed("wrappers", TransformStage::StringArray, &["absent"]));
        assert_eq!(
            pipeline.stage_order(TransformStage::StringArray).unwrap(),
            vec!["wrappers"]
        );
    }

    #[test]
    fn test_cycle_is_reported() {
        let mut pipeline = StagePipeline::new();
        pipeline.add(Named::boxed("a", TransformStage::StringArray, &["b"]));
        pipeline.add(Named::boxed("b", TransformStage::StringArray, &["a"]));

        let ast = Ast::new(SourceType::Script);
        let mut cx = TransformContext::new(ast, Some(1), "");
        assert!(matches!(
            pipeline.run(&mut cx),
            Err(TransformError::TransformerCycle("a"))
        ));
    }

    #[test]
    fn test_every_transformer_visits_every_node() {
        let mut pipeline = StagePipeline::new();
        pipeline.add(Named::boxed("one", TransformStage::StringArray, &[]));
        pipeline.add(Named::boxed("two", TransformStage::StringArray, &[]));

        let mut ast = Ast::new(SourceType::Script);
        let x = ast.identifier("x");
        let statement = ast.expression_statement(x);
        let root = ast.root();
        ast.push_statement(root, statement).unwrap();
        let mut cx = TransformContext::new(ast, Some(1), "");
        pipeline.run(&mut cx).unwrap();

        for transformer in pipeline.transformers_mut() {
            let named = transformer.as_any_mut().downcast_mut::<Named>().unwrap();
            assert_eq!(named.entered, 3);
        }
    }
}
