//! Entry point: configure the transformers, run every stage, collect what
//! the printer needs besides the tree.

use crate::ast::Ast;
use crate::config::ObfuscatorConfig;
use crate::error::Result;
use crate::storage::{ControlFlowStorage, ScopeCallsWrappersStorage, StringArrayStorage};
use crate::transform::control_flow::FunctionControlFlowTransformer;
use crate::transform::string_array::{
    StringArrayOptions, StringArrayScopeCallsWrapperTransformer, StringArrayTransformer,
};
use crate::transform::{StagePipeline, TransformContext};
use std::cell::RefCell;
use std::rc::Rc;
use tracing::{debug, info};

/// Rewritten tree plus the storages its rewritten nodes refer to.
#[derive(Debug)]
pub struct ObfuscationResult {
    pub ast: Ast,
    /// Seed the run used; replaying it reproduces the output exactly.
    pub seed: u64,
    /// One per flattened function, innermost functions first.
    pub control_flow_storages: Vec<ControlFlowStorage>,
    /// `None` when the string array is disabled.
    pub string_array: Option<StringArrayStorage>,
}

pub struct Obfuscator {
    config: ObfuscatorConfig,
}

impl Obfuscator {
    pub fn new(config: ObfuscatorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ObfuscatorConfig {
        &self.config
    }

    pub fn obfuscate(&self, ast: Ast) -> Result<ObfuscationResult> {
        let mut cx = TransformContext::new(ast, self.config.seed, &self.config.identifiers_prefix);
        let seed = cx.random.seed();
        info!(seed, nodes = cx.ast.len(), "obfuscation started");

        let mut pipeline = self.build_pipeline();
        pipeline.run(&mut cx)?;

        let mut control_flow_storages = Vec::new();
        let mut string_array = None;
        for transformer in pipeline.transformers_mut() {
            let any = transformer.as_any_mut();
            if let Some(control_flow) = any.downcast_mut::<FunctionControlFlowTransformer>() {
                control_flow_storages.extend(control_flow.take_storages());
            } else if let Some(strings) = any.downcast_mut::<StringArrayTransformer>() {
                string_array = strings.take_storage();
            }
        }

        info!(
            seed,
            control_flow_storages = control_flow_storages.len(),
            string_array_items = string_array.as_ref().map_or(0, StringArrayStorage::len),
            "obfuscation finished"
        );
        Ok(ObfuscationResult {
            ast: cx.ast,
            seed,
            control_flow_storages,
            string_array,
        })
    }

    fn build_pipeline(&self) -> StagePipeline {
        let config = &self.config;
        let mut pipeline = StagePipeline::new();

        if config.control_flow_flattening {
            debug!(
                threshold = config.control_flow_flattening_threshold,
                "control flow flattening enabled"
            );
            pipeline.add(Box::new(FunctionControlFlowTransformer::new(
                config.control_flow_flattening_threshold,
            )));
        }

        if config.string_array {
            let options = StringArrayOptions::from(config);
            debug!(?options, "string array enabled");
            let wrappers = Rc::new(RefCell::new(ScopeCallsWrappersStorage::new()));
            pipeline.add(Box::new(StringArrayTransformer::new(
                options,
                Rc::clone(&wrappers),
            )));
            pipeline.add(Box::new(StringArrayScopeCallsWrapperTransformer::new(
                wrappers,
                config.string_array_wrappers_parameters_max_count,
            )));
        }

        pipeline
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::SourceType;
    use crate::error::{ConfigError, TransformError};

    #[test]
    fn test_invalid_config_is_rejected_up_front() {
        let config = ObfuscatorConfig {
            string_array_wrappers_parameters_max_count: 0,
            ..ObfuscatorConfig::default()
        };
        assert!(matches!(
            Obfuscator::new(config),
            Err(TransformError::Config(ConfigError::TooFewWrapperParameters(0)))
        ));
    }

    #[test]
    fn test_disabled_transforms_return_tree_unchanged() {
        let mut ast = Ast::new(SourceType::Script);
        let id = ast.identifier("greeting");
        let init = ast.string_literal("hello");
        let declaration = ast.var_declaration(id, Some(init));
        let root = ast.root();
        ast.push_statement(root, declaration).unwrap();
        let before = ast.render(root);

        let obfuscator = Obfuscator::new(ObfuscatorConfig::no_additional_nodes().with_seed(1)).unwrap();
        let result = obfuscator.obfuscate(ast).unwrap();

        assert_eq!(result.ast.render(result.ast.root()), before);
        assert!(result.control_flow_storages.is_empty());
        assert!(result.string_array.is_none());
        assert_eq!(result.seed, 1);
    }
}
