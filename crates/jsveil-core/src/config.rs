//! Obfuscator options.
//!
//! Keys follow the camelCase names of the JavaScript tool family
//! (`controlFlowFlatteningThreshold`, `stringArrayEncoding`, ...). Every field
//! has a default, so partial JSON documents are accepted.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

/// Representation of string-array entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StringArrayEncoding {
    None,
    Base64,
    Rc4,
}

impl StringArrayEncoding {
    pub fn as_str(self) -> &'static str {
        match self {
            StringArrayEncoding::None => "none",
            StringArrayEncoding::Base64 => "base64",
            StringArrayEncoding::Rc4 => "rc4",
        }
    }
}

/// Shape of the per-scope calls wrappers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StringArrayWrappersType {
    /// `var w = root;`
    #[serde(alias = "variable")]
    Plain,
    /// `function w(p0, p1, ...) { return root(p_i - shift, p_j); }`
    Function,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ObfuscatorConfig {
    /// Fixed seed for every random draw. `None` seeds from entropy.
    pub seed: Option<u64>,

    pub control_flow_flattening: bool,
    /// Probability that an eligible expression is extracted.
    pub control_flow_flattening_threshold: f64,

    pub string_array: bool,
    /// Probability that an eligible string literal is moved into the array.
    pub string_array_threshold: f64,
    pub string_array_encoding: Vec<StringArrayEncoding>,
    pub string_array_index_shift: bool,
    pub string_array_rotate: bool,
    pub string_array_shuffle: bool,
    pub string_array_wrappers_count: usize,
    pub string_array_wrappers_type: StringArrayWrappersType,
    pub string_array_wrappers_parameters_max_count: usize,
    /// Leave literals inside async functions untouched.
    pub string_array_skip_async_functions: bool,

    /// Prefix for names generated in the global scope.
    pub identifiers_prefix: String,
}

impl Default for ObfuscatorConfig {
    fn default() -> Self {
        Self {
            seed: None,
            control_flow_flattening: false,
            control_flow_flattening_threshold: 0.75,
            string_array: true,
            string_array_threshold: 0.75,
            string_array_encoding: vec![StringArrayEncoding::None],
            string_array_index_shift: true,
            string_array_rotate: true,
            string_array_shuffle: true,
            string_array_wrappers_count: 1,
            string_array_wrappers_type: StringArrayWrappersType::Plain,
            string_array_wrappers_parameters_max_count: 2,
            string_array_skip_async_functions: false,
            identifiers_prefix: String::new(),
        }
    }
}

impl ObfuscatorConfig {
    /// Every transform disabled.
    pub fn no_additional_nodes() -> Self {
        Self {
            control_flow_flattening: false,
            string_array: false,
            ..Self::default()
        }
    }

    pub fn high_obfuscation() -> Self {
        Self {
            control_flow_flattening: true,
            control_flow_flattening_threshold: 1.0,
            string_array: true,
            string_array_threshold: 1.0,
            string_array_encoding: vec![StringArrayEncoding::Rc4],
            string_array_index_shift: true,
            string_array_rotate: true,
            string_array_shuffle: true,
            string_array_wrappers_count: 5,
            string_array_wrappers_type: StringArrayWrappersType::Function,
            string_array_wrappers_parameters_max_count: 5,
            ..Self::default()
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Parse a JSON options object and validate it.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        check_threshold(
            "controlFlowFlatteningThreshold",
            self.control_flow_flattening_threshold,
        )?;
        check_threshold("stringArrayThreshold", self.string_array_threshold)?;

        if self.string_array_wrappers_parameters_max_count < 2 {
            return Err(ConfigError::TooFewWrapperParameters(
                self.string_array_wrappers_parameters_max_count,
            ));
        }
        if self.string_array && self.string_array_encoding.is_empty() {
            return Err(ConfigError::EmptyEncodingSet);
        }
        Ok(())
    }

    /// Configured encodings without duplicates, in first-seen order.
    pub fn encodings(&self) -> Vec<StringArrayEncoding> {
        let mut encodings = Vec::with_capacity(self.string_array_encoding.len());
        for encoding in &self.string_array_encoding {
            if !encodings.contains(encoding) {
                encodings.push(*encoding);
            }
        }
        encodings
    }
}

fn check_threshold(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::ThresholdOutOfRange { name, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(ObfuscatorConfig::default().validate().is_ok());
        assert!(ObfuscatorConfig::high_obfuscation().validate().is_ok());
        assert!(ObfuscatorConfig::no_additional_nodes().validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = ObfuscatorConfig::from_json_str(
            r#"{
                "controlFlowFlattening": true,
                "stringArrayEncoding": ["base64", "rc4"],
                "stringArrayWrappersType": "variable",
                "seed": 42
            }"#,
        )
        .unwrap();

        assert!(config.control_flow_flattening);
        assert_eq!(config.control_flow_flattening_threshold, 0.75);
        assert_eq!(
            config.string_array_encoding,
            vec![StringArrayEncoding::Base64, StringArrayEncoding::Rc4]
        );
        assert_eq!(
            config.string_array_wrappers_type,
            StringArrayWrappersType::Plain
        );
        assert_eq!(config.seed, Some(42));
    }

    #[test]
    fn test_threshold_out_of_range_is_rejected() {
        let config = ObfuscatorConfig {
            string_array_threshold: 1.5,
            ..ObfuscatorConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ThresholdOutOfRange {
                name: "stringArrayThreshold",
                ..
            })
        ));

        let config = ObfuscatorConfig {
            control_flow_flattening_threshold: f64::NAN,
            ..ObfuscatorConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_negative_wrappers_count_fails_to_parse() {
        let result = ObfuscatorConfig::from_json_str(r#"{ "stringArrayWrappersCount": -1 }"#);
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_parameters_max_count_lower_bound() {
        let result =
            ObfuscatorConfig::from_json_str(r#"{ "stringArrayWrappersParametersMaxCount": 1 }"#);
        assert!(matches!(
            result,
            Err(ConfigError::TooFewWrapperParameters(1))
        ));
    }

    #[test]
    fn test_empty_encoding_set_only_matters_when_enabled() {
        let mut config = ObfuscatorConfig {
            string_array_encoding: Vec::new(),
            ..ObfuscatorConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::EmptyEncodingSet)
        ));

        config.string_array = false;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_encodings_are_deduplicated() {
        let config = ObfuscatorConfig {
            string_array_encoding: vec![
                StringArrayEncoding::Rc4,
                StringArrayEncoding::None,
                StringArrayEncoding::Rc4,
            ],
            ..ObfuscatorConfig::default()
        };
        assert_eq!(
            config.encodings(),
            vec![StringArrayEncoding::Rc4, StringArrayEncoding::None]
        );
    }
}
