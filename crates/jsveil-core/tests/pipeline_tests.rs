use jsveil_core::{
    ConfigError, NodeFlags, ObfuscatorConfig, Obfuscator, StringArrayEncoding, TransformError,
};
use jsveil_test_helpers::fixtures::{
    function_with_binary, function_with_mixed_expressions, function_with_strings,
    nested_scopes_program,
};
use regex_lite::Regex;
use jsveil_test_helpers::{control_flow_only, obfuscate, render_program, string_array_only};

#[test]
fn test_same_seed_same_output() {
    let run = || {
        let (ast, _) = function_with_strings(2);
        let result = obfuscate(ast, ObfuscatorConfig::high_obfuscation().with_seed(42))
            .expect("obfuscation failed");
        let storage = result.string_array.expect("string array enabled");
        let items: Vec<(String, usize, String)> = storage
            .items()
            .map(|item| (item.value.clone(), item.index, item.encoded_value.clone()))
            .collect();
        (render_program(&result.ast), items, storage.rotation_amount())
    };

    assert_eq!(run(), run());
}

#[test]
fn test_seed_is_reported() {
    let (ast, _) = function_with_binary(0);
    let result = obfuscate(ast, control_flow_only(1234)).expect("obfuscation failed");
    assert_eq!(result.seed, 1234);

    let (ast, _) = function_with_binary(0);
    let config = ObfuscatorConfig {
        seed: None,
        ..control_flow_only(0)
    };
    let first = obfuscate(ast, config.clone()).expect("obfuscation failed");
    let (ast, _) = function_with_binary(0);
    let replay = obfuscate(ast, config.with_seed(first.seed)).expect("obfuscation failed");
    assert_eq!(render_program(&first.ast), render_program(&replay.ast));
}

#[test]
fn test_full_threshold_extracts_every_eligible_expression() {
    for seed in 0..20 {
        let (ast, body) = function_with_mixed_expressions();
        let result = obfuscate(ast, control_flow_only(seed)).expect("obfuscation failed");
        let storage = &result.control_flow_storages[0];

        let statements = result.ast.kind(body).statements().unwrap().to_vec();
        assert_eq!(statements.len(), 3);
        assert!(result
            .ast
            .has_flags(statements[0], NodeFlags::CONTROL_FLOW_GENERATED));
        let rest: String = statements[1..]
            .iter()
            .map(|statement| result.ast.render(*statement))
            .collect();

        for unreplaced in [" + ", " - ", " && ", "foo(", "'string literal'"] {
            assert!(!rest.contains(unreplaced), "`{unreplaced}` left in: {rest}");
        }
        // a + b, - c, a && b, foo(...) and the literal
        assert_eq!(
            rest.matches(&format!("{}['", storage.id())).count(),
            5,
            "unexpected body: {rest}"
        );
    }
}

#[test]
fn test_string_array_sweeps_control_flow_storage() {
    let (ast, body) = function_with_strings(0);
    let config = ObfuscatorConfig {
        control_flow_flattening: true,
        control_flow_flattening_threshold: 1.0,
        ..string_array_only(3)
    };
    let result = obfuscate(ast, config).expect("obfuscation failed");

    let control_flow = &result.control_flow_storages[0];
    let strings = result.string_array.as_ref().unwrap();

    assert!(strings.get("string literal", StringArrayEncoding::None).is_some());
    for key in control_flow.keys() {
        assert!(
            strings.get(key, StringArrayEncoding::None).is_some(),
            "storage key {key} was not moved to the string array"
        );
    }

    let rendered = result.ast.render(body);
    assert!(!rendered.contains("'string literal'"), "unexpected body: {rendered}");
    // object keys of the storage are never extracted
    for key in control_flow.keys() {
        assert!(rendered.contains(&format!("{{'{key}': ")) || rendered.contains(&format!(", '{key}': ")));
    }
}

#[test]
fn test_control_flow_keys_are_unique_and_sized() {
    for seed in 0..50 {
        let (ast, _) = function_with_strings(3);
        let result = obfuscate(ast, control_flow_only(seed)).expect("obfuscation failed");
        for storage in &result.control_flow_storages {
            let keys: Vec<&str> = storage.keys().collect();
            let mut unique = keys.clone();
            unique.sort_unstable();
            unique.dedup();
            assert_eq!(unique.len(), keys.len());
            assert!(keys.iter().all(|key| key.len() == 5));
        }
    }
}

#[test]
fn test_scope_wrappers_precede_control_flow_storage() {
    let (ast, body) = function_with_strings(0);
    let result = obfuscate(ast, ObfuscatorConfig::high_obfuscation().with_seed(21))
        .expect("obfuscation failed");
    let ast = &result.ast;
    let storage_id = result.control_flow_storages[0].id();

    let statements = ast.kind(body).statements().unwrap().to_vec();
    let wrapper_count = statements
        .iter()
        .take_while(|statement| ast.has_flags(**statement, NodeFlags::IGNORED))
        .count();
    assert!(wrapper_count > 0, "no wrappers in: {}", ast.render(body));

    let wrapper = Regex::new(r"^function (_0x[0-9a-f]+)\(").unwrap();
    let names: Vec<String> = statements[..wrapper_count]
        .iter()
        .map(|statement| {
            let rendered = ast.render(*statement);
            wrapper
                .captures(&rendered)
                .unwrap_or_else(|| panic!("unexpected wrapper: {rendered}"))[1]
                .to_string()
        })
        .collect();

    let declaration = statements[wrapper_count];
    assert!(ast.has_flags(declaration, NodeFlags::CONTROL_FLOW_GENERATED));
    let rendered = ast.render(declaration);
    assert!(rendered.starts_with(&format!("var {storage_id} = {{")));
    // the storage values go through the wrappers declared above them
    assert!(
        names.iter().any(|name| rendered.contains(&format!("{name}("))),
        "storage does not use the wrappers: {rendered}"
    );
}

#[test]
fn test_generated_names_do_not_shadow_program_names() {
    let (ast, _, _) = nested_scopes_program();
    let config = ObfuscatorConfig {
        string_array_wrappers_count: 1,
        ..string_array_only(4)
    };
    let result = obfuscate(ast, config).expect("obfuscation failed");
    let storage = result.string_array.as_ref().unwrap();

    for name in ["top", "outer", "first", "second", "inner"] {
        assert_ne!(storage.storage_name(), name);
        assert!(storage.root_wrapper_names().all(|(_, root)| root != name));
    }
}

#[test]
fn test_invalid_threshold_is_rejected() {
    let config = ObfuscatorConfig {
        control_flow_flattening_threshold: 2.0,
        ..ObfuscatorConfig::default()
    };
    assert!(matches!(
        Obfuscator::new(config),
        Err(TransformError::Config(ConfigError::ThresholdOutOfRange {
            name: "controlFlowFlatteningThreshold",
            ..
        }))
    ));
}

#[test]
fn test_empty_encoding_set_is_rejected() {
    let result = ObfuscatorConfig::from_json_str(r#"{ "stringArray": true, "stringArrayEncoding": [] }"#);
    assert!(matches!(result, Err(ConfigError::EmptyEncodingSet)));

    let result =
        ObfuscatorConfig::from_json_str(r#"{ "stringArray": false, "stringArrayEncoding": [] }"#);
    assert!(result.is_ok());
}

#[test]
fn test_unknown_encoding_fails_to_parse() {
    let result = ObfuscatorConfig::from_json_str(r#"{ "stringArrayEncoding": ["rot13"] }"#);
    assert!(matches!(result, Err(ConfigError::Parse(_))));
}
