use crate::ast::{Ast, NodeFlags, NodeId};
use crate::storage::{ParameterIndexes, StringArrayStorageItem};
use crate::util::RandomGenerator;

/// Filler for parameter slots of function wrappers that carry nothing.
const MAX_FILLER_VALUE: i64 = 1000;

/// Accessor a string-array call goes through.
#[derive(Debug, Clone)]
pub struct CallTarget {
    pub name: String,
    pub index_shift: i64,
    /// Slot layout for function wrappers, with the total slot count.
    pub parameters: Option<(ParameterIndexes, usize)>,
}

/// Statements of a string-array call: a single `<target>(<args>);`.
///
/// The emitted index is `item.index + storage_index_shift + target.index_shift`.
/// The decode key literal is flagged so it never becomes an array item itself.
pub fn build_string_array_call(
    ast: &mut Ast,
    random: &mut RandomGenerator,
    item: &StringArrayStorageItem,
    storage_index_shift: i64,
    target: &CallTarget,
) -> Vec<NodeId> {
    let index = item.index as i64 + storage_index_shift + target.index_shift;

    let arguments = match target.parameters {
        None => {
            let mut arguments = vec![ast.number_literal(index as f64)];
            if let Some(key) = &item.decode_key {
                arguments.push(decode_key_literal(ast, key));
            }
            arguments
        }
        Some((slots, count)) => (0..count)
            .map(|position| {
                if position == slots.value_index_param_pos {
                    return ast.number_literal(index as f64);
                }
                match &item.decode_key {
                    Some(key) if position == slots.decode_key_param_pos => {
                        decode_key_literal(ast, key)
                    }
                    _ => {
                        let filler = random.get_random_integer(0, MAX_FILLER_VALUE);
                        ast.number_literal(filler as f64)
                    }
                }
            })
            .collect(),
    };

    let callee = ast.identifier(target.name.as_str());
    let call = ast.call(callee, arguments);
    vec![ast.expression_statement(call)]
}

fn decode_key_literal(ast: &mut Ast, key: &str) -> NodeId {
    let literal = ast.string_literal(key);
    ast.add_flags(literal, NodeFlags::STRING_ARRAY_CALL_LITERAL);
    literal
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::SourceType;
    use crate::config::StringArrayEncoding;

    fn item(decode_key: Option<&str>) -> StringArrayStorageItem {
        StringArrayStorageItem {
            value: "value".to_string(),
            index: 3,
            encoding: if decode_key.is_some() {
                StringArrayEncoding::Rc4
            } else {
                StringArrayEncoding::None
            },
            decode_key: decode_key.map(str::to_string),
            encoded_value: String::new(),
        }
    }

    #[test]
    fn test_root_call_with_shift() {
        let mut ast = Ast::new(SourceType::Script);
        let mut random = RandomGenerator::new(Some(1));
        let target = CallTarget {
            name: "_0xroot".to_string(),
            index_shift: 0,
            parameters: None,
        };
        let statements = build_string_array_call(&mut ast, &mut random, &item(None), 100, &target);

        assert_eq!(statements.len(), 1);
        assert_eq!(ast.render(statements[0]), "_0xroot(103);");
    }

    #[test]
    fn test_rc4_key_is_flagged() {
        let mut ast = Ast::new(SourceType::Script);
        let mut random = RandomGenerator::new(Some(1));
        let target = CallTarget {
            name: "_0xw".to_string(),
            index_shift: -3,
            parameters: None,
        };
        let statements =
            build_string_array_call(&mut ast, &mut random, &item(Some("aB3d")), 0, &target);
        let rendered = ast.render(statements[0]);
        assert_eq!(rendered, "_0xw(0, 'aB3d');");

        let flagged = ast
            .descendants(statements[0])
            .into_iter()
            .filter(|id| ast.has_flags(*id, NodeFlags::STRING_ARRAY_CALL_LITERAL))
            .count();
        assert_eq!(flagged, 1);
    }

    #[test]
    fn test_function_wrapper_fills_every_slot() {
        let mut ast = Ast::new(SourceType::Script);
        let mut random = RandomGenerator::new(Some(1));
        let target = CallTarget {
            name: "_0xw".to_string(),
            index_shift: 10,
            parameters: Some((
                ParameterIndexes {
                    value_index_param_pos: 2,
                    decode_key_param_pos: 0,
                },
                4,
            )),
        };
        let statements =
            build_string_array_call(&mut ast, &mut random, &item(Some("kEy1")), 0, &target);
        let rendered = ast.render(statements[0]);

        let pattern = regex_lite::Regex::new(r"^_0xw\('kEy1', \d+, 13, \d+\);$").unwrap();
        assert!(pattern.is_match(&rendered), "unexpected call: {rendered}");
    }
}
