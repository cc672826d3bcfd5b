/// Scopes up to this many statements get one storage entry per statement.
const LIMIT_THRESHOLD: usize = 25;
/// Growth of the bound per statement beyond the threshold.
const LIMIT_GROWTH: f64 = 0.002;

/// Upper index of the indirection entries a block scope of
/// `block_scope_statement_count` statements may accumulate.
///
/// Equal to `count - 1` for small scopes, then grows by one roughly every
/// 500 statements: 5 → 4, 25 → 24, 1000 → 26, 10000 → 44.
pub fn get_limit_index(block_scope_statement_count: usize) -> usize {
    let last_index = block_scope_statement_count.saturating_sub(1);
    if last_index < LIMIT_THRESHOLD {
        return last_index;
    }

    let limit = ((LIMIT_THRESHOLD - 1) as f64 + last_index as f64 * LIMIT_GROWTH).round() as usize;
    limit.min(last_index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_reference_points() {
        assert_eq!(get_limit_index(5), 4);
        assert_eq!(get_limit_index(25), 24);
        assert_eq!(get_limit_index(1000), 26);
        assert_eq!(get_limit_index(10000), 44);
    }

    #[test]
    fn test_empty_and_single_statement_scopes() {
        assert_eq!(get_limit_index(0), 0);
        assert_eq!(get_limit_index(1), 0);
    }

    proptest! {
        #[test]
        fn limit_index_is_monotonic(count in 0usize..200_000) {
            prop_assert!(get_limit_index(count) <= get_limit_index(count + 1));
        }

        #[test]
        fn limit_index_never_exceeds_last_index(count in 1usize..200_000) {
            prop_assert!(get_limit_index(count) <= count - 1);
        }
    }
}
