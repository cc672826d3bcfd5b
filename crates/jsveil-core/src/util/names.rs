use super::random::RandomGenerator;
use rustc_hash::FxHashSet;

/// Generates hexadecimal identifier names (`_0x1a2b3c`).
///
/// Names found in the input program and every name handed out before are
/// never produced again, so generated storages and wrappers cannot shadow
/// user bindings or each other.
pub struct IdentifierNamesGenerator {
    prefix: String,
    preserved: FxHashSet<String>,
}

impl IdentifierNamesGenerator {
    const MIN_SEED: i64 = 10_000;
    const MAX_SEED: i64 = 99_999_999;
    const MAX_HEX_DIGITS: usize = 6;

    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            preserved: FxHashSet::default(),
        }
    }

    /// Reserve names that generated identifiers must not collide with.
    pub fn preserve_names(&mut self, names: impl IntoIterator<Item = String>) {
        self.preserved.extend(names);
    }

    pub fn is_preserved(&self, name: &str) -> bool {
        self.preserved.contains(name)
    }

    /// Name for a binding in a nested lexical scope.
    pub fn generate_next(&mut self, random: &mut RandomGenerator) -> String {
        self.generate_with_prefix(random, "")
    }

    /// Name for a binding in the program scope; carries the configured prefix.
    pub fn generate_for_global_scope(&mut self, random: &mut RandomGenerator) -> String {
        let prefix = self.prefix.clone();
        self.generate_with_prefix(random, &prefix)
    }

    fn generate_with_prefix(&mut self, random: &mut RandomGenerator, prefix: &str) -> String {
        loop {
            let seed = random.get_random_integer(Self::MIN_SEED, Self::MAX_SEED);
            let mut hex = format!("{seed:x}");
            hex.truncate(Self::MAX_HEX_DIGITS);
            let name = format!("{prefix}_0x{hex}");
            if self.preserved.insert(name.clone()) {
                return name;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_names_are_hexadecimal() {
        let mut random = RandomGenerator::new(Some(5));
        let mut names = IdentifierNamesGenerator::new("");
        for _ in 0..50 {
            let name = names.generate_next(&mut random);
            let digits = name.strip_prefix("_0x").unwrap();
            assert!((4..=6).contains(&digits.len()), "unexpected name {name}");
            assert!(digits.chars().all(|c| c.is_ascii_hexdigit()));
        }
    }

    #[test]
    fn test_generated_names_never_repeat() {
        let mut random = RandomGenerator::new(Some(9));
        let mut names = IdentifierNamesGenerator::new("");
        let mut seen = FxHashSet::default();
        for _ in 0..500 {
            assert!(seen.insert(names.generate_next(&mut random)));
        }
    }

    #[test]
    fn test_preserved_names_are_skipped() {
        let mut random = RandomGenerator::new(Some(2));
        let first = IdentifierNamesGenerator::new("").generate_next(&mut random);

        let mut random = RandomGenerator::new(Some(2));
        let mut names = IdentifierNamesGenerator::new("");
        names.preserve_names([first.clone()]);
        assert_ne!(names.generate_next(&mut random), first);
    }

    #[test]
    fn test_global_scope_names_carry_prefix() {
        let mut random = RandomGenerator::new(Some(4));
        let mut names = IdentifierNamesGenerator::new("app");
        assert!(names.generate_for_global_scope(&mut random).starts_with("app_0x"));
        assert!(names.generate_next(&mut random).starts_with("_0x"));
    }
}
