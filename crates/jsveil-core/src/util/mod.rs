pub mod crypt;
pub mod names;
pub mod random;

pub use names::IdentifierNamesGenerator;
pub use random::RandomGenerator;
