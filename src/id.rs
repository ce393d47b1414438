//! Random identifier generation

use rand::{Rng, SeedableRng, rngs::StdRng};

/// Alphabet ids are drawn from
pub const ID_ALPHABET: &[u8] = b"1234567890abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Length of every generated id
pub const ID_LENGTH: usize = 16;

/// Uniform generator of fixed-length alphanumeric ids.
///
/// Seeded once on construction; each store owns its own instance.
#[derive(Debug, Clone)]
pub struct IdGenerator {
    rng: StdRng,
}

impl IdGenerator {
    /// Seeds from operating system entropy.
    pub fn new() -> IdGenerator {
        IdGenerator { rng: StdRng::from_entropy() }
    }

    /// Seeds deterministically, same seed yields the same id sequence.
    pub fn with_seed(seed: u64) -> IdGenerator {
        IdGenerator { rng: StdRng::seed_from_u64(seed) }
    }

    /// Draws one candidate id, without checking for collisions.
    pub fn candidate(&mut self) -> String {
        (0..ID_LENGTH)
            .map(|_| ID_ALPHABET[self.rng.gen_range(0..ID_ALPHABET.len())] as char)
            .collect()
    }

    /// Draws candidates until `in_use` rejects none.
    ///
    /// Loops forever if every possible id is taken.
    pub fn generate(&mut self, in_use: impl Fn(&str) -> bool) -> String {
        loop {
            let id = self.candidate();
            if !in_use(&id) {
                return id;
            }
        }
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}
