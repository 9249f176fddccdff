//! Random one-time secrets for verification and reset tokens.

use rand::distributions::Alphanumeric;
use rand::{Rng, thread_rng};

use crate::domain::ports::SecretGenerator;

/// Length of generated secrets.
pub const SECRET_LENGTH: usize = 32;

/// [`SecretGenerator`] drawing alphanumeric characters from the thread RNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomSecretGenerator;

impl SecretGenerator for RandomSecretGenerator {
    fn generate(&self) -> String {
        thread_rng()
            .sample_iter(&Alphanumeric)
            .take(SECRET_LENGTH)
            .map(char::from)
            .collect()
    }
}
