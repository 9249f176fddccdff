//! Driven port for one-time secrets.

/// Source of unguessable token values.
#[cfg_attr(test, mockall::automock)]
pub trait SecretGenerator: Send + Sync {
    fn generate(&self) -> String;
}
