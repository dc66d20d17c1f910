use thiserror::Error;

/// Engine error taxonomy.
///
/// `Validation` errors are recoverable: the command is rejected and the
/// session state is unchanged. `Invariant` errors are fatal for the session.
/// `ShoeExhausted` is fatal for the round only; the round is voided as a
/// push. `Configuration` errors surface synchronously at construction.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EngineError {
    /// Command not legal in the current state (bad bet, split on non-pair, ...).
    #[error("invalid action: {0}")]
    Validation(String),
    /// A state the engine must never reach.
    #[error("engine invariant violated: {0}")]
    Invariant(String),
    /// Dealing was requested with no cards left and reshuffle disallowed mid-round.
    #[error("shoe exhausted")]
    ShoeExhausted,
    /// Rule set or counting system rejected at construction.
    #[error("invalid configuration: {0}")]
    Configuration(String),
}

impl EngineError {
    pub fn validation(msg: impl Into<String>) -> Self {
        EngineError::Validation(msg.into())
    }
}
