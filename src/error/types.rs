use thiserror::Error;

/// Unified result type for the matchgrid crate.
pub type Result<T> = std::result::Result<T, GameError>;

/// Errors surfaced by the game core and its terminal adapters.
///
/// Configuration problems never appear here: invalid pair descriptors are
/// validated up front and silently omitted from the roster. Invariant
/// violations inside the state machine are debug assertions and defensive
/// no-ops rather than recoverable errors.
#[derive(Debug, Error)]
pub enum GameError {
    #[error("item index {0} out of bounds")]
    ItemOutOfBounds(usize),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
