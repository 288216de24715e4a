pub mod deal;
pub mod error;
pub mod market;
pub mod types;

pub use error::DealError;
pub use types::*;

/// Standard result type for all pisoflip operations
pub type DealResult<T> = Result<T, DealError>;
