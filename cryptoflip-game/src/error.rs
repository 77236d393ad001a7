use thiserror::Error;

pub type Result<T> = std::result::Result<T, GameError>;

#[derive(Error, Debug)]
pub enum GameError {
    #[error("Core error: {0}")]
    Core(#[from] cryptoflip_core::CryptoflipError),

    #[error("Flip already in progress")]
    FlipInProgress,

    #[error("Insufficient balance: need {need} coins, have {available} coins")]
    InsufficientBalance { need: u64, available: u64 },

    #[error("Invalid bet: {0}")]
    InvalidBet(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
