//! Error types
//!
//! The simulation itself never fails; everything in here comes from the
//! edges of the game: asset loading and configuration.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GameError {
    #[error("failed to load asset `{asset}`: {reason}")]
    AssetLoad { asset: String, reason: String },

    #[error("{remaining} required asset(s) still loading")]
    AssetsPending { remaining: usize },

    #[error("unknown asset `{0}`")]
    UnknownAsset(String),

    #[error("invalid tuning: {0}")]
    InvalidTuning(String),

    #[error("malformed config: {0}")]
    Config(#[from] serde_json::Error),

    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T, E = GameError> = std::result::Result<T, E>;
