use thiserror::Error;

use crate::swatch::SwatchId;

#[derive(Debug, Error)]
pub enum PaletteError {
    /// A channel mode tag that no channel understands, e.g. `"bogus"`.
    #[error("unknown {channel} mode `{tag}`")]
    UnknownMode { channel: &'static str, tag: String },

    #[error("unknown action type `{0}`")]
    UnknownAction(String),

    #[error("invalid value for `{action}`: {reason}")]
    InvalidActionValue { action: String, reason: String },

    #[error("no swatch with id {0}")]
    UnknownSwatch(SwatchId),

    /// Propagation reached the same swatch twice.
    #[error("swatch {id} is part of a parent cycle")]
    Cycle { id: SwatchId },

    #[error("swatch id space exhausted")]
    IdsExhausted,

    #[error("invalid hex color `{0}`")]
    InvalidHex(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl PaletteError {
    /// Whether this error points at a defect upstream (bad mode tag, bad action
    /// type, malformed tree) rather than bad runtime data.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            PaletteError::UnknownMode { .. }
                | PaletteError::UnknownAction(_)
                | PaletteError::Cycle { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, PaletteError>;
