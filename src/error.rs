use std::fmt;

use reqwest::StatusCode;

/// Which of the two lookups a failure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    TitleSearch,
    ThumbnailLookup,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::TitleSearch => f.write_str("title search"),
            Phase::ThumbnailLookup => f.write_str("thumbnail lookup"),
        }
    }
}

/// Any failure while talking to the Wikipedia API.
#[derive(Debug, thiserror::Error)]
pub enum LookupFailed {
    #[error("{phase} request failed: {source}")]
    Transport {
        phase: Phase,
        #[source]
        source: reqwest::Error,
    },

    #[error("{phase} returned HTTP {status}")]
    Status { phase: Phase, status: StatusCode },

    #[error("{phase} response is not valid JSON: {source}")]
    Decode {
        phase: Phase,
        #[source]
        source: serde_json::Error,
    },

    #[error("{phase} response has an unexpected shape: {detail}")]
    Shape { phase: Phase, detail: String },
}

impl LookupFailed {
    pub fn phase(&self) -> Phase {
        match self {
            LookupFailed::Transport { phase, .. }
            | LookupFailed::Status { phase, .. }
            | LookupFailed::Decode { phase, .. }
            | LookupFailed::Shape { phase, .. } => *phase,
        }
    }
}
