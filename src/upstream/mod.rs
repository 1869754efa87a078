pub mod gemini;
pub mod mock;

use std::fmt;

use anyhow::Result;
use async_trait::async_trait;
use thiserror::Error;

/// What the upstream API made of a single question.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    /// Answer text found where it was expected.
    Answer(String),
    /// The API answered, but without usable text.
    NoAnswer(DecodeError),
    /// The API answered with an error payload (quota, bad key, ...).
    Rejected(Rejection),
}

/// Why a reply carried no answer text.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DecodeError {
    #[error("`{path}` is absent")]
    Absent { path: String },
    #[error("`{path}` is empty")]
    Empty { path: String },
    #[error("`{path}` should be {expected}, found {found}")]
    Malformed {
        path: String,
        expected: &'static str,
        found: &'static str,
    },
}

/// An error payload returned by the upstream API.
#[derive(Debug, Clone, PartialEq)]
pub struct Rejection {
    pub code: Option<i64>,
    pub status: Option<String>,
    pub message: String,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match (self.code, self.status.as_deref()) {
            (Some(code), Some(status)) => format!("{code} {status}"),
            (Some(code), None) => code.to_string(),
            (None, Some(status)) => status.to_string(),
            (None, None) => "unknown".to_string(),
        };
        write!(f, "Gemini API error ({}): {}", label, self.message)
    }
}

/// The service that actually answers. Gemini in production, a script in tests.
///
/// `Err` means the call itself failed (network, unreadable body). Anything
/// the API managed to say comes back as a [`Reply`].
#[async_trait]
pub trait Upstream: Send + Sync {
    async fn ask(&self, question: &str) -> Result<Reply>;
}
