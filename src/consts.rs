//! Project-wide constants.

pub const AUTHOR: &str = env!("CARGO_PKG_AUTHORS");
pub const HOMEPAGE: &str = env!("CARGO_PKG_HOMEPAGE");
pub const REPO: &str = env!("CARGO_PKG_REPOSITORY");

/// Default Gemini model when none is specified.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Base URL of the Generative Language API.
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com";

/// Environment variable holding the server-side Gemini key.
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Default port for `parley` (relay mode).
pub const DEFAULT_PORT: u16 = 3000;

/// Answer relayed when the upstream reply carries no usable text.
pub const FALLBACK_ANSWER: &str = "No reply from Gemini";

/// Error body for anything but `POST /api/chat`.
pub const METHOD_NOT_ALLOWED: &str = "Method not allowed";

/// Error body when the upstream call itself fails.
pub const UPSTREAM_FAILED: &str = "Failed to fetch from Gemini";

/// Answer shown by the client when the relay cannot be reached.
pub const CLIENT_ERROR_ANSWER: &str = "Sorry, something went wrong. Please try again.";

/// Locale used for both recognition and synthesis.
pub const SPEECH_LOCALE: &str = "en-US";

/// Synthesis rate (1.0 is the engine's normal speed).
pub const SPEECH_RATE: f32 = 1.0;
