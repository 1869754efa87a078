//! Speech capability seam.
//!
//! Recognition and synthesis live outside the program (a browser, an OS voice,
//! a test script). The client only sees this trait, so its logic runs anywhere.

pub mod command;
pub mod mock;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::consts::{SPEECH_LOCALE, SPEECH_RATE};

/// How a single recognition pass is configured.
#[derive(Debug, Clone, PartialEq)]
pub struct RecognitionOptions {
    pub locale: String,
    pub continuous: bool,
    pub interim_results: bool,
    pub max_alternatives: u32,
}

impl Default for RecognitionOptions {
    /// One utterance, final results only, best alternative only.
    fn default() -> Self {
        Self {
            locale: SPEECH_LOCALE.to_string(),
            continuous: false,
            interim_results: false,
            max_alternatives: 1,
        }
    }
}

/// One unit of synthesized speech.
#[derive(Debug, Clone, PartialEq)]
pub struct Utterance {
    pub text: String,
    pub locale: String,
    pub rate: f32,
}

impl Utterance {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            locale: SPEECH_LOCALE.to_string(),
            rate: SPEECH_RATE,
        }
    }
}

/// Why recognition produced no transcript.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RecognitionError {
    #[error("speech recognition is not supported")]
    Unsupported,
    #[error("no speech detected")]
    NoSpeech,
    #[error("microphone permission denied")]
    PermissionDenied,
    #[error("speech recognition failed: {0}")]
    Other(String),
}

impl RecognitionError {
    /// Classify a browser-style error code (`no-speech`, `not-allowed`, ...).
    pub fn from_code(code: &str) -> Self {
        match code {
            "no-speech" => Self::NoSpeech,
            "not-allowed" | "service-not-allowed" => Self::PermissionDenied,
            other => Self::Other(other.to_string()),
        }
    }
}

#[async_trait]
pub trait Speech: Send + Sync {
    /// Listen for one utterance and return its transcript.
    async fn recognize_once(
        &self,
        options: &RecognitionOptions,
    ) -> Result<String, RecognitionError>;

    /// Hand an utterance to the speech engine. Returns without waiting for
    /// playback; nothing already playing is cancelled.
    async fn speak(&self, utterance: Utterance);
}

#[async_trait]
impl<T: Speech + ?Sized> Speech for Arc<T> {
    async fn recognize_once(
        &self,
        options: &RecognitionOptions,
    ) -> Result<String, RecognitionError> {
        (**self).recognize_once(options).await
    }

    async fn speak(&self, utterance: Utterance) {
        (**self).speak(utterance).await
    }
}

/// No microphone, no voice.
pub struct Muted;

#[async_trait]
impl Speech for Muted {
    async fn recognize_once(
        &self,
        _options: &RecognitionOptions,
    ) -> Result<String, RecognitionError> {
        Err(RecognitionError::Unsupported)
    }

    async fn speak(&self, _utterance: Utterance) {}
}
