//! The voice bot page, minus the browser.
//!
//! [`Page`] holds the same four pieces of state as the web page and runs the
//! same ask / listen / speak flow against the [`ChatApi`] and
//! [`Speech`] seams.

pub mod http;
pub mod mock;

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use thiserror::Error;

use crate::consts::CLIENT_ERROR_ANSWER;
use crate::speech::{RecognitionError, RecognitionOptions, Speech, Utterance};

/// Something that can answer a question. The relay, over HTTP, in practice.
#[async_trait]
pub trait ChatApi: Send + Sync {
    async fn ask(&self, question: &str) -> Result<String>;
}

#[async_trait]
impl<T: ChatApi + ?Sized> ChatApi for Arc<T> {
    async fn ask(&self, question: &str) -> Result<String> {
        (**self).ask(question).await
    }
}

/// Transient UI state. Nothing here outlives the process.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageState {
    pub question: String,
    pub answer: String,
    pub listening: bool,
    pub loading: bool,
}

/// A blocking message for the user. No request is made when one is raised.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Notice {
    #[error("Speech recognition is not supported in this browser. Try Chrome!")]
    Unsupported,
    #[error("No speech was detected. Please try again.")]
    NoSpeech,
    #[error("Microphone access was denied.")]
    PermissionDenied,
    #[error("Speech recognition error: {0}")]
    Failed(String),
}

impl From<RecognitionError> for Notice {
    fn from(err: RecognitionError) -> Self {
        match err {
            RecognitionError::Unsupported => Self::Unsupported,
            RecognitionError::NoSpeech => Self::NoSpeech,
            RecognitionError::PermissionDenied => Self::PermissionDenied,
            RecognitionError::Other(code) => Self::Failed(code),
        }
    }
}

/// Sets a flag and clears it again on drop, even if the owner is cancelled.
struct Raised<'a>(&'a mut bool);

impl<'a> Raised<'a> {
    fn new(flag: &'a mut bool) -> Self {
        *flag = true;
        Self(flag)
    }
}

impl Drop for Raised<'_> {
    fn drop(&mut self) {
        *self.0 = false;
    }
}

pub struct Page {
    api: Box<dyn ChatApi>,
    speech: Box<dyn Speech>,
    state: PageState,
}

impl Page {
    pub fn new(api: Box<dyn ChatApi>, speech: Box<dyn Speech>) -> Self {
        Self {
            api,
            speech,
            state: PageState::default(),
        }
    }

    pub fn state(&self) -> &PageState {
        &self.state
    }

    pub fn set_question(&mut self, question: impl Into<String>) {
        self.state.question = question.into();
    }

    /// Ask the current question. Returns whether a request was issued.
    ///
    /// Blank questions are ignored. A failed request shows a fixed error as
    /// the answer; only real answers are spoken.
    pub async fn submit(&mut self) -> bool {
        if self.state.question.trim().is_empty() {
            return false;
        }

        let result = {
            let _loading = Raised::new(&mut self.state.loading);
            self.api.ask(&self.state.question).await
        };

        match result {
            Ok(answer) => {
                self.state.answer = answer;
                self.speak(&self.state.answer).await;
            }
            Err(e) => {
                log::warn!("chat request failed: {e:#}");
                self.state.answer = CLIENT_ERROR_ANSWER.to_string();
            }
        }
        true
    }

    /// Listen for one spoken question and ask it straight away.
    pub async fn listen(&mut self) -> Result<(), Notice> {
        let heard = {
            let _listening = Raised::new(&mut self.state.listening);
            self.speech
                .recognize_once(&RecognitionOptions::default())
                .await
        };

        match heard {
            Ok(transcript) => {
                self.state.question = transcript;
                self.submit().await;
                Ok(())
            }
            Err(e) => {
                log::warn!("speech recognition error: {e}");
                Err(e.into())
            }
        }
    }

    /// Say the current answer again.
    pub async fn speak_again(&self) {
        self.speak(&self.state.answer).await;
    }

    async fn speak(&self, text: &str) {
        if text.is_empty() {
            return;
        }
        self.speech.speak(Utterance::new(text)).await;
    }
}
