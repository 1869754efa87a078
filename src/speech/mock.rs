use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

use super::{RecognitionError, RecognitionOptions, Speech, Utterance};

/// Scripted speech for tests. Each listen pops the next scripted result;
/// an empty script means recognition is unsupported. Spoken utterances are
/// recorded instead of played.
#[derive(Default)]
pub struct ScriptedSpeech {
    heard: Mutex<VecDeque<Result<String, RecognitionError>>>,
    listens: Mutex<Vec<RecognitionOptions>>,
    spoken: Mutex<Vec<Utterance>>,
}

impl ScriptedSpeech {
    pub fn new(heard: Vec<Result<String, RecognitionError>>) -> Self {
        Self {
            heard: Mutex::new(heard.into()),
            ..Self::default()
        }
    }

    /// A runtime without a recognizer.
    pub fn unsupported() -> Self {
        Self::default()
    }

    pub fn spoken(&self) -> Vec<Utterance> {
        self.spoken.lock().unwrap().clone()
    }

    /// Options of every recognition pass, in order.
    pub fn listens(&self) -> Vec<RecognitionOptions> {
        self.listens.lock().unwrap().clone()
    }
}

#[async_trait]
impl Speech for ScriptedSpeech {
    async fn recognize_once(
        &self,
        options: &RecognitionOptions,
    ) -> Result<String, RecognitionError> {
        self.listens.lock().unwrap().push(options.clone());
        self.heard
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(RecognitionError::Unsupported))
    }

    async fn speak(&self, utterance: Utterance) {
        self.spoken.lock().unwrap().push(utterance);
    }
}
