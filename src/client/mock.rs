use anyhow::Result;
use async_trait::async_trait;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::ChatApi;

/// A scripted relay for tests. Returns pre-defined answers in order and
/// records the questions it receives. `Err(message)` simulates a failed call.
pub struct MockChatApi {
    answers: Vec<std::result::Result<String, String>>,
    index: AtomicUsize,
    questions: Mutex<Vec<String>>,
}

impl MockChatApi {
    pub fn new(answers: Vec<std::result::Result<String, String>>) -> Self {
        Self {
            answers,
            index: AtomicUsize::new(0),
            questions: Mutex::new(Vec::new()),
        }
    }

    pub fn questions(&self) -> Vec<String> {
        self.questions.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatApi for MockChatApi {
    async fn ask(&self, question: &str) -> Result<String> {
        self.questions.lock().unwrap().push(question.to_string());
        let i = self.index.fetch_add(1, Ordering::SeqCst);
        match self.answers.get(i) {
            Some(Ok(answer)) => Ok(answer.clone()),
            Some(Err(message)) => Err(anyhow::anyhow!("{message}")),
            None => Err(anyhow::anyhow!(
                "MockChatApi: no more answers (called {} times)",
                i + 1
            )),
        }
    }
}
