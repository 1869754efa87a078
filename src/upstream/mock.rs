use anyhow::Result;
use async_trait::async_trait;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::{Reply, Upstream};

/// A scripted upstream for tests. Returns pre-defined replies in order and
/// records every question it was asked.
///
/// An `Err(message)` entry simulates a failed call (network down, garbage body).
pub struct MockUpstream {
    replies: Vec<std::result::Result<Reply, String>>,
    index: AtomicUsize,
    questions: Mutex<Vec<String>>,
}

impl MockUpstream {
    pub fn new(replies: Vec<std::result::Result<Reply, String>>) -> Self {
        Self {
            replies,
            index: AtomicUsize::new(0),
            questions: Mutex::new(Vec::new()),
        }
    }

    /// Always answers with the same text.
    pub fn answering(answer: &str) -> Self {
        Self::new(vec![Ok(Reply::Answer(answer.to_string()))])
    }

    /// Questions received so far, in order.
    pub fn questions(&self) -> Vec<String> {
        self.questions.lock().unwrap().clone()
    }
}

#[async_trait]
impl Upstream for MockUpstream {
    async fn ask(&self, question: &str) -> Result<Reply> {
        self.questions.lock().unwrap().push(question.to_string());

        let i = self.index.fetch_add(1, Ordering::SeqCst);
        // A single scripted reply repeats forever
        let scripted = if self.replies.len() == 1 {
            self.replies.first()
        } else {
            self.replies.get(i)
        };
        match scripted {
            Some(Ok(reply)) => Ok(reply.clone()),
            Some(Err(message)) => Err(anyhow::anyhow!("{message}")),
            None => Err(anyhow::anyhow!(
                "MockUpstream: no more replies (called {} times)",
                i + 1
            )),
        }
    }
}
