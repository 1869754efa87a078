use anyhow::{Result, bail};
use async_trait::async_trait;
use std::process::Stdio;
use tokio::process::Command;

use super::{RecognitionError, RecognitionOptions, Speech, Utterance};

/// Speaks through an external text-to-speech program (`espeak-ng`, `say`, ...).
///
/// The utterance text is appended as the last argument. Locale and rate are
/// exported as `PARLEY_LOCALE` and `PARLEY_RATE` for wrappers that want them.
/// A terminal has no speech recognizer, so listening is unsupported.
#[derive(Debug, Clone)]
pub struct CommandSpeech {
    program: String,
    args: Vec<String>,
}

impl CommandSpeech {
    /// Parse a command line such as `espeak-ng -v en-us`.
    pub fn new(command: &str) -> Result<Self> {
        let mut words = command.split_whitespace().map(str::to_string);
        let Some(program) = words.next() else {
            bail!("text-to-speech command is empty");
        };
        Ok(Self {
            program,
            args: words.collect(),
        })
    }

    fn command(&self, utterance: &Utterance) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args)
            .arg(&utterance.text)
            .env("PARLEY_LOCALE", &utterance.locale)
            .env("PARLEY_RATE", utterance.rate.to_string())
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        cmd
    }
}

#[async_trait]
impl Speech for CommandSpeech {
    async fn recognize_once(
        &self,
        _options: &RecognitionOptions,
    ) -> Result<String, RecognitionError> {
        Err(RecognitionError::Unsupported)
    }

    async fn speak(&self, utterance: Utterance) {
        if utterance.text.is_empty() {
            return;
        }
        match self.command(&utterance).spawn() {
            Ok(mut child) => {
                // Reap in the background
                tokio::spawn(async move {
                    let _ = child.wait().await;
                });
            }
            Err(e) => log::warn!("failed to start `{}`: {e}", self.program),
        }
    }
}
