//! Terminal stand-in for the page's "Thinking..." label.

use std::io::Write;
use std::time::Duration;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;

const FRAMES: &[&str] = &["◐", "◓", "◑", "◒"];

const INTERVAL: Duration = Duration::from_millis(120);

/// Animates `<frame> <label>` on stderr until stopped or dropped.
pub struct Spinner {
    handle: JoinHandle<()>,
    stop: Option<oneshot::Sender<()>>,
}

impl Spinner {
    pub fn start(label: &str) -> Self {
        let (stop_tx, mut stop_rx) = oneshot::channel::<()>();
        let label = label.to_string();

        let handle = tokio::spawn(async move {
            for frame in FRAMES.iter().cycle() {
                eprint!("\x1b[2K\r{frame} {label}");
                let _ = std::io::stderr().flush();

                tokio::select! {
                    _ = tokio::time::sleep(INTERVAL) => {}
                    _ = &mut stop_rx => break,
                }
            }
            eprint!("\x1b[2K\r");
            let _ = std::io::stderr().flush();
        });

        Self {
            handle,
            stop: Some(stop_tx),
        }
    }

    /// Stop and wait until the line is cleared.
    pub async fn stop(mut self) {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
        let _ = (&mut self.handle).await;
    }
}

// A cancelled request drops the spinner without awaiting `stop`.
impl Drop for Spinner {
    fn drop(&mut self) {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
    }
}
