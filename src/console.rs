//! User-facing terminal output: styled status lines and the progress
//! spinner shown while an external operation is in flight.

use crossterm::style::Stylize;
use std::io::{self, Write};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

const SPINNER_FRAMES: [char; 6] = ['|', '/', '-', '|', '-', '\\'];
const SPINNER_TICK: Duration = Duration::from_millis(60);

/// Print a status line with a highlighted module prefix.
pub fn log(prefix: &str, message: &str) {
    println!("{} {}", prefix.cyan().bold(), message);
}

/// Rewrite the current line in place.
fn log_repl(prefix: &str, message: &str) {
    print!("\r{} {}", prefix.cyan().bold(), message);
    let _ = io::stdout().flush();
}

/// Print an error line with the red error marker.
pub fn error(message: &str) {
    eprintln!("{} {}", "error:".red().bold(), message);
}

/// Cosmetic progress indicator for long-running external operations.
///
/// A periodic task redraws the line until cancelled. [`Spinner::finish`]
/// cancels it and waits for the task to acknowledge before emitting the
/// final line, so the two never interleave.
pub struct Spinner {
    prefix: String,
    token: CancellationToken,
    handle: JoinHandle<()>,
}

impl Spinner {
    pub fn start(prefix: &str, message: &str) -> Self {
        let token = CancellationToken::new();
        let task_token = token.clone();
        let task_prefix = prefix.to_string();
        let task_message = message.to_string();

        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(SPINNER_TICK);
            let mut tick = 0usize;
            loop {
                tokio::select! {
                    _ = task_token.cancelled() => break,
                    _ = interval.tick() => {
                        let frame = SPINNER_FRAMES[tick % SPINNER_FRAMES.len()];
                        log_repl(&task_prefix, &format!("{task_message} {frame} "));
                        tick += 1;
                    }
                }
            }
        });

        Self {
            prefix: prefix.to_string(),
            token,
            handle,
        }
    }

    /// Stop the spinner and replace its line with a final message.
    pub async fn finish(self, message: &str) {
        self.token.cancel();
        let _ = self.handle.await;
        log_repl(&self.prefix, &format!("{message}  \n"));
    }
}
