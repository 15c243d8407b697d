//! Progress spinner drawn on stderr while a provider call is in flight.

use std::io::{self, IsTerminal, Write};
use std::time::Duration;

use crossterm::cursor::MoveToColumn;
use crossterm::style::Print;
use crossterm::terminal::{Clear, ClearType};
use crossterm::{execute, queue};
use tokio::task::JoinHandle;

use crate::config::SpinnerStyle;

const DOTS: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
const LINE: &[&str] = &["-", "\\", "|", "/"];

const FRAME_INTERVAL: Duration = Duration::from_millis(100);

/// Animation frames for a spinner style. `None` has no frames.
pub fn frames(style: SpinnerStyle) -> &'static [&'static str] {
    match style {
        SpinnerStyle::Dots => DOTS,
        SpinnerStyle::Line => LINE,
        SpinnerStyle::None => &[],
    }
}

/// A running spinner.
///
/// Only drawn when stderr is a terminal. Must be stopped before anything
/// else is printed so the line it occupies is cleared.
pub struct Spinner {
    task: Option<JoinHandle<()>>,
}

impl Spinner {
    /// Starts a spinner next to `message`.
    pub fn start(style: SpinnerStyle, message: &str) -> Self {
        let frames = frames(style);
        if frames.is_empty() || !io::stderr().is_terminal() {
            return Self { task: None };
        }

        let message = message.to_string();
        let task = tokio::spawn(async move {
            let mut interval = tokio::time::interval(FRAME_INTERVAL);
            for frame in frames.iter().cycle() {
                interval.tick().await;
                let mut stderr = io::stderr();
                let _ = queue!(
                    stderr,
                    MoveToColumn(0),
                    Clear(ClearType::CurrentLine),
                    Print(format!("{frame} {message}"))
                );
                let _ = stderr.flush();
            }
        });
        Self { task: Some(task) }
    }

    /// A spinner that draws nothing.
    pub fn hidden() -> Self {
        Self { task: None }
    }

    /// Returns true when the spinner is being drawn.
    pub fn is_active(&self) -> bool {
        self.task.is_some()
    }

    /// Stops the animation and clears its line.
    pub async fn stop(mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            let _ = task.await;
            clear_line();
        }
    }
}

impl Drop for Spinner {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            clear_line();
        }
    }
}

fn clear_line() {
    let _ = execute!(io::stderr(), MoveToColumn(0), Clear(ClearType::CurrentLine));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frames_per_style() {
        assert_eq!(frames(SpinnerStyle::Dots).len(), 10);
        assert_eq!(frames(SpinnerStyle::Line), &["-", "\\", "|", "/"]);
        assert!(frames(SpinnerStyle::None).is_empty());
    }

    #[tokio::test]
    async fn none_style_never_draws() {
        let spinner = Spinner::start(SpinnerStyle::None, "Working");
        assert!(!spinner.is_active());
        spinner.stop().await;
    }

    #[tokio::test]
    async fn hidden_spinner_stops_cleanly() {
        let spinner = Spinner::hidden();
        assert!(!spinner.is_active());
        spinner.stop().await;
    }
}
