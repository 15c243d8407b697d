//! Interactive terminal input, editor round-trips and clipboard copies.

use std::collections::VecDeque;
use std::io::{self, BufRead, IsTerminal, Write};
use std::process::{Command, Stdio};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tracing::{debug, warn};

use crate::utils::parse_editor_command;

/// Environment variables consulted for an editor, in order.
pub const EDITOR_VARS: [&str; 3] = ["AIG_EDITOR", "EDITOR", "VISUAL"];

/// Clipboard programs tried in order, with their arguments.
const CLIPBOARD_TOOLS: &[(&str, &[&str])] = &[
    ("pbcopy", &[]),
    ("wl-copy", &[]),
    ("xclip", &["-selection", "clipboard"]),
    ("xsel", &["--clipboard", "--input"]),
    ("clip.exe", &[]),
];

enum Source {
    /// Lines from a reader thread, started on the first prompt.
    Lines(tokio::sync::Mutex<Option<UnboundedReceiver<String>>>),
    Scripted(Mutex<VecDeque<String>>),
}

impl Source {
    fn stdin() -> Self {
        Self::Lines(tokio::sync::Mutex::new(None))
    }
}

/// Asks the user questions, each bounded by a deadline.
///
/// Prompts are only shown when interaction was requested and stdin is a
/// terminal. An answer that does not arrive in time counts as "no".
pub struct Prompter {
    enabled: bool,
    timeout: Duration,
    source: Source,
}

impl Prompter {
    /// Creates a prompter reading from stdin.
    pub fn new(requested: bool, timeout: Duration) -> Self {
        let is_terminal = io::stdin().is_terminal();
        if requested && !is_terminal {
            warn!("stdin is not a terminal, skipping interactive prompts");
        }
        Self {
            enabled: requested && is_terminal,
            timeout,
            source: Source::stdin(),
        }
    }

    /// A prompter that never asks anything.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            timeout: Duration::ZERO,
            source: Source::stdin(),
        }
    }

    /// A prompter that answers from a fixed list instead of stdin.
    #[cfg(test)]
    pub(crate) fn scripted(answers: &[&str]) -> Self {
        Self {
            enabled: true,
            timeout: Duration::from_secs(30),
            source: Source::Scripted(Mutex::new(
                answers.iter().map(|answer| (*answer).to_string()).collect(),
            )),
        }
    }

    /// A prompter reading lines sent on a channel.
    #[cfg(test)]
    pub(crate) fn from_lines(lines: UnboundedReceiver<String>, timeout: Duration) -> Self {
        Self {
            enabled: true,
            timeout,
            source: Source::Lines(tokio::sync::Mutex::new(Some(lines))),
        }
    }

    /// Returns true when prompts will be shown.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Prints `prompt` and reads one line, without the trailing newline.
    ///
    /// Returns `None` when the deadline passes, input ends or interaction
    /// is disabled.
    pub async fn ask(&self, prompt: &str) -> Option<String> {
        if !self.enabled {
            return None;
        }
        print!("{prompt}");
        let _ = io::stdout().flush();

        let line = match &self.source {
            Source::Scripted(answers) => answers
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .pop_front(),
            Source::Lines(lines) => self.read_line(lines).await,
        };
        line.map(|line| line.trim_end_matches(['\r', '\n']).to_string())
    }

    /// Asks a yes/no question. A timeout or closed input counts as "no".
    pub async fn confirm(&self, prompt: &str, default_yes: bool) -> bool {
        self.ask(prompt)
            .await
            .is_some_and(|answer| parse_answer(&answer, default_yes))
    }

    /// Waits for the next line typed after the prompt appeared.
    ///
    /// Lines that arrived while no prompt was waiting answered an earlier,
    /// timed-out prompt and are discarded.
    async fn read_line(
        &self,
        lines: &tokio::sync::Mutex<Option<UnboundedReceiver<String>>>,
    ) -> Option<String> {
        let mut lines = lines.lock().await;
        let rx = lines.get_or_insert_with(spawn_stdin_reader);
        while let Ok(stale) = rx.try_recv() {
            debug!(len = stale.len(), "Discarding late answer");
        }

        match tokio::time::timeout(self.timeout, rx.recv()).await {
            Ok(line) => line,
            Err(_) => {
                println!();
                warn!(timeout_secs = self.timeout.as_secs(), "Prompt timed out");
                None
            }
        }
    }
}

/// Starts the process-wide stdin reader.
///
/// The thread owns stdin until input ends or the receiver is dropped. It is
/// never joined; a read still blocked on stdin ends with the process.
fn spawn_stdin_reader() -> UnboundedReceiver<String> {
    let (tx, rx) = mpsc::unbounded_channel();
    std::thread::spawn(move || {
        for line in io::stdin().lock().lines().map_while(io::Result::ok) {
            if tx.send(line).is_err() {
                break;
            }
        }
    });
    rx
}

/// Interprets a yes/no answer. An empty answer takes the default.
pub fn parse_answer(answer: &str, default_yes: bool) -> bool {
    match answer.trim().to_lowercase().as_str() {
        "" => default_yes,
        "y" | "yes" => true,
        _ => false,
    }
}

/// First non-empty editor from [`EDITOR_VARS`].
pub fn editor_from_env(env: impl Fn(&str) -> Option<String>) -> Option<String> {
    EDITOR_VARS
        .into_iter()
        .filter_map(env)
        .map(|value| value.trim().to_string())
        .find(|value| !value.is_empty())
}

/// Opens `initial` in the user's editor and returns the saved text.
pub fn edit_in_editor(initial: &str) -> Result<String> {
    let Some(editor) = editor_from_env(|var| std::env::var(var).ok()) else {
        bail!("no editor configured; set AIG_EDITOR or EDITOR");
    };
    edit_with(&editor, initial)
}

/// Opens `initial` in `editor` through a temporary markdown file.
pub fn edit_with(editor: &str, initial: &str) -> Result<String> {
    let mut file = tempfile::Builder::new()
        .prefix("aig-")
        .suffix(".md")
        .tempfile()
        .context("Failed to create temporary file for editing")?;
    file.write_all(initial.as_bytes())
        .context("Failed to write temporary file for editing")?;
    file.flush()?;

    let (cmd, args) = parse_editor_command(editor);
    debug!(editor = %editor, path = %file.path().display(), "Opening editor");
    let status = Command::new(cmd)
        .args(args)
        .arg(file.path())
        .status()
        .with_context(|| format!("Failed to execute editor: {editor}"))?;

    if !status.success() {
        bail!("Editor exited with non-zero status: {:?}", status.code());
    }

    std::fs::read_to_string(file.path()).context("Failed to read edited file")
}

/// Copies `text` to the system clipboard, returning the tool that took it.
pub fn copy_to_clipboard(text: &str) -> Result<&'static str> {
    copy_with(CLIPBOARD_TOOLS, text)
}

fn copy_with(tools: &[(&'static str, &[&str])], text: &str) -> Result<&'static str> {
    for &(tool, args) in tools {
        let child = Command::new(tool)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn();
        let mut child = match child {
            Ok(child) => child,
            Err(e) => {
                debug!(tool, error = %e, "Clipboard tool unavailable");
                continue;
            }
        };

        if let Some(mut stdin) = child.stdin.take() {
            if let Err(e) = stdin.write_all(text.as_bytes()) {
                debug!(tool, error = %e, "Failed to write to clipboard tool");
            }
        }

        match child.wait() {
            Ok(status) if status.success() => return Ok(tool),
            Ok(status) => debug!(tool, code = ?status.code(), "Clipboard tool failed"),
            Err(e) => debug!(tool, error = %e, "Clipboard tool failed"),
        }
    }

    let names: Vec<&str> = tools.iter().map(|(tool, _)| *tool).collect();
    bail!("no clipboard tool available (tried {})", names.join(", "))
}
