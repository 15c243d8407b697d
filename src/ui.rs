//! Terminal output for all commands.

pub mod interact;
pub mod render;
pub mod spinner;

use std::fmt::Display;

use crossterm::style::{Color, Stylize};

use crate::config::{SpinnerStyle, Theme, UiSettings};
use crate::data::{CommitMessage, PrDescription, ReviewResult, Summary};
use crate::utils::preview;

pub use interact::{copy_to_clipboard, edit_in_editor, Prompter};
pub use spinner::Spinner;

/// Bytes of the staged diff shown by `commit --dry-run`.
pub const DRY_RUN_PREVIEW: usize = 1000;

const fn rgb(hex: u32) -> Color {
    Color::Rgb {
        r: (hex >> 16) as u8,
        g: (hex >> 8) as u8,
        b: hex as u8,
    }
}

const PRIMARY: Color = rgb(0x7C_3A_ED);
const SUCCESS: Color = rgb(0x10_B9_81);
const ERROR: Color = rgb(0xEF_44_44);
const WARNING: Color = rgb(0xF5_9E_0B);
const INFO: Color = rgb(0x3B_82_F6);
const MUTED_DARK: Color = rgb(0x6B_72_80);
const MUTED_LIGHT: Color = rgb(0x4B_55_63);

/// Colour associated with a conventional commit type.
pub fn commit_type_color(commit_type: &str) -> Color {
    match commit_type {
        "feat" => rgb(0x10_B9_81),
        "fix" => rgb(0xEF_44_44),
        "docs" => rgb(0x3B_82_F6),
        "style" => rgb(0x8B_5C_F6),
        "refactor" => rgb(0xF5_9E_0B),
        "test" => rgb(0xEC_48_99),
        "perf" => rgb(0xF9_73_16),
        "ci" => rgb(0x06_B6_D4),
        "build" => rgb(0x84_CC_16),
        _ => rgb(0x6B_72_80),
    }
}

/// Styled printer built from the `ui` configuration section.
#[derive(Debug, Clone, Copy)]
pub struct Ui {
    color: bool,
    emoji: bool,
    theme: Theme,
    spinner: SpinnerStyle,
}

impl Default for Ui {
    fn default() -> Self {
        Self::new(&UiSettings::default())
    }
}

impl Ui {
    /// Creates a printer from configuration.
    pub fn new(settings: &UiSettings) -> Self {
        Self {
            color: settings.color,
            emoji: settings.emoji,
            theme: settings.theme,
            spinner: settings.spinner,
        }
    }

    fn paint(&self, text: impl Display, color: Color) -> String {
        if self.color {
            text.to_string().with(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn bold(&self, text: impl Display, color: Color) -> String {
        if self.color {
            text.to_string().with(color).bold().to_string()
        } else {
            text.to_string()
        }
    }

    fn muted(&self, text: impl Display) -> String {
        let color = match self.theme {
            Theme::Light => MUTED_LIGHT,
            Theme::Dark | Theme::Auto => MUTED_DARK,
        };
        self.paint(text, color)
    }

    /// Prefixes `text` with `icon` when emoji are enabled.
    fn icon(&self, icon: &str, text: &str) -> String {
        if self.emoji {
            format!("{icon} {text}")
        } else {
            text.to_string()
        }
    }

    pub fn success(&self, message: &str) {
        println!("{}", self.paint(self.icon("✅", message), SUCCESS));
    }

    pub fn info(&self, message: &str) {
        println!("{}", self.paint(self.icon("ℹ️ ", message), INFO));
    }

    pub fn warning(&self, message: &str) {
        println!("{}", self.paint(self.icon("⚠️ ", message), WARNING));
    }

    pub fn error(&self, message: &str) {
        let text = format!("Error: {message}");
        println!("{}", self.paint(self.icon("❌", &text), ERROR));
    }

    /// Like [`info`](Self::info) with a custom leading emoji.
    pub fn status(&self, icon: &str, message: &str) {
        println!("{}", self.paint(self.icon(icon, message), INFO));
    }

    /// Starts a spinner in the configured style.
    pub fn spinner(&self, message: &str) -> Spinner {
        Spinner::start(self.spinner, message)
    }

    /// Prints the staged diff preview for `commit --dry-run`.
    pub fn show_dry_run(&self, diff: &str) {
        println!("{}", self.bold(self.icon("🔍", "Dry Run - Staged Changes:"), PRIMARY));
        println!("{}", preview(diff, DRY_RUN_PREVIEW));
        println!(
            "{}",
            self.muted("\n(This is a preview. Remove --dry-run to generate commit message)")
        );
    }

    /// Prints a generated commit message with its type highlighted.
    pub fn show_commit_message(&self, message: &CommitMessage) {
        println!("{}", self.bold("Generated Commit Message:", PRIMARY));
        let header = message.header();
        match header.strip_prefix(message.commit_type.as_str()) {
            Some(rest) if !message.commit_type.is_empty() => println!(
                "{}{}",
                self.bold(&message.commit_type, commit_type_color(&message.commit_type)),
                self.muted(rest)
            ),
            _ => println!("{header}"),
        }
        if !message.body.is_empty() {
            println!("\nBody:\n{}", message.body);
        }
        if !message.footer.is_empty() {
            println!("\nFooter:\n{}", message.footer);
        }
    }

    /// Prints a diff with added, removed and header lines coloured.
    pub fn show_diff(&self, diff: &str) {
        for line in diff.lines() {
            let styled = if line.starts_with('+') {
                self.paint(line, SUCCESS)
            } else if line.starts_with('-') {
                self.paint(line, ERROR)
            } else if line.starts_with("@@") || line.starts_with("diff") {
                self.paint(line, INFO)
            } else {
                line.to_string()
            };
            println!("{styled}");
        }
    }

    /// Prints review findings grouped by section.
    pub fn show_review(&self, review: &ReviewResult) {
        println!("{}", self.bold("Code Review Results Completed", PRIMARY));

        if review.is_empty() {
            println!("{}", self.muted("No findings."));
            return;
        }

        if !review.summary.is_empty() {
            println!("{}", self.muted("## Summary"));
            println!("{}", review.summary);
        }

        let arrow = self.muted("↳");

        if !review.issues.is_empty() {
            println!("{}", self.paint("## Issues", ERROR));
            for issue in &review.issues {
                println!("  {} {}", self.paint("•", ERROR), render::issue_line(issue));
                if !issue.suggestion.is_empty() {
                    println!("    {arrow} Suggestion: {}", issue.suggestion);
                }
            }
        }

        if !review.suggestions.is_empty() {
            println!("{}", self.paint("## Suggestions", INFO));
            for suggestion in &review.suggestions {
                println!(
                    "  {} {}",
                    self.paint("•", INFO),
                    render::suggestion_line(suggestion)
                );
                if !suggestion.example.is_empty() {
                    println!("    {arrow} Example: {}", suggestion.example);
                }
            }
        }

        if !review.security_risks.is_empty() {
            println!("{}", self.paint("## Security Risks", ERROR));
            for risk in &review.security_risks {
                println!("  {} {}", self.paint("•", ERROR), render::security_line(risk));
                if !risk.mitigation.is_empty() {
                    println!("    {arrow} Mitigation: {}", risk.mitigation);
                }
            }
        }

        if !review.performance_issues.is_empty() {
            println!("{}", self.paint("## Performance Issues", WARNING));
            for perf in &review.performance_issues {
                println!(
                    "  {} {}",
                    self.paint("•", WARNING),
                    render::performance_line(perf)
                );
                if !perf.solution.is_empty() {
                    println!("    {arrow} Solution: {}", perf.solution);
                }
            }
        }
    }

    /// Prints a PR description section by section, then its markdown body.
    pub fn show_pr_description(&self, description: &PrDescription) {
        println!(
            "{}",
            self.bold(self.icon("🚀", "Generated PR/MR Description"), PRIMARY)
        );

        self.section("Title:", &description.title);
        if !description.summary.is_empty() {
            self.section("Summary:", &description.summary);
        }
        if !description.changes.is_empty() {
            self.section("Changes:", &render::format_list(&description.changes));
        }
        if !description.issue_links.is_empty() {
            self.section("Related Issues:", &render::format_list(&description.issue_links));
        }
        if !description.testing_notes.is_empty() {
            self.section("Testing:", &description.testing_notes);
        }
        if !description.checklist.is_empty() {
            self.section(
                "Checklist:",
                &render::format_checklist(&description.checklist, description.platform),
            );
        }
        if !description.breaking_changes.is_empty() {
            println!("{}", self.paint(self.icon("⚠️ ", "Breaking Changes:"), ERROR));
            println!("{}", render::format_list(&description.breaking_changes));
        }
        if description.screenshots_needed {
            println!(
                "{}",
                self.paint(
                    self.icon("📸", "Don't forget to add screenshots of UI changes!"),
                    WARNING
                )
            );
        }

        let platform = format!("Formatted for {}", description.platform.display_name());
        println!("\n{}", self.muted(self.icon("📋", &platform)));

        self.section("Markdown Output:", &render::format_pr_markdown(description));
    }

    /// Prints a summary in text or markdown form.
    pub fn show_summary(&self, summary: &Summary, markdown: bool) {
        if markdown {
            println!("{}", render::summary_markdown(summary));
            return;
        }
        if !summary.title.is_empty() {
            println!("{}", self.bold(&summary.title, PRIMARY));
        }
        let mut rest = summary.clone();
        if rest.description == rest.title {
            rest.description.clear();
        }
        rest.title.clear();
        let rest = render::summary_text(&rest);
        if !rest.is_empty() {
            println!("\n{rest}");
        }
    }

    fn section(&self, title: &str, body: &str) {
        println!("{}", self.bold(title, PRIMARY));
        println!("{body}");
    }
}
