//! # aig
//!
//! AI-assisted git workflows.
//!
//! `aig` sends diffs and commit metadata to a remote language model and turns
//! the response into something you can act on:
//!
//! - conventional commit messages for staged changes
//! - structured code reviews
//! - pull request descriptions for GitHub, GitLab and Bitbucket
//! - summaries and changelogs of commit ranges
//!
//! ## Layout
//!
//! - [`git`] shells out to the `git` binary.
//! - [`ai`] talks to the OpenAI and Gemini HTTP APIs with rate-limit retries.
//! - [`normalize`] turns raw model text into the typed results in [`data`].
//! - [`analysis`] holds local heuristics that need no model at all.
//! - [`ui`] and [`cli`] are the terminal front end.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod ai;
pub mod analysis;
pub mod cli;
pub mod config;
pub mod data;
pub mod git;
pub mod normalize;
pub mod ui;
pub mod utils;

pub use crate::cli::Cli;

/// The current version of aig.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
