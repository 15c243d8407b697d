//! Include/exclude filtering of diff file sections.

use anyhow::{Context, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};

/// Glob based path filter built from review configuration.
///
/// An empty include list admits every path. Excludes always win.
#[derive(Debug, Clone)]
pub struct PathFilter {
    include: Option<GlobSet>,
    exclude: GlobSet,
}

impl PathFilter {
    /// Builds a filter from include and exclude glob patterns.
    pub fn new(include: &[String], exclude: &[String]) -> Result<Self> {
        let include = if include.is_empty() {
            None
        } else {
            Some(build_set(include)?)
        };
        Ok(Self {
            include,
            exclude: build_set(exclude)?,
        })
    }

    /// Returns true when `path` passes the filter.
    ///
    /// Patterns match either the whole path or its file name, so `*.rs`
    /// admits `src/lib.rs`.
    pub fn allows(&self, path: &str) -> bool {
        let file_name = path.rsplit('/').next().unwrap_or(path);
        let matches = |set: &GlobSet| set.is_match(path) || set.is_match(file_name);
        if matches(&self.exclude) {
            return false;
        }
        self.include.as_ref().map_or(true, matches)
    }

    /// Keeps only the `diff --git` sections whose path passes the filter.
    ///
    /// Text before the first section header is kept as is.
    pub fn apply(&self, diff: &str) -> String {
        let mut kept = Vec::new();
        let mut keep_current = true;
        for line in diff.lines() {
            if let Some(header) = line.strip_prefix("diff --git ") {
                keep_current = section_path(header).map_or(true, |path| self.allows(path));
            }
            if keep_current {
                kept.push(line);
            }
        }
        kept.join("\n")
    }
}

fn build_set(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern).with_context(|| format!("Invalid glob pattern: {pattern}"))?;
        builder.add(glob);
    }
    builder.build().context("Failed to build glob set")
}

/// Extracts the new-side path from `a/<path> b/<path>`.
fn section_path(header: &str) -> Option<&str> {
    header
        .rsplit_once(" b/")
        .map(|(_, path)| path)
        .or_else(|| header.split_whitespace().last())
}
