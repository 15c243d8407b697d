//! Git operations through the `git` command-line binary.
//!
//! Nothing here reads the object database directly; every operation is a
//! subprocess whose failure carries the captured standard error.

mod branch;
mod command;
mod commit;
mod diff;
mod log;

pub use branch::{extract_commit_details, BranchDetails};
pub use command::{Git, GitError};
pub use diff::DiffSource;
pub use log::{parse_log_output, LogQuery};

/// Number of hex characters shown in abbreviated commit hashes.
pub const SHORT_HASH_LEN: usize = 7;

/// Returns the abbreviated form of a commit hash.
pub fn short_hash(hash: &str) -> &str {
    hash.get(..SHORT_HASH_LEN).unwrap_or(hash)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_hash_long() {
        assert_eq!(short_hash("abc1234567890"), "abc1234");
    }

    #[test]
    fn short_hash_already_short() {
        assert_eq!(short_hash("abc12"), "abc12");
    }
}
