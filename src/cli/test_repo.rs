//! Temporary git repositories for command tests.

use std::fs;
use std::path::{Path, PathBuf};

use git2::{BranchType, IndexAddOption, Repository, Signature};
use tempfile::TempDir;

use crate::git::Git;

/// A throwaway repository with a configured identity.
pub(crate) struct TestRepo {
    _temp_dir: TempDir,
    repo_path: PathBuf,
    repo: Repository,
}

impl TestRepo {
    /// Initializes an empty repository on branch `main`.
    pub(crate) fn new() -> Self {
        let temp_dir = tempfile::tempdir().unwrap();
        let repo_path = temp_dir.path().to_path_buf();
        let repo = Repository::init(&repo_path).unwrap();
        repo.set_head("refs/heads/main").unwrap();

        let mut config = repo.config().unwrap();
        config.set_str("user.name", "Test User").unwrap();
        config.set_str("user.email", "test@example.com").unwrap();
        config.set_bool("commit.gpgsign", false).unwrap();

        Self {
            _temp_dir: temp_dir,
            repo_path,
            repo,
        }
    }

    pub(crate) fn path(&self) -> &Path {
        &self.repo_path
    }

    pub(crate) fn git(&self) -> Git {
        Git::at(&self.repo_path)
    }

    /// Writes a file relative to the repository root.
    pub(crate) fn write(&self, name: &str, content: &str) {
        let path = self.repo_path.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    /// Stages every change in the working tree.
    pub(crate) fn stage_all(&self) {
        let mut index = self.repo.index().unwrap();
        index
            .add_all(["*"].iter(), IndexAddOption::DEFAULT, None)
            .unwrap();
        index.write().unwrap();
    }

    /// Writes, stages and commits a file on the current branch.
    pub(crate) fn commit_file(&self, name: &str, content: &str, message: &str) -> git2::Oid {
        self.write(name, content);
        self.stage_all();

        let mut index = self.repo.index().unwrap();
        let tree_id = index.write_tree().unwrap();
        let tree = self.repo.find_tree(tree_id).unwrap();
        let signature = Signature::now("Test User", "test@example.com").unwrap();
        let parent = self
            .repo
            .head()
            .ok()
            .and_then(|head| head.peel_to_commit().ok());
        let parents: Vec<&git2::Commit<'_>> = parent.iter().collect();

        self.repo
            .commit(
                Some("HEAD"),
                &signature,
                &signature,
                message,
                &tree,
                &parents,
            )
            .unwrap()
    }

    /// Creates `name` at HEAD and checks it out.
    pub(crate) fn checkout_new_branch(&self, name: &str) {
        let head = self.repo.head().unwrap().peel_to_commit().unwrap();
        self.repo.branch(name, &head, false).unwrap();
        let branch = self.repo.find_branch(name, BranchType::Local).unwrap();
        let refname = branch.get().name().unwrap().to_string();
        self.repo.set_head(&refname).unwrap();
        self.repo
            .checkout_head(Some(git2::build::CheckoutBuilder::new().force()))
            .unwrap();
    }

    /// Subject line of the HEAD commit.
    pub(crate) fn head_message(&self) -> String {
        self.repo
            .head()
            .unwrap()
            .peel_to_commit()
            .unwrap()
            .message()
            .unwrap_or_default()
            .to_string()
    }

    /// Number of commits reachable from HEAD, zero on an unborn branch.
    pub(crate) fn commit_count(&self) -> usize {
        let Ok(head) = self.repo.head() else {
            return 0;
        };
        let mut walk = self.repo.revwalk().unwrap();
        walk.push(head.target().unwrap()).unwrap();
        walk.count()
    }
}
