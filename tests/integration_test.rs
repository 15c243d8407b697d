use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use aig::config::ConfigManager;
use aig::git::{extract_commit_details, DiffSource, Git, LogQuery};
use git2::{Repository, Signature};
use tempfile::TempDir;

/// Test setup that creates a temporary git repository with test commits
struct TestRepo {
    _temp_dir: TempDir,
    repo_path: PathBuf,
    repo: Repository,
}

impl TestRepo {
    fn new() -> Result<Self> {
        let temp_dir = tempfile::tempdir()?;
        let repo_path = temp_dir.path().to_path_buf();

        let repo = Repository::init(&repo_path)?;
        repo.set_head("refs/heads/main")?;

        let mut config = repo.config()?;
        config.set_str("user.name", "Test User")?;
        config.set_str("user.email", "test@example.com")?;
        config.set_bool("commit.gpgsign", false)?;

        Ok(TestRepo {
            _temp_dir: temp_dir,
            repo_path,
            repo,
        })
    }

    fn git(&self) -> Git {
        Git::at(&self.repo_path)
    }

    fn write(&self, name: &str, content: &str) -> Result<()> {
        fs::write(self.repo_path.join(name), content)?;
        Ok(())
    }

    fn add_commit(&self, name: &str, content: &str, message: &str) -> Result<git2::Oid> {
        self.write(name, content)?;

        let mut index = self.repo.index()?;
        index.add_path(Path::new(name))?;
        index.write()?;

        let tree_id = index.write_tree()?;
        let tree = self.repo.find_tree(tree_id)?;
        let signature = Signature::now("Test User", "test@example.com")?;
        let parent = self
            .repo
            .head()
            .ok()
            .and_then(|head| head.peel_to_commit().ok());
        let parents: Vec<&git2::Commit<'_>> = parent.iter().collect();

        Ok(self.repo.commit(
            Some("HEAD"),
            &signature,
            &signature,
            message,
            &tree,
            &parents,
        )?)
    }
}

#[test]
fn log_lists_newest_first() -> Result<()> {
    let repo = TestRepo::new()?;
    repo.add_commit("a.txt", "a", "feat: first | with pipe")?;
    let second = repo.add_commit("b.txt", "b", "fix: second")?;

    let commits = repo.git().log(&LogQuery::default())?;
    assert_eq!(commits.len(), 2);
    assert_eq!(commits[0].hash, second.to_string());
    assert_eq!(commits[0].message, "fix: second");
    assert_eq!(commits[0].author, "Test User");
    assert_eq!(commits[1].message, "feat: first | with pipe");
    assert_eq!(commits[1].date.len(), "2024-01-01".len());

    let limited = repo.git().log(&LogQuery {
        number: Some(1),
        ..LogQuery::default()
    })?;
    assert_eq!(limited.len(), 1);
    Ok(())
}

#[test]
fn log_range_excludes_start() -> Result<()> {
    let repo = TestRepo::new()?;
    let first = repo.add_commit("a.txt", "a", "chore: init")?;
    repo.add_commit("b.txt", "b", "feat: add b")?;
    repo.add_commit("c.txt", "c", "feat: add c")?;

    let commits = repo.git().log(&LogQuery {
        from: Some(first.to_string()),
        ..LogQuery::default()
    })?;
    let messages: Vec<_> = commits.iter().map(|c| c.message.as_str()).collect();
    assert_eq!(messages, vec!["feat: add c", "feat: add b"]);
    Ok(())
}

#[test]
fn stage_and_commit_through_git_binary() -> Result<()> {
    let repo = TestRepo::new()?;
    repo.add_commit("README.md", "# demo\n", "chore: init")?;
    let git = repo.git();

    assert!(git.is_clean()?);
    assert!(!git.has_staged_changes()?);

    repo.write("README.md", "# demo\n\nMore.\n")?;
    assert!(!git.is_clean()?);
    assert!(git.staged_diff()?.is_empty());
    assert!(git.diff(&DiffSource::Unstaged)?.contains("+More."));

    git.stage_all()?;
    assert!(git.has_staged_changes()?);
    assert!(git.staged_diff()?.contains("README.md"));

    git.commit("docs: expand readme")?;
    assert!(git.is_clean()?);
    let head = repo.git().log(&LogQuery {
        number: Some(1),
        ..LogQuery::default()
    })?;
    assert_eq!(head[0].message, "docs: expand readme");
    Ok(())
}

#[test]
fn branch_details_from_current_branch() -> Result<()> {
    let repo = TestRepo::new()?;
    repo.add_commit("a.txt", "a", "chore: init")?;
    let head = repo.repo.head()?.peel_to_commit()?;
    repo.repo.branch("fix/JIRA-4242-crash", &head, false)?;
    repo.repo.set_head("refs/heads/fix/JIRA-4242-crash")?;

    let branch = repo.git().current_branch()?;
    assert_eq!(branch, "fix/JIRA-4242-crash");

    let details = extract_commit_details(&branch);
    assert_eq!(details.commit_type.as_deref(), Some("fix"));
    assert_eq!(details.ticket.as_deref(), Some("4242"));
    Ok(())
}

#[test]
fn git_outside_repository_fails() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let git = Git::at(dir.path());
    assert!(git.current_branch().is_err());
    Ok(())
}

#[test]
fn config_file_round_trip() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let manager = ConfigManager::with_path(dir.path().join("aig").join("config.yaml"));

    assert_eq!(manager.get("ai.provider")?, "openai");
    manager.set("ai.provider", "gemini")?;
    manager.set("ai.api_key", "sk-test-123456789")?;
    manager.set("review.exclude_patterns", "*.lock, dist/*")?;

    let config = manager.load_file()?;
    assert_eq!(config.ai.provider, "gemini");
    assert_eq!(
        config.review.exclude_patterns,
        vec!["*.lock".to_string(), "dist/*".to_string()]
    );

    let listed = manager.list()?;
    let (_, key) = listed
        .iter()
        .find(|(name, _)| name == "ai.api_key")
        .expect("api key listed");
    assert!(!key.contains("123456789"));
    Ok(())
}
