use std::collections::BTreeSet;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use tracing::debug;

use super::{ChangedFilesOptions, ChangedFilesSource};
use crate::error::AffectedError;

const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Changed files according to the system `git` binary.
///
/// Reports everything that differs between the working tree and the merge
/// base of `HEAD` with the base branch: committed, staged and unstaged
/// changes, deletions included, plus untracked files that are not ignored
/// when enabled.
#[derive(Debug, Clone)]
pub struct GitChangedFiles {
    bin: PathBuf,
}

impl Default for GitChangedFiles {
    fn default() -> Self {
        Self::new()
    }
}

impl GitChangedFiles {
    pub fn new() -> Self {
        Self {
            bin: PathBuf::from("git"),
        }
    }

    /// Use a specific git executable
    pub fn with_binary(mut self, bin: impl Into<PathBuf>) -> Self {
        self.bin = bin.into();
        self
    }

    fn merge_base(
        &self,
        root: &Path,
        options: &ChangedFilesOptions,
    ) -> Result<String, AffectedError> {
        let output = self.execute_git_command(
            root,
            &["merge-base", &options.base_branch, "HEAD"],
            options.timeout,
        )?;
        Ok(output.trim().to_string())
    }

    /// Run git in `root`, returning stdout. Killed once `timeout` elapses.
    fn execute_git_command(
        &self,
        root: &Path,
        args: &[&str],
        timeout: Duration,
    ) -> Result<String, AffectedError> {
        let command_line = args.join(" ");
        debug!(command = %command_line, root = %root.display(), "running git");

        let mut child = Command::new(&self.bin)
            .args(["-c", "core.quotePath=false"])
            .args(args)
            .current_dir(root)
            .env("GIT_OPTIONAL_LOCKS", "0")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| AffectedError::Git {
                command: command_line.clone(),
                stderr: e.to_string(),
            })?;

        // Drain both pipes while waiting so a chatty child cannot block
        let stdout = child.stdout.take().map(drain);
        let stderr = child.stderr.take().map(drain);

        let deadline = Instant::now() + timeout;
        let status = loop {
            if let Some(status) = child.try_wait()? {
                break status;
            }
            if Instant::now() >= deadline {
                let _ = child.kill();
                let _ = child.wait();
                return Err(AffectedError::GitTimeout {
                    command: command_line,
                    timeout,
                });
            }
            thread::sleep(POLL_INTERVAL);
        };

        let collect = |reader: Option<thread::JoinHandle<Vec<u8>>>| {
            reader
                .and_then(|handle| handle.join().ok())
                .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
                .unwrap_or_default()
        };
        let stdout = collect(stdout);
        let stderr = collect(stderr);

        if !status.success() {
            return Err(AffectedError::Git {
                command: command_line,
                stderr: stderr.trim().to_string(),
            });
        }

        Ok(stdout)
    }
}

fn drain<R: Read + Send + 'static>(mut reader: R) -> thread::JoinHandle<Vec<u8>> {
    thread::spawn(move || {
        let mut buffer = Vec::new();
        let _ = reader.read_to_end(&mut buffer);
        buffer
    })
}

fn push_lines(files: &mut BTreeSet<String>, output: &str) {
    files.extend(
        output
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string),
    );
}

impl ChangedFilesSource for GitChangedFiles {
    fn changed_files(
        &self,
        working_tree_root: &Path,
        options: &ChangedFilesOptions,
    ) -> Result<Vec<String>, AffectedError> {
        let merge_base = self.merge_base(working_tree_root, options)?;
        debug!(base = %options.base_branch, %merge_base, "resolved merge base");

        let mut files = BTreeSet::new();

        // Both sides of a move belong to the change
        let diff = self.execute_git_command(
            working_tree_root,
            &[
                "diff",
                "--name-only",
                "--no-renames",
                "--relative",
                &merge_base,
            ],
            options.timeout,
        )?;
        push_lines(&mut files, &diff);

        if options.include_untracked {
            let untracked = self.execute_git_command(
                working_tree_root,
                &["ls-files", "--others", "--exclude-standard"],
                options.timeout,
            )?;
            push_lines(&mut files, &untracked);
        }

        debug!(count = files.len(), "collected changed files");

        Ok(files.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    use super::*;

    fn git_available() -> bool {
        Command::new("git")
            .arg("--version")
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    }

    fn git(root: &Path, args: &[&str]) {
        let status = Command::new("git")
            .args(["-c", "user.name=Test", "-c", "user.email=test@example.com"])
            .args(["-c", "commit.gpgsign=false"])
            .args(args)
            .current_dir(root)
            .output()
            .unwrap()
            .status;
        assert!(status.success(), "git {args:?} failed");
    }

    fn init_repo() -> TempDir {
        let temp = TempDir::new().unwrap();
        let root = temp.path();

        git(root, &["init", "-q"]);
        git(root, &["symbolic-ref", "HEAD", "refs/heads/main"]);
        fs::write(root.join("README.md"), "hello\n").unwrap();
        fs::create_dir_all(root.join("lib/src")).unwrap();
        fs::write(root.join("lib/src/lib.rs"), "pub fn a() {}\n").unwrap();
        git(root, &["add", "."]);
        git(root, &["commit", "-q", "-m", "initial"]);

        temp
    }

    #[test]
    fn test_changes_against_base_branch() {
        if !git_available() {
            return;
        }
        let temp = init_repo();
        let root = temp.path();

        git(root, &["checkout", "-q", "-b", "feature"]);
        fs::write(root.join("lib/src/lib.rs"), "pub fn b() {}\n").unwrap();
        git(root, &["commit", "-q", "-am", "change lib"]);
        fs::write(root.join("README.md"), "changed\n").unwrap();
        fs::write(root.join("notes.txt"), "new\n").unwrap();

        let source = GitChangedFiles::new();
        let files = source
            .changed_files(root, &ChangedFilesOptions::default())
            .unwrap();
        assert_eq!(files, vec!["README.md", "lib/src/lib.rs", "notes.txt"]);

        let files = source
            .changed_files(
                root,
                &ChangedFilesOptions::default().with_include_untracked(false),
            )
            .unwrap();
        assert_eq!(files, vec!["README.md", "lib/src/lib.rs"]);
    }

    #[test]
    fn test_missing_base_branch_is_an_error() {
        if !git_available() {
            return;
        }
        let temp = init_repo();

        let result = GitChangedFiles::new().changed_files(
            temp.path(),
            &ChangedFilesOptions::default().with_base_branch("does-not-exist"),
        );

        match result {
            Err(AffectedError::Git { command, .. }) => {
                assert!(command.contains("does-not-exist"))
            }
            other => panic!("expected git error, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_binary_is_an_error() {
        let temp = TempDir::new().unwrap();

        let result = GitChangedFiles::new()
            .with_binary("/nonexistent/git")
            .changed_files(temp.path(), &ChangedFilesOptions::default());

        assert!(matches!(result, Err(AffectedError::Git { .. })));
    }

    #[test]
    fn test_moved_file_reports_both_paths() {
        if !git_available() {
            return;
        }
        let temp = init_repo();
        let root = temp.path();

        git(root, &["checkout", "-q", "-b", "feature"]);
        fs::create_dir_all(root.join("other/src")).unwrap();
        git(root, &["mv", "lib/src/lib.rs", "other/src/lib.rs"]);
        git(root, &["commit", "-q", "-m", "move lib"]);

        let files = GitChangedFiles::new()
            .changed_files(root, &ChangedFilesOptions::default())
            .unwrap();
        assert_eq!(files, vec!["lib/src/lib.rs", "other/src/lib.rs"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_slow_git_is_killed_after_timeout() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().unwrap();
        let script = temp.path().join("slow-git");
        fs::write(&script, "#!/bin/sh\nexec sleep 10\n").unwrap();
        fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();

        let started = Instant::now();
        let result = GitChangedFiles::new().with_binary(&script).changed_files(
            temp.path(),
            &ChangedFilesOptions::default().with_timeout(Duration::from_millis(50)),
        );

        match result {
            Err(AffectedError::GitTimeout { command, timeout }) => {
                assert!(command.starts_with("merge-base"));
                assert_eq!(timeout, Duration::from_millis(50));
            }
            other => panic!("expected git timeout, got {other:?}"),
        }
        assert!(started.elapsed() < Duration::from_secs(5));
    }
}
