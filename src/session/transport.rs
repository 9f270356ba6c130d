//! External process seam for the secure shell and copy clients.
//!
//! The workflow talks to a [`Transport`] so tests can substitute a
//! recording fake; the real [`OpenSsh`] implementation spawns the system
//! `ssh`/`scp` binaries with inherited stdio. The parent has nothing to do
//! while a child runs, so every call blocks until the child exits.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::error::TetherError;

/// Connection parameters for one remote session.
#[derive(Debug, Clone)]
pub struct SessionTarget {
    pub user: String,
    pub address: String,
    /// Resolved private key path.
    pub key_path: PathBuf,
}

impl SessionTarget {
    /// The `user@address` login string.
    pub fn login(&self) -> String {
        format!("{}@{}", self.user, self.address)
    }
}

/// Seam between the connection workflow and the system ssh/scp clients.
pub trait Transport {
    /// Open an interactive shell on the target, taking over the terminal.
    /// Blocks until the remote session ends.
    fn open_shell(&self, target: &SessionTarget) -> Result<(), TetherError>;

    /// Create `dir` under the login user's home directory on the target.
    fn create_remote_dir(&self, target: &SessionTarget, dir: &str) -> Result<(), TetherError>;

    /// Recursively copy the contents of `local_dir` into `remote_dir` on
    /// the target.
    fn copy_dir(
        &self,
        target: &SessionTarget,
        local_dir: &Path,
        remote_dir: &str,
    ) -> Result<(), TetherError>;
}

/// Spawns the system `ssh`/`scp` binaries.
pub struct OpenSsh;

impl Transport for OpenSsh {
    fn open_shell(&self, target: &SessionTarget) -> Result<(), TetherError> {
        tracing::info!(
            target = %target.login(),
            key = %target.key_path.display(),
            "opening interactive session"
        );
        let status = Command::new("ssh")
            .arg("-i")
            .arg(&target.key_path)
            .arg(target.login())
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()?;
        if !status.success() {
            // ssh already printed its own error to the shared terminal.
            tracing::warn!(%status, "ssh exited with a non-zero status");
        }
        Ok(())
    }

    fn create_remote_dir(&self, target: &SessionTarget, dir: &str) -> Result<(), TetherError> {
        tracing::debug!(target = %target.login(), dir, "creating remote directory");
        let status = Command::new("ssh")
            .arg("-i")
            .arg(&target.key_path)
            .arg(target.login())
            .arg(format!("mkdir -p {}", dir))
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()?;
        if !status.success() {
            return Err(TetherError::RemoteDirCreateFailed {
                target: target.login(),
                reason: format!("ssh exited with {}", status),
            });
        }
        Ok(())
    }

    fn copy_dir(
        &self,
        target: &SessionTarget,
        local_dir: &Path,
        remote_dir: &str,
    ) -> Result<(), TetherError> {
        tracing::debug!(
            target = %target.login(),
            local = %local_dir.display(),
            remote_dir,
            "copying staged files"
        );
        // `dir/.` makes scp copy the directory's contents rather than the
        // directory itself.
        let status = Command::new("scp")
            .arg("-r")
            .arg("-i")
            .arg(&target.key_path)
            .arg(local_dir.join("."))
            .arg(format!("{}:{}/", target.login(), remote_dir))
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()?;
        if !status.success() {
            return Err(TetherError::CopyFailed {
                target: target.login(),
                reason: format!("scp exited with {}", status),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod fake {
    use super::*;
    use std::cell::RefCell;

    /// Records transport calls instead of spawning processes.
    #[derive(Default)]
    pub(crate) struct RecordingTransport {
        pub(crate) calls: RefCell<Vec<String>>,
        pub(crate) fail_remote_dir: bool,
        pub(crate) fail_copy: bool,
    }

    impl Transport for RecordingTransport {
        fn open_shell(&self, target: &SessionTarget) -> Result<(), TetherError> {
            self.calls.borrow_mut().push(format!(
                "shell {} key={}",
                target.login(),
                target.key_path.display()
            ));
            Ok(())
        }

        fn create_remote_dir(
            &self,
            target: &SessionTarget,
            dir: &str,
        ) -> Result<(), TetherError> {
            if self.fail_remote_dir {
                return Err(TetherError::RemoteDirCreateFailed {
                    target: target.login(),
                    reason: "ssh exited with exit status: 1".to_string(),
                });
            }
            self.calls
                .borrow_mut()
                .push(format!("mkdir {} {}", target.login(), dir));
            Ok(())
        }

        fn copy_dir(
            &self,
            target: &SessionTarget,
            local_dir: &Path,
            remote_dir: &str,
        ) -> Result<(), TetherError> {
            if self.fail_copy {
                return Err(TetherError::CopyFailed {
                    target: target.login(),
                    reason: "scp exited with exit status: 1".to_string(),
                });
            }
            self.calls.borrow_mut().push(format!(
                "copy {} {} -> {}",
                target.login(),
                local_dir.display(),
                remote_dir
            ));
            Ok(())
        }
    }
}
