//! # 运行锁
//!
//! 同一输出目录同一时间只允许一个 multiplet 进程，
//! 通过独占创建 `.multiplet.lock` 实现，`Drop` 时删除。
//!
//! 锁文件内容为持有者的 PID。进程被 Ctrl-C 或 abort 终止时 `Drop` 不会执行，
//! 下次获取时若记录的 PID 已不存在，则接管这把过期的锁。
//!
//! ## 依赖关系
//! - 被 `process/runner.rs` 使用

use crate::error::{MultipletError, Result};

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

pub const LOCK_FILE_NAME: &str = ".multiplet.lock";

/// 输出目录上的独占锁
#[derive(Debug)]
pub struct RunLock {
    path: PathBuf,
}

impl RunLock {
    pub fn acquire(dir: &Path) -> Result<Self> {
        let path = dir.join(LOCK_FILE_NAME);
        match Self::create(path.clone()) {
            Err(MultipletError::RunInProgress { .. }) if is_stale(&path) => {
                log::warn!("removing stale lock {}", path.display());
                match fs::remove_file(&path) {
                    Ok(()) => {}
                    Err(e) if e.kind() == ErrorKind::NotFound => {}
                    Err(e) => {
                        return Err(MultipletError::FileWriteError {
                            path: path.display().to_string(),
                            source: e,
                        })
                    }
                }
                Self::create(path)
            }
            other => other,
        }
    }

    fn create(path: PathBuf) -> Result<Self> {
        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .map_err(|e| match e.kind() {
                ErrorKind::AlreadyExists => MultipletError::RunInProgress {
                    path: path.display().to_string(),
                },
                _ => MultipletError::FileWriteError {
                    path: path.display().to_string(),
                    source: e,
                },
            })?;

        writeln!(file, "{}", std::process::id()).map_err(|e| MultipletError::FileWriteError {
            path: path.display().to_string(),
            source: e,
        })?;

        Ok(RunLock { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// 锁文件记录的 PID 已经不存在；内容无法解析时视为仍被持有
fn is_stale(path: &Path) -> bool {
    fs::read_to_string(path)
        .ok()
        .and_then(|content| content.trim().parse::<u32>().ok())
        .is_some_and(|pid| !process_alive(pid))
}

#[cfg(unix)]
fn process_alive(pid: u32) -> bool {
    let pid = match libc::pid_t::try_from(pid) {
        Ok(pid) if pid > 0 => pid,
        _ => return false,
    };
    // SAFETY: 信号 0 只做存在性和权限检查，不会投递信号
    if unsafe { libc::kill(pid, 0) } == 0 {
        return true;
    }
    std::io::Error::last_os_error().raw_os_error() == Some(libc::EPERM)
}

#[cfg(not(unix))]
fn process_alive(_pid: u32) -> bool {
    true
}

impl Drop for RunLock {
    fn drop(&mut self) {
        if let Err(e) = fs::remove_file(&self.path) {
            log::warn!("failed to remove lock {}: {}", self.path.display(), e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_second_acquire_fails_until_released() {
        let dir = tempdir().unwrap();

        let lock = RunLock::acquire(dir.path()).unwrap();
        assert!(lock.path().exists());

        let err = RunLock::acquire(dir.path()).unwrap_err();
        assert!(matches!(err, MultipletError::RunInProgress { .. }));

        drop(lock);
        assert!(!dir.path().join(LOCK_FILE_NAME).exists());
        RunLock::acquire(dir.path()).unwrap();
    }

    #[test]
    fn test_unreadable_lock_is_kept() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(LOCK_FILE_NAME);
        fs::write(&path, "").unwrap();

        let err = RunLock::acquire(dir.path()).unwrap_err();
        assert!(matches!(err, MultipletError::RunInProgress { .. }));
        assert!(path.exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_lock_of_dead_process_is_taken_over() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(LOCK_FILE_NAME);

        // 已退出并被回收的子进程，其 PID 不再存在
        let mut child = std::process::Command::new("/bin/sh")
            .args(["-c", "exit 0"])
            .spawn()
            .unwrap();
        let dead_pid = child.id();
        child.wait().unwrap();
        fs::write(&path, format!("{}\n", dead_pid)).unwrap();

        let lock = RunLock::acquire(dir.path()).unwrap();
        let owner = fs::read_to_string(lock.path()).unwrap();
        assert_eq!(owner.trim(), std::process::id().to_string());
    }

    #[cfg(unix)]
    #[test]
    fn test_lock_of_live_process_is_respected() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join(LOCK_FILE_NAME),
            format!("{}\n", std::process::id()),
        )
        .unwrap();

        let err = RunLock::acquire(dir.path()).unwrap_err();
        assert!(matches!(err, MultipletError::RunInProgress { .. }));
    }
}
