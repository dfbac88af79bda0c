//! # multiplet 进程执行器
//!
//! 在输出目录中启动 multiplet，把输入卡片写入其标准输入，
//! 并把 stdout/stderr 按行实时转发给调用方。
//!
//! ## 功能
//! - 两个读线程分别读取 stdout 和 stderr，经 channel 汇总到调用线程
//! - 单独的写线程写入卡片后关闭 stdin
//! - 退出码 0 -> `RunState::Succeeded`，否则 `RunState::Failed`
//!
//! ## 依赖关系
//! - 被 `commands/run.rs` 使用
//! - 使用 `process/lock.rs`

use crate::error::{MultipletError, Result};
use crate::process::lock::RunLock;

use std::ffi::OsString;
use std::fs;
use std::io::{BufRead, BufReader, ErrorKind, Read, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};
use std::sync::mpsc::{self, Sender};
use std::thread;

/// 输出来源
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamKind {
    Stdout,
    Stderr,
}

/// 子进程输出的一行（不含换行符）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleLine {
    pub stream: StreamKind,
    pub text: String,
}

/// 一次运行的状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Running,
    Succeeded,
    /// 非零退出码；被信号终止时为 `None`
    Failed(Option<i32>),
}

impl RunState {
    pub fn from_exit(status: ExitStatus) -> Self {
        match status.code() {
            Some(0) => RunState::Succeeded,
            code => RunState::Failed(code),
        }
    }

    /// 把失败状态转换为错误
    pub fn into_result(self) -> Result<()> {
        match self {
            RunState::Failed(Some(code)) => Err(MultipletError::ProcessFailed { code }),
            RunState::Failed(None) => Err(MultipletError::ProcessKilled),
            _ => Ok(()),
        }
    }
}

/// 一次 multiplet 运行
pub struct MultipletRun {
    executable: PathBuf,
    args: Vec<OsString>,
    work_dir: PathBuf,
    state: RunState,
}

impl MultipletRun {
    pub fn new(executable: impl Into<PathBuf>, work_dir: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
            args: Vec::new(),
            work_dir: work_dir.into(),
            state: RunState::Idle,
        }
    }

    /// 追加传给可执行文件的参数
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    /// 运行直到子进程退出，每收到一行输出调用一次 `on_line`
    pub fn execute<F>(&mut self, deck: &str, mut on_line: F) -> Result<RunState>
    where
        F: FnMut(&ConsoleLine),
    {
        fs::create_dir_all(&self.work_dir).map_err(|e| MultipletError::FileWriteError {
            path: self.work_dir.display().to_string(),
            source: e,
        })?;
        let lock = RunLock::acquire(&self.work_dir)?;
        log::debug!("holding run lock {}", lock.path().display());

        let command_name = self.executable.display().to_string();
        log::info!("starting {} in {}", command_name, self.work_dir().display());

        let mut child = Command::new(&self.executable)
            .args(&self.args)
            .current_dir(&self.work_dir)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound | ErrorKind::PermissionDenied => {
                    MultipletError::CommandNotFound {
                        command: command_name.clone(),
                    }
                }
                _ => MultipletError::Other(format!("Failed to start {}: {}", command_name, e)),
            })?;
        self.state = RunState::Running;

        let writer = child.stdin.take().map(|mut stdin| {
            let bytes = deck.as_bytes().to_vec();
            thread::spawn(move || {
                // stdin 在线程结束时关闭
                if let Err(e) = stdin.write_all(&bytes) {
                    log::debug!("writing deck to stdin failed: {}", e);
                }
            })
        });

        let (tx, rx) = mpsc::channel();
        let mut readers = Vec::new();
        if let Some(stdout) = child.stdout.take() {
            readers.push(spawn_reader(stdout, StreamKind::Stdout, tx.clone()));
        }
        if let Some(stderr) = child.stderr.take() {
            readers.push(spawn_reader(stderr, StreamKind::Stderr, tx.clone()));
        }
        drop(tx);

        for line in rx {
            on_line(&line);
        }

        for handle in readers {
            let _ = handle.join();
        }
        if let Some(handle) = writer {
            let _ = handle.join();
        }

        let status = child
            .wait()
            .map_err(|e| MultipletError::Other(format!("Failed to wait for {}: {}", command_name, e)))?;

        self.state = RunState::from_exit(status);
        log::info!("{} finished: {:?}", command_name, self.state);
        Ok(self.state)
    }
}

/// 按行读取一个输出流；非 UTF-8 字节按 lossy 方式替换
fn spawn_reader<R>(stream: R, kind: StreamKind, tx: Sender<ConsoleLine>) -> thread::JoinHandle<()>
where
    R: Read + Send + 'static,
{
    thread::spawn(move || {
        let mut reader = BufReader::new(stream);
        let mut buf = Vec::new();
        loop {
            buf.clear();
            match reader.read_until(b'\n', &mut buf) {
                Ok(0) => break,
                Ok(_) => {
                    let text = String::from_utf8_lossy(&buf)
                        .trim_end_matches(['\n', '\r'])
                        .to_string();
                    if tx.send(ConsoleLine { stream: kind, text }).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    log::debug!("{:?} reader stopped: {}", kind, e);
                    break;
                }
            }
        }
    })
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::process::lock::LOCK_FILE_NAME;
    use tempfile::tempdir;

    /// 用 /bin/sh 执行脚本，模拟 multiplet
    fn fake_multiplet(dir: &Path, body: &str) -> MultipletRun {
        let script = dir.join("fake_multiplet.sh");
        fs::write(&script, body).unwrap();
        MultipletRun::new("/bin/sh", dir.join("out")).args([script])
    }

    #[test]
    fn test_successful_run() {
        let dir = tempdir().unwrap();
        let mut run = fake_multiplet(
            dir.path(),
            "cat > received.txt\necho 'start multiplet'\necho 'note' 1>&2\nexit 0\n",
        );
        assert_eq!(run.state(), RunState::Idle);

        let deck = "-639 -1.e-6\n 1.e-3 90.";
        let mut lines = Vec::new();
        let state = run.execute(deck, |l| lines.push(l.clone())).unwrap();

        assert_eq!(state, RunState::Succeeded);
        assert_eq!(run.state(), RunState::Succeeded);
        assert!(state.into_result().is_ok());

        let received = fs::read_to_string(run.work_dir().join("received.txt")).unwrap();
        assert_eq!(received, deck);

        assert!(lines.contains(&ConsoleLine {
            stream: StreamKind::Stdout,
            text: "start multiplet".to_string(),
        }));
        assert!(lines.contains(&ConsoleLine {
            stream: StreamKind::Stderr,
            text: "note".to_string(),
        }));
        assert!(!run.work_dir().join(LOCK_FILE_NAME).exists());
    }

    #[test]
    fn test_failed_run() {
        let dir = tempdir().unwrap();
        let mut run = fake_multiplet(dir.path(), "cat > /dev/null\nexit 3\n");

        let state = run.execute("1", |_| {}).unwrap();
        assert_eq!(state, RunState::Failed(Some(3)));
        assert!(matches!(
            state.into_result(),
            Err(MultipletError::ProcessFailed { code: 3 })
        ));
        assert!(!run.work_dir().join(LOCK_FILE_NAME).exists());
    }

    #[test]
    fn test_killed_by_signal() {
        let dir = tempdir().unwrap();
        let mut run = fake_multiplet(dir.path(), "echo 'about to die'\nkill -9 $$\n");

        let mut lines = Vec::new();
        let state = run.execute("1", |l| lines.push(l.text.clone())).unwrap();
        assert_eq!(state, RunState::Failed(None));
        assert_eq!(run.state(), RunState::Failed(None));
        assert!(matches!(
            state.into_result(),
            Err(MultipletError::ProcessKilled)
        ));
        assert_eq!(lines, vec!["about to die".to_string()]);
        assert!(!run.work_dir().join(LOCK_FILE_NAME).exists());
    }

    #[test]
    fn test_missing_executable() {
        let dir = tempdir().unwrap();
        let mut run = MultipletRun::new(dir.path().join("no-such-multiplet"), dir.path());
        let err = run.execute("1", |_| {}).unwrap_err();
        assert!(matches!(err, MultipletError::CommandNotFound { .. }));
        assert_eq!(run.state(), RunState::Idle);
    }

    #[test]
    fn test_locked_directory_refused() {
        let dir = tempdir().unwrap();
        let mut run = fake_multiplet(dir.path(), "exit 0\n");
        fs::create_dir_all(run.work_dir()).unwrap();
        let _held = RunLock::acquire(run.work_dir()).unwrap();

        let err = run.execute("1", |_| {}).unwrap_err();
        assert!(matches!(err, MultipletError::RunInProgress { .. }));
    }
}
