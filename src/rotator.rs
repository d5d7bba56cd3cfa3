//! 抓包文件轮转
//!
//! 代理进程持续向抓包文件追加数据。轮转在锁文件的排他锁保护下完成两步：
//!
//! 1. 把抓包文件重命名为 `<capture>.<随机后缀>` 快照
//! 2. 在原路径创建新的空文件，代理随即可以继续追加
//!
//! 锁只覆盖这两步，不覆盖之后的解析与回放。锁文件与抓包文件分离，
//! 仅作为协作进程之间的互斥约定，并不锁住抓包文件本身的内容。

use crate::config::{ReplayConfig, sibling_path};
use crate::error::ReplayError;
use crate::tools::random_suffix;
use fs2::FileExt;
use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};

/// 快照文件名随机后缀的长度
const SUFFIX_LENGTH: usize = 10;

/// 锁文件上的排他锁，离开作用域时释放
#[derive(Debug)]
pub struct RotationLock {
    file: File,
    path: PathBuf,
}

impl RotationLock {
    /// 打开（必要时创建）锁文件并阻塞等待排他锁
    pub fn acquire(path: &Path) -> Result<Self, ReplayError> {
        let lock_err = |source| ReplayError::Lock {
            path: path.display().to_string(),
            source,
        };

        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)
            .map_err(lock_err)?;
        file.lock_exclusive().map_err(lock_err)?;

        tracing::debug!(lock = %path.display(), "rotation lock acquired");
        Ok(Self {
            file,
            path: path.to_path_buf(),
        })
    }
}

impl Drop for RotationLock {
    fn drop(&mut self) {
        if let Err(e) = FileExt::unlock(&self.file) {
            tracing::warn!(lock = %self.path.display(), error = %e, "failed to release rotation lock");
        } else {
            tracing::debug!(lock = %self.path.display(), "rotation lock released");
        }
    }
}

/// 轮转得到的快照，归回放引擎独占
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    path: PathBuf,
}

impl Snapshot {
    /// 以已有文件作为快照（例如手动重放保留下来的快照）
    pub fn from_path<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 一次性读入全部内容
    pub fn read(&self) -> Result<Vec<u8>, ReplayError> {
        fs::read(&self.path).map_err(|source| ReplayError::Read {
            path: self.path.display().to_string(),
            source,
        })
    }

    /// 删除快照文件
    pub fn remove(self) -> Result<(), ReplayError> {
        fs::remove_file(&self.path).map_err(|source| ReplayError::Remove {
            path: self.path.display().to_string(),
            source,
        })
    }
}

/// 抓包文件轮转器
#[derive(Debug, Clone)]
pub struct Rotator {
    capture_path: PathBuf,
    lock_path: PathBuf,
}

impl Rotator {
    /// 创建轮转器
    ///
    /// # 错误
    ///
    /// 抓包文件不存在时返回 [`ReplayError::CaptureFileNotFound`]，属于启动期致命错误。
    pub fn new(config: &ReplayConfig) -> Result<Self, ReplayError> {
        if !config.capture_path.exists() {
            return Err(ReplayError::CaptureFileNotFound {
                path: config.capture_path.display().to_string(),
            });
        }

        Ok(Self {
            capture_path: config.capture_path.clone(),
            lock_path: config.lock_path(),
        })
    }

    pub fn capture_path(&self) -> &Path {
        &self.capture_path
    }

    pub fn lock_path(&self) -> &Path {
        &self.lock_path
    }

    /// 执行一次轮转
    ///
    /// 成功后恰好多出一个快照文件，内容为轮转前的全部数据；原路径存在且为空。
    /// 任何一步失败都会释放锁并把错误交给调用方，不做额外清理。
    pub fn rotate(&self) -> Result<Snapshot, ReplayError> {
        let snapshot_path = sibling_path(&self.capture_path, &random_suffix(SUFFIX_LENGTH));

        let _lock = RotationLock::acquire(&self.lock_path)?;

        fs::rename(&self.capture_path, &snapshot_path).map_err(|source| ReplayError::Rename {
            from: self.capture_path.display().to_string(),
            to: snapshot_path.display().to_string(),
            source,
        })?;

        // 写入方可能已经重新创建了文件，不能截断
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.capture_path)
            .map_err(|source| ReplayError::Create {
                path: self.capture_path.display().to_string(),
                source,
            })?;

        tracing::info!(
            capture = %self.capture_path.display(),
            snapshot = %snapshot_path.display(),
            "rotated capture file"
        );
        Ok(Snapshot::from_path(snapshot_path))
    }
}
