use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// 核心层错误类型
///
/// 访问被拒绝需要与其他 I/O 错误区分开，遍历器据此决定如何报告被跳过的分支。
#[derive(Debug, Error)]
pub enum PurgeError {
    /// 没有访问权限
    #[error("拒绝访问: {}", path.display())]
    AccessDenied { path: PathBuf },

    /// 路径不存在（例如在遍历或删除期间被移除）
    #[error("路径不存在: {}", path.display())]
    NotFound { path: PathBuf },

    /// 路径存在但不是目录
    #[error("不是目录: {}", path.display())]
    NotADirectory { path: PathBuf },

    /// 其他 I/O 错误
    #[error("I/O 错误 {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// 搜索条件无效
    #[error("无效的搜索条件: {reason}")]
    InvalidCriteria { reason: String },
}

impl PurgeError {
    /// 根据 `io::ErrorKind` 对 I/O 错误进行分类
    pub fn from_io(path: &Path, err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::PermissionDenied => PurgeError::AccessDenied {
                path: path.to_path_buf(),
            },
            io::ErrorKind::NotFound => PurgeError::NotFound {
                path: path.to_path_buf(),
            },
            _ => PurgeError::Io {
                path: path.to_path_buf(),
                source: err,
            },
        }
    }

    pub fn is_access_denied(&self) -> bool {
        matches!(self, PurgeError::AccessDenied { .. })
    }
}
