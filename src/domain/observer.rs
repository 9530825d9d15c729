use std::path::Path;

use super::error::PurgeError;

/// 搜索与删除过程中的事件接收者
///
/// 核心逻辑只通过此trait报告进度与错误，不直接写控制台或日志。
pub trait PurgeObserver {
    /// 开始列出某个目录
    fn entering_directory(&self, _dir: &Path) {}

    /// 文件通过全部筛选条件
    fn file_matched(&self, _path: &Path, _size: u64) {}

    /// 子目录分支因错误被放弃，遍历继续处理其兄弟目录
    fn branch_skipped(&self, _dir: &Path, _error: &PurgeError) {}

    /// 顶层搜索结束（无论成功与否）
    fn search_finished(&self) {}

    fn file_deleted(&self, _path: &Path) {}

    fn delete_failed(&self, _path: &Path, _error: &PurgeError) {}
}

/// 忽略所有事件
#[derive(Debug, Default, Clone, Copy)]
pub struct NullObserver;

impl PurgeObserver for NullObserver {}
