use std::path::{Path, PathBuf};

use super::criteria::Criteria;
use super::error::PurgeError;
use super::observer::PurgeObserver;
use crate::infrastructure::filesystem::{FileEntry, FileSystem};

/// 一次搜索的结果
///
/// 文件顺序取决于底层文件系统的枚举顺序（目录按深度优先），不同平台之间不保证一致。
#[derive(Debug, Default, Clone)]
pub struct MatchSet {
    pub files: Vec<FileEntry>,
    /// 成功列出的目录数
    pub scanned_dirs: u64,
    /// 因错误被放弃的分支数
    pub skipped_branches: u64,
}

impl MatchSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn paths(&self) -> Vec<PathBuf> {
        self.files.iter().map(|f| f.path.clone()).collect()
    }

    pub fn total_bytes(&self) -> u64 {
        self.files.iter().map(|f| f.size).sum()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// 递归目录遍历器
pub struct DirectoryWalker<'a, F: FileSystem + ?Sized> {
    fs: &'a F,
    observer: &'a dyn PurgeObserver,
}

impl<'a, F: FileSystem + ?Sized> DirectoryWalker<'a, F> {
    pub fn new(fs: &'a F, observer: &'a dyn PurgeObserver) -> Self {
        Self { fs, observer }
    }

    /// 从 `root` 开始搜索，每次调用都使用新的结果集
    ///
    /// 只有根目录本身无法列出时才返回错误；子目录分支的失败会被报告并跳过。
    pub fn search(&self, root: &Path, criteria: &Criteria) -> Result<MatchSet, PurgeError> {
        let mut matches = MatchSet::new();
        self.search_into(root, criteria, &mut matches)?;
        Ok(matches)
    }

    /// 搜索并将结果追加到调用方提供的结果集
    ///
    /// 根目录先被解析为绝对路径，因此结果中的路径都是绝对路径。
    pub fn search_into(
        &self,
        root: &Path,
        criteria: &Criteria,
        matches: &mut MatchSet,
    ) -> Result<(), PurgeError> {
        let result = self
            .fs
            .resolve_dir(root)
            .and_then(|root| self.walk(&root, criteria, matches));
        self.observer.search_finished();
        result
    }

    /// 深度优先、先序: 先处理本层文件，再依次进入匹配的子目录
    fn walk(&self, dir: &Path, criteria: &Criteria, matches: &mut MatchSet) -> Result<(), PurgeError> {
        self.observer.entering_directory(dir);

        let listing = self.fs.list_dir(dir)?;
        matches.scanned_dirs += 1;

        for file in listing.files {
            if criteria.selects_name(&file.name) && criteria.in_window(file.modified) {
                self.observer.file_matched(&file.path, file.size);
                matches.files.push(file);
            }
        }

        for subdir in listing.dirs {
            if !criteria.descends_into(&subdir.name) {
                continue;
            }
            if let Err(err) = self.walk(&subdir.path, criteria, matches) {
                matches.skipped_branches += 1;
                self.observer.branch_skipped(&subdir.path, &err);
            }
        }

        Ok(())
    }
}

/// 使用给定文件系统执行一次搜索
pub fn search<F: FileSystem + ?Sized>(
    fs: &F,
    root: &Path,
    criteria: &Criteria,
    observer: &dyn PurgeObserver,
) -> Result<MatchSet, PurgeError> {
    DirectoryWalker::new(fs, observer).search(root, criteria)
}
