// 三层架构模块
pub mod domain;
pub mod application;
pub mod infrastructure;
pub mod presentation;

// 重新导出主要类型
pub use domain::{
    matches, Criteria, DeletionExecutor, DeletionReport, DirectoryWalker, MatchSet, PurgeError,
    PurgeObserver, WildcardPattern,
};
pub use application::Config;
pub use infrastructure::{ErrorLogger, ErrorType, FileSystem, LocalFileSystem, Logger, LoggerTrait};
pub use presentation::{ConsoleObserver, SearchSummary, Shell, ShellOptions, ShellOutcome};
