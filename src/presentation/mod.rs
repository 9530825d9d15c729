pub mod console;
pub mod display;
pub mod shell;

pub use console::ConsoleObserver;
pub use display::{format_duration, print_deletion_report, print_matches, SearchSummary};
pub use shell::{Shell, ShellOptions, ShellOutcome};
