/// Command dispatch: run a submitted line and capture what it printed.
///
/// `Dispatcher` is the seam between the session and process spawning; the
/// real implementation is `ShellDispatcher`, tests plug in their own.

mod shell;
mod worker;

pub use shell::ShellDispatcher;
pub use worker::{DispatchOutcome, Notifier, PendingDispatch};

use std::path::{Path, PathBuf};

/// Captured result of one dispatched line. Consumed once by the transcript.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandResult {
    pub stdout: String,
    pub stderr: String,
    /// Set when the command could not be launched at all.
    pub error_message: Option<String>,
    /// Exit status of the child; `None` if it never ran or died from a signal.
    pub exit_code: Option<i32>,
    /// Reported by built-ins that change the working directory.
    pub new_working_dir: Option<PathBuf>,
}

impl CommandResult {
    pub fn launch_failure(message: impl Into<String>) -> Self {
        Self {
            error_message: Some(message.into()),
            ..Self::default()
        }
    }

    pub fn is_launch_failure(&self) -> bool {
        self.error_message.is_some()
    }
}

pub trait Dispatcher: Send + Sync {
    /// Run `command_line` with `working_dir` as the process directory.
    /// Blocks until the command finishes; never panics on a bad command.
    fn run(&self, command_line: &str, working_dir: &Path) -> CommandResult;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_launch_failure_constructor() {
        let r = CommandResult::launch_failure("permission denied");
        assert!(r.is_launch_failure());
        assert_eq!(r.error_message.as_deref(), Some("permission denied"));
        assert!(r.stdout.is_empty());
        assert_eq!(r.exit_code, None);
    }

    #[test]
    fn test_default_is_empty_success() {
        let r = CommandResult::default();
        assert!(!r.is_launch_failure());
        assert!(r.new_working_dir.is_none());
    }
}
