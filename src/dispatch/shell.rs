/// Shell dispatcher: hands the line verbatim to the host interpreter
/// (`/bin/sh -c` by default) and collects stdout/stderr once it exits.

use super::{CommandResult, Dispatcher};
use crate::config::ShellConfig;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::Instant;

#[derive(Debug, Clone)]
pub struct ShellDispatcher {
    program: String,
    args: Vec<String>,
    builtin_cd: bool,
}

impl ShellDispatcher {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
            builtin_cd: false,
        }
    }

    pub fn from_config(config: &ShellConfig) -> Self {
        Self::new(config.program.clone(), config.args.clone()).with_builtin_cd(config.builtin_cd)
    }

    /// Handle `cd` in-process so it changes the session's working directory.
    pub fn with_builtin_cd(mut self, enabled: bool) -> Self {
        self.builtin_cd = enabled;
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    fn spawn(&self, command_line: &str, working_dir: &Path) -> CommandResult {
        let output = Command::new(&self.program)
            .args(&self.args)
            .arg(command_line)
            .current_dir(working_dir)
            .stdin(Stdio::null())
            .output();

        match output {
            Ok(output) => CommandResult {
                stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
                error_message: None,
                exit_code: output.status.code(),
                new_working_dir: None,
            },
            Err(e) => {
                log::warn!("failed to launch {}: {}", self.program, e);
                CommandResult::launch_failure(e.to_string())
            }
        }
    }
}

impl Default for ShellDispatcher {
    fn default() -> Self {
        Self::from_config(&ShellConfig::default())
    }
}

impl Dispatcher for ShellDispatcher {
    fn run(&self, command_line: &str, working_dir: &Path) -> CommandResult {
        if command_line.trim().is_empty() {
            return CommandResult::default();
        }

        if self.builtin_cd {
            if let Some(target) = parse_cd(command_line) {
                return change_directory(target, working_dir);
            }
        }

        let start = Instant::now();
        let result = self.spawn(command_line, working_dir);
        log::debug!(
            "ran {:?} in {} ({}ms, exit {:?})",
            command_line,
            working_dir.display(),
            start.elapsed().as_millis(),
            result.exit_code
        );
        result
    }
}

/// Characters that make a line more than a plain `cd`; such lines go to the shell.
const SHELL_METACHARS: &[char] = &[';', '&', '|', '<', '>', '$', '`', '(', ')', '*', '?', '\\'];

/// `Some(target)` if the line is a lone `cd` with at most one argument; an
/// empty target means home.
fn parse_cd(line: &str) -> Option<&str> {
    let line = line.trim();
    let rest = line.strip_prefix("cd")?;
    if !rest.is_empty() && !rest.starts_with(char::is_whitespace) {
        return None;
    }
    let rest = rest.trim();
    if rest.contains(SHELL_METACHARS) {
        return None;
    }
    let quoted = rest
        .strip_prefix('"')
        .and_then(|r| r.strip_suffix('"'))
        .or_else(|| rest.strip_prefix('\'').and_then(|r| r.strip_suffix('\'')));
    match quoted {
        Some(inner) if !inner.contains(['"', '\'']) => Some(inner),
        Some(_) => None,
        None if rest.contains(|c: char| c.is_whitespace() || c == '"' || c == '\'') => None,
        None => Some(rest),
    }
}

fn change_directory(target: &str, working_dir: &Path) -> CommandResult {
    let path = match expand_target(target, working_dir) {
        Some(path) => path,
        None => return CommandResult::launch_failure("cd: HOME not set"),
    };

    match path.canonicalize() {
        Ok(dir) if dir.is_dir() => CommandResult {
            new_working_dir: Some(dir),
            exit_code: Some(0),
            ..CommandResult::default()
        },
        Ok(_) => CommandResult::launch_failure(format!("cd: not a directory: {}", target)),
        Err(e) => CommandResult::launch_failure(format!("cd: {}: {}", e, target)),
    }
}

fn expand_target(target: &str, working_dir: &Path) -> Option<PathBuf> {
    let home = || std::env::var_os("HOME").map(PathBuf::from);
    match target {
        "" | "~" => home(),
        t if t.starts_with("~/") => home().map(|h| h.join(&t[2..])),
        t => Some(working_dir.join(t)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_cd() {
        assert_eq!(parse_cd("cd"), Some(""));
        assert_eq!(parse_cd("  cd /tmp "), Some("/tmp"));
        assert_eq!(parse_cd("cd \"my dir\""), Some("my dir"));
        assert_eq!(parse_cd("cd 'my dir'"), Some("my dir"));
        assert_eq!(parse_cd("cdrecord -v"), None);
        assert_eq!(parse_cd("echo cd"), None);
    }

    #[test]
    fn test_parse_cd_leaves_compound_lines_to_shell() {
        assert_eq!(parse_cd("cd sub && make"), None);
        assert_eq!(parse_cd("cd x; ls"), None);
        assert_eq!(parse_cd("cd $HOME"), None);
        assert_eq!(parse_cd("cd a b"), None);
        assert_eq!(parse_cd("cd `pwd`"), None);
        assert_eq!(parse_cd("cd 'a' 'b'"), None);
        assert_eq!(parse_cd("cd d > log"), None);
    }

    #[cfg(unix)]
    #[test]
    fn test_builtin_cd_compound_line_runs_in_shell() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        let d = ShellDispatcher::default().with_builtin_cd(true);
        let r = d.run("cd sub && echo ran", dir.path());
        assert_eq!(r.stdout, "ran\n");
        assert_eq!(r.error_message, None);
        assert_eq!(r.new_working_dir, None);
    }

    #[test]
    fn test_blank_line_spawns_nothing() {
        let d = ShellDispatcher::new("/definitely/not/a/shell", vec![]);
        let r = d.run("   ", Path::new("/"));
        assert_eq!(r, CommandResult::default());
    }

    #[test]
    fn test_missing_interpreter_is_launch_failure() {
        let d = ShellDispatcher::new("/definitely/not/a/shell", vec!["-c".into()]);
        let r = d.run("echo hi", Path::new("/"));
        assert!(r.is_launch_failure());
        assert!(r.stdout.is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_echo_captures_stdout() {
        let d = ShellDispatcher::default();
        let r = d.run("echo hi", Path::new("/"));
        assert_eq!(r.stdout, "hi\n");
        assert_eq!(r.stderr, "");
        assert_eq!(r.error_message, None);
        assert_eq!(r.exit_code, Some(0));
    }

    #[cfg(unix)]
    #[test]
    fn test_stderr_and_nonzero_exit_are_not_errors() {
        let d = ShellDispatcher::default();
        let r = d.run("echo oops 1>&2; exit 3", Path::new("/"));
        assert_eq!(r.stderr, "oops\n");
        assert_eq!(r.exit_code, Some(3));
        assert!(!r.is_launch_failure());
    }

    #[cfg(unix)]
    #[test]
    fn test_nul_byte_is_launch_failure() {
        let d = ShellDispatcher::default();
        let r = d.run("\u{0}bad", Path::new("/"));
        assert!(r.error_message.as_deref().is_some_and(|m| !m.is_empty()));
    }

    #[cfg(unix)]
    #[test]
    fn test_runs_in_working_dir() {
        let dir = tempfile::tempdir().unwrap();
        let canonical = dir.path().canonicalize().unwrap();
        let d = ShellDispatcher::default();
        let r = d.run("pwd -P", &canonical);
        assert_eq!(r.stdout.trim_end(), canonical.to_str().unwrap());
    }

    #[cfg(unix)]
    #[test]
    fn test_cd_without_builtin_does_not_move() {
        let d = ShellDispatcher::default();
        let r = d.run("cd /", Path::new("/tmp"));
        assert_eq!(r.new_working_dir, None);
        assert!(!r.is_launch_failure());
    }

    #[test]
    fn test_builtin_cd_relative() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        let d = ShellDispatcher::default().with_builtin_cd(true);
        let r = d.run("cd sub", dir.path());
        let expected = dir.path().join("sub").canonicalize().unwrap();
        assert_eq!(r.new_working_dir, Some(expected));
        assert!(!r.is_launch_failure());
    }

    #[test]
    fn test_builtin_cd_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        let d = ShellDispatcher::default().with_builtin_cd(true);
        let r = d.run("cd nope", dir.path());
        assert_eq!(r.new_working_dir, None);
        let msg = r.error_message.unwrap();
        assert!(msg.starts_with("cd: "));
        assert!(msg.ends_with("nope"));
    }

    #[test]
    fn test_builtin_cd_onto_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("f.txt"), "x").unwrap();
        let d = ShellDispatcher::default().with_builtin_cd(true);
        let r = d.run("cd f.txt", dir.path());
        assert_eq!(r.error_message.as_deref(), Some("cd: not a directory: f.txt"));
    }
}
