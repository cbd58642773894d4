//! End-to-end: a session driven by keys, running commands through the real shell.
#![cfg(unix)]

use replterm::core::{KeyInput, LineKind, RenderAction, TranscriptLine};
use replterm::dispatch::ShellDispatcher;
use replterm::session::{DispatchMode, Session, SessionOptions};
use std::path::Path;
use std::sync::Arc;

fn blocking() -> SessionOptions {
    SessionOptions {
        dispatch_mode: DispatchMode::Blocking,
        ..SessionOptions::default()
    }
}

fn type_line(session: &mut Session, line: &str) -> RenderAction {
    for c in line.chars() {
        session.handle_key(KeyInput::Char(c));
    }
    session.handle_key(KeyInput::Submit)
}

fn committed(session: &Session) -> Vec<TranscriptLine> {
    session.transcript().lines().cloned().collect()
}

#[test]
fn test_echo_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let wd = dir.path().canonicalize().unwrap();
    let mut session = Session::new(Arc::new(ShellDispatcher::default()), &wd, blocking());

    type_line(&mut session, "echo hello");

    let lines = committed(&session);
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0].kind, LineKind::Prompt);
    assert_eq!(lines[0].text, format!("({}) >: echo hello", wd.display()));
    assert_eq!(lines[1].kind, LineKind::Output);
    assert_eq!(lines[1].text, "hello");
    assert_eq!(
        session.transcript().live(),
        Some(format!("({}) >: _", wd.display()).as_str())
    );
}

#[test]
fn test_stderr_follows_stdout() {
    let mut session = Session::new(Arc::new(ShellDispatcher::default()), "/", blocking());
    type_line(&mut session, "echo out; echo err >&2");

    let texts: Vec<String> = committed(&session).into_iter().map(|l| l.text).collect();
    assert_eq!(texts[1..], ["out".to_string(), "err".to_string()]);
}

#[test]
fn test_launch_failure_reported_as_error_line() {
    let mut session = Session::new(Arc::new(ShellDispatcher::default()), "/", blocking());
    type_line(&mut session, "echo \u{0}bad");

    let lines = committed(&session);
    let last = lines.last().unwrap();
    assert_eq!(last.kind, LineKind::Error);
    assert!(last.text.starts_with("Error: "));
    assert!(!session.is_dispatching());
}

#[test]
fn test_cd_without_builtin_keeps_prompt() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = Session::new(Arc::new(ShellDispatcher::default()), "/", blocking());

    type_line(&mut session, &format!("cd {}", dir.path().display()));

    assert_eq!(session.editor().working_dir(), Path::new("/"));
    assert_eq!(session.transcript().live(), Some("(/) >: _"));
}

#[test]
fn test_builtin_cd_moves_prompt() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir(dir.path().join("sub")).unwrap();
    let base = dir.path().canonicalize().unwrap();
    let dispatcher = ShellDispatcher::default().with_builtin_cd(true);
    let mut session = Session::new(Arc::new(dispatcher), &base, blocking());

    type_line(&mut session, "cd sub");
    assert_eq!(session.editor().working_dir(), base.join("sub"));

    // later commands run in the new directory
    type_line(&mut session, "pwd -P");
    let last = committed(&session).pop().unwrap();
    assert_eq!(last.text, base.join("sub").display().to_string());
}

#[test]
fn test_background_dispatch_orders_output_before_prompt() {
    let mut session = Session::new(
        Arc::new(ShellDispatcher::default()),
        "/",
        SessionOptions::default(),
    );

    let action = type_line(&mut session, "echo later");
    assert!(matches!(action, RenderAction::Submitted { .. }));
    assert!(session.is_dispatching());

    // keys are ignored until the result is in
    assert_eq!(session.handle_key(KeyInput::Char('x')), RenderAction::None);

    session.wait();
    assert!(!session.is_dispatching());
    let lines = committed(&session);
    assert_eq!(lines.last().unwrap().text, "later");
    assert_eq!(session.transcript().live(), Some("(/) >: _"));
    assert!(session.editor().state().buffer.is_empty());
}

#[test]
fn test_history_records_submissions() {
    let mut session = Session::new(Arc::new(ShellDispatcher::default()), "/", blocking());
    type_line(&mut session, "true");
    type_line(&mut session, "");
    let history = session.editor().history();
    assert_eq!(history.entries(), ["true".to_string(), String::new()]);
}
