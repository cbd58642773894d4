/// Session: one editor, one transcript and one dispatcher wired together.
///
/// Ordering: the output of a submitted line is always appended to the
/// transcript before the next prompt appears. While a command is pending
/// there is no live prompt at all and keys are ignored.

use crate::core::{InputLineEditor, KeyInput, LineKind, RenderAction, Transcript, DEFAULT_SCROLLBACK};
use crate::dispatch::{CommandResult, DispatchOutcome, Dispatcher, Notifier, PendingDispatch};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchMode {
    /// Run the command inline on the caller's thread.
    Blocking,
    /// Run the command on a worker thread; collect it with `poll`/`wait`.
    Background,
}

#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub dispatch_mode: DispatchMode,
    pub show_exit_status: bool,
    pub scrollback: usize,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            dispatch_mode: DispatchMode::Background,
            show_exit_status: false,
            scrollback: DEFAULT_SCROLLBACK,
        }
    }
}

pub struct Session {
    editor: InputLineEditor,
    transcript: Transcript,
    dispatcher: Arc<dyn Dispatcher>,
    pending: Option<PendingDispatch>,
    notifier: Option<Notifier>,
    options: SessionOptions,
}

impl Session {
    pub fn new(
        dispatcher: Arc<dyn Dispatcher>,
        working_dir: impl Into<PathBuf>,
        options: SessionOptions,
    ) -> Self {
        let mut session = Self {
            editor: InputLineEditor::new(working_dir),
            transcript: Transcript::new(options.scrollback),
            dispatcher,
            pending: None,
            notifier: None,
            options,
        };
        session.refresh_prompt();
        session
    }

    /// Called from the worker thread once a background result is ready.
    pub fn with_notifier(mut self, notifier: Notifier) -> Self {
        self.notifier = Some(notifier);
        self
    }

    pub fn handle_key(&mut self, key: KeyInput) -> RenderAction {
        let action = self.editor.handle_key(key);
        match &action {
            RenderAction::None => {}
            RenderAction::PromptUpdated => self.refresh_prompt(),
            RenderAction::Submitted { line } => self.dispatch(line.clone()),
        }
        action
    }

    fn dispatch(&mut self, line: String) {
        let frozen = self.editor.render_submitted(&line);
        self.transcript.set_live(frozen);
        self.transcript.commit_live(LineKind::Prompt);

        let working_dir = self.editor.working_dir().to_path_buf();
        match self.options.dispatch_mode {
            DispatchMode::Blocking => {
                let result = self.dispatcher.run(&line, &working_dir);
                self.apply(result);
            }
            DispatchMode::Background => {
                self.pending = Some(PendingDispatch::spawn(
                    self.dispatcher.clone(),
                    line,
                    working_dir,
                    self.notifier.clone(),
                ));
            }
        }
    }

    /// Apply a finished background result, if any. Returns true when the
    /// transcript changed.
    pub fn poll(&mut self) -> bool {
        let Some(pending) = &self.pending else {
            return false;
        };
        match pending.poll() {
            DispatchOutcome::Running => false,
            DispatchOutcome::Finished(result) => {
                if let Some(done) = self.pending.take() {
                    log::debug!("{:?} finished after {:?}", done.line(), done.elapsed());
                }
                self.apply(result);
                true
            }
        }
    }

    /// Block until the pending command, if any, has been applied.
    pub fn wait(&mut self) {
        if let Some(pending) = self.pending.take() {
            let result = pending.wait();
            self.apply(result);
        }
    }

    fn apply(&mut self, result: CommandResult) {
        if !result.stdout.is_empty() {
            self.transcript.push(LineKind::Output, &result.stdout);
        }
        if !result.stderr.is_empty() {
            self.transcript.push(LineKind::Output, &result.stderr);
        }
        if let Some(message) = &result.error_message {
            self.transcript.push(LineKind::Error, &format!("Error: {}", message));
        }
        if self.options.show_exit_status {
            if let Some(code) = result.exit_code.filter(|&c| c != 0) {
                self.transcript.push(LineKind::Notice, &format!("[exit {}]", code));
            }
        }
        self.editor.finish_dispatch(result.new_working_dir.as_deref());
        self.refresh_prompt();
    }

    /// Flip the caret. Does nothing while a command is pending.
    pub fn tick_caret(&mut self) -> RenderAction {
        if self.is_dispatching() {
            return RenderAction::None;
        }
        let action = self.editor.tick_caret();
        self.refresh_prompt();
        action
    }

    fn refresh_prompt(&mut self) {
        self.transcript.set_live(self.editor.render_prompt());
    }

    pub fn is_dispatching(&self) -> bool {
        self.pending.is_some()
    }

    pub fn editor(&self) -> &InputLineEditor {
        &self.editor
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }
}
