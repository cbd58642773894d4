/// Input line editor: the in-progress command line, the prompt it renders to,
/// and the Editing/Dispatching state machine around a submit.
///
/// The editor knows nothing about windows or processes. Callers feed it
/// classified keys and act on the returned `RenderAction`.

use super::history::CommandHistory;
use std::path::{Path, PathBuf};

/// Glyph appended to the prompt while the caret is in its visible phase.
pub const CARET_GLYPH: char = '_';

/// A key press, already reduced to what the editor cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyInput {
    Submit,
    Backspace,
    Char(char),
    Other,
}

/// What the caller has to do after feeding the editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderAction {
    /// Nothing changed.
    None,
    /// The prompt line must be redrawn.
    PromptUpdated,
    /// `line` was submitted and has to be dispatched.
    Submitted { line: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorMode {
    Editing,
    Dispatching,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorState {
    pub buffer: String,
    pub working_dir: PathBuf,
    pub caret_visible: bool,
}

pub struct InputLineEditor {
    state: EditorState,
    history: CommandHistory,
    mode: EditorMode,
}

impl InputLineEditor {
    pub fn new(working_dir: impl Into<PathBuf>) -> Self {
        Self {
            state: EditorState {
                buffer: String::new(),
                working_dir: working_dir.into(),
                caret_visible: true,
            },
            history: CommandHistory::new(),
            mode: EditorMode::Editing,
        }
    }

    pub fn handle_key(&mut self, key: KeyInput) -> RenderAction {
        if self.mode == EditorMode::Dispatching {
            return RenderAction::None;
        }

        match key {
            KeyInput::Submit | KeyInput::Char('\n') | KeyInput::Char('\r') => self.submit(),
            KeyInput::Backspace => {
                self.state.buffer.pop();
                RenderAction::PromptUpdated
            }
            KeyInput::Char(c) => {
                self.state.buffer.push(c);
                RenderAction::PromptUpdated
            }
            KeyInput::Other => RenderAction::None,
        }
    }

    fn submit(&mut self) -> RenderAction {
        let line = std::mem::take(&mut self.state.buffer);
        self.history.push(line.clone());
        self.mode = EditorMode::Dispatching;
        RenderAction::Submitted { line }
    }

    /// Flip caret visibility. Never touches the buffer.
    pub fn tick_caret(&mut self) -> RenderAction {
        self.state.caret_visible = !self.state.caret_visible;
        RenderAction::PromptUpdated
    }

    pub fn render_prompt(&self) -> String {
        let mut prompt = self.prompt_prefix();
        prompt.push_str(&self.state.buffer);
        if self.state.caret_visible {
            prompt.push(CARET_GLYPH);
        }
        prompt
    }

    /// The prompt as it is frozen into the transcript on submit: no caret.
    pub fn render_submitted(&self, line: &str) -> String {
        let mut prompt = self.prompt_prefix();
        prompt.push_str(line);
        prompt
    }

    fn prompt_prefix(&self) -> String {
        format!("({}) >: ", self.state.working_dir.display())
    }

    /// Leave Dispatching. A reported directory replaces the working directory.
    pub fn finish_dispatch(&mut self, new_working_dir: Option<&Path>) {
        if let Some(dir) = new_working_dir {
            self.state.working_dir = dir.to_path_buf();
        }
        self.mode = EditorMode::Editing;
    }

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    pub fn history(&self) -> &CommandHistory {
        &self.history
    }

    pub fn mode(&self) -> EditorMode {
        self.mode
    }

    pub fn working_dir(&self) -> &Path {
        &self.state.working_dir
    }
}
