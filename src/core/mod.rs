mod blink;
mod editor;
mod history;
mod transcript;

pub use blink::{BlinkTimer, DEFAULT_BLINK_INTERVAL};
pub use editor::{EditorMode, EditorState, InputLineEditor, KeyInput, RenderAction, CARET_GLYPH};
pub use history::CommandHistory;
pub use transcript::{LineKind, Transcript, TranscriptLine, ViewLine, DEFAULT_SCROLLBACK};
