#![no_main]
use libfuzzer_sys::fuzz_target;
use replterm::core::{EditorMode, InputLineEditor, KeyInput, LineKind, RenderAction, Transcript};

fuzz_target!(|data: &[u8]| {
    let mut editor = InputLineEditor::new("/");
    let mut transcript = Transcript::new(64);

    for ch in String::from_utf8_lossy(data).chars() {
        let key = match ch {
            '\u{8}' | '\u{7f}' => KeyInput::Backspace,
            '\u{1b}' => KeyInput::Other,
            c => KeyInput::Char(c),
        };
        if let RenderAction::Submitted { line } = editor.handle_key(key) {
            assert!(!line.contains('\n'));
            transcript.push(LineKind::Output, &line);
            editor.finish_dispatch(None);
        }
        assert_eq!(editor.mode(), EditorMode::Editing);
        assert!(!editor.state().buffer.contains('\n'));
        transcript.set_live(editor.render_prompt());
    }

    for line in transcript.viewport(17, 9, 3) {
        assert!(line.text.chars().count() <= 17);
    }
});
