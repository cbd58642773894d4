/// Keyboard classification: turns winit key presses into editor input.
/// Shortcuts (Ctrl/Alt/Super chords) and navigation keys are not text, so
/// they come out as `KeyInput::Other`.

use crate::core::KeyInput;
use winit::keyboard::{Key, ModifiersState, NamedKey};

pub fn classify(key: &Key, modifiers: ModifiersState) -> Vec<KeyInput> {
    match key {
        Key::Named(NamedKey::Enter) => vec![KeyInput::Submit],
        Key::Named(NamedKey::Backspace) => vec![KeyInput::Backspace],
        Key::Named(NamedKey::Space) if !is_chord(modifiers) => vec![KeyInput::Char(' ')],
        Key::Character(s) if !is_chord(modifiers) => {
            let chars: Vec<KeyInput> = s
                .chars()
                .filter(|c| !c.is_control())
                .map(KeyInput::Char)
                .collect();
            if chars.is_empty() {
                vec![KeyInput::Other]
            } else {
                chars
            }
        }
        _ => vec![KeyInput::Other],
    }
}

fn is_chord(modifiers: ModifiersState) -> bool {
    modifiers.control_key() || modifiers.alt_key() || modifiers.super_key()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn none() -> ModifiersState {
        ModifiersState::empty()
    }

    #[test]
    fn test_enter_submits() {
        assert_eq!(classify(&Key::Named(NamedKey::Enter), none()), vec![KeyInput::Submit]);
    }

    #[test]
    fn test_backspace() {
        assert_eq!(
            classify(&Key::Named(NamedKey::Backspace), none()),
            vec![KeyInput::Backspace]
        );
    }

    #[test]
    fn test_space_is_a_char() {
        assert_eq!(
            classify(&Key::Named(NamedKey::Space), none()),
            vec![KeyInput::Char(' ')]
        );
    }

    #[test]
    fn test_character() {
        assert_eq!(classify(&Key::Character("a".into()), none()), vec![KeyInput::Char('a')]);
        assert_eq!(
            classify(&Key::Character("A".into()), ModifiersState::SHIFT),
            vec![KeyInput::Char('A')]
        );
    }

    #[test]
    fn test_composed_text_yields_each_char() {
        assert_eq!(
            classify(&Key::Character("ü值".into()), none()),
            vec![KeyInput::Char('ü'), KeyInput::Char('值')]
        );
    }

    #[test]
    fn test_chords_are_other() {
        assert_eq!(
            classify(&Key::Character("c".into()), ModifiersState::CONTROL),
            vec![KeyInput::Other]
        );
        assert_eq!(
            classify(&Key::Character("v".into()), ModifiersState::SUPER),
            vec![KeyInput::Other]
        );
    }

    #[test]
    fn test_navigation_keys_are_other() {
        for key in [NamedKey::ArrowUp, NamedKey::ArrowLeft, NamedKey::Tab, NamedKey::Escape, NamedKey::Shift] {
            assert_eq!(classify(&Key::Named(key), none()), vec![KeyInput::Other]);
        }
    }

    #[test]
    fn test_control_characters_dropped() {
        assert_eq!(classify(&Key::Character("\u{7}".into()), none()), vec![KeyInput::Other]);
    }
}
