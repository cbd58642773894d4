/// Output sanitization: command output is shown as plain text, so escape
/// sequences and other control bytes must not reach the renderer.

pub const TAB_WIDTH: usize = 4;

/// Strip control characters from one line of output and expand tabs.
/// Newlines are expected to be split off by the caller.
pub fn sanitize_output(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut col = 0;
    let mut chars = line.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\t' => {
                let pad = TAB_WIDTH - col % TAB_WIDTH;
                out.extend(std::iter::repeat(' ').take(pad));
                col += pad;
            }
            '\x1b' => skip_escape(&mut chars),
            c if c.is_control() => {}
            c => {
                out.push(c);
                col += 1;
            }
        }
    }
    out
}

/// Drop a CSI sequence (`ESC [ ... final`) or the single byte after a bare ESC.
fn skip_escape(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) {
    if chars.next() == Some('[') {
        for c in chars.by_ref() {
            if ('\x40'..='\x7e').contains(&c) {
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_untouched() {
        assert_eq!(sanitize_output("hello world"), "hello world");
    }

    #[test]
    fn test_strips_control() {
        assert_eq!(sanitize_output("Hello\x07World\r"), "HelloWorld");
    }

    #[test]
    fn test_strips_csi_sequences() {
        assert_eq!(sanitize_output("\x1b[31mred\x1b[0m plain"), "red plain");
    }

    #[test]
    fn test_expands_tabs_to_stops() {
        assert_eq!(sanitize_output("a\tb"), "a   b");
        assert_eq!(sanitize_output("abcd\te"), "abcd    e");
    }

    #[test]
    fn test_unicode_kept() {
        assert_eq!(sanitize_output("值🦀"), "值🦀");
    }
}
