/// Scrollback position of the transcript view, in whole rows above the bottom.

pub struct ScrollState {
    offset: usize,
    pub lines_per_notch: f32,
    /// Fractional rows left over from trackpad deltas.
    remainder: f32,
}

impl ScrollState {
    pub fn new() -> Self {
        Self {
            offset: 0,
            lines_per_notch: 3.0,
            remainder: 0.0,
        }
    }

    /// Positive `notches` scroll back (up), negative toward the latest output.
    /// `max_offset` is the number of rows hidden above the window.
    pub fn scroll(&mut self, notches: f32, max_offset: usize) {
        let delta = notches * self.lines_per_notch + self.remainder;
        let whole = delta.trunc();
        self.remainder = delta - whole;
        let target = self.offset as i64 + whole as i64;
        self.offset = target.clamp(0, max_offset as i64) as usize;
    }

    /// Scroll by pixels, e.g. trackpad input.
    pub fn scroll_pixels(&mut self, pixels: f32, cell_height: f32, max_offset: usize) {
        if cell_height > 0.0 {
            self.scroll(pixels / cell_height / self.lines_per_notch, max_offset);
        }
    }

    /// Snap back to the latest output.
    pub fn reset(&mut self) {
        self.offset = 0;
        self.remainder = 0.0;
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn is_at_bottom(&self) -> bool {
        self.offset == 0
    }
}

impl Default for ScrollState {
    fn default() -> Self { Self::new() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state() {
        let s = ScrollState::new();
        assert_eq!(s.offset(), 0);
        assert!(s.is_at_bottom());
    }

    #[test]
    fn test_scroll_up() {
        let mut s = ScrollState::new();
        s.scroll(1.0, 1000);
        assert_eq!(s.offset(), 3);
        assert!(!s.is_at_bottom());
    }

    #[test]
    fn test_scroll_clamp_max() {
        let mut s = ScrollState::new();
        s.scroll(99999.0, 100);
        assert_eq!(s.offset(), 100);
    }

    #[test]
    fn test_scroll_clamp_min() {
        let mut s = ScrollState::new();
        s.scroll(-10.0, 100);
        assert_eq!(s.offset(), 0);
    }

    #[test]
    fn test_fractional_deltas_accumulate() {
        let mut s = ScrollState::new();
        s.lines_per_notch = 1.0;
        s.scroll(0.5, 100);
        assert_eq!(s.offset(), 0);
        s.scroll(0.5, 100);
        assert_eq!(s.offset(), 1);
    }

    #[test]
    fn test_scroll_pixels() {
        let mut s = ScrollState::new();
        s.scroll_pixels(48.0, 16.0, 100);
        assert_eq!(s.offset(), 3);
    }

    #[test]
    fn test_reset() {
        let mut s = ScrollState::new();
        s.scroll(10.0, 1000);
        s.reset();
        assert_eq!(s.offset(), 0);
        assert!(s.is_at_bottom());
    }
}
