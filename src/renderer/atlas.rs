/// Glyph atlas: rasterizes glyphs and packs them into a GPU texture.
/// Uses fontdue for rasterization and maintains a cache of glyph positions.

use crate::error::TermError;
use fontdue::{Font, FontSettings};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Monospace fonts tried in order when the config does not name one.
const FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSansMono.ttf",
    "/usr/share/fonts/TTF/DejaVuSansMono.ttf",
    "/usr/share/fonts/dejavu/DejaVuSansMono.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationMono-Regular.ttf",
    "/usr/share/fonts/liberation-mono/LiberationMono-Regular.ttf",
    "/usr/share/fonts/truetype/ubuntu/UbuntuMono-R.ttf",
    "/System/Library/Fonts/Menlo.ttc",
    "/System/Library/Fonts/Monaco.ttf",
    "C:\\Windows\\Fonts\\consola.ttf",
];

/// Read the configured font, or the first installed candidate.
pub fn load_font_data(configured: Option<&Path>) -> Result<(PathBuf, Vec<u8>), TermError> {
    if let Some(path) = configured {
        let data = std::fs::read(path)
            .map_err(|e| TermError::Font(format!("{}: {}", path.display(), e)))?;
        return Ok((path.to_path_buf(), data));
    }
    FONT_CANDIDATES
        .iter()
        .map(PathBuf::from)
        .find_map(|path| std::fs::read(&path).ok().map(|data| (path, data)))
        .ok_or_else(|| TermError::Font("no monospace font found; set [font].path".into()))
}

/// Position of a glyph within the atlas texture.
#[derive(Debug, Clone, Copy)]
pub struct GlyphEntry {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    pub offset_x: f32,
    pub offset_y: f32,
}

pub struct GlyphAtlas {
    font: Font,
    font_size: f32,
    /// Atlas pixel data (single channel, alpha)
    pub pixels: Vec<u8>,
    pub atlas_width: u32,
    pub atlas_height: u32,
    cursor_x: u32,
    cursor_y: u32,
    row_height: u32,
    cache: HashMap<char, GlyphEntry>,
    /// Whether atlas texture needs re-upload to GPU
    pub dirty: bool,
    pub cell_width: f32,
    pub cell_height: f32,
    /// Distance from the top of a cell to the baseline.
    pub ascent: f32,
}

impl GlyphAtlas {
    pub fn new(font_data: &[u8], font_size: f32) -> Result<Self, TermError> {
        let font = Font::from_bytes(font_data, FontSettings::default())
            .map_err(|e| TermError::Font(e.to_string()))?;

        let metrics = font.metrics('M', font_size);
        let line_metrics = font.horizontal_line_metrics(font_size);
        let cell_width = metrics.advance_width.ceil().max(1.0);
        let (cell_height, ascent) = line_metrics
            .map(|lm| ((lm.ascent - lm.descent + lm.line_gap).ceil(), lm.ascent))
            .unwrap_or((font_size * 1.2, font_size));

        let atlas_width = 1024;
        let atlas_height = 1024;

        Ok(Self {
            font,
            font_size,
            pixels: vec![0; (atlas_width * atlas_height) as usize],
            atlas_width,
            atlas_height,
            cursor_x: 0,
            cursor_y: 0,
            row_height: 0,
            cache: HashMap::new(),
            dirty: true,
            cell_width,
            cell_height: cell_height.max(1.0),
            ascent,
        })
    }

    /// Get or rasterize a glyph, returning its atlas entry.
    pub fn get_glyph(&mut self, ch: char) -> GlyphEntry {
        if let Some(&entry) = self.cache.get(&ch) {
            return entry;
        }
        self.rasterize(ch)
    }

    fn rasterize(&mut self, ch: char) -> GlyphEntry {
        let (metrics, bitmap) = self.font.rasterize(ch, self.font_size);

        let w = metrics.width as u32;
        let h = metrics.height as u32;

        if self.cursor_x + w + 1 > self.atlas_width {
            self.cursor_x = 0;
            self.cursor_y += self.row_height + 1;
            self.row_height = 0;
        }

        if self.cursor_y + h > self.atlas_height {
            log::warn!("Glyph atlas full, cannot rasterize '{}'", ch);
            let entry = GlyphEntry { x: 0, y: 0, width: 0, height: 0, offset_x: 0.0, offset_y: 0.0 };
            self.cache.insert(ch, entry);
            return entry;
        }

        for row in 0..h {
            let src = (row * w) as usize;
            let dst = ((self.cursor_y + row) * self.atlas_width + self.cursor_x) as usize;
            self.pixels[dst..dst + w as usize].copy_from_slice(&bitmap[src..src + w as usize]);
        }

        let entry = GlyphEntry {
            x: self.cursor_x,
            y: self.cursor_y,
            width: w,
            height: h,
            offset_x: metrics.xmin as f32,
            offset_y: metrics.ymin as f32,
        };

        self.cursor_x += w + 1;
        self.row_height = self.row_height.max(h);
        self.dirty = true;
        self.cache.insert(ch, entry);
        entry
    }

    pub fn glyph_count(&self) -> usize {
        self.cache.len()
    }

    /// How many cells fit in a surface of the given pixel size.
    pub fn grid_size(&self, width: u32, height: u32, padding: u32) -> (usize, usize) {
        let usable_w = width.saturating_sub(padding * 2) as f32;
        let usable_h = height.saturating_sub(padding * 2) as f32;
        let cols = (usable_w / self.cell_width).floor() as usize;
        let rows = (usable_h / self.cell_height).floor() as usize;
        (cols.max(1), rows.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Installed fonts vary per machine; tests that need one skip without it.
    fn test_atlas() -> Option<GlyphAtlas> {
        let (_, data) = load_font_data(None).ok()?;
        GlyphAtlas::new(&data, 14.0).ok()
    }

    #[test]
    fn test_missing_configured_font() {
        let result = load_font_data(Some(Path::new("/no/such/font.ttf")));
        assert!(matches!(result, Err(TermError::Font(_))));
    }

    #[test]
    fn test_garbage_font_rejected() {
        assert!(GlyphAtlas::new(b"not a font", 14.0).is_err());
    }

    #[test]
    fn test_atlas_creation() {
        let Some(atlas) = test_atlas() else { return };
        assert!(atlas.cell_width > 0.0);
        assert!(atlas.cell_height > 0.0);
        assert!(atlas.ascent > 0.0);
        assert_eq!(atlas.atlas_width, 1024);
        assert_eq!(atlas.glyph_count(), 0);
    }

    #[test]
    fn test_glyph_caching() {
        let Some(mut atlas) = test_atlas() else { return };
        let e1 = atlas.get_glyph('B');
        let e2 = atlas.get_glyph('B');
        assert!(e1.width > 0 && e1.height > 0);
        assert_eq!((e1.x, e1.y), (e2.x, e2.y));
        assert_eq!(atlas.glyph_count(), 1);
    }

    #[test]
    fn test_multiple_glyphs_packed() {
        let Some(mut atlas) = test_atlas() else { return };
        let positions: Vec<(u32, u32)> = ('A'..='Z')
            .map(|ch| {
                let e = atlas.get_glyph(ch);
                (e.x, e.y)
            })
            .collect();
        assert_eq!(atlas.glyph_count(), 26);
        for i in 0..positions.len() {
            for j in (i + 1)..positions.len() {
                assert_ne!(positions[i], positions[j], "Glyphs overlap");
            }
        }
    }

    #[test]
    fn test_grid_size() {
        let Some(atlas) = test_atlas() else { return };
        let (cols, rows) = atlas.grid_size(800, 600, 4);
        assert_eq!(cols, ((792.0 / atlas.cell_width).floor() as usize).max(1));
        assert_eq!(rows, ((592.0 / atlas.cell_height).floor() as usize).max(1));
        assert_eq!(atlas.grid_size(0, 0, 4), (1, 1));
    }
}
