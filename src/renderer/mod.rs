pub mod atlas;
pub mod pipeline;
pub mod scroll;

pub use atlas::{load_font_data, GlyphAtlas};
pub use pipeline::RenderState;
pub use scroll::ScrollState;
