pub mod color;
pub mod font;
pub mod glcdfont;
pub mod text;

pub use color::{color565, Color565};
pub use font::{BakedFont, GfxFont, GfxGlyph};
pub use text::{Charset, TextStyle, Wrapping};
