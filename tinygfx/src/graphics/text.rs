use super::color::Color565;

/// How the character stream behaves at the right edge of the surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Wrapping {
    /// Line breaks occur before any glyph that would cross the right edge.
    /// Breaks are per character; there is no word boundary logic.
    #[default]
    Character,

    /// Glyphs keep going past the edge and are clipped per pixel
    Clip,
}

/// Which character-to-glyph mapping the built-in font uses.
///
/// The historical table was missing one glyph (176, the light-shade block),
/// so every code from 176 up rendered the glyph one slot early. A lot of
/// existing text depends on that, so it stays the default.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Charset {
    #[default]
    Classic,
    Cp437,
}

/// Everything the character stream needs besides the cursor and font.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TextStyle {
    pub color: Color565,

    /// Equal to `color` means transparent: background pixels are skipped.
    pub background: Color565,

    /// Integer magnification per axis, never below 1
    pub size_x: u8,
    pub size_y: u8,

    pub wrapping: Wrapping,
    pub charset: Charset,
}
impl Default for TextStyle {
    fn default() -> Self {
        Self {
            color: Color565::WHITE,
            background: Color565::WHITE,
            size_x: 1,
            size_y: 1,
            wrapping: Wrapping::Character,
            charset: Charset::Classic,
        }
    }
}
