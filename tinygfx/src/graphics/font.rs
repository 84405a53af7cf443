use std::fmt::Display;

use eyre::{eyre, WrapErr};
use fontdue::{Font as FontData, FontSettings};

/// Metrics for one glyph of a [`GfxFont`].
///
/// Offsets are relative to the cursor: `x_offset` from the cursor column,
/// `y_offset` from the baseline (negative is above it).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct GfxGlyph {
    /// Index of the glyph's first byte in [`GfxFont::bitmap`]
    pub bitmap_offset: u16,
    pub width: u8,
    pub height: u8,
    /// Distance to advance the cursor after this glyph
    pub x_advance: u8,
    pub x_offset: i8,
    pub y_offset: i8,
}
impl GfxGlyph {
    /// Glyphs like the space have metrics but no bitmap
    pub fn has_bitmap(&self) -> bool {
        self.width > 0 && self.height > 0
    }
}

/// A borrowed, already-parsed bitmap font table.
///
/// Glyph bitmaps are 1 bit per pixel, MSB first, packed continuously
/// row after row with no padding between rows.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GfxFont<'a> {
    pub bitmap: &'a [u8],
    pub glyphs: &'a [GfxGlyph],
    pub first: u8,
    pub last: u8,
    /// Line height, used for newlines and wrapping
    pub y_advance: u8,
}

impl<'a> GfxFont<'a> {
    /// Looks up the glyph for code point `c`. Codes outside `[first, last]`
    /// or past the end of the glyph table yield `None`.
    pub fn glyph(&self, c: u8) -> Option<&'a GfxGlyph> {
        if c < self.first || c > self.last {
            return None;
        }
        self.glyphs.get((c - self.first) as usize)
    }

    /// The glyph's pixels in row-major order, `true` for ink.
    /// Truncated bitmap data reads as blank.
    pub fn glyph_bits(&self, glyph: &GfxGlyph) -> GlyphBits<'a> {
        GlyphBits {
            bitmap: self.bitmap,
            offset: glyph.bitmap_offset as usize,
            index: 0,
            len: glyph.width as usize * glyph.height as usize,
        }
    }
}

/// Iterator over a glyph's packed bits; see [`GfxFont::glyph_bits`].
pub struct GlyphBits<'a> {
    bitmap: &'a [u8],
    offset: usize,
    index: usize,
    len: usize,
}
impl<'a> Iterator for GlyphBits<'a> {
    type Item = bool;

    fn next(&mut self) -> Option<bool> {
        if self.index >= self.len {
            return None;
        }
        let byte = self
            .bitmap
            .get(self.offset + self.index / 8)
            .copied()
            .unwrap_or(0);
        let bit = byte & (0x80 >> (self.index % 8)) != 0;
        self.index += 1;
        Some(bit)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.len - self.index;
        (remaining, Some(remaining))
    }
}

/// Coverage at or above this value becomes an ink pixel when baking
pub const COVERAGE_THRESHOLD: u8 = 128;

/// `fontdue` reports failures as bare `&'static str`s, which `eyre` can't wrap
#[derive(Debug)]
pub struct FontError(&'static str);
impl Display for FontError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "FontError: {}", self.0)
    }
}
impl std::error::Error for FontError {}

/// An owned font table, produced by rasterizing an outline font once up front.
pub struct BakedFont {
    bitmap: Vec<u8>,
    glyphs: Vec<GfxGlyph>,
    first: u8,
    last: u8,
    y_advance: u8,
}
impl BakedFont {
    /// Rasterizes `first..=last` of a TrueType/OpenType font at `px` pixels
    /// and thresholds the coverage into a 1-bit table.
    pub fn from_ttf(data: &[u8], px: f32, first: u8, last: u8) -> eyre::Result<Self> {
        if first > last {
            return Err(eyre!("empty glyph range {first}..={last}"));
        }
        let font = FontData::from_bytes(data, FontSettings::default())
            .map_err(FontError)
            .wrap_err("processing font data")?;

        let y_advance = font
            .horizontal_line_metrics(px)
            .map(|metrics| metrics.new_line_size.round())
            .unwrap_or(px.ceil());
        let y_advance = u8::try_from(y_advance as i64)
            .wrap_err_with(|| format!("line height {y_advance} does not fit the table"))?;

        let mut bitmap = Vec::new();
        let mut glyphs = Vec::with_capacity((last - first) as usize + 1);
        for code in first..=last {
            let (metrics, coverage) = font.rasterize(code as char, px);
            let glyph = GfxGlyph {
                bitmap_offset: u16::try_from(bitmap.len())
                    .wrap_err_with(|| format!("bitmap overflow at code {code}"))?,
                width: u8::try_from(metrics.width)
                    .wrap_err_with(|| format!("glyph {code} too wide"))?,
                height: u8::try_from(metrics.height)
                    .wrap_err_with(|| format!("glyph {code} too tall"))?,
                x_advance: u8::try_from(metrics.advance_width.round() as i64)
                    .wrap_err_with(|| format!("glyph {code} advance out of range"))?,
                x_offset: i8::try_from(metrics.xmin)
                    .wrap_err_with(|| format!("glyph {code} x offset out of range"))?,
                // fontdue measures the bottom edge upwards from the baseline
                y_offset: i8::try_from(-(metrics.ymin + metrics.height as i32))
                    .wrap_err_with(|| format!("glyph {code} y offset out of range"))?,
            };
            bitmap.extend(pack_coverage(&coverage, COVERAGE_THRESHOLD));
            glyphs.push(glyph);
        }
        log::debug!(
            "baked {} glyphs ({} bitmap bytes) at {px}px",
            glyphs.len(),
            bitmap.len()
        );

        Ok(Self {
            bitmap,
            glyphs,
            first,
            last,
            y_advance,
        })
    }

    pub fn as_font(&self) -> GfxFont<'_> {
        GfxFont {
            bitmap: &self.bitmap,
            glyphs: &self.glyphs,
            first: self.first,
            last: self.last,
            y_advance: self.y_advance,
        }
    }
}

/// Packs a row-major coverage map into MSB-first bits, continuously across rows.
pub fn pack_coverage(coverage: &[u8], threshold: u8) -> Vec<u8> {
    coverage
        .chunks(8)
        .map(|chunk| {
            chunk
                .iter()
                .enumerate()
                .filter(|(_, value)| **value >= threshold)
                .fold(0u8, |byte, (i, _)| byte | (0x80 >> i))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const BITMAP: [u8; 2] = [0b1010_0000, 0b1100_0000];
    const GLYPHS: [GfxGlyph; 2] = [
        GfxGlyph {
            bitmap_offset: 0,
            width: 2,
            height: 2,
            x_advance: 3,
            x_offset: 0,
            y_offset: -2,
        },
        GfxGlyph {
            bitmap_offset: 1,
            width: 1,
            height: 2,
            x_advance: 2,
            x_offset: 1,
            y_offset: -2,
        },
    ];

    fn font() -> GfxFont<'static> {
        GfxFont {
            bitmap: &BITMAP,
            glyphs: &GLYPHS,
            first: b'a',
            last: b'b',
            y_advance: 4,
        }
    }

    #[test]
    fn glyph_lookup_fails_closed() {
        let font = font();
        assert_eq!(font.glyph(b'a'), Some(&GLYPHS[0]));
        assert_eq!(font.glyph(b'b'), Some(&GLYPHS[1]));
        assert_eq!(font.glyph(b'`'), None);
        assert_eq!(font.glyph(b'c'), None);

        let short = GfxFont {
            last: b'z',
            ..font
        };
        assert_eq!(short.glyph(b'c'), None);
    }

    #[test]
    fn glyph_bits_walk_msb_first_without_row_padding() {
        let font = font();
        let bits: Vec<bool> = font.glyph_bits(&GLYPHS[0]).collect();
        assert_eq!(bits, vec![true, false, true, false]);
        let bits: Vec<bool> = font.glyph_bits(&GLYPHS[1]).collect();
        assert_eq!(bits, vec![true, true]);
    }

    #[test]
    fn truncated_bitmap_reads_blank() {
        let glyph = GfxGlyph {
            bitmap_offset: 1,
            width: 8,
            height: 2,
            ..GfxGlyph::default()
        };
        let bits: Vec<bool> = font().glyph_bits(&glyph).collect();
        assert_eq!(bits.len(), 16);
        assert_eq!(bits.iter().filter(|b| **b).count(), 2);
    }

    #[test]
    fn coverage_packing_thresholds_and_pads_the_tail() {
        let coverage = [255, 0, 127, 128, 0, 0, 0, 0, 200, 10];
        assert_eq!(
            pack_coverage(&coverage, COVERAGE_THRESHOLD),
            vec![0b1001_0000, 0b1000_0000]
        );
        assert!(pack_coverage(&[], COVERAGE_THRESHOLD).is_empty());
    }

    #[test]
    fn bad_font_data_is_reported() {
        let err = BakedFont::from_ttf(&[0, 1, 2, 3], 12.0, b' ', b'~')
            .err()
            .map(|e| format!("{e:#}"));
        assert!(err.is_some_and(|e| e.contains("processing font data")));
    }
}
