use palette::Srgb;

/// A packed 16-bit RGB565 pixel: 5 bits red, 6 bits green, 5 bits blue.
///
/// This is the only pixel encoding the engine speaks; devices receive it as-is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct Color565(pub u16);

impl Color565 {
    pub const BLACK: Self = Self(0x0000);
    pub const NAVY: Self = Self(0x000F);
    pub const DARKGREEN: Self = Self(0x03E0);
    pub const DARKCYAN: Self = Self(0x03EF);
    pub const MAROON: Self = Self(0x7800);
    pub const PURPLE: Self = Self(0x780F);
    pub const OLIVE: Self = Self(0x7BE0);
    pub const LIGHTGREY: Self = Self(0xC618);
    pub const DARKGREY: Self = Self(0x7BEF);
    pub const BLUE: Self = Self(0x001F);
    pub const GREEN: Self = Self(0x07E0);
    pub const CYAN: Self = Self(0x07FF);
    pub const RED: Self = Self(0xF800);
    pub const MAGENTA: Self = Self(0xF81F);
    pub const YELLOW: Self = Self(0xFFE0);
    pub const WHITE: Self = Self(0xFFFF);
    pub const ORANGE: Self = Self(0xFD20);
    pub const GREENYELLOW: Self = Self(0xAFE5);
    pub const PINK: Self = Self(0xFC18);

    /// Packs 8-bit channels. The low bits that do not fit the 5-6-5 split are
    /// truncated, never rounded.
    pub const fn from_rgb(red: u8, green: u8, blue: u8) -> Self {
        Self((((red & 0xF8) as u16) << 8) | (((green & 0xFC) as u16) << 3) | (blue >> 3) as u16)
    }

    pub const fn red(self) -> u8 {
        (self.0 >> 11) as u8
    }

    pub const fn green(self) -> u8 {
        ((self.0 >> 5) & 0x3F) as u8
    }

    pub const fn blue(self) -> u8 {
        (self.0 & 0x1F) as u8
    }

    /// Expands back to 8 bits per channel, replicating the high bits into the
    /// vacated low bits so full-scale stays full-scale.
    pub fn to_srgb(self) -> Srgb<u8> {
        let (r, g, b) = (self.red(), self.green(), self.blue());
        Srgb::new((r << 3) | (r >> 2), (g << 2) | (g >> 4), (b << 3) | (b >> 2))
    }

    /// `0x00RRGGBB`, the layout softbuffer presents
    pub fn to_xrgb8888(self) -> u32 {
        let srgb = self.to_srgb();
        ((srgb.red as u32) << 16) | ((srgb.green as u32) << 8) | srgb.blue as u32
    }

    /// Bitwise complement, as an inverted panel would show it
    pub const fn inverted(self) -> Self {
        Self(!self.0)
    }
}

impl From<Srgb<u8>> for Color565 {
    fn from(value: Srgb<u8>) -> Self {
        Self::from_rgb(value.red, value.green, value.blue)
    }
}

impl From<u16> for Color565 {
    fn from(value: u16) -> Self {
        Self(value)
    }
}

impl From<Color565> for u16 {
    fn from(value: Color565) -> Self {
        value.0
    }
}

/// Packs 8-bit red, green and blue into a 565 pixel. Pure arithmetic; no device is touched.
pub const fn color565(red: u8, green: u8, blue: u8) -> Color565 {
    Color565::from_rgb(red, green, blue)
}
