//! The fixed 16-color EGA palette.
//!
//! Scripts pick colors by index (`setfgcolor 14`, `writeln 12 "..."`); the
//! index order is the classic CGA/EGA one, which differs from the ANSI
//! order terminals use.  [`Color::ansi`] does the translation.

use crossterm::style::Color as TermColor;

/// One of the sixteen palette entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Color {
    Black = 0,
    Blue = 1,
    Green = 2,
    Cyan = 3,
    Red = 4,
    Magenta = 5,
    Brown = 6,
    LightGray = 7,
    DarkGray = 8,
    BrightBlue = 9,
    BrightGreen = 10,
    BrightCyan = 11,
    BrightRed = 12,
    BrightMagenta = 13,
    BrightYellow = 14,
    White = 15,
}

const PALETTE: [Color; 16] = [
    Color::Black,
    Color::Blue,
    Color::Green,
    Color::Cyan,
    Color::Red,
    Color::Magenta,
    Color::Brown,
    Color::LightGray,
    Color::DarkGray,
    Color::BrightBlue,
    Color::BrightGreen,
    Color::BrightCyan,
    Color::BrightRed,
    Color::BrightMagenta,
    Color::BrightYellow,
    Color::White,
];

impl Color {
    /// Default text color.
    pub const FOREGROUND: Color = Color::White;
    /// Default background color.
    pub const BACKGROUND: Color = Color::Black;

    /// Palette entry `index`, or `None` outside `0..16`.
    pub fn from_index(index: i32) -> Option<Color> {
        usize::try_from(index).ok().and_then(|i| PALETTE.get(i).copied())
    }

    /// Palette entry `index`, or `fallback` outside `0..16`.
    pub fn from_index_or(index: i32, fallback: Color) -> Color {
        Self::from_index(index).unwrap_or(fallback)
    }

    pub fn index(self) -> u8 {
        self as u8
    }

    /// `(r, g, b)` as on real EGA hardware.
    pub fn rgb(self) -> (u8, u8, u8) {
        match self {
            Color::Black => (0x00, 0x00, 0x00),
            Color::Blue => (0x00, 0x00, 0xAA),
            Color::Green => (0x00, 0xAA, 0x00),
            Color::Cyan => (0x00, 0xAA, 0xAA),
            Color::Red => (0xAA, 0x00, 0x00),
            Color::Magenta => (0xAA, 0x00, 0xAA),
            Color::Brown => (0xAA, 0x55, 0x00),
            Color::LightGray => (0xAA, 0xAA, 0xAA),
            Color::DarkGray => (0x55, 0x55, 0x55),
            Color::BrightBlue => (0x55, 0x55, 0xFF),
            Color::BrightGreen => (0x55, 0xFF, 0x55),
            Color::BrightCyan => (0x55, 0xFF, 0xFF),
            Color::BrightRed => (0xFF, 0x55, 0x55),
            Color::BrightMagenta => (0xFF, 0x55, 0xFF),
            Color::BrightYellow => (0xFF, 0xFF, 0x55),
            Color::White => (0xFF, 0xFF, 0xFF),
        }
    }

    /// Closest named terminal color.
    pub fn ansi(self) -> TermColor {
        match self {
            Color::Black => TermColor::Black,
            Color::Blue => TermColor::DarkBlue,
            Color::Green => TermColor::DarkGreen,
            Color::Cyan => TermColor::DarkCyan,
            Color::Red => TermColor::DarkRed,
            Color::Magenta => TermColor::DarkMagenta,
            Color::Brown => TermColor::DarkYellow,
            Color::LightGray => TermColor::Grey,
            Color::DarkGray => TermColor::DarkGrey,
            Color::BrightBlue => TermColor::Blue,
            Color::BrightGreen => TermColor::Green,
            Color::BrightCyan => TermColor::Cyan,
            Color::BrightRed => TermColor::Red,
            Color::BrightMagenta => TermColor::Magenta,
            Color::BrightYellow => TermColor::Yellow,
            Color::White => TermColor::White,
        }
    }

    /// Exact palette color for true-color terminals.
    pub fn true_color(self) -> TermColor {
        let (r, g, b) = self.rgb();
        TermColor::Rgb { r, g, b }
    }
}
