//! Caption style and the `tx3g` sample description it is written into.

use crate::bmff::{write_box, AtomType};
use crate::{Error, Result};
use bytes::BufMut;

/// An 8-bit RGBA colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgba(255, 255, 255, 255);
    pub const BLACK: Color = Color::rgba(0, 0, 0, 255);
    pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0);

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn to_bytes(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(
    feature = "serialize",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum HorizontalJustification {
    Left,
    #[default]
    Center,
    Right,
}

impl HorizontalJustification {
    /// Signed code stored in `tx3g`.
    pub fn code(self) -> i8 {
        match self {
            Self::Left => 0,
            Self::Center => 1,
            Self::Right => -1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(
    feature = "serialize",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum VerticalJustification {
    Top,
    Center,
    #[default]
    Bottom,
}

impl VerticalJustification {
    /// Signed code stored in `tx3g`.
    pub fn code(self) -> i8 {
        match self {
            Self::Top => 0,
            Self::Center => 1,
            Self::Bottom => -1,
        }
    }
}

/// Default text box, in track pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct TextBox {
    pub top: i16,
    pub left: i16,
    pub bottom: i16,
    pub right: i16,
}

/// Style applied to every sample of a text track.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serialize",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct TextStyle {
    pub font: String,
    pub font_size: u8,
    pub text_color: Color,
    pub background_color: Color,
    pub horizontal: HorizontalJustification,
    pub vertical: VerticalJustification,
    /// Written as all zeros when unset.
    pub text_box: Option<TextBox>,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font: "Helvetica".to_string(),
            font_size: 12,
            text_color: Color::WHITE,
            background_color: Color::TRANSPARENT,
            horizontal: HorizontalJustification::Center,
            vertical: VerticalJustification::Bottom,
            text_box: None,
        }
    }
}

impl TextStyle {
    /// Check the style fits the `tx3g` record.
    pub fn validate(&self) -> Result<()> {
        if self.font.is_empty() {
            return Err(Error::invalid_input("font name is empty"));
        }
        if self.font.len() > u8::MAX as usize {
            return Err(Error::invalid_input(format!(
                "font name is {} bytes, at most 255 fit",
                self.font.len()
            )));
        }
        if self.font_size == 0 {
            return Err(Error::invalid_input("font size must be positive"));
        }
        Ok(())
    }
}

/// Font id referenced by the style record and declared in `ftab`.
const FONT_ID: u16 = 1;

/// Build the `tx3g` sample entry for `style`.
pub fn write_tx3g(style: &TextStyle) -> Result<Vec<u8>> {
    style.validate()?;

    let mut entry = Vec::with_capacity(64 + style.font.len());
    // reserved + data reference index
    entry.put_slice(&[0u8; 6]);
    entry.put_u16(1);
    // display flags
    entry.put_u32(0);
    entry.put_i8(style.horizontal.code());
    entry.put_i8(style.vertical.code());
    entry.put_slice(&style.background_color.to_bytes());

    let text_box = style.text_box.unwrap_or_default();
    entry.put_i16(text_box.top);
    entry.put_i16(text_box.left);
    entry.put_i16(text_box.bottom);
    entry.put_i16(text_box.right);

    // Style record: start/end char, font id, face flags, size, colour
    entry.put_u16(0);
    entry.put_u16(0);
    entry.put_u16(FONT_ID);
    entry.put_u8(0);
    entry.put_u8(style.font_size);
    entry.put_slice(&style.text_color.to_bytes());

    let mut ftab = Vec::with_capacity(5 + style.font.len());
    ftab.put_u16(1); // entry count
    ftab.put_u16(FONT_ID);
    ftab.put_u8(style.font.len() as u8);
    ftab.put_slice(style.font.as_bytes());
    entry.put_slice(&write_box(AtomType::FTAB, &ftab));

    Ok(write_box(AtomType::TX3G, &entry))
}
