/*
 * Platform-agnostic value types shared by the codec and the dispatch wrappers.
 */

/// An opaque RGB colour. Converted to the native `COLORREF` layout by
/// `param_codec::color_to_colorref`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}
