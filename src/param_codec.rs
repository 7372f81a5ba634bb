/*
 * Packing and unpacking of window-message parameters.
 *
 * Every message travels as two pointer-sized words (WPARAM, LPARAM), and many
 * messages squeeze two 16-bit fields into the low 32 bits of one of them. The
 * helpers here reproduce the platform macros (MAKELONG, LOWORD, HIWORD,
 * GET_X_LPARAM, ...) bit for bit. All functions are total: inputs are masked,
 * never rejected.
 */

use crate::native_structs::Point;
use crate::types::Color;

/// Platform `TRUE`.
pub const NATIVE_TRUE: i32 = 1;
/// Platform `FALSE`.
pub const NATIVE_FALSE: i32 = 0;

mod sealed {
    pub trait Sealed {}
    impl Sealed for i32 {}
    impl Sealed for u32 {}
    impl Sealed for isize {}
    impl Sealed for usize {}
}

/// A value whose low 32 bits carry a packed low/high word pair.
///
/// Implemented for the 32-bit integers and for the pointer-sized message
/// parameter types; on 64-bit targets the upper half of a pointer-sized value
/// is ignored, exactly like the platform macros.
pub trait PackedParam: Copy + sealed::Sealed {
    fn low_dword(self) -> u32;
}

impl PackedParam for i32 {
    #[inline]
    fn low_dword(self) -> u32 {
        self as u32
    }
}

impl PackedParam for u32 {
    #[inline]
    fn low_dword(self) -> u32 {
        self
    }
}

impl PackedParam for isize {
    #[inline]
    fn low_dword(self) -> u32 {
        self as u32
    }
}

impl PackedParam for usize {
    #[inline]
    fn low_dword(self) -> u32 {
        self as u32
    }
}

/// `MAKELONG`: `(high << 16) | (low & 0xFFFF)`. Bits above 16 in either input
/// are discarded.
#[inline]
pub fn make_long(low: i32, high: i32) -> i32 {
    (((high as u32) << 16) | ((low as u32) & 0xFFFF)) as i32
}

/// `MAKELPARAM`: the packed value sign-extended to pointer width.
#[inline]
pub fn make_lparam(low: i32, high: i32) -> isize {
    make_long(low, high) as isize
}

/// `MAKEWPARAM`: the packed value zero-extended to pointer width.
#[inline]
pub fn make_wparam(low: i32, high: i32) -> usize {
    make_long(low, high) as u32 as usize
}

#[inline]
pub fn lo_word<P: PackedParam>(value: P) -> u16 {
    (value.low_dword() & 0xFFFF) as u16
}

#[inline]
pub fn hi_word<P: PackedParam>(value: P) -> u16 {
    ((value.low_dword() >> 16) & 0xFFFF) as u16
}

/// The low word read as a two's-complement 16-bit value, sign-extended.
#[inline]
pub fn signed_lo_word<P: PackedParam>(value: P) -> i32 {
    lo_word(value) as i16 as i32
}

/// The high word read as a two's-complement 16-bit value, sign-extended.
#[inline]
pub fn signed_hi_word<P: PackedParam>(value: P) -> i32 {
    hi_word(value) as i16 as i32
}

/// `GET_X_LPARAM` / `GET_Y_LPARAM`. Coordinates can be negative on
/// multi-monitor setups, so both halves are sign-extended.
#[inline]
pub fn point_from_lparam(lparam: isize) -> Point {
    Point {
        x: signed_lo_word(lparam),
        y: signed_hi_word(lparam),
    }
}

/// Inverse of `point_from_lparam`.
#[inline]
pub fn lparam_from_point(point: Point) -> isize {
    make_lparam(point.x, point.y)
}

#[inline]
pub fn bool_to_native(value: bool) -> i32 {
    if value { NATIVE_TRUE } else { NATIVE_FALSE }
}

/// Any non-zero BOOL counts as true.
#[inline]
pub fn native_to_bool(value: i32) -> bool {
    value != NATIVE_FALSE
}

/*
 * Creates a native COLORREF value from the platform-agnostic `Color` struct.
 * The native layout is 0x00BBGGRR.
 */
#[inline]
pub fn color_to_colorref(color: Color) -> u32 {
    (color.r as u32) | ((color.g as u32) << 8) | ((color.b as u32) << 16)
}

/*
 * Converts a native COLORREF (0x00BBGGRR) back to `Color`. The top byte is
 * ignored.
 */
#[inline]
pub fn colorref_to_color(colorref: u32) -> Color {
    Color {
        r: (colorref & 0xFF) as u8,
        g: ((colorref >> 8) & 0xFF) as u8,
        b: ((colorref >> 16) & 0xFF) as u8,
    }
}
