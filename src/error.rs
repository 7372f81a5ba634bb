/*
 * Error type for the few places where this crate reports a problem itself.
 *
 * Native call failures are never converted into `InteropError`; they travel back
 * to the caller as the raw return value of the call. The variants here describe
 * broken binary contracts (a mirror whose size does not match the platform) and
 * out-of-range enum values caught by the diagnostics layer.
 */

/// Every error that the interop layer can produce.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InteropError {
    /// A struct mirror's in-memory size differs from the platform ABI size.
    LayoutMismatch {
        /// The native structure name, e.g. `TTTOOLINFOW`.
        structure: &'static str,
        /// `size_of` the Rust mirror.
        mirror_size: usize,
        /// The size the platform expects.
        native_size: usize,
    },

    /// A raw value is outside the declared contiguous range of an enum.
    EnumOutOfRange {
        enum_name: &'static str,
        value: i32,
        min: i32,
        max: i32,
    },

    /// A call into the `windows` crate failed while running diagnostics.
    Win32 { code: u32 },
}

impl std::fmt::Display for InteropError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::LayoutMismatch {
                structure,
                mirror_size,
                native_size,
            } => write!(
                f,
                "struct mirror for {structure} is {mirror_size} bytes, platform expects {native_size}"
            ),
            Self::EnumOutOfRange {
                enum_name,
                value,
                min,
                max,
            } => write!(f, "{value} is not a valid {enum_name} (expected {min}..={max})"),
            Self::Win32 { code } => write!(f, "Win32 call failed (error {code:#010x})"),
        }
    }
}

impl std::error::Error for InteropError {}

#[cfg(target_os = "windows")]
impl From<windows::core::Error> for InteropError {
    fn from(e: windows::core::Error) -> Self {
        // HRESULT.0 is i32; reinterpret the bits for display.
        Self::Win32 {
            code: e.code().0 as u32,
        }
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, InteropError>;
