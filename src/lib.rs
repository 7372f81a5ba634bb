/*
 * Marshalling layer between a Rust windowing toolkit and the Win32 API.
 *
 * The crate moves values across the native boundary with the right bit layout
 * and keeps native resources valid while a call needs them: message parameter
 * packing (`param_codec`), byte-exact structure mirrors (`native_structs`),
 * handle lifetime guards (`handle`), guarded menu/toolbar/tool-tip wrappers
 * (`dispatch`, `tooltip`), deferred image references (`image_indexer`) and
 * mnemonic text helpers (`mnemonic`).
 *
 * Only `win32_api` touches the OS. Everything else is portable so non-Windows
 * builds can compile and test the logic against a recording `NativeApi`.
 */
pub mod diagnostics;
pub mod dispatch;
pub mod error;
pub mod handle;
pub mod image_indexer;
pub mod mnemonic;
pub mod native_api;
pub mod native_structs;
pub mod param_codec;
pub mod tooltip;
pub mod types;
#[cfg(target_os = "windows")]
pub mod win32_api;

#[cfg(test)]
pub(crate) mod test_support;

pub use diagnostics::{Diagnostics, DiagnosticsConfig, EnumRangeCache, assert_struct_layouts};
pub use error::{InteropError, Result as InteropResult};
pub use handle::{Handle, HandleOwner, HandleRef, keep_alive};
pub use image_indexer::{ImageIndexer, ImageKeyList, ImageKeyLookup, UNRESOLVED_INDEX};
pub use mnemonic::{MnemonicCase, escape_mnemonics, has_mnemonic, mnemonic, strip_mnemonics};
pub use native_api::{NativeApi, WindowProc, WindowProcSource};
pub use tooltip::{ToolInfoWrapper, ToolMessage, ToolText, ToolTipIcon};
pub use types::Color;
#[cfg(target_os = "windows")]
pub use win32_api::Win32Api;
