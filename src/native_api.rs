/*
 * The seam between this crate and the operating system.
 *
 * `NativeApi` lists the handful of windowing calls the dispatch wrappers need.
 * The production implementation lives in `win32_api` (Windows only); tests
 * plug in a recording double. Toolkit objects reach this layer only through
 * `HandleOwner` and, for subclassed windows, `WindowProcSource`.
 */

use crate::handle::{Handle, HandleOwner};
use crate::native_structs::{InitCommonControlsEx, MenuItemInfo, PopupMenuParams};

pub const WM_USER: u32 = 0x0400;

// ── Tool-tip messages ─────────────────────────────────────────────────────────

pub const TTM_ACTIVATE: u32 = WM_USER + 1;
pub const TTM_TRACKACTIVATE: u32 = WM_USER + 17;
pub const TTM_TRACKPOSITION: u32 = WM_USER + 18;
pub const TTM_SETMAXTIPWIDTH: u32 = WM_USER + 24;
pub const TTM_SETTITLEW: u32 = WM_USER + 33;
pub const TTM_ADDTOOLW: u32 = WM_USER + 50;
pub const TTM_DELTOOLW: u32 = WM_USER + 51;
pub const TTM_NEWTOOLRECTW: u32 = WM_USER + 52;
pub const TTM_GETTOOLINFOW: u32 = WM_USER + 53;
pub const TTM_SETTOOLINFOW: u32 = WM_USER + 54;
pub const TTM_UPDATETIPTEXTW: u32 = WM_USER + 57;

// ── Toolbar messages ──────────────────────────────────────────────────────────

pub const TB_GETBUTTONINFOW: u32 = WM_USER + 63;
pub const TB_SETBUTTONINFOW: u32 = WM_USER + 64;

/// Signature of a window procedure, ABI-compatible with `WNDPROC`.
pub type WindowProc = unsafe extern "system" fn(Handle, u32, usize, isize) -> isize;

/// Extension point for toolkit windows that subclass a native class and need
/// unhandled messages forwarded to the original procedure.
pub trait WindowProcSource: HandleOwner {
    fn default_window_proc(&self) -> WindowProc;
}

/// Native windowing calls used by the dispatch wrappers.
///
/// Implementations forward to the OS without interpreting results: a failed
/// call is reported through its own return value.
pub trait NativeApi {
    /// `SendMessageW`.
    ///
    /// # Safety
    /// If `msg` expects a pointer in `wparam` or `lparam`, that pointer must be
    /// valid for the reads and writes the message performs, for the whole call.
    unsafe fn send_message(&self, hwnd: Handle, msg: u32, wparam: usize, lparam: isize) -> isize;

    /// `CallWindowProcW`.
    ///
    /// # Safety
    /// Same pointer requirements as `send_message`; `proc_` must be a window
    /// procedure that accepts `hwnd`.
    unsafe fn call_window_proc(
        &self,
        proc_: WindowProc,
        hwnd: Handle,
        msg: u32,
        wparam: usize,
        lparam: isize,
    ) -> isize;

    /// `InitCommonControlsEx`.
    fn init_common_controls_ex(&self, init: &InitCommonControlsEx) -> bool;

    /// `TrackPopupMenuEx`. Returns the raw BOOL, or the chosen command id
    /// when `TPM_RETURNCMD` is set.
    fn track_popup_menu_ex(
        &self,
        menu: Handle,
        flags: u32,
        x: i32,
        y: i32,
        hwnd: Handle,
        params: Option<&PopupMenuParams>,
    ) -> i32;

    /// `GetMenuItemInfoW`.
    ///
    /// # Safety
    /// When `MIIM_STRING` is requested and `info.type_data` is non-null, it
    /// must point to a writable buffer of `info.cch` UTF-16 units (the
    /// terminator included). On return `cch` holds the copied text length.
    unsafe fn get_menu_item_info(
        &self,
        menu: Handle,
        item: u32,
        by_position: bool,
        info: &mut MenuItemInfo,
    ) -> bool;

    /// `SetMenuItemInfoW`.
    ///
    /// # Safety
    /// When `MIIM_STRING` is set, `info.type_data` must point to a
    /// NUL-terminated UTF-16 string.
    unsafe fn set_menu_item_info(
        &self,
        menu: Handle,
        item: u32,
        by_position: bool,
        info: &MenuItemInfo,
    ) -> bool;
}
