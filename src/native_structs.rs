/*
 * Byte-exact mirrors of the windowing-API structures this crate sends to native code.
 *
 * Every mirror is `#[repr(C)]` with fields in the order the platform headers
 * declare them, so the compiler inserts exactly the padding the C ABI does.
 * Each type records its documented native size for both pointer widths via
 * `NativeLayout`; the `const` assertions at the bottom of this file reject a
 * wrong mirror at compile time and `diagnostics::verify_struct_layouts`
 * repeats the check at startup (cross-checking against the `windows` crate on
 * Windows).
 *
 * Handles are stored as `Handle` (a transparent pointer-sized integer) and text
 * buffers as raw `*mut u16`. A mirror holding a text pointer is only valid
 * while the buffer behind it is alive; the dispatch wrappers build such
 * mirrors inside the scope that owns the buffer and never hand them out.
 */

use crate::handle::Handle;

use std::ffi::c_void;

/// Documented ABI facts for a mirrored structure.
pub trait NativeLayout: Sized {
    /// Name of the structure in the platform headers.
    const NAME: &'static str;
    /// Size on 32-bit targets.
    const NATIVE_SIZE_32: usize;
    /// Size on 64-bit targets.
    const NATIVE_SIZE_64: usize;
    /// Size on the running target.
    const NATIVE_SIZE: usize = if cfg!(target_pointer_width = "64") {
        Self::NATIVE_SIZE_64
    } else {
        Self::NATIVE_SIZE_32
    };
}

// ── Tool-tip flags (TTF_*) ────────────────────────────────────────────────────

pub const TTF_IDISHWND: u32 = 0x0001;
pub const TTF_CENTERTIP: u32 = 0x0002;
pub const TTF_RTLREADING: u32 = 0x0004;
pub const TTF_SUBCLASS: u32 = 0x0010;
pub const TTF_TRACK: u32 = 0x0020;
pub const TTF_ABSOLUTE: u32 = 0x0080;
pub const TTF_TRANSPARENT: u32 = 0x0100;
pub const TTF_PARSELINKS: u32 = 0x1000;

/// `LPSTR_TEXTCALLBACKW`: ask the owner for the text via TTN_GETDISPINFO.
pub const LPSTR_TEXTCALLBACKW: *mut u16 = -1isize as *mut u16;

// ── Menu item info masks (MIIM_*) ─────────────────────────────────────────────

pub const MIIM_STATE: u32 = 0x0001;
pub const MIIM_ID: u32 = 0x0002;
pub const MIIM_SUBMENU: u32 = 0x0004;
pub const MIIM_CHECKMARKS: u32 = 0x0008;
pub const MIIM_TYPE: u32 = 0x0010;
pub const MIIM_DATA: u32 = 0x0020;
pub const MIIM_STRING: u32 = 0x0040;
pub const MIIM_BITMAP: u32 = 0x0080;
pub const MIIM_FTYPE: u32 = 0x0100;

pub const MFT_STRING: u32 = 0x0000;
pub const MFT_SEPARATOR: u32 = 0x0800;
pub const MFS_CHECKED: u32 = 0x0008;
pub const MFS_DISABLED: u32 = 0x0003;

// ── Toolbar button info masks (TBIF_*) ────────────────────────────────────────

pub const TBIF_IMAGE: u32 = 0x0000_0001;
pub const TBIF_TEXT: u32 = 0x0000_0002;
pub const TBIF_STATE: u32 = 0x0000_0004;
pub const TBIF_STYLE: u32 = 0x0000_0008;
pub const TBIF_LPARAM: u32 = 0x0000_0010;
pub const TBIF_COMMAND: u32 = 0x0000_0020;
pub const TBIF_SIZE: u32 = 0x0000_0040;
pub const TBIF_BYINDEX: u32 = 0x8000_0000;

// ── Common control classes (ICC_*) ────────────────────────────────────────────

pub const ICC_LISTVIEW_CLASSES: u32 = 0x0000_0001;
pub const ICC_TREEVIEW_CLASSES: u32 = 0x0000_0002;
pub const ICC_BAR_CLASSES: u32 = 0x0000_0004;
pub const ICC_TAB_CLASSES: u32 = 0x0000_0008;
pub const ICC_PROGRESS_CLASS: u32 = 0x0000_0020;
pub const ICC_WIN95_CLASSES: u32 = 0x0000_00FF;
pub const ICC_STANDARD_CLASSES: u32 = 0x0000_4000;

// ── Popup menu flags (TPM_*) ──────────────────────────────────────────────────

pub const TPM_LEFTALIGN: u32 = 0x0000;
pub const TPM_RIGHTBUTTON: u32 = 0x0002;
pub const TPM_VERTICAL: u32 = 0x0040;
pub const TPM_NONOTIFY: u32 = 0x0080;
pub const TPM_RETURNCMD: u32 = 0x0100;

// ── Leaf structures ───────────────────────────────────────────────────────────

/// `POINT`.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

/// `RECT`.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Rect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Rect {
    pub const fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }
}

/// `NMHDR`, the header of every WM_NOTIFY payload.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NotifyHeader {
    pub hwnd_from: Handle,
    pub id_from: usize,
    pub code: u32,
}

// ── TTTOOLINFOW ───────────────────────────────────────────────────────────────

/// `TTTOOLINFOW`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToolInfo {
    pub cb_size: u32,
    pub flags: u32,
    pub hwnd: Handle,
    pub id: usize,
    pub rect: Rect,
    pub hinst: Handle,
    pub text: *mut u16,
    pub lparam: isize,
    pub reserved: *mut c_void,
}

impl ToolInfo {
    /// Size reported to the tool-tip control. Comctl32 v6 rejects the full
    /// structure size in several messages; the size without the trailing
    /// `lpReserved` pointer (TTTOOLINFOW_V2_SIZE) is accepted everywhere.
    pub const V2_SIZE: usize = size_of::<Self>() - size_of::<*mut c_void>();

    pub fn new(hwnd: Handle, id: usize, flags: u32, rect: Rect) -> Self {
        Self {
            cb_size: size_of::<Self>() as u32,
            flags,
            hwnd,
            id,
            rect,
            hinst: Handle::NULL,
            text: std::ptr::null_mut(),
            lparam: 0,
            reserved: std::ptr::null_mut(),
        }
    }
}

impl NativeLayout for ToolInfo {
    const NAME: &'static str = "TTTOOLINFOW";
    const NATIVE_SIZE_32: usize = 48;
    const NATIVE_SIZE_64: usize = 72;
}

// ── MENUITEMINFOW ─────────────────────────────────────────────────────────────

/// `MENUITEMINFOW`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuItemInfo {
    pub cb_size: u32,
    pub mask: u32,
    pub item_type: u32,
    pub state: u32,
    pub id: u32,
    pub sub_menu: Handle,
    pub bmp_checked: Handle,
    pub bmp_unchecked: Handle,
    pub item_data: usize,
    pub type_data: *mut u16,
    pub cch: u32,
    pub bmp_item: Handle,
}

impl MenuItemInfo {
    pub fn new(mask: u32) -> Self {
        Self {
            cb_size: size_of::<Self>() as u32,
            mask,
            item_type: MFT_STRING,
            state: 0,
            id: 0,
            sub_menu: Handle::NULL,
            bmp_checked: Handle::NULL,
            bmp_unchecked: Handle::NULL,
            item_data: 0,
            type_data: std::ptr::null_mut(),
            cch: 0,
            bmp_item: Handle::NULL,
        }
    }
}

impl NativeLayout for MenuItemInfo {
    const NAME: &'static str = "MENUITEMINFOW";
    const NATIVE_SIZE_32: usize = 48;
    const NATIVE_SIZE_64: usize = 80;
}

// ── TBBUTTONINFOW ─────────────────────────────────────────────────────────────

/// `TBBUTTONINFOW`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToolbarButtonInfo {
    pub cb_size: u32,
    pub mask: u32,
    pub command: i32,
    pub image: i32,
    pub state: u8,
    pub style: u8,
    pub cx: u16,
    pub lparam: usize,
    pub text: *mut u16,
    pub cch_text: i32,
}

impl ToolbarButtonInfo {
    pub fn new(mask: u32) -> Self {
        Self {
            cb_size: size_of::<Self>() as u32,
            mask,
            command: 0,
            image: 0,
            state: 0,
            style: 0,
            cx: 0,
            lparam: 0,
            text: std::ptr::null_mut(),
            cch_text: 0,
        }
    }
}

impl NativeLayout for ToolbarButtonInfo {
    const NAME: &'static str = "TBBUTTONINFOW";
    const NATIVE_SIZE_32: usize = 32;
    const NATIVE_SIZE_64: usize = 48;
}

// ── INITCOMMONCONTROLSEX ──────────────────────────────────────────────────────

/// `INITCOMMONCONTROLSEX`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InitCommonControlsEx {
    pub size: u32,
    pub icc: u32,
}

impl InitCommonControlsEx {
    pub fn new(icc: u32) -> Self {
        Self {
            size: size_of::<Self>() as u32,
            icc,
        }
    }
}

impl NativeLayout for InitCommonControlsEx {
    const NAME: &'static str = "INITCOMMONCONTROLSEX";
    const NATIVE_SIZE_32: usize = 8;
    const NATIVE_SIZE_64: usize = 8;
}

// ── TPMPARAMS ─────────────────────────────────────────────────────────────────

/// `TPMPARAMS`: the screen rectangle a popup menu must not overlap.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PopupMenuParams {
    pub cb_size: u32,
    pub exclude: Rect,
}

impl PopupMenuParams {
    pub fn new(exclude: Rect) -> Self {
        Self {
            cb_size: size_of::<Self>() as u32,
            exclude,
        }
    }
}

impl NativeLayout for PopupMenuParams {
    const NAME: &'static str = "TPMPARAMS";
    const NATIVE_SIZE_32: usize = 20;
    const NATIVE_SIZE_64: usize = 20;
}

impl NativeLayout for NotifyHeader {
    const NAME: &'static str = "NMHDR";
    const NATIVE_SIZE_32: usize = 12;
    const NATIVE_SIZE_64: usize = 24;
}

impl NativeLayout for Rect {
    const NAME: &'static str = "RECT";
    const NATIVE_SIZE_32: usize = 16;
    const NATIVE_SIZE_64: usize = 16;
}

impl NativeLayout for Point {
    const NAME: &'static str = "POINT";
    const NATIVE_SIZE_32: usize = 8;
    const NATIVE_SIZE_64: usize = 8;
}

const _: () = assert!(size_of::<Point>() == Point::NATIVE_SIZE);
const _: () = assert!(size_of::<Rect>() == Rect::NATIVE_SIZE);
const _: () = assert!(size_of::<NotifyHeader>() == NotifyHeader::NATIVE_SIZE);
const _: () = assert!(size_of::<ToolInfo>() == ToolInfo::NATIVE_SIZE);
const _: () = assert!(size_of::<MenuItemInfo>() == MenuItemInfo::NATIVE_SIZE);
const _: () = assert!(size_of::<ToolbarButtonInfo>() == ToolbarButtonInfo::NATIVE_SIZE);
const _: () = assert!(size_of::<InitCommonControlsEx>() == InitCommonControlsEx::NATIVE_SIZE);
const _: () = assert!(size_of::<PopupMenuParams>() == PopupMenuParams::NATIVE_SIZE);
