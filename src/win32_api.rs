/*
 * Production `NativeApi` backed by the `windows` crate.
 *
 * The crate's own mirrors are passed to the OS by pointer cast to the matching
 * `windows` structure. That is sound only because each pair has the same
 * layout, which `platform_layout_report` lets the diagnostics layer verify at
 * startup in debug builds.
 */

use crate::diagnostics::LayoutCheck;
use crate::handle::Handle;
use crate::native_api::{NativeApi, WindowProc};
use crate::native_structs::{
    InitCommonControlsEx, MenuItemInfo, NativeLayout, NotifyHeader, Point, PopupMenuParams, Rect,
    ToolInfo, ToolbarButtonInfo,
};

use windows::Win32::{
    Foundation::{HWND, LPARAM, LRESULT, POINT, RECT, WPARAM},
    UI::{
        Controls::{
            INITCOMMONCONTROLSEX, InitCommonControlsEx as NativeInitCommonControlsEx, NMHDR,
            TBBUTTONINFOW, TTTOOLINFOW,
        },
        WindowsAndMessaging::{
            CallWindowProcW, GetMenuItemInfoW, HMENU, MENUITEMINFOW, SendMessageW,
            SetMenuItemInfoW, TPMPARAMS, TrackPopupMenuEx,
        },
    },
};

#[inline]
fn hwnd(handle: Handle) -> HWND {
    HWND(handle.as_ptr())
}

#[inline]
fn hmenu(handle: Handle) -> HMENU {
    HMENU(handle.as_ptr())
}

/// Calls straight into user32/comctl32.
#[derive(Debug, Default, Clone, Copy)]
pub struct Win32Api;

impl NativeApi for Win32Api {
    unsafe fn send_message(
        &self,
        hwnd_target: Handle,
        msg: u32,
        wparam: usize,
        lparam: isize,
    ) -> isize {
        // SAFETY: pointer validity for `msg` is guaranteed by the caller.
        let result = unsafe {
            SendMessageW(
                hwnd(hwnd_target),
                msg,
                Some(WPARAM(wparam)),
                Some(LPARAM(lparam)),
            )
        };
        result.0
    }

    unsafe fn call_window_proc(
        &self,
        proc_: WindowProc,
        hwnd_target: Handle,
        msg: u32,
        wparam: usize,
        lparam: isize,
    ) -> isize {
        type NativeProc = unsafe extern "system" fn(HWND, u32, WPARAM, LPARAM) -> LRESULT;
        // SAFETY: `Handle`, `WPARAM`, `LPARAM` and `LRESULT` are transparent
        // wrappers over the same pointer-sized integers, so both signatures
        // share one ABI.
        let native_proc = unsafe { std::mem::transmute::<WindowProc, NativeProc>(proc_) };
        // SAFETY: pointer validity for `msg` is guaranteed by the caller.
        let result = unsafe {
            CallWindowProcW(
                Some(native_proc),
                hwnd(hwnd_target),
                msg,
                WPARAM(wparam),
                LPARAM(lparam),
            )
        };
        result.0
    }

    fn init_common_controls_ex(&self, init: &InitCommonControlsEx) -> bool {
        // SAFETY: `InitCommonControlsEx` mirrors INITCOMMONCONTROLSEX exactly.
        unsafe {
            let native = init as *const InitCommonControlsEx as *const INITCOMMONCONTROLSEX;
            NativeInitCommonControlsEx(native).as_bool()
        }
    }

    fn track_popup_menu_ex(
        &self,
        menu: Handle,
        flags: u32,
        x: i32,
        y: i32,
        hwnd_owner: Handle,
        params: Option<&PopupMenuParams>,
    ) -> i32 {
        let params = params.map(|p| p as *const PopupMenuParams as *const TPMPARAMS);
        // SAFETY: `PopupMenuParams` mirrors TPMPARAMS and outlives the call.
        unsafe {
            TrackPopupMenuEx(
                hmenu(menu),
                flags,
                x,
                y,
                hwnd(hwnd_owner),
                params,
            )
            .0
        }
    }

    unsafe fn get_menu_item_info(
        &self,
        menu: Handle,
        item: u32,
        by_position: bool,
        info: &mut MenuItemInfo,
    ) -> bool {
        // SAFETY: `MenuItemInfo` mirrors MENUITEMINFOW; buffer validity is the
        // caller's contract.
        unsafe {
            GetMenuItemInfoW(
                hmenu(menu),
                item,
                by_position,
                info as *mut MenuItemInfo as *mut MENUITEMINFOW,
            )
            .is_ok()
        }
    }

    unsafe fn set_menu_item_info(
        &self,
        menu: Handle,
        item: u32,
        by_position: bool,
        info: &MenuItemInfo,
    ) -> bool {
        // SAFETY: as for `get_menu_item_info`.
        unsafe {
            SetMenuItemInfoW(
                hmenu(menu),
                item,
                by_position,
                info as *const MenuItemInfo as *const MENUITEMINFOW,
            )
            .is_ok()
        }
    }
}

fn against_platform<T: NativeLayout, N>() -> LayoutCheck {
    LayoutCheck {
        structure: T::NAME,
        mirror_size: size_of::<T>(),
        native_size: size_of::<N>(),
    }
}

/// Mirror sizes compared with the `windows` crate's structure definitions.
pub(crate) fn platform_layout_report() -> Vec<LayoutCheck> {
    vec![
        against_platform::<Point, POINT>(),
        against_platform::<Rect, RECT>(),
        against_platform::<NotifyHeader, NMHDR>(),
        against_platform::<ToolInfo, TTTOOLINFOW>(),
        against_platform::<MenuItemInfo, MENUITEMINFOW>(),
        against_platform::<ToolbarButtonInfo, TBBUTTONINFOW>(),
        against_platform::<InitCommonControlsEx, INITCOMMONCONTROLSEX>(),
        against_platform::<PopupMenuParams, TPMPARAMS>(),
    ]
}
