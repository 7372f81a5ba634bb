/*
 * Test doubles shared by the unit tests: a fake handle table that notices when an
 * owner is dropped, and a `NativeApi` that records every call together with
 * whether the handles involved were still live at the moment of the call.
 */

use crate::handle::{Handle, HandleOwner};
use crate::native_api::{
    NativeApi, TB_GETBUTTONINFOW, TB_SETBUTTONINFOW, TTM_GETTOOLINFOW, TTM_SETTITLEW, WindowProc,
};
use crate::native_structs::{
    InitCommonControlsEx, LPSTR_TEXTCALLBACKW, MIIM_STRING, MenuItemInfo, PopupMenuParams,
    ToolInfo, ToolbarButtonInfo,
};
use crate::tooltip::MAX_TOOL_TEXT_LEN;

use std::cell::{Cell, RefCell};
use std::collections::HashSet;
use std::rc::Rc;

/// Stand-in for the OS handle table.
#[derive(Debug, Clone, Default)]
pub(crate) struct HandleRegistry {
    live: Rc<RefCell<HashSet<Handle>>>,
    next: Rc<Cell<isize>>,
}

impl HandleRegistry {
    pub(crate) fn new() -> Self {
        let registry = Self::default();
        registry.next.set(0x1000);
        registry
    }

    fn allocate(&self) -> Handle {
        let handle = Handle::from_raw(self.next.get());
        self.next.set(self.next.get() + 4);
        self.live.borrow_mut().insert(handle);
        handle
    }

    pub(crate) fn is_live(&self, handle: Handle) -> bool {
        self.live.borrow().contains(&handle)
    }

    fn destroy(&self, handle: Handle) {
        self.live.borrow_mut().remove(&handle);
    }
}

/// A toolkit object that destroys its native resource when dropped.
#[derive(Debug)]
pub(crate) struct TrackedWindow {
    handle: Handle,
    registry: HandleRegistry,
}

impl TrackedWindow {
    pub(crate) fn create(registry: &HandleRegistry) -> Self {
        Self {
            handle: registry.allocate(),
            registry: registry.clone(),
        }
    }
}

impl HandleOwner for TrackedWindow {
    fn handle(&self) -> Handle {
        self.handle
    }
}

impl Drop for TrackedWindow {
    fn drop(&mut self) {
        self.registry.destroy(self.handle);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct SentMessage {
    pub hwnd: Handle,
    pub msg: u32,
    pub wparam: usize,
    pub lparam: isize,
    pub hwnd_live: bool,
    /// Snapshot of a TTTOOLINFOW passed in lParam.
    pub tool: Option<ToolInfo>,
    /// Snapshot of a TBBUTTONINFOW passed in lParam.
    pub button: Option<ToolbarButtonInfo>,
    /// Text read through the pointer the message carried, during the call.
    pub text: Option<String>,
    /// Whether every handle owner registered via `watch` was live.
    pub watched_live: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum RecordedCall {
    Send(SentMessage),
    WindowProc {
        hwnd: Handle,
        msg: u32,
        hwnd_live: bool,
    },
    InitCommonControls(InitCommonControlsEx),
    TrackPopupMenu {
        menu: Handle,
        flags: u32,
        x: i32,
        y: i32,
        hwnd: Handle,
        params: Option<PopupMenuParams>,
        menu_live: bool,
        hwnd_live: bool,
    },
    GetMenuItemInfo {
        menu: Handle,
        item: u32,
        by_position: bool,
        mask: u32,
        had_buffer: bool,
        menu_live: bool,
    },
    SetMenuItemInfo {
        menu: Handle,
        item: u32,
        by_position: bool,
        mask: u32,
        text: Option<String>,
        menu_live: bool,
    },
}

/// Recording `NativeApi`.
#[derive(Debug)]
pub(crate) struct RecordingApi {
    registry: HandleRegistry,
    watched: RefCell<Vec<Handle>>,
    calls: RefCell<Vec<RecordedCall>>,
    pub send_result: Cell<isize>,
    pub bool_result: Cell<bool>,
    pub popup_result: Cell<i32>,
    /// Text of the menu item served by `get_menu_item_info`; `None` fails the call.
    pub menu_text: RefCell<Option<String>>,
    /// Value written into `ToolInfo::lparam` on TTM_GETTOOLINFOW.
    pub tool_lparam_writeback: Cell<Option<isize>>,
    /// Text copied through `ToolInfo::text` on TTM_GETTOOLINFOW, at most
    /// `MAX_TOOL_TEXT_LEN` units plus a NUL, as the control does.
    pub tool_text_writeback: RefCell<Option<String>>,
    /// Value written into `ToolbarButtonInfo::image` on TB_GETBUTTONINFOW.
    pub button_image_writeback: Cell<Option<i32>>,
}

impl RecordingApi {
    pub(crate) fn new(registry: &HandleRegistry) -> Self {
        Self {
            registry: registry.clone(),
            watched: RefCell::new(Vec::new()),
            calls: RefCell::new(Vec::new()),
            send_result: Cell::new(0),
            bool_result: Cell::new(true),
            popup_result: Cell::new(1),
            menu_text: RefCell::new(None),
            tool_lparam_writeback: Cell::new(None),
            tool_text_writeback: RefCell::new(None),
            button_image_writeback: Cell::new(None),
        }
    }

    /// Also report whether `handle` is live on every message sent.
    pub(crate) fn watch(&self, handle: Handle) {
        self.watched.borrow_mut().push(handle);
    }

    pub(crate) fn calls(&self) -> Vec<RecordedCall> {
        self.calls.borrow().clone()
    }

    pub(crate) fn sent(&self) -> Vec<SentMessage> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|call| match call {
                RecordedCall::Send(sent) => Some(sent.clone()),
                _ => None,
            })
            .collect()
    }

    fn live(&self, handle: Handle) -> bool {
        self.registry.is_live(handle)
    }
}

/// `tool_text_writeback` value that makes TTM_GETTOOLINFOW report a callback tool.
pub(crate) const CALLBACK_TEXT: &str = "<callback>";

/// Reads a NUL-terminated UTF-16 string.
///
/// # Safety
/// `ptr` must point to a NUL-terminated UTF-16 buffer.
unsafe fn read_wide(ptr: *const u16) -> String {
    let mut len = 0;
    // SAFETY: the caller guarantees a terminator exists within the buffer.
    unsafe {
        while *ptr.add(len) != 0 {
            len += 1;
        }
        String::from_utf16_lossy(std::slice::from_raw_parts(ptr, len))
    }
}

fn readable_text(ptr: *mut u16) -> bool {
    !ptr.is_null() && ptr != LPSTR_TEXTCALLBACKW
}

impl NativeApi for RecordingApi {
    unsafe fn send_message(&self, hwnd: Handle, msg: u32, wparam: usize, lparam: isize) -> isize {
        let mut sent = SentMessage {
            hwnd,
            msg,
            wparam,
            lparam,
            hwnd_live: self.live(hwnd),
            tool: None,
            button: None,
            text: None,
            watched_live: self.watched.borrow().iter().all(|h| self.live(*h)),
        };

        // SAFETY: the caller upholds the per-message pointer contract of
        // `NativeApi::send_message`; the pointers below are the ones it vouched for.
        unsafe {
            if (crate::native_api::TTM_ADDTOOLW..=crate::native_api::TTM_UPDATETIPTEXTW)
                .contains(&msg)
            {
                let tool = lparam as *mut ToolInfo;
                if msg == TTM_GETTOOLINFOW {
                    if let Some(value) = self.tool_lparam_writeback.get() {
                        (*tool).lparam = value;
                    }
                    if let Some(text) = self.tool_text_writeback.borrow().as_deref() {
                        if text == CALLBACK_TEXT {
                            (*tool).text = LPSTR_TEXTCALLBACKW;
                        } else if readable_text((*tool).text) {
                            let wide: Vec<u16> =
                                text.encode_utf16().take(MAX_TOOL_TEXT_LEN).collect();
                            std::ptr::copy_nonoverlapping(wide.as_ptr(), (*tool).text, wide.len());
                            *(*tool).text.add(wide.len()) = 0;
                        }
                    }
                }
                if readable_text((*tool).text) {
                    sent.text = Some(read_wide((*tool).text));
                }
                sent.tool = Some(*tool);
            } else if msg == TTM_SETTITLEW {
                sent.text = Some(read_wide(lparam as *const u16));
            } else if msg == TB_GETBUTTONINFOW || msg == TB_SETBUTTONINFOW {
                let button = lparam as *mut ToolbarButtonInfo;
                if msg == TB_GETBUTTONINFOW {
                    if let Some(image) = self.button_image_writeback.get() {
                        (*button).image = image;
                    }
                }
                if msg == TB_SETBUTTONINFOW && readable_text((*button).text) {
                    sent.text = Some(read_wide((*button).text));
                }
                sent.button = Some(*button);
            }
        }

        self.calls.borrow_mut().push(RecordedCall::Send(sent));
        self.send_result.get()
    }

    unsafe fn call_window_proc(
        &self,
        proc_: WindowProc,
        hwnd: Handle,
        msg: u32,
        wparam: usize,
        lparam: isize,
    ) -> isize {
        self.calls.borrow_mut().push(RecordedCall::WindowProc {
            hwnd,
            msg,
            hwnd_live: self.live(hwnd),
        });
        // SAFETY: forwarded under the caller's contract.
        unsafe { proc_(hwnd, msg, wparam, lparam) }
    }

    fn init_common_controls_ex(&self, init: &InitCommonControlsEx) -> bool {
        self.calls
            .borrow_mut()
            .push(RecordedCall::InitCommonControls(*init));
        self.bool_result.get()
    }

    fn track_popup_menu_ex(
        &self,
        menu: Handle,
        flags: u32,
        x: i32,
        y: i32,
        hwnd: Handle,
        params: Option<&PopupMenuParams>,
    ) -> i32 {
        self.calls.borrow_mut().push(RecordedCall::TrackPopupMenu {
            menu,
            flags,
            x,
            y,
            hwnd,
            params: params.copied(),
            menu_live: self.live(menu),
            hwnd_live: self.live(hwnd),
        });
        self.popup_result.get()
    }

    unsafe fn get_menu_item_info(
        &self,
        menu: Handle,
        item: u32,
        by_position: bool,
        info: &mut MenuItemInfo,
    ) -> bool {
        self.calls.borrow_mut().push(RecordedCall::GetMenuItemInfo {
            menu,
            item,
            by_position,
            mask: info.mask,
            had_buffer: !info.type_data.is_null(),
            menu_live: self.live(menu),
        });

        let Some(text) = self.menu_text.borrow().clone() else {
            return false;
        };
        if info.mask & MIIM_STRING == 0 {
            return true;
        }
        let wide: Vec<u16> = text.encode_utf16().collect();
        if info.type_data.is_null() {
            info.cch = wide.len() as u32;
            return true;
        }
        // `cch` is the buffer size including the terminator, as in GetMenuItemInfoW.
        if info.cch == 0 {
            return true;
        }
        let copied = wide.len().min(info.cch as usize - 1);
        // SAFETY: the caller supplied a buffer of `cch` units.
        unsafe {
            std::ptr::copy_nonoverlapping(wide.as_ptr(), info.type_data, copied);
            *info.type_data.add(copied) = 0;
        }
        info.cch = copied as u32;
        true
    }

    unsafe fn set_menu_item_info(
        &self,
        menu: Handle,
        item: u32,
        by_position: bool,
        info: &MenuItemInfo,
    ) -> bool {
        let text = if info.mask & MIIM_STRING != 0 && !info.type_data.is_null() {
            // SAFETY: MIIM_STRING requires a NUL-terminated string.
            Some(unsafe { read_wide(info.type_data) })
        } else {
            None
        };
        self.calls.borrow_mut().push(RecordedCall::SetMenuItemInfo {
            menu,
            item,
            by_position,
            mask: info.mask,
            text,
            menu_live: self.live(menu),
        });
        self.bool_result.get()
    }
}
