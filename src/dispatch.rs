/*
 * Guarded wrappers for the menu, toolbar and common-controls calls.
 *
 * Each wrapper takes the toolkit object that owns the native resource, builds
 * whatever mirror the call needs, issues the call through `HandleRef::call` so
 * the owner outlives it, and returns the native result untouched. A failed
 * native call is reported through that result (a FALSE BOOL, -1 index, zero
 * command); nothing here turns it into an error.
 */

use crate::handle::{HandleOwner, HandleRef};
use crate::native_api::{NativeApi, TB_GETBUTTONINFOW, TB_SETBUTTONINFOW, WindowProcSource};
use crate::native_structs::{
    InitCommonControlsEx, MIIM_STRING, MenuItemInfo, Point, PopupMenuParams, Rect, TBIF_TEXT,
    ToolbarButtonInfo,
};
use crate::param_codec::native_to_bool;

/// NUL-terminated UTF-16 copy of `text` for handing to native code.
pub(crate) fn to_wide_nul(text: &str) -> Vec<u16> {
    text.encode_utf16().chain(std::iter::once(0)).collect()
}

/// Sends `msg` to the window owned by `owner` and returns the raw LRESULT.
///
/// # Safety
/// Pointers carried in `wparam`/`lparam` must be valid for what `msg` does
/// with them, for the duration of the call.
pub unsafe fn send_message<A, O>(
    api: &A,
    owner: &O,
    msg: u32,
    wparam: usize,
    lparam: isize,
) -> isize
where
    A: NativeApi + ?Sized,
    O: HandleOwner + ?Sized,
{
    HandleRef::new(owner).call(|hwnd| {
        log::trace!(
            "Dispatch: SendMessage hwnd {hwnd:?} msg {msg:#06x} wparam {wparam:#x} lparam {lparam:#x}"
        );
        // SAFETY: pointer validity is the caller's contract.
        unsafe { api.send_message(hwnd, msg, wparam, lparam) }
    })
}

/// Forwards a message to the window's original (pre-subclass) procedure.
///
/// # Safety
/// Same contract as `send_message`.
pub unsafe fn call_default_window_proc<A, W>(
    api: &A,
    window: &W,
    msg: u32,
    wparam: usize,
    lparam: isize,
) -> isize
where
    A: NativeApi + ?Sized,
    W: WindowProcSource + ?Sized,
{
    let default_proc = window.default_window_proc();
    HandleRef::new(window).call(|hwnd| {
        // SAFETY: pointer validity is the caller's contract; the procedure
        // comes from the window that owns `hwnd`.
        unsafe { api.call_window_proc(default_proc, hwnd, msg, wparam, lparam) }
    })
}

/// Registers the common control classes in `classes` (ICC_* bits).
pub fn init_common_controls<A>(api: &A, classes: u32) -> bool
where
    A: NativeApi + ?Sized,
{
    let init = InitCommonControlsEx::new(classes);
    log::debug!("Dispatch: InitCommonControlsEx classes {classes:#x}");
    api.init_common_controls_ex(&init)
}

/*
 * Queries a toolbar button (TB_GETBUTTONINFOW). `command_id` is the button's
 * command, or its index when `mask` carries TBIF_BYINDEX. TBIF_TEXT is removed
 * from the mask because no text buffer is supplied. Returns the raw result (the
 * button index, or -1 on failure) together with the filled mirror.
 */
pub fn get_toolbar_button_info<A, O>(
    api: &A,
    toolbar: &O,
    command_id: i32,
    mask: u32,
) -> (isize, ToolbarButtonInfo)
where
    A: NativeApi + ?Sized,
    O: HandleOwner + ?Sized,
{
    if mask & TBIF_TEXT != 0 {
        log::debug!("Dispatch: TB_GETBUTTONINFOW ignores TBIF_TEXT without a buffer");
    }
    let mut info = ToolbarButtonInfo::new(mask & !TBIF_TEXT);
    let result = HandleRef::new(toolbar).call(|hwnd| {
        // SAFETY: `info` is a correctly sized TBBUTTONINFOW with no text buffer
        // and outlives the call.
        unsafe {
            api.send_message(
                hwnd,
                TB_GETBUTTONINFOW,
                command_id as usize,
                &mut info as *mut ToolbarButtonInfo as isize,
            )
        }
    });
    (result, info)
}

/// Updates a toolbar button (TB_SETBUTTONINFOW). `text`, when given, is
/// pinned for the call and TBIF_TEXT is added to the mask. The `text` and
/// `cch_text` fields of `info` are always ignored: with `text` set to `None`
/// TBIF_TEXT is removed and a null text pointer is sent, so the button text
/// is left unchanged.
pub fn set_toolbar_button_info<A, O>(
    api: &A,
    toolbar: &O,
    command_id: i32,
    info: &ToolbarButtonInfo,
    text: Option<&str>,
) -> bool
where
    A: NativeApi + ?Sized,
    O: HandleOwner + ?Sized,
{
    let mut native = *info;
    native.cb_size = size_of::<ToolbarButtonInfo>() as u32;
    let mut wide = text.map(to_wide_nul);
    match wide.as_mut() {
        Some(buffer) => {
            native.mask |= TBIF_TEXT;
            native.text = buffer.as_mut_ptr();
            native.cch_text = (buffer.len() - 1) as i32;
        }
        None => {
            native.mask &= !TBIF_TEXT;
            native.text = std::ptr::null_mut();
            native.cch_text = 0;
        }
    }

    let result = HandleRef::new(toolbar).call(|hwnd| {
        // SAFETY: `native` and the optional text buffer both outlive the call.
        unsafe {
            api.send_message(
                hwnd,
                TB_SETBUTTONINFOW,
                command_id as usize,
                &native as *const ToolbarButtonInfo as isize,
            )
        }
    });
    drop(wide);
    native_to_bool(result as i32)
}

/// Reads the fields selected by `mask`. If `mask` includes MIIM_STRING only
/// the text length is returned (in `cch`); use `get_menu_item_text` for the text.
pub fn get_menu_item_info<A, O>(
    api: &A,
    menu: &O,
    item: u32,
    by_position: bool,
    mask: u32,
) -> (bool, MenuItemInfo)
where
    A: NativeApi + ?Sized,
    O: HandleOwner + ?Sized,
{
    let mut info = MenuItemInfo::new(mask);
    let ok = HandleRef::new(menu).call(|hmenu| {
        // SAFETY: `type_data` is null, so the OS only reports the length.
        unsafe { api.get_menu_item_info(hmenu, item, by_position, &mut info) }
    });
    (ok, info)
}

/// Writes a menu item. `text`, when given, is pinned for the call and
/// MIIM_STRING is added to the mask. The `type_data` and `cch` fields of
/// `info` are always ignored: with `text` set to `None` MIIM_STRING is
/// removed and the item text is left unchanged.
pub fn set_menu_item_info<A, O>(
    api: &A,
    menu: &O,
    item: u32,
    by_position: bool,
    info: &MenuItemInfo,
    text: Option<&str>,
) -> bool
where
    A: NativeApi + ?Sized,
    O: HandleOwner + ?Sized,
{
    let mut native = *info;
    native.cb_size = size_of::<MenuItemInfo>() as u32;
    let mut wide = text.map(to_wide_nul);
    match wide.as_mut() {
        Some(buffer) => {
            native.mask |= MIIM_STRING;
            native.type_data = buffer.as_mut_ptr();
            native.cch = (buffer.len() - 1) as u32;
        }
        None => {
            native.mask &= !MIIM_STRING;
            native.type_data = std::ptr::null_mut();
            native.cch = 0;
        }
    }

    let ok = HandleRef::new(menu).call(|hmenu| {
        // SAFETY: with MIIM_STRING set, `type_data` points into `wide`, which
        // is NUL-terminated and outlives the call.
        unsafe { api.set_menu_item_info(hmenu, item, by_position, &native) }
    });
    drop(wide);
    ok
}

/*
 * Reads a menu item's text with the usual two calls: the first (null buffer)
 * reports the length, the second fills a buffer of that length plus the
 * terminator. Returns `None` when either native call fails.
 */
pub fn get_menu_item_text<A, O>(api: &A, menu: &O, item: u32, by_position: bool) -> Option<String>
where
    A: NativeApi + ?Sized,
    O: HandleOwner + ?Sized,
{
    HandleRef::new(menu).call(|hmenu| {
        let mut info = MenuItemInfo::new(MIIM_STRING);
        // SAFETY: null `type_data` asks for the length only.
        if !unsafe { api.get_menu_item_info(hmenu, item, by_position, &mut info) } {
            log::trace!("Dispatch: GetMenuItemInfoW length query failed for item {item}");
            return None;
        }

        // On the fill call `cch` is the buffer size, terminator included.
        let mut buffer = vec![0u16; info.cch as usize + 1];
        info.type_data = buffer.as_mut_ptr();
        info.cch = buffer.len() as u32;
        // SAFETY: `buffer` holds `cch` units and outlives the call.
        if !unsafe { api.get_menu_item_info(hmenu, item, by_position, &mut info) } {
            return None;
        }
        let len = (info.cch as usize).min(buffer.len() - 1);
        Some(String::from_utf16_lossy(&buffer[..len]))
    })
}

/*
 * Shows a popup menu at `point` (screen coordinates) on behalf of `window`.
 * The TPMPARAMS mirror is only built when an exclusion rectangle is given.
 * Both the menu and the window owners stay alive until the menu closes.
 * Returns the raw result: a BOOL, or the chosen command with TPM_RETURNCMD.
 */
pub fn track_popup_menu<A, M, W>(
    api: &A,
    menu: &M,
    window: &W,
    flags: u32,
    point: Point,
    exclude: Option<Rect>,
) -> i32
where
    A: NativeApi + ?Sized,
    M: HandleOwner + ?Sized,
    W: HandleOwner + ?Sized,
{
    let params = exclude.map(PopupMenuParams::new);
    HandleRef::new(menu).call(|hmenu| {
        HandleRef::new(window).call(|hwnd| {
            log::trace!(
                "Dispatch: TrackPopupMenuEx menu {hmenu:?} at ({}, {}) flags {flags:#x}",
                point.x,
                point.y
            );
            api.track_popup_menu_ex(hmenu, flags, point.x, point.y, hwnd, params.as_ref())
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handle::Handle;
    use crate::native_api::{WM_USER, WindowProc};
    use crate::native_structs::{
        ICC_BAR_CLASSES, ICC_TAB_CLASSES, MIIM_ID, MIIM_STATE, TBIF_BYINDEX, TBIF_IMAGE,
        TPM_RETURNCMD,
    };
    use crate::test_support::{HandleRegistry, RecordedCall, RecordingApi, TrackedWindow};
    use std::rc::Rc;

    #[test]
    fn test_send_message_returns_raw_result() {
        // Arrange
        let registry = HandleRegistry::new();
        let api = RecordingApi::new(&registry);
        let window = TrackedWindow::create(&registry);
        api.send_result.set(-1);

        // Act
        let result = unsafe { send_message(&api, &window, WM_USER + 5, 3, 4) };

        // Assert
        assert_eq!(result, -1);
        let sent = api.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].hwnd, window.handle());
        assert_eq!((sent[0].msg, sent[0].wparam, sent[0].lparam), (WM_USER + 5, 3, 4));
        assert!(sent[0].hwnd_live);
    }

    #[test]
    fn test_send_message_through_released_rc_owner() {
        let registry = HandleRegistry::new();
        let api = RecordingApi::new(&registry);
        let window = Rc::new(TrackedWindow::create(&registry));
        let guard = HandleRef::new(Rc::clone(&window));
        let handle = guard.handle();
        drop(window);

        let _ = unsafe { send_message(&api, &guard, WM_USER, 0, 0) };

        assert!(api.sent()[0].hwnd_live);
        drop(guard);
        assert!(!registry.is_live(handle));
    }

    unsafe extern "system" fn echo_proc(_hwnd: Handle, msg: u32, wparam: usize, _lparam: isize) -> isize {
        msg as isize + wparam as isize
    }

    struct Subclassed(TrackedWindow);

    impl HandleOwner for Subclassed {
        fn handle(&self) -> Handle {
            self.0.handle()
        }
    }

    impl WindowProcSource for Subclassed {
        fn default_window_proc(&self) -> WindowProc {
            echo_proc
        }
    }

    #[test]
    fn test_call_default_window_proc_uses_owner_proc() {
        let registry = HandleRegistry::new();
        let api = RecordingApi::new(&registry);
        let window = Subclassed(TrackedWindow::create(&registry));

        let result = unsafe { call_default_window_proc(&api, &window, 10, 5, 0) };

        assert_eq!(result, 15);
        assert_eq!(
            api.calls(),
            vec![RecordedCall::WindowProc {
                hwnd: window.handle(),
                msg: 10,
                hwnd_live: true,
            }]
        );
    }

    #[test]
    fn test_init_common_controls_fills_size() {
        let registry = HandleRegistry::new();
        let api = RecordingApi::new(&registry);
        api.bool_result.set(false);

        let ok = init_common_controls(&api, ICC_BAR_CLASSES | ICC_TAB_CLASSES);

        assert!(!ok);
        assert_eq!(
            api.calls(),
            vec![RecordedCall::InitCommonControls(InitCommonControlsEx {
                size: 8,
                icc: ICC_BAR_CLASSES | ICC_TAB_CLASSES,
            })]
        );
    }

    #[test]
    fn test_get_toolbar_button_info_strips_text_and_reads_back() {
        let registry = HandleRegistry::new();
        let api = RecordingApi::new(&registry);
        let toolbar = TrackedWindow::create(&registry);
        api.send_result.set(2);
        api.button_image_writeback.set(Some(7));

        let (index, info) =
            get_toolbar_button_info(&api, &toolbar, 1001, TBIF_IMAGE | TBIF_TEXT);

        assert_eq!(index, 2);
        assert_eq!(info.image, 7);
        let sent = api.sent().remove(0);
        assert_eq!(sent.msg, TB_GETBUTTONINFOW);
        assert_eq!(sent.wparam, 1001);
        let button = sent.button.expect("button mirror");
        assert_eq!(button.mask, TBIF_IMAGE);
        assert_eq!(button.cb_size as usize, size_of::<ToolbarButtonInfo>());
    }

    #[test]
    fn test_get_toolbar_button_info_failure_is_minus_one() {
        let registry = HandleRegistry::new();
        let api = RecordingApi::new(&registry);
        let toolbar = TrackedWindow::create(&registry);
        api.send_result.set(-1);

        let (index, _) = get_toolbar_button_info(&api, &toolbar, 0, TBIF_IMAGE | TBIF_BYINDEX);

        assert_eq!(index, -1);
    }

    #[test]
    fn test_set_toolbar_button_info_pins_text() {
        let registry = HandleRegistry::new();
        let api = RecordingApi::new(&registry);
        let toolbar = TrackedWindow::create(&registry);
        api.send_result.set(1);
        let mut info = ToolbarButtonInfo::new(TBIF_IMAGE);
        info.image = 3;

        let ok = set_toolbar_button_info(&api, &toolbar, 1002, &info, Some("Save"));

        assert!(ok);
        let sent = api.sent().remove(0);
        assert_eq!(sent.text.as_deref(), Some("Save"));
        let button = sent.button.expect("button mirror");
        assert_eq!(button.mask, TBIF_IMAGE | TBIF_TEXT);
        assert_eq!(button.cch_text, 4);
        assert_eq!(button.image, 3);
    }

    #[test]
    fn test_set_toolbar_button_info_without_text_clears_mask() {
        let registry = HandleRegistry::new();
        let api = RecordingApi::new(&registry);
        let toolbar = TrackedWindow::create(&registry);
        let mut caller_text = to_wide_nul("Stale");
        let mut info = ToolbarButtonInfo::new(TBIF_IMAGE | TBIF_TEXT);
        info.text = caller_text.as_mut_ptr();
        info.cch_text = 5;

        let ok = set_toolbar_button_info(&api, &toolbar, 1, &info, None);

        assert!(!ok);
        let sent = api.sent().remove(0);
        let button = sent.button.expect("button mirror");
        assert_eq!(button.mask, TBIF_IMAGE);
        assert!(button.text.is_null());
        assert_eq!(button.cch_text, 0);
        assert_eq!(sent.text, None);
    }

    #[test]
    fn test_get_menu_item_info_passes_mask() {
        let registry = HandleRegistry::new();
        let api = RecordingApi::new(&registry);
        let menu = TrackedWindow::create(&registry);
        *api.menu_text.borrow_mut() = Some(String::new());

        let (ok, info) = get_menu_item_info(&api, &menu, 4, true, MIIM_ID | MIIM_STATE);

        assert!(ok);
        assert_eq!(info.mask, MIIM_ID | MIIM_STATE);
        assert_eq!(
            api.calls(),
            vec![RecordedCall::GetMenuItemInfo {
                menu: menu.handle(),
                item: 4,
                by_position: true,
                mask: MIIM_ID | MIIM_STATE,
                had_buffer: false,
                menu_live: true,
            }]
        );
    }

    #[test]
    fn test_get_menu_item_text_two_call_protocol() {
        let registry = HandleRegistry::new();
        let api = RecordingApi::new(&registry);
        let menu = TrackedWindow::create(&registry);
        *api.menu_text.borrow_mut() = Some("&Open...".to_string());

        let text = get_menu_item_text(&api, &menu, 100, false);

        assert_eq!(text.as_deref(), Some("&Open..."));
        let calls = api.calls();
        assert_eq!(calls.len(), 2);
        assert!(matches!(calls[0], RecordedCall::GetMenuItemInfo { had_buffer: false, .. }));
        assert!(matches!(calls[1], RecordedCall::GetMenuItemInfo { had_buffer: true, .. }));
    }

    #[test]
    fn test_get_menu_item_text_keeps_last_character() {
        // Arrange: the fill call copies at most `cch - 1` units plus a NUL.
        let registry = HandleRegistry::new();
        let api = RecordingApi::new(&registry);
        let menu = TrackedWindow::create(&registry);

        for text in ["Open", "X", ""] {
            *api.menu_text.borrow_mut() = Some(text.to_string());

            // Act
            let read = get_menu_item_text(&api, &menu, 1, true);

            // Assert
            assert_eq!(read.as_deref(), Some(text));
        }
    }

    #[test]
    fn test_get_menu_item_text_failure_is_none() {
        let registry = HandleRegistry::new();
        let api = RecordingApi::new(&registry);
        let menu = TrackedWindow::create(&registry);

        assert_eq!(get_menu_item_text(&api, &menu, 100, false), None);
        assert_eq!(api.calls().len(), 1);
    }

    #[test]
    fn test_set_menu_item_info_pins_text() {
        let registry = HandleRegistry::new();
        let api = RecordingApi::new(&registry);
        let menu = TrackedWindow::create(&registry);

        let ok = set_menu_item_info(&api, &menu, 7, false, &MenuItemInfo::new(MIIM_ID), Some("E&xit"));

        assert!(ok);
        assert_eq!(
            api.calls(),
            vec![RecordedCall::SetMenuItemInfo {
                menu: menu.handle(),
                item: 7,
                by_position: false,
                mask: MIIM_ID | MIIM_STRING,
                text: Some("E&xit".to_string()),
                menu_live: true,
            }]
        );
    }

    #[test]
    fn test_track_popup_menu_with_exclusion_rect() {
        let registry = HandleRegistry::new();
        let api = RecordingApi::new(&registry);
        let menu = TrackedWindow::create(&registry);
        let window = TrackedWindow::create(&registry);
        api.popup_result.set(42);
        let exclude = Rect::new(0, 0, 100, 20);

        let command = track_popup_menu(
            &api,
            &menu,
            &window,
            TPM_RETURNCMD,
            Point { x: 10, y: 20 },
            Some(exclude),
        );

        assert_eq!(command, 42);
        assert_eq!(
            api.calls(),
            vec![RecordedCall::TrackPopupMenu {
                menu: menu.handle(),
                flags: TPM_RETURNCMD,
                x: 10,
                y: 20,
                hwnd: window.handle(),
                params: Some(PopupMenuParams::new(exclude)),
                menu_live: true,
                hwnd_live: true,
            }]
        );
    }

    #[test]
    fn test_track_popup_menu_without_exclusion_passes_none() {
        let registry = HandleRegistry::new();
        let api = RecordingApi::new(&registry);
        let menu = TrackedWindow::create(&registry);
        let window = TrackedWindow::create(&registry);
        api.popup_result.set(0);

        let result = track_popup_menu(&api, &menu, &window, 0, Point::default(), None);

        assert_eq!(result, 0);
        assert!(matches!(api.calls()[0], RecordedCall::TrackPopupMenu { params: None, .. }));
    }
}
