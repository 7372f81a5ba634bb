/*
 * TTTOOLINFOW builder and sender for the tool-tip control.
 *
 * `ToolInfoWrapper` keeps the tool's owner alive for as long as the wrapper
 * exists, holds the text as a Rust string, and only materialises the native
 * text pointer inside `send_message`, where the UTF-16 copy is pinned for the
 * duration of the call. The mirror handed to the OS therefore never outlives
 * the buffer it points to.
 */

use crate::diagnostics::ContiguousEnum;
use crate::dispatch::to_wide_nul;
use crate::error::InteropError;
use crate::handle::{HandleOwner, HandleRef, keep_alive};
use crate::native_api::{
    NativeApi, TTM_ADDTOOLW, TTM_DELTOOLW, TTM_GETTOOLINFOW, TTM_NEWTOOLRECTW, TTM_SETTITLEW,
    TTM_SETTOOLINFOW, TTM_UPDATETIPTEXTW,
};
use crate::native_structs::{LPSTR_TEXTCALLBACKW, Rect, TTF_IDISHWND, ToolInfo};
use crate::param_codec::{bool_to_native, native_to_bool};

use std::ops::Deref;

/// TTM_SETTITLEW rejects titles longer than this many UTF-16 units.
pub const MAX_TITLE_LEN: usize = 99;

/// Most text units the control copies into `lpszText` on TTM_GETTOOLINFOW.
pub const MAX_TOOL_TEXT_LEN: usize = 80;

/// The tool-tip messages whose lParam is a TTTOOLINFOW.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolMessage {
    AddTool,
    DeleteTool,
    NewToolRect,
    GetToolInfo,
    SetToolInfo,
    UpdateTipText,
}

impl ToolMessage {
    pub fn code(self) -> u32 {
        match self {
            Self::AddTool => TTM_ADDTOOLW,
            Self::DeleteTool => TTM_DELTOOLW,
            Self::NewToolRect => TTM_NEWTOOLRECTW,
            Self::GetToolInfo => TTM_GETTOOLINFOW,
            Self::SetToolInfo => TTM_SETTOOLINFOW,
            Self::UpdateTipText => TTM_UPDATETIPTEXTW,
        }
    }

    /// The control writes the tool text through `lpszText` instead of reading it.
    pub fn fills_text(self) -> bool {
        matches!(self, Self::GetToolInfo)
    }
}

/// Text source for a tool.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ToolText {
    /// No text pointer (null).
    #[default]
    None,
    /// Literal text, pinned while a message is sent.
    Literal(String),
    /// The control asks the owner via TTN_GETDISPINFOW.
    Callback,
}

/// Standard title icons (TTI_*).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ToolTipIcon {
    None = 0,
    Info = 1,
    Warning = 2,
    Error = 3,
    InfoLarge = 4,
    WarningLarge = 5,
    ErrorLarge = 6,
}

impl ContiguousEnum for ToolTipIcon {
    const NAME: &'static str = "ToolTipIcon";
    const MIN: i32 = ToolTipIcon::None as i32;
    const MAX: i32 = ToolTipIcon::ErrorLarge as i32;
    const VARIANTS: &'static [Self] = &[
        Self::None,
        Self::Info,
        Self::Warning,
        Self::Error,
        Self::InfoLarge,
        Self::WarningLarge,
        Self::ErrorLarge,
    ];

    fn to_raw(self) -> i32 {
        self as i32
    }
}

impl TryFrom<i32> for ToolTipIcon {
    type Error = InteropError;

    fn try_from(raw: i32) -> Result<Self, InteropError> {
        Self::check(raw)?;
        Ok(Self::VARIANTS[(raw - Self::MIN) as usize])
    }
}

/// A tool registration for a tool-tip control.
pub struct ToolInfoWrapper<P>
where
    P: Deref,
    P::Target: HandleOwner,
{
    info: ToolInfo,
    text: ToolText,
    owner: HandleRef<P>,
}

impl<P> ToolInfoWrapper<P>
where
    P: Deref,
    P::Target: HandleOwner,
{
    /// A tool covering the whole owner window: the owner handle is both
    /// `hwnd` and `uId`, and TTF_IDISHWND is added to `flags`.
    pub fn for_owner(owner: P, flags: u32, text: ToolText) -> Self {
        let owner = HandleRef::new(owner);
        let handle = owner.handle();
        Self {
            info: ToolInfo::new(
                handle,
                handle.raw() as usize,
                flags | TTF_IDISHWND,
                Rect::default(),
            ),
            text,
            owner,
        }
    }

    /// A tool identified by `id` covering `rect` in the owner's client area.
    pub fn with_id(owner: P, id: usize, flags: u32, text: ToolText, rect: Rect) -> Self {
        let owner = HandleRef::new(owner);
        let handle = owner.handle();
        Self {
            info: ToolInfo::new(handle, id, flags, rect),
            text,
            owner,
        }
    }

    /// The last state of the mirror. Its `text` field is always null outside
    /// `send_message`.
    pub fn info(&self) -> &ToolInfo {
        &self.info
    }

    pub fn text(&self) -> &ToolText {
        &self.text
    }

    pub fn set_text(&mut self, text: ToolText) {
        self.text = text;
    }

    pub fn set_rect(&mut self, rect: Rect) {
        self.info.rect = rect;
    }

    /*
     * Sends `msg` to `tooltip` with this tool as lParam and `state` as a BOOL
     * wParam. The size field is set to the V2 size and both the tool owner and
     * the tool-tip owner stay alive until the call returns. For messages the
     * control reads, the text is pinned for the call; for TTM_GETTOOLINFOW a
     * zeroed buffer of `MAX_TOOL_TEXT_LEN` units plus terminator is pinned
     * instead and, on success, the reported text replaces `text`. Fields the
     * control writes back are kept; the transient text pointer is cleared.
     * Returns the raw LRESULT.
     */
    pub fn send_message<A, T>(
        &mut self,
        api: &A,
        tooltip: &T,
        msg: ToolMessage,
        state: bool,
    ) -> isize
    where
        A: NativeApi + ?Sized,
        T: HandleOwner + ?Sized,
    {
        self.info.cb_size = ToolInfo::V2_SIZE as u32;

        let mut pinned = if msg.fills_text() {
            Some(vec![0u16; MAX_TOOL_TEXT_LEN + 1])
        } else {
            match &self.text {
                ToolText::Literal(text) => Some(to_wide_nul(text)),
                ToolText::None | ToolText::Callback => None,
            }
        };
        let mut native = self.info;
        native.text = match (&self.text, pinned.as_mut()) {
            (_, Some(buffer)) if msg.fills_text() => buffer.as_mut_ptr(),
            (ToolText::Callback, _) => LPSTR_TEXTCALLBACKW,
            (_, Some(buffer)) => buffer.as_mut_ptr(),
            (_, None) => std::ptr::null_mut(),
        };
        let pinned_ptr = native.text;

        log::trace!(
            "ToolTip: {msg:?} for tool {:#x} of {:?}",
            native.id,
            native.hwnd
        );
        let result = HandleRef::new(tooltip).call(|hwnd| {
            // SAFETY: `native` is a TTTOOLINFOW whose text pointer is null, the
            // callback sentinel, or points into `pinned`, which is large enough
            // for what `msg` does with it; all outlive the call.
            unsafe {
                api.send_message(
                    hwnd,
                    msg.code(),
                    bool_to_native(state) as usize,
                    &mut native as *mut ToolInfo as isize,
                )
            }
        });
        keep_alive(&self.owner);

        if msg.fills_text() && result != 0 {
            self.text = if native.text == LPSTR_TEXTCALLBACKW {
                ToolText::Callback
            } else if native.text == pinned_ptr {
                let buffer = pinned.as_deref().unwrap_or_default();
                let len = buffer.iter().position(|&unit| unit == 0).unwrap_or(buffer.len());
                let text = String::from_utf16_lossy(&buffer[..len]);
                if text.is_empty() {
                    ToolText::None
                } else {
                    ToolText::Literal(text)
                }
            } else {
                ToolText::None
            };
        }
        drop(pinned);

        native.text = std::ptr::null_mut();
        self.info = native;
        result
    }
}

impl<P> std::fmt::Debug for ToolInfoWrapper<P>
where
    P: Deref,
    P::Target: HandleOwner,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolInfoWrapper")
            .field("info", &self.info)
            .field("text", &self.text)
            .finish_non_exhaustive()
    }
}

/// Sets the title and icon of a balloon/tool-tip (TTM_SETTITLEW). Titles
/// longer than `MAX_TITLE_LEN` UTF-16 units are truncated.
pub fn set_tooltip_title<A, T>(api: &A, tooltip: &T, icon: ToolTipIcon, title: &str) -> bool
where
    A: NativeApi + ?Sized,
    T: HandleOwner + ?Sized,
{
    let mut wide: Vec<u16> = title.encode_utf16().collect();
    if wide.len() > MAX_TITLE_LEN {
        log::debug!(
            "ToolTip: title truncated from {} to {MAX_TITLE_LEN} units",
            wide.len()
        );
        wide.truncate(MAX_TITLE_LEN);
    }
    wide.push(0);

    let result = HandleRef::new(tooltip).call(|hwnd| {
        // SAFETY: `wide` is NUL-terminated and outlives the call.
        unsafe {
            api.send_message(
                hwnd,
                TTM_SETTITLEW,
                icon.to_raw() as usize,
                wide.as_ptr() as isize,
            )
        }
    });
    native_to_bool(result as i32)
}
