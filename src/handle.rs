/*
 * Native handles and the lifetime guard that keeps their owners alive across native calls.
 *
 * A `Handle` is just the pointer-sized number the OS hands out for a window,
 * menu or image list. It owns nothing. The object that owns the resource (and
 * destroys it on drop) implements `HandleOwner`. Any code that pulls the raw
 * number out of an owner and passes it to native code must keep the owner
 * reachable until that call returns, otherwise a drop racing with the call
 * destroys the resource the OS is still using.
 *
 * `HandleRef` packages that discipline: it captures the handle together with
 * the owner (a borrow, `Rc`, `Arc` or `Box`), and `HandleRef::call` releases the
 * owner only after the closure issuing the native call has returned. Every
 * wrapper in `dispatch` and `tooltip` routes its native call through it.
 */

use std::ops::Deref;

/// Opaque pointer-sized identifier of a native resource.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Handle(isize);

impl Handle {
    pub const NULL: Handle = Handle(0);

    #[inline]
    pub const fn from_raw(raw: isize) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn raw(self) -> isize {
        self.0
    }

    #[inline]
    pub const fn is_null(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub fn from_ptr<T>(ptr: *mut T) -> Self {
        Self(ptr as isize)
    }

    #[inline]
    pub fn as_ptr<T>(self) -> *mut T {
        self.0 as *mut T
    }
}

impl From<Handle> for isize {
    fn from(handle: Handle) -> Self {
        handle.0
    }
}

/// The single accessor the interop layer needs from a toolkit object.
pub trait HandleOwner {
    fn handle(&self) -> Handle;
}

/// A bare handle owns nothing; use this only for resources the OS keeps
/// alive on its own (desktop window, system menus).
impl HandleOwner for Handle {
    fn handle(&self) -> Handle {
        *self
    }
}

/// Marks the point up to which `value` must stay alive. The optimizer cannot
/// move the last use of `value` above this call.
#[inline(never)]
pub fn keep_alive<T: ?Sized>(value: &T) {
    let _ = std::hint::black_box(value);
}

/// A captured handle plus whatever keeps its owner alive.
pub struct HandleRef<P>
where
    P: Deref,
    P::Target: HandleOwner,
{
    owner: P,
    handle: Handle,
}

impl<P> HandleRef<P>
where
    P: Deref,
    P::Target: HandleOwner,
{
    /// Extracts the handle now. The owner stays reachable through `self`
    /// even if the caller drops every other reference to it.
    pub fn new(owner: P) -> Self {
        let handle = owner.handle();
        Self { owner, handle }
    }

    #[inline]
    pub fn handle(&self) -> Handle {
        self.handle
    }

    pub fn owner(&self) -> &P::Target {
        &self.owner
    }

    /// Runs `native_call` with the captured handle, then releases the owner.
    pub fn call<R>(self, native_call: impl FnOnce(Handle) -> R) -> R {
        let Self { owner, handle } = self;
        let result = native_call(handle);
        keep_alive(&owner);
        drop(owner);
        result
    }
}

impl<P> HandleOwner for HandleRef<P>
where
    P: Deref,
    P::Target: HandleOwner,
{
    fn handle(&self) -> Handle {
        self.handle
    }
}

impl<P> std::fmt::Debug for HandleRef<P>
where
    P: Deref,
    P::Target: HandleOwner,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandleRef")
            .field("handle", &self.handle)
            .finish_non_exhaustive()
    }
}
