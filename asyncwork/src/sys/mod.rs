//! Raw types for the host runtime's native asynchronous-work ABI.
//!
//! Nothing in here is safe to use directly. The host hands out opaque pointers for its
//! environment, values, handle scopes and work items, and every entry point reports a
//! [`Status`]. The safe layer, [`crate::AsyncWork`] and [`crate::HandleScope`], owns these pointers.
use std::ffi::c_void;
use std::fmt;

use libc::{c_char, c_int, size_t};


/// Declares an opaque, unsized-by-convention type used only behind raw pointers.
macro_rules! opaque {
    ($name:ident) => {
        #[repr(C)]
        #[derive(Debug)]
        pub struct $name {
            _private: [u8; 0],
        }
    };
}

opaque!(EnvOpaque);
opaque!(ValueOpaque);
opaque!(ScopeOpaque);
opaque!(WorkOpaque);

/// The host environment an operation is executed against.
pub type RawEnv = *mut EnvOpaque;
/// A host value, only ever used here for resource labels.
pub type RawValue = *mut ValueOpaque;
/// An open handle scope.
pub type RawScope = *mut ScopeOpaque;
/// A unit of background work registered with the host.
pub type RawWork = *mut WorkOpaque;

/// Length marker asking the host to compute the length of a NUL-terminated string.
pub const AUTO_LENGTH: size_t = size_t::MAX;

/// Status code returned by every native entry point.
///
/// Only [`Status::OK`] is meaningful to the safe layer; any other value is a failure and
/// the details are fetched from the host's last-error info.
#[repr(transparent)]
#[derive(Copy, Clone, PartialEq, Eq)]
pub struct Status(pub c_int);

impl Status {
    pub const OK: Status = Status(0);
    pub const INVALID_ARG: Status = Status(1);
    pub const GENERIC_FAILURE: Status = Status(9);
    pub const PENDING_EXCEPTION: Status = Status(10);
    pub const CANCELLED: Status = Status(11);

    #[inline]
    pub fn is_ok(self) -> bool {
        self == Status::OK
    }
}

impl fmt::Debug for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Status::OK => f.write_str("ok"),
            Status::INVALID_ARG => f.write_str("invalid_arg"),
            Status::GENERIC_FAILURE => f.write_str("generic_failure"),
            Status::PENDING_EXCEPTION => f.write_str("pending_exception"),
            Status::CANCELLED => f.write_str("cancelled"),
            Status(code) => write!(f, "status({})", code),
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Extended information about the last failing call on an environment.
///
/// Owned by the host. The pointer returned from `get_last_error_info` is only valid until the
/// next native call on the same environment.
#[repr(C)]
#[derive(Debug)]
pub struct ErrorInfo {
    pub error_message: *const c_char,
    pub engine_reserved: *mut c_void,
    pub engine_error_code: u32,
    pub error_code: Status,
}

/// Invoked by the host on a worker thread. No host values may be created here.
pub type ExecuteHook = unsafe extern "C" fn(env: RawEnv, data: *mut c_void);

/// Invoked by the host on the main thread once the execute phase is over, or once the work was
/// cancelled before it started.
pub type CompleteHook = unsafe extern "C" fn(env: RawEnv, status: Status, data: *mut c_void);

/// The host's function table.
///
/// A host exports exactly one of these for the lifetime of the process, which is why
/// [`crate::Env`] only ever borrows it as `&'static`.
#[repr(C)]
pub struct NativeApi {
    pub create_string_latin1: unsafe extern "C" fn(
        env: RawEnv,
        s: *const c_char,
        length: size_t,
        result: *mut RawValue,
    ) -> Status,

    pub create_async_work: unsafe extern "C" fn(
        env: RawEnv,
        async_resource: RawValue,
        async_resource_name: RawValue,
        execute: ExecuteHook,
        complete: CompleteHook,
        data: *mut c_void,
        result: *mut RawWork,
    ) -> Status,

    pub queue_async_work: unsafe extern "C" fn(env: RawEnv, work: RawWork) -> Status,

    pub cancel_async_work: unsafe extern "C" fn(env: RawEnv, work: RawWork) -> Status,

    pub delete_async_work: unsafe extern "C" fn(env: RawEnv, work: RawWork) -> Status,

    pub open_handle_scope: unsafe extern "C" fn(env: RawEnv, result: *mut RawScope) -> Status,

    pub close_handle_scope: unsafe extern "C" fn(env: RawEnv, scope: RawScope) -> Status,

    pub get_last_error_info:
        unsafe extern "C" fn(env: RawEnv, result: *mut *const ErrorInfo) -> Status,

    pub is_exception_pending: unsafe extern "C" fn(env: RawEnv, result: *mut bool) -> Status,

    pub throw_error:
        unsafe extern "C" fn(env: RawEnv, code: *const c_char, msg: *const c_char) -> Status,
}

impl fmt::Debug for NativeApi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeApi").finish()
    }
}
