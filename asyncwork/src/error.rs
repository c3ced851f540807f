//! Error signalling for native calls.
//!
//! Every native call reports a [`Status`]. When it is anything but ok, the details are pulled
//! from the host's last-error info into an [`Error`], which is then handed to an [`ErrorPolicy`].
//! Two policies exist:
//!
//! - [`Propagate`] returns the error to the caller as `Err`, to be moved up with `?`.
//! - [`Pending`] throws the error into the host as a pending exception and returns a fallback
//!   value. The host observes the exception once control goes back to it.
//!
//! [`DefaultPolicy`] is picked at compile time by the `pending-errors` cargo feature.
use std::ffi::CString;
use std::ptr;

use log::warn;

use crate::sys::{ErrorInfo, Status};
use crate::Env;

pub type Result<T, E = Error> = std::result::Result<T, E>;

const UNKNOWN_ERROR: &str = "Unknown failure";

/// A failed native call, or a failure reported by user completion code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message} ({status})")]
pub struct Error {
    status: Status,
    message: String,
}

impl Error {
    /// An error raised by user code rather than by the host.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            status: Status::GENERIC_FAILURE,
            message: message.into(),
        }
    }

    /// Capture the last error the host recorded on `env`.
    ///
    /// Must run right after the failing call: any other native call overwrites the info.
    pub fn last(env: Env) -> Self {
        let mut info: *const ErrorInfo = ptr::null();
        // Safety: `env` is valid per the contract of `Env::from_raw`.
        let status = unsafe { (env.api().get_last_error_info)(env.raw(), &mut info) };
        if !status.is_ok() || info.is_null() {
            return Self::new(UNKNOWN_ERROR);
        }

        // Safety: the host keeps the info alive until the next call on this environment, and we
        //         copy everything out of it before returning.
        let info = unsafe { &*info };
        let message = if info.error_message.is_null() {
            UNKNOWN_ERROR.to_owned()
        } else {
            // Safety: a non-null message is a NUL-terminated string owned by the host.
            unsafe { std::ffi::CStr::from_ptr(info.error_message) }
                .to_string_lossy()
                .into_owned()
        };
        Self {
            status: info.error_code,
            message,
        }
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Raise this error as the host's pending exception on `env`.
    ///
    /// Failing to throw is logged and otherwise ignored: there is no caller left to tell.
    pub fn throw_as_pending(&self, env: Env) {
        let message = match CString::new(self.message.as_str()) {
            Ok(message) => message,
            Err(e) => {
                let end = e.nul_position();
                // Cannot fail, the slice stops at the first NUL.
                CString::new(&self.message.as_bytes()[..end]).unwrap_or_default()
            }
        };
        // Safety: `env` is valid and `message` outlives the call.
        let status = unsafe { (env.api().throw_error)(env.raw(), ptr::null(), message.as_ptr()) };
        if !status.is_ok() {
            warn!("failed to raise pending error `{}`: {}", self, status);
        }
    }
}

/// How a failed native call is reported to the caller.
pub trait ErrorPolicy: 'static {
    /// What a fallible operation returns under this policy.
    type Output<T>;

    fn ok<T>(value: T) -> Self::Output<T>;

    /// Report `error`. `fallback` builds the value returned when the policy does not surface
    /// the error through the return type.
    fn fail<T, F>(env: Env, error: Error, fallback: F) -> Self::Output<T>
    where
        F: FnOnce() -> T;
}

/// Failures come back as `Err`.
#[derive(Debug)]
pub enum Propagate {}

impl ErrorPolicy for Propagate {
    type Output<T> = Result<T>;

    fn ok<T>(value: T) -> Result<T> {
        Ok(value)
    }

    fn fail<T, F>(_env: Env, error: Error, _fallback: F) -> Result<T>
    where
        F: FnOnce() -> T,
    {
        Err(error)
    }
}

/// Failures are thrown into the host as a pending exception.
#[derive(Debug)]
pub enum Pending {}

impl ErrorPolicy for Pending {
    type Output<T> = T;

    fn ok<T>(value: T) -> T {
        value
    }

    fn fail<T, F>(env: Env, error: Error, fallback: F) -> T
    where
        F: FnOnce() -> T,
    {
        error.throw_as_pending(env);
        fallback()
    }
}

#[cfg(not(feature = "pending-errors"))]
pub type DefaultPolicy = Propagate;

#[cfg(feature = "pending-errors")]
pub type DefaultPolicy = Pending;

/// Bail out of the enclosing function through policy `$policy` when `$status` is not ok.
macro_rules! check {
    ($policy:ty, $env:expr, $status:expr, $fallback:expr) => {{
        let status: $crate::sys::Status = $status;
        if !status.is_ok() {
            let env: $crate::Env = $env;
            let error = $crate::error::Error::last(env);
            return <$policy as $crate::error::ErrorPolicy>::fail(env, error, || $fallback);
        }
    }};
}

pub(crate) use check;
