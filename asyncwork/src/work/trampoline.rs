//! Entry points the host calls back into.
//!
//! The host only knows about the `extern "C"` hooks below and the data pointer registered with
//! them, which points at a [`Callbacks`] record. The record is boxed by [`AsyncWork`] so its
//! address survives moves of the wrapper, and it is freed only after the work has been deleted.
//!
//! Unwinding out of an `extern "C"` function aborts the process, so both hooks catch panics.
//!
//! [`AsyncWork`]: super::AsyncWork
use std::any::Any;
use std::ffi::c_void;
use std::fmt::{self, Debug};
use std::panic::{self, AssertUnwindSafe};

use log::{debug, error, warn};

use super::{CompleteCallback, ExecuteCallback};
use crate::error::Error;
use crate::scope::HandleScope;
use crate::sys::{RawEnv, Status};
use crate::Env;

/// What the hooks need to reach user code.
pub(super) struct Callbacks {
    pub(super) env: Env,
    pub(super) execute: ExecuteCallback,
    pub(super) complete: CompleteCallback,
    pub(super) data: *mut c_void,
}

impl Debug for Callbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callbacks")
            .field("data", &self.data)
            .finish()
    }
}

impl Callbacks {
    pub(super) fn as_hook_data(&self) -> *mut c_void {
        self as *const Callbacks as *mut c_void
    }
}

/// Runs the execute phase on a host worker thread.
///
/// ### Safety
/// `data` must be the pointer produced by `Callbacks::as_hook_data` for a record that is still
/// alive.
pub(super) unsafe extern "C" fn on_execute(_env: RawEnv, data: *mut c_void) {
    let callbacks = &*(data as *const Callbacks);
    let (execute, user_data) = (callbacks.execute, callbacks.data);

    // Nothing can be raised into the host from here, the worker thread has no access to it.
    if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(|| execute(user_data))) {
        error!(
            "execute callback panicked: {}",
            panic_message(payload.as_ref())
        );
    }
}

/// Runs the complete phase on the host's main thread.
///
/// ### Safety
/// Same contract as [`on_execute`]. Additionally, the host must call this on the thread that
/// owns the environment.
pub(super) unsafe extern "C" fn on_complete(_env: RawEnv, status: Status, data: *mut c_void) {
    let callbacks = &*(data as *const Callbacks);
    let env = callbacks.env;
    debug!("async work completed with status {}", status);

    let _scope = match HandleScope::open(env) {
        Ok(scope) => scope,
        Err(e) => {
            warn!("cannot open a handle scope for completion: {}", e);
            e.throw_as_pending(env);
            return;
        }
    };

    let (complete, user_data) = (callbacks.complete, callbacks.data);
    match panic::catch_unwind(AssertUnwindSafe(|| complete(env, user_data))) {
        Ok(Ok(())) => {}
        Ok(Err(e)) => e.throw_as_pending(env),
        Err(payload) => {
            let message = panic_message(payload.as_ref());
            error!("complete callback panicked: {}", message);
            Error::new(format!("complete callback panicked: {}", message)).throw_as_pending(env);
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "unknown"
    }
}
