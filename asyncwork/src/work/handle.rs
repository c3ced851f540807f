//! The owning handle for a native work item.
use std::ffi::{c_void, CString};
use std::fmt::{self, Debug};
use std::marker::PhantomData;
use std::ptr;

use log::{trace, warn};

use super::trampoline::{on_complete, on_execute, Callbacks};
use super::{CompleteCallback, ExecuteCallback, DEFAULT_RESOURCE_NAME};
use crate::error::{check, DefaultPolicy, Error, ErrorPolicy};
use crate::sys::{RawValue, RawWork, AUTO_LENGTH};
use crate::Env;

/// Exclusive owner of one unit of host background work.
///
/// The native handle is created by the constructor and deleted when the [`AsyncWork`] is dropped,
/// whether or not it was ever queued, and even if the host is still executing it. An
/// [`AsyncWork`] can be moved but not cloned, so exactly one delete happens per handle.
///
/// `P` picks how failures are reported, see [`ErrorPolicy`]. Under [`Pending`](crate::Pending)
/// a failed construction still returns a value; it holds no handle and every call on it is
/// rejected by the host.
pub struct AsyncWork<P: ErrorPolicy = DefaultPolicy> {
    work: RawWork,
    // Registered with the host as hook data, must outlive `work`.
    callbacks: Box<Callbacks>,
    _policy: PhantomData<P>,
}

impl<P: ErrorPolicy> AsyncWork<P> {
    /// Register a new unit of work labelled [`DEFAULT_RESOURCE_NAME`].
    ///
    /// `data` is handed to both callbacks as is. The caller keeps it alive until the complete
    /// callback has run, or until the work is dropped without ever running.
    pub fn new(
        env: Env,
        execute: ExecuteCallback,
        complete: CompleteCallback,
        data: *mut c_void,
    ) -> P::Output<Self> {
        Self::with_resource_name(env, DEFAULT_RESOURCE_NAME, execute, complete, data)
    }

    /// Like [`AsyncWork::new`], reporting `name` to the host's diagnostics instead of the
    /// default label.
    pub fn with_resource_name(
        env: Env,
        name: &str,
        execute: ExecuteCallback,
        complete: CompleteCallback,
        data: *mut c_void,
    ) -> P::Output<Self> {
        let callbacks = Box::new(Callbacks {
            env,
            execute,
            complete,
            data,
        });

        let name = match CString::new(name) {
            Ok(name) => name,
            Err(_) => {
                let error = Error::new(format!("resource name {:?} contains a NUL byte", name));
                return P::fail(env, error, || Self::empty(callbacks));
            }
        };

        let api = env.api();
        let mut resource_name: RawValue = ptr::null_mut();
        check!(
            P,
            env,
            // Safety: `env` is valid and `name` is NUL-terminated.
            unsafe {
                (api.create_string_latin1)(
                    env.raw(),
                    name.as_ptr(),
                    AUTO_LENGTH,
                    &mut resource_name,
                )
            },
            Self::empty(callbacks)
        );

        let mut work: RawWork = ptr::null_mut();
        check!(
            P,
            env,
            // Safety: the hook data points into `callbacks`, which is heap allocated and dropped
            //         only after `work` is deleted.
            unsafe {
                (api.create_async_work)(
                    env.raw(),
                    ptr::null_mut(),
                    resource_name,
                    on_execute,
                    on_complete,
                    callbacks.as_hook_data(),
                    &mut work,
                )
            },
            Self::empty(callbacks)
        );

        trace!("created async work {:?} ({:?})", work, name);
        P::ok(Self {
            work,
            callbacks,
            _policy: PhantomData,
        })
    }

    fn empty(callbacks: Box<Callbacks>) -> Self {
        Self {
            work: ptr::null_mut(),
            callbacks,
            _policy: PhantomData,
        }
    }

    /// Submit the work to the host's worker pool.
    ///
    /// The host rejects work that is already queued, and queueing during shutdown.
    pub fn queue(&self) -> P::Output<()> {
        let env = self.env();
        check!(
            P,
            env,
            // Safety: `env` is valid; a null `work` is rejected by the host.
            unsafe { (env.api().queue_async_work)(env.raw(), self.work) },
            ()
        );
        trace!("queued async work {:?}", self.work);
        P::ok(())
    }

    /// Ask the host to drop queued work before it starts.
    ///
    /// Work that never got queued, is already running, or has completed cannot be cancelled.
    /// Successfully cancelled work still gets its complete callback.
    pub fn cancel(&self) -> P::Output<()> {
        let env = self.env();
        check!(
            P,
            env,
            // Safety: as in `queue`.
            unsafe { (env.api().cancel_async_work)(env.raw(), self.work) },
            ()
        );
        trace!("cancelled async work {:?}", self.work);
        P::ok(())
    }

    /// The execution context this work is scheduled against.
    pub fn env(&self) -> Env {
        self.callbacks.env
    }

    /// The native handle, for use with other native calls. Null if construction failed.
    ///
    /// The handle stays owned by `self`; it must not be deleted through the raw pointer.
    pub fn as_raw(&self) -> RawWork {
        self.work
    }

    /// True if this value holds no native handle.
    pub fn is_empty(&self) -> bool {
        self.work.is_null()
    }
}

impl<P: ErrorPolicy> From<&AsyncWork<P>> for RawWork {
    fn from(work: &AsyncWork<P>) -> RawWork {
        work.as_raw()
    }
}

impl<P: ErrorPolicy> Debug for AsyncWork<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AsyncWork")
            .field("env", &self.callbacks.env)
            .field("work", &self.work)
            .field("data", &self.callbacks.data)
            .finish()
    }
}

impl<P: ErrorPolicy> Drop for AsyncWork<P> {
    fn drop(&mut self) {
        if self.work.is_null() {
            return;
        }
        let env = self.env();
        // Safety: `self.work` was created on `env` and is deleted exactly once, here.
        let status = unsafe { (env.api().delete_async_work)(env.raw(), self.work) };
        if status.is_ok() {
            trace!("deleted async work {:?}", self.work);
        } else {
            warn!("failed to delete async work {:?}: {}", self.work, status);
        }
    }
}
