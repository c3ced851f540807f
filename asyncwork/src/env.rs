use std::fmt::{self, Debug};

use crate::sys::{NativeApi, RawEnv};

/// The execution context a unit of work is scheduled against.
///
/// An [`Env`] is a plain pair of the host's raw environment pointer and the host's function
/// table. It is `Copy` and carries no ownership: the host keeps the environment alive for as
/// long as any callback into this crate can run.
#[derive(Copy, Clone)]
pub struct Env {
    raw: RawEnv,
    api: &'static NativeApi,
}

impl Env {
    /// Wrap a raw environment handed to native code by the host.
    ///
    /// # Safety
    ///
    /// `raw` must be an environment issued by the host that exports `api`, and it must stay valid
    /// for as long as the returned [`Env`] or anything built from it is used.
    pub unsafe fn from_raw(raw: RawEnv, api: &'static NativeApi) -> Self {
        Self { raw, api }
    }

    pub fn raw(&self) -> RawEnv {
        self.raw
    }

    pub fn api(&self) -> &'static NativeApi {
        self.api
    }

    /// Returns true if the host has an exception waiting to be observed by the caller.
    ///
    /// A failing query is reported as "nothing pending".
    pub fn is_exception_pending(&self) -> bool {
        let mut pending = false;
        // Safety: `self.raw` is valid per the contract of `Env::from_raw`.
        let status = unsafe { (self.api.is_exception_pending)(self.raw, &mut pending) };
        status.is_ok() && pending
    }
}

impl Debug for Env {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Env").field("raw", &self.raw).finish()
    }
}

impl PartialEq for Env {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw && std::ptr::eq(self.api, other.api)
    }
}

impl Eq for Env {}
