use std::fmt::{self, Debug};
use std::ptr;

use log::warn;

use crate::error::{Error, Result};
use crate::sys::RawScope;
use crate::Env;

/// A scoped execution context on the host's main thread.
///
/// Host values created while a [`HandleScope`] is open are reclaimed when it closes. Closing
/// happens on drop, so scopes nest the same way Rust borrows do.
pub struct HandleScope {
    env: Env,
    raw: RawScope,
}

impl HandleScope {
    pub fn open(env: Env) -> Result<Self> {
        let mut raw: RawScope = ptr::null_mut();
        // Safety: `env` is valid per the contract of `Env::from_raw`.
        let status = unsafe { (env.api().open_handle_scope)(env.raw(), &mut raw) };
        if !status.is_ok() {
            return Err(Error::last(env));
        }
        Ok(Self { env, raw })
    }

    pub fn env(&self) -> Env {
        self.env
    }
}

impl Debug for HandleScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandleScope").field("raw", &self.raw).finish()
    }
}

impl Drop for HandleScope {
    fn drop(&mut self) {
        // Safety: `self.raw` was opened on `self.env` and is closed exactly once, here.
        let status = unsafe { (self.env.api().close_handle_scope)(self.env.raw(), self.raw) };
        if !status.is_ok() {
            warn!("failed to close handle scope {:?}: {}", self.raw, status);
        }
    }
}
