//! Move-only ownership of a host runtime's native asynchronous work.
//!
//! Host runtimes that embed native code commonly expose a C ABI for background work: register a
//! unit of work with an execute callback and a complete callback, queue it, and the host runs the
//! execute phase on a worker thread and delivers the complete phase back on its main thread.
//! This crate wraps that ABI:
//!
//! - [`AsyncWork`] owns exactly one native work handle and deletes it when dropped.
//! - [`Env`] is the execution context work is scheduled against, reached through the host's
//!   [`sys::NativeApi`] function table.
//! - [`HandleScope`] is the scoped context the complete phase runs in.
//! - [`Error`] and the [`ErrorPolicy`] implementations decide whether failures come back as
//!   `Err` ([`Propagate`]) or are raised as the host's pending exception ([`Pending`]).
//!
//! The thread pool and the event loop belong to the host. Nothing in here schedules anything.
//!
//! # Features
//!
//! - `pending-errors`: make [`Pending`] the [`DefaultPolicy`]. Without it failures propagate as
//!   `Err`.
#![warn(missing_debug_implementations, rust_2018_idioms)]

pub mod sys;

mod env;
pub use env::Env;

mod error;
pub use error::{DefaultPolicy, Error, ErrorPolicy, Pending, Propagate, Result};

mod scope;
pub use scope::HandleScope;

mod work;
pub use work::{AsyncWork, CompleteCallback, ExecuteCallback, DEFAULT_RESOURCE_NAME};
