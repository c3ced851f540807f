//! Ownership of a single unit of host background work.
//!
//! The host runs work in two phases. The execute phase runs on one of the host's worker threads
//! and must not touch host values. The complete phase runs later on the host's main thread, where
//! host values can be created again. [`AsyncWork`] registers a pair of plain function pointers
//! for those phases, together with an opaque data pointer that is passed through untouched.
//!
//! ```ignore
//! fn hash_in_background(env: Env, job: *mut Job) -> Result<AsyncWork<Propagate>> {
//!     let work = AsyncWork::<Propagate>::new(env, Job::run, Job::finish, job.cast())?;
//!     work.queue()?;
//!     Ok(work)
//! }
//! ```
//!
//! Scheduling belongs to the host. The wrapper keeps no state machine of its own: queueing twice,
//! cancelling running work and the like are rejected by the host and reported through the
//! [`ErrorPolicy`](crate::ErrorPolicy) in use.
use std::ffi::c_void;

use crate::error::Result;
use crate::Env;

mod handle;
pub use handle::AsyncWork;

mod trampoline;

/// Label reported to the host for work created without an explicit resource name.
pub const DEFAULT_RESOURCE_NAME: &str = "generic";

/// Background phase. Runs on a host worker thread.
pub type ExecuteCallback = fn(data: *mut c_void);

/// Main-thread phase. Runs inside a [`HandleScope`](crate::HandleScope); an `Err` is raised as the
/// host's pending exception.
pub type CompleteCallback = fn(env: Env, data: *mut c_void) -> Result<()>;
