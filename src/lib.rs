// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025-2026 natyamatsya contributors
//
// POSIX counting-semaphore emulation over native handle-based kernel
// semaphore objects — same semantic mapping as the classic pthreads
// compatibility layers: value clamping, atomic create-or-open of named
// objects, absolute-to-relative timeout conversion, and count probing via
// a zero-timeout wait + release pair.

//! POSIX-style counting semaphores for hosts whose native primitive is a
//! handle-based kernel semaphore.
//!
//! The nine POSIX operations (`sem_init`, `sem_wait`, `sem_trywait`,
//! `sem_timedwait`, `sem_post`, `sem_getvalue`, `sem_destroy`, `sem_open`
//! + `sem_close`, `sem_unlink`) map onto [`Semaphore`]. Failures are
//! reported per call as [`Error`] classifications instead of through a
//! process-wide errno slot; the information content is the same.
//!
//! [`Semaphore::value`] is a probe (decrement, then immediately
//! re-increment), not an atomic snapshot — see its documentation for the
//! consistency guarantee.

pub mod name;

mod platform;

mod error;
pub use error::{Error, Result};

mod sem;
pub use sem::{OpenFlags, Scope, Semaphore, SEM_VALUE_MAX};
