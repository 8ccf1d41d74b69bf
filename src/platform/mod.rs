// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025-2026 natyamatsya contributors
//
// Host synchronization capability: a bounded counting wait/signal object
// reached through an opaque reference, with create / timed-wait / release /
// close calls. Windows exposes this directly as a kernel semaphore; other
// platforms get a process-local emulation with the same surface.

#[cfg(unix)]
pub mod posix;

#[cfg(windows)]
pub mod windows;

// Re-export the platform-specific implementations under a uniform name.

#[cfg(unix)]
pub use posix::{is_invalid_handle_error, is_overflow_error, PlatformSema};

#[cfg(windows)]
pub use windows::{is_invalid_handle_error, is_overflow_error, PlatformSema};

/// Wait bound in the native time unit (milliseconds).
/// `Millis(0)` is an immediate poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timeout {
    Millis(u64),
    Infinite,
}

/// Outcome of a native wait that did not error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitOutcome {
    Acquired,
    TimedOut,
}

/// Result of a successful native create call.
///
/// Creation is a single atomic call that also reports whether an object of
/// the requested name already existed; callers branch on the flag instead
/// of doing a racy existence check first.
pub struct CreateOutcome {
    pub sema: PlatformSema,
    pub already_existed: bool,
}
