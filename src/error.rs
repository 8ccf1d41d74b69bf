// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025-2026 natyamatsya contributors
//
// Error classification for the semaphore adapter.
//
// POSIX reports semaphore failures through the process-wide errno slot.
// Here every operation returns `Result<_, Error>` instead: the same nine
// classifications, carried per call rather than through shared mutable
// state.

use std::fmt;
use std::io;

/// Failure classification for a semaphore operation.
///
/// Each variant corresponds to one errno value of the POSIX semaphore
/// API; `raw_errno_name` gives the traditional spelling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Error {
    /// Null/cleared handle, out-of-range initial value, malformed name,
    /// or an unexpected native outcome. (`EINVAL`)
    InvalidArgument,
    /// The host could not allocate the wrapper record. (`ENOMEM`)
    OutOfMemory,
    /// Native object creation failed — resource exhaustion or an
    /// unclassified creation error. (`ENOSPC`)
    NoSpace,
    /// Non-blocking acquire found the counter at zero. (`EAGAIN`)
    WouldBlock,
    /// Bounded wait expired before acquisition. (`ETIMEDOUT`)
    TimedOut,
    /// Release would exceed the maximum representable count. (`EOVERFLOW`)
    Overflow,
    /// Exclusive create requested but the named object already existed.
    /// (`EEXIST`)
    AlreadyExists,
    /// Open-existing requested but no named object existed, or the named
    /// object's handle was reported invalid during lookup. (`ENOENT`)
    NotFound,
    /// Access denied opening or creating a named object. (`EACCES`)
    PermissionDenied,
}

/// Operation result for the semaphore adapter.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// The errno spelling a POSIX implementation would place in the
    /// process-wide error slot for this failure.
    pub fn raw_errno_name(self) -> &'static str {
        match self {
            Error::InvalidArgument => "EINVAL",
            Error::OutOfMemory => "ENOMEM",
            Error::NoSpace => "ENOSPC",
            Error::WouldBlock => "EAGAIN",
            Error::TimedOut => "ETIMEDOUT",
            Error::Overflow => "EOVERFLOW",
            Error::AlreadyExists => "EEXIST",
            Error::NotFound => "ENOENT",
            Error::PermissionDenied => "EACCES",
        }
    }

    fn message(self) -> &'static str {
        match self {
            Error::InvalidArgument => "invalid argument",
            Error::OutOfMemory => "out of memory",
            Error::NoSpace => "no space for native semaphore object",
            Error::WouldBlock => "semaphore count is zero",
            Error::TimedOut => "wait timed out",
            Error::Overflow => "semaphore count would overflow",
            Error::AlreadyExists => "named semaphore already exists",
            Error::NotFound => "named semaphore not found",
            Error::PermissionDenied => "permission denied",
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.message(), self.raw_errno_name())
    }
}

impl std::error::Error for Error {}

impl From<Error> for io::Error {
    fn from(e: Error) -> io::Error {
        let kind = match e {
            Error::InvalidArgument => io::ErrorKind::InvalidInput,
            Error::OutOfMemory => io::ErrorKind::OutOfMemory,
            Error::NoSpace => io::ErrorKind::Other,
            Error::WouldBlock => io::ErrorKind::WouldBlock,
            Error::TimedOut => io::ErrorKind::TimedOut,
            Error::Overflow => io::ErrorKind::Other,
            Error::AlreadyExists => io::ErrorKind::AlreadyExists,
            Error::NotFound => io::ErrorKind::NotFound,
            Error::PermissionDenied => io::ErrorKind::PermissionDenied,
        };
        io::Error::new(kind, e)
    }
}
