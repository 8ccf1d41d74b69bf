// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025-2026 natyamatsya contributors
//
// The semaphore adapter: the POSIX counting-semaphore operation set
// translated onto the native bounded counting object.

use std::io;
use std::time::{Duration, SystemTime};

use crate::error::{Error, Result};
use crate::name;
use crate::platform::{self, PlatformSema, Timeout, WaitOutcome};

/// Largest representable semaphore count. The native counter is a signed
/// 32-bit LONG, so this matches `SEM_VALUE_MAX` of the emulated API.
pub const SEM_VALUE_MAX: u32 = i32::MAX as u32;

/// Visibility of an unnamed semaphore, mirroring the POSIX `pshared`
/// argument of `sem_init`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// Shared only between threads of the creating process.
    ProcessPrivate,
    /// Placed in the process-shareable namespace under a derived name.
    ProcessShared,
}

/// Open disposition for a named semaphore, mirroring the `O_CREAT` /
/// `O_EXCL` bits of `sem_open`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OpenFlags {
    pub create: bool,
    pub exclusive: bool,
}

impl OpenFlags {
    /// Fail with `NotFound` unless the named semaphore already exists.
    pub const OPEN_EXISTING: OpenFlags = OpenFlags {
        create: false,
        exclusive: false,
    };
    /// Create the semaphore if absent, otherwise open the existing one.
    pub const CREATE: OpenFlags = OpenFlags {
        create: true,
        exclusive: false,
    };
    /// Create the semaphore; fail with `AlreadyExists` if the name is taken.
    pub const CREATE_EXCLUSIVE: OpenFlags = OpenFlags {
        create: true,
        exclusive: true,
    };
}

/// A POSIX-style counting semaphore over one native reference.
///
/// The wrapper is live exactly while it holds the native reference;
/// [`destroy`](Semaphore::destroy) clears it, and every operation on a
/// cleared wrapper fails with [`Error::InvalidArgument`] — the safe
/// rendition of POSIX's `sem_t *` being nulled out.
pub struct Semaphore {
    native: Option<PlatformSema>,
}

impl Semaphore {
    /// Create an unnamed semaphore with the given initial count
    /// (`sem_init`).
    ///
    /// With [`Scope::ProcessShared`] the native object is created in the
    /// shareable namespace under a process-unique derived name; with
    /// [`Scope::ProcessPrivate`] it is anonymous.
    pub fn new(initial: u32, scope: Scope) -> Result<Semaphore> {
        if initial > SEM_VALUE_MAX {
            return Err(Error::InvalidArgument);
        }
        let derived;
        let internal_name = match scope {
            Scope::ProcessPrivate => None,
            Scope::ProcessShared => {
                derived = name::anonymous_shared_name();
                Some(derived.as_str())
            }
        };
        let outcome = PlatformSema::create(internal_name, initial, SEM_VALUE_MAX)
            .map_err(classify_unnamed_create_error)?;
        Ok(Semaphore {
            native: Some(outcome.sema),
        })
    }

    /// Create or open a named semaphore (`sem_open`).
    ///
    /// Named semaphores always live in the process-shareable namespace.
    /// Creation and pre-existence detection happen in one atomic native
    /// call; `flags` then decide what the pre-existence signal means. When
    /// the object already existed, `initial` is ignored — the first
    /// creator wins.
    pub fn open(sem_name: &str, flags: OpenFlags, initial: u32) -> Result<Semaphore> {
        if initial > SEM_VALUE_MAX {
            return Err(Error::InvalidArgument);
        }
        let full_name = name::shared_name(sem_name).ok_or(Error::InvalidArgument)?;
        let outcome = PlatformSema::create(Some(&full_name), initial, SEM_VALUE_MAX)
            .map_err(classify_named_create_error)?;
        let mut sema = outcome.sema;

        if outcome.already_existed {
            if flags.create && flags.exclusive {
                let _ = sema.close();
                return Err(Error::AlreadyExists);
            }
        } else if !flags.create {
            // Strict open-existing: the probing create just made the
            // object, so release it before reporting absence.
            let _ = sema.close();
            return Err(Error::NotFound);
        }

        Ok(Semaphore { native: Some(sema) })
    }

    /// Block until the count is positive, then decrement it (`sem_wait`).
    pub fn wait(&self) -> Result<()> {
        match self.native()?.wait(Timeout::Infinite) {
            Ok(WaitOutcome::Acquired) => Ok(()),
            // An infinite wait has no timeout outcome; anything else is
            // an unexpected native result.
            _ => Err(Error::InvalidArgument),
        }
    }

    /// Decrement the count without blocking (`sem_trywait`).
    ///
    /// Fails with [`Error::WouldBlock`] when the count is zero.
    pub fn try_wait(&self) -> Result<()> {
        match self.native()?.wait(Timeout::Millis(0)) {
            Ok(WaitOutcome::Acquired) => Ok(()),
            Ok(WaitOutcome::TimedOut) => Err(Error::WouldBlock),
            Err(_) => Err(Error::InvalidArgument),
        }
    }

    /// Block until the count is positive or `deadline` passes
    /// (`sem_timedwait`).
    ///
    /// The deadline is an absolute point on the epoch clock; it is
    /// converted to the native relative millisecond bound, floored at zero
    /// when already in the past.
    pub fn timed_wait(&self, deadline: SystemTime) -> Result<()> {
        let native = self.native()?;
        let remaining = deadline
            .duration_since(SystemTime::now())
            .unwrap_or(Duration::ZERO);
        let ms = u64::try_from(remaining.as_millis()).unwrap_or(u64::MAX);
        match native.wait(Timeout::Millis(ms)) {
            Ok(WaitOutcome::Acquired) => Ok(()),
            Ok(WaitOutcome::TimedOut) => Err(Error::TimedOut),
            Err(_) => Err(Error::InvalidArgument),
        }
    }

    /// Increment the count by one, waking one blocked waiter if any
    /// (`sem_post`).
    ///
    /// Fails with [`Error::Overflow`] — leaving the count unchanged —
    /// when the increment would exceed [`SEM_VALUE_MAX`].
    pub fn post(&self) -> Result<()> {
        match self.native()?.release(1) {
            Ok(_) => Ok(()),
            Err(ref e) if platform::is_overflow_error(e) => Err(Error::Overflow),
            Err(_) => Err(Error::InvalidArgument),
        }
    }

    /// Report the current count (`sem_getvalue`).
    ///
    /// The native object has no side-effect-free count query, so the value
    /// is probed: a zero-timeout wait followed by an immediate release (the
    /// release reports the prior count). The probe nets to zero observable
    /// change and the reported value is the count at some instant during
    /// the call — it is *not* an atomic snapshot. A concurrent `post`
    /// landing between the probe's decrement and re-increment is absorbed;
    /// a concurrent `wait` can race with the probe's briefly-lowered count.
    pub fn value(&self) -> Result<u32> {
        let native = self.native()?;
        match native.wait(Timeout::Millis(0)) {
            Ok(WaitOutcome::Acquired) => match native.release(1) {
                Ok(prior) => Ok(prior + 1),
                Err(_) => Err(Error::InvalidArgument),
            },
            Ok(WaitOutcome::TimedOut) => Ok(0),
            Err(_) => Err(Error::InvalidArgument),
        }
    }

    /// Destroy the semaphore (`sem_destroy`): release the native reference
    /// and clear the wrapper. A second call on the cleared wrapper fails
    /// with [`Error::InvalidArgument`].
    pub fn destroy(&mut self) -> Result<()> {
        let native = self.native.as_mut().ok_or(Error::InvalidArgument)?;
        native.close().map_err(|_| Error::InvalidArgument)?;
        self.native = None;
        Ok(())
    }

    /// Close the semaphore (`sem_close`). Identical contract to
    /// [`destroy`](Semaphore::destroy); named and unnamed handles are
    /// closed the same way.
    pub fn close(&mut self) -> Result<()> {
        self.destroy()
    }

    /// Remove a named semaphore from the namespace (`sem_unlink`).
    ///
    /// Always succeeds: the host reference-counts named objects and
    /// reclaims them when the last open reference closes, so there is
    /// nothing separate to remove.
    pub fn unlink(sem_name: &str) -> Result<()> {
        let _ = sem_name;
        Ok(())
    }

    /// Whether this wrapper still holds a live native reference.
    pub fn is_valid(&self) -> bool {
        self.native.is_some()
    }

    fn native(&self) -> Result<&PlatformSema> {
        self.native.as_ref().ok_or(Error::InvalidArgument)
    }
}

fn classify_unnamed_create_error(e: io::Error) -> Error {
    if e.kind() == io::ErrorKind::OutOfMemory {
        Error::OutOfMemory
    } else {
        Error::NoSpace
    }
}

fn classify_named_create_error(e: io::Error) -> Error {
    if e.kind() == io::ErrorKind::PermissionDenied {
        Error::PermissionDenied
    } else if platform::is_invalid_handle_error(&e) {
        Error::NotFound
    } else {
        Error::NoSpace
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_flag_presets() {
        assert!(!OpenFlags::OPEN_EXISTING.create);
        assert!(OpenFlags::CREATE.create && !OpenFlags::CREATE.exclusive);
        assert!(OpenFlags::CREATE_EXCLUSIVE.create && OpenFlags::CREATE_EXCLUSIVE.exclusive);
        assert_eq!(OpenFlags::default(), OpenFlags::OPEN_EXISTING);
    }

    #[test]
    fn named_create_error_classification() {
        let denied = io::Error::new(io::ErrorKind::PermissionDenied, "denied");
        assert_eq!(classify_named_create_error(denied), Error::PermissionDenied);
        let other = io::Error::new(io::ErrorKind::Other, "exhausted");
        assert_eq!(classify_named_create_error(other), Error::NoSpace);
    }

    #[test]
    fn unnamed_create_error_classification() {
        let oom = io::Error::new(io::ErrorKind::OutOfMemory, "oom");
        assert_eq!(classify_unnamed_create_error(oom), Error::OutOfMemory);
        let other = io::Error::new(io::ErrorKind::Other, "exhausted");
        assert_eq!(classify_unnamed_create_error(other), Error::NoSpace);
    }
}
