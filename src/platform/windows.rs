// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025-2026 natyamatsya contributors
//
// Windows implementation of the host semaphore capability: the kernel
// counting semaphore object, reached through CreateSemaphoreW /
// WaitForSingleObject / ReleaseSemaphore / CloseHandle.

use std::io;
use std::ptr;

use windows_sys::Win32::Foundation::{
    CloseHandle, GetLastError, ERROR_ALREADY_EXISTS, ERROR_INVALID_HANDLE, ERROR_TOO_MANY_POSTS,
    HANDLE, WAIT_OBJECT_0, WAIT_TIMEOUT,
};
use windows_sys::Win32::System::Threading::{
    CreateSemaphoreW, ReleaseSemaphore, WaitForSingleObject, INFINITE,
};

use super::{CreateOutcome, Timeout, WaitOutcome};

/// Encode a name as a null-terminated wide string for Win32 APIs.
fn to_wide(s: &str) -> Vec<u16> {
    s.encode_utf16().chain(std::iter::once(0)).collect()
}

pub struct PlatformSema {
    handle: HANDLE,
}

// Safety: a kernel semaphore handle may be waited on and released from any
// thread; the kernel object does its own synchronization.
unsafe impl Send for PlatformSema {}
unsafe impl Sync for PlatformSema {}

impl PlatformSema {
    /// Create a kernel semaphore, or bind to the pre-existing one when
    /// `name` is taken. `CreateSemaphoreW` on an existing name succeeds and
    /// flags `ERROR_ALREADY_EXISTS`, which is what makes create-or-open a
    /// single atomic call.
    pub fn create(name: Option<&str>, initial: u32, max: u32) -> io::Result<CreateOutcome> {
        if max == 0 || max > i32::MAX as u32 || initial > max {
            return Err(io::Error::new(io::ErrorKind::InvalidInput, "count out of range"));
        }

        let wide = name.map(to_wide);
        let name_ptr = wide.as_ref().map_or(ptr::null(), |w| w.as_ptr());

        let handle =
            unsafe { CreateSemaphoreW(ptr::null(), initial as i32, max as i32, name_ptr) };
        if handle.is_null() {
            return Err(io::Error::last_os_error());
        }
        let already_existed = unsafe { GetLastError() } == ERROR_ALREADY_EXISTS;

        Ok(CreateOutcome {
            sema: Self { handle },
            already_existed,
        })
    }

    pub fn wait(&self, timeout: Timeout) -> io::Result<WaitOutcome> {
        let ms = match timeout {
            Timeout::Infinite => INFINITE,
            // INFINITE itself is the sentinel, so finite bounds clamp just below it.
            Timeout::Millis(ms) => ms.min(u64::from(INFINITE - 1)) as u32,
        };
        match unsafe { WaitForSingleObject(self.handle, ms) } {
            WAIT_OBJECT_0 => Ok(WaitOutcome::Acquired),
            WAIT_TIMEOUT => Ok(WaitOutcome::TimedOut),
            _ => Err(io::Error::last_os_error()),
        }
    }

    /// Release `n` units, returning the count prior to the release.
    pub fn release(&self, n: u32) -> io::Result<u32> {
        let mut prior: i32 = 0;
        if unsafe { ReleaseSemaphore(self.handle, n as i32, &mut prior) } == 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(prior as u32)
    }

    /// Drop this native reference. The kernel object survives as long as
    /// other handles to it remain open.
    pub fn close(&mut self) -> io::Result<()> {
        if self.handle.is_null() {
            return Err(io::Error::from_raw_os_error(ERROR_INVALID_HANDLE as i32));
        }
        if unsafe { CloseHandle(self.handle) } == 0 {
            return Err(io::Error::last_os_error());
        }
        self.handle = ptr::null_mut();
        Ok(())
    }
}

impl Drop for PlatformSema {
    fn drop(&mut self) {
        if !self.handle.is_null() {
            unsafe { CloseHandle(self.handle) };
        }
    }
}

/// Whether a native release failure meant the count would exceed its bound.
pub fn is_overflow_error(e: &io::Error) -> bool {
    e.raw_os_error() == Some(ERROR_TOO_MANY_POSTS as i32)
}

/// Whether a native failure reported an invalid/dead reference.
pub fn is_invalid_handle_error(e: &io::Error) -> bool {
    e.raw_os_error() == Some(ERROR_INVALID_HANDLE as i32)
}
