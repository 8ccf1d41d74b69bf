// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025-2026 natyamatsya contributors
//
// Unix rendition of the host semaphore capability.
//
// Unix has no handle-based kernel semaphore whose release call reports the
// prior count, so the capability is emulated in-process: each object is a
// bounded counter guarded by a Mutex + Condvar, and named objects live in a
// process-global registry with explicit reference counts, standing in for
// the kernel's handle table. Failures carry errno-style raw codes so the
// adapter can classify them uniformly across backends.

use std::collections::HashMap;
use std::io;
use std::sync::{Arc, Condvar, Mutex, OnceLock};
use std::time::{Duration, Instant};

use super::{CreateOutcome, Timeout, WaitOutcome};

// ---------------------------------------------------------------------------
// SemObject — one emulated kernel semaphore
// ---------------------------------------------------------------------------

struct SemObject {
    max: u32,
    count: Mutex<u32>,
    available: Condvar,
}

impl SemObject {
    fn new(initial: u32, max: u32) -> io::Result<Arc<Self>> {
        if max == 0 || initial > max {
            return Err(io::Error::from_raw_os_error(libc::EINVAL));
        }
        Ok(Arc::new(Self {
            max,
            count: Mutex::new(initial),
            available: Condvar::new(),
        }))
    }

    fn acquire(&self, timeout: Timeout) -> io::Result<WaitOutcome> {
        let mut count = self.count.lock().unwrap();
        match timeout {
            Timeout::Infinite => {
                while *count == 0 {
                    count = self.available.wait(count).unwrap();
                }
            }
            Timeout::Millis(ms) => {
                let deadline = Instant::now().checked_add(Duration::from_millis(ms));
                while *count == 0 {
                    let remaining = match deadline {
                        Some(d) => match d.checked_duration_since(Instant::now()) {
                            Some(r) if !r.is_zero() => r,
                            _ => return Ok(WaitOutcome::TimedOut),
                        },
                        // Bound too large for the clock — wait unbounded.
                        None => {
                            count = self.available.wait(count).unwrap();
                            continue;
                        }
                    };
                    let (guard, _) = self.available.wait_timeout(count, remaining).unwrap();
                    count = guard;
                }
            }
        }
        *count -= 1;
        Ok(WaitOutcome::Acquired)
    }

    /// Add `n` units and return the count prior to the release.
    /// The counter is left untouched when the release would exceed `max`.
    fn release(&self, n: u32) -> io::Result<u32> {
        if n == 0 {
            return Err(io::Error::from_raw_os_error(libc::EINVAL));
        }
        let mut count = self.count.lock().unwrap();
        let prior = *count;
        if n > self.max - prior {
            return Err(io::Error::from_raw_os_error(libc::EOVERFLOW));
        }
        *count = prior + n;
        if n == 1 {
            self.available.notify_one();
        } else {
            self.available.notify_all();
        }
        Ok(prior)
    }
}

// ---------------------------------------------------------------------------
// Named-object registry — the emulated kernel namespace
// ---------------------------------------------------------------------------

struct RegistryEntry {
    object: Arc<SemObject>,
    // Open native references within this process. The entry (and with it
    // the object, once every Arc is gone) disappears when this hits zero,
    // which is why unlink has nothing left to do.
    refs: usize,
}

fn registry() -> &'static Mutex<HashMap<String, RegistryEntry>> {
    static REG: OnceLock<Mutex<HashMap<String, RegistryEntry>>> = OnceLock::new();
    REG.get_or_init(|| Mutex::new(HashMap::new()))
}

fn registry_release(name: &str) {
    let mut reg = registry().lock().unwrap();
    if let Some(entry) = reg.get_mut(name) {
        entry.refs -= 1;
        if entry.refs == 0 {
            reg.remove(name);
        }
    }
}

// ---------------------------------------------------------------------------
// PlatformSema — one native reference
// ---------------------------------------------------------------------------

pub struct PlatformSema {
    object: Option<Arc<SemObject>>,
    name: Option<String>,
}

impl PlatformSema {
    /// Create a bounded counting object, or bind to the pre-existing one
    /// when `name` is taken. Anonymous objects (`name == None`) are never
    /// shared. Create-vs-open is atomic under the registry lock.
    pub fn create(name: Option<&str>, initial: u32, max: u32) -> io::Result<CreateOutcome> {
        let Some(name) = name else {
            let object = SemObject::new(initial, max)?;
            return Ok(CreateOutcome {
                sema: Self {
                    object: Some(object),
                    name: None,
                },
                already_existed: false,
            });
        };

        let mut reg = registry().lock().unwrap();
        if let Some(entry) = reg.get_mut(name) {
            entry.refs += 1;
            let object = Arc::clone(&entry.object);
            return Ok(CreateOutcome {
                sema: Self {
                    object: Some(object),
                    name: Some(name.to_string()),
                },
                already_existed: true,
            });
        }
        let object = SemObject::new(initial, max)?;
        reg.insert(
            name.to_string(),
            RegistryEntry {
                object: Arc::clone(&object),
                refs: 1,
            },
        );
        Ok(CreateOutcome {
            sema: Self {
                object: Some(object),
                name: Some(name.to_string()),
            },
            already_existed: false,
        })
    }

    pub fn wait(&self, timeout: Timeout) -> io::Result<WaitOutcome> {
        self.live()?.acquire(timeout)
    }

    /// Release `n` units, returning the count prior to the release.
    pub fn release(&self, n: u32) -> io::Result<u32> {
        self.live()?.release(n)
    }

    /// Drop this native reference. The underlying object survives as long
    /// as other references to it remain open.
    pub fn close(&mut self) -> io::Result<()> {
        let object = self
            .object
            .take()
            .ok_or_else(|| io::Error::from_raw_os_error(libc::EBADF))?;
        if let Some(name) = self.name.take() {
            registry_release(&name);
        }
        drop(object);
        Ok(())
    }

    fn live(&self) -> io::Result<&SemObject> {
        self.object
            .as_deref()
            .ok_or_else(|| io::Error::from_raw_os_error(libc::EBADF))
    }
}

impl Drop for PlatformSema {
    fn drop(&mut self) {
        if self.object.is_some() {
            let _ = self.close();
        }
    }
}

/// Whether a native release failure meant the count would exceed its bound.
pub fn is_overflow_error(e: &io::Error) -> bool {
    e.raw_os_error() == Some(libc::EOVERFLOW)
}

/// Whether a native failure reported an invalid/dead reference.
pub fn is_invalid_handle_error(e: &io::Error) -> bool {
    e.raw_os_error() == Some(libc::EBADF)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn release_reports_prior_count() {
        let out = PlatformSema::create(None, 2, 10).unwrap();
        assert!(!out.already_existed);
        assert_eq!(out.sema.release(1).unwrap(), 2);
        assert_eq!(out.sema.release(3).unwrap(), 3);
    }

    #[test]
    fn release_past_bound_is_overflow_and_leaves_count() {
        let out = PlatformSema::create(None, 4, 4).unwrap();
        let err = out.sema.release(1).unwrap_err();
        assert!(is_overflow_error(&err));
        // Count untouched: four acquires still succeed, the fifth polls out.
        for _ in 0..4 {
            assert_eq!(
                out.sema.wait(Timeout::Millis(0)).unwrap(),
                WaitOutcome::Acquired
            );
        }
        assert_eq!(
            out.sema.wait(Timeout::Millis(0)).unwrap(),
            WaitOutcome::TimedOut
        );
    }

    #[test]
    fn zero_timeout_never_blocks() {
        let out = PlatformSema::create(None, 0, 10).unwrap();
        let start = Instant::now();
        assert_eq!(
            out.sema.wait(Timeout::Millis(0)).unwrap(),
            WaitOutcome::TimedOut
        );
        assert!(start.elapsed() < Duration::from_millis(100));
    }

    #[test]
    fn named_create_reports_pre_existence() {
        let name = "Global\\psem.platform.preexist";
        let first = PlatformSema::create(Some(name), 1, 10).unwrap();
        assert!(!first.already_existed);
        let second = PlatformSema::create(Some(name), 9, 10).unwrap();
        assert!(second.already_existed);
        // First creator wins: the second create's initial value is ignored.
        assert_eq!(second.sema.release(1).unwrap(), 1);
    }

    #[test]
    fn namespace_entry_dies_with_last_reference() {
        let name = "Global\\psem.platform.lastref";
        let mut a = PlatformSema::create(Some(name), 5, 10).unwrap().sema;
        let mut b = PlatformSema::create(Some(name), 0, 10).unwrap().sema;
        a.close().unwrap();
        b.close().unwrap();
        // Both references gone — a fresh create starts over.
        let again = PlatformSema::create(Some(name), 2, 10).unwrap();
        assert!(!again.already_existed);
        assert_eq!(again.sema.release(1).unwrap(), 2);
    }

    #[test]
    fn double_close_reports_invalid_handle() {
        let mut sema = PlatformSema::create(None, 1, 10).unwrap().sema;
        sema.close().unwrap();
        let err = sema.close().unwrap_err();
        assert!(is_invalid_handle_error(&err));
    }
}
