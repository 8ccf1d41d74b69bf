// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025-2026 natyamatsya contributors
//
// Name derivation for the shared namespace.
//
// Named kernel semaphores live in a single flat namespace; this module
// applies the fixed prefix that places an object there and enforces the
// capacity of the internal name buffer.

use std::sync::atomic::{AtomicU64, Ordering};

/// Marker placing a named object in the process-shareable namespace.
/// On Windows this is the literal kernel-object `Global\` session prefix;
/// the unix emulation keeps the same spelling so names are portable.
pub const SHARED_NAMESPACE_PREFIX: &str = "Global\\";

/// Capacity of the internal name buffer, including the prefix and a
/// trailing NUL. Mirrors the 512-byte buffer of the original C layer.
pub const NAME_CAPACITY: usize = 512;

/// Longest caller-supplied name that still fits after prefixing.
pub const NAME_MAX: usize = NAME_CAPACITY - SHARED_NAMESPACE_PREFIX.len() - 1;

/// Prefix a caller-supplied name into the shared namespace.
///
/// Returns `None` when the name is empty or would not fit in the internal
/// name buffer once prefixed.
pub fn shared_name(name: &str) -> Option<String> {
    if name.is_empty() || name.len() > NAME_MAX {
        return None;
    }
    let mut full = String::with_capacity(SHARED_NAMESPACE_PREFIX.len() + name.len());
    full.push_str(SHARED_NAMESPACE_PREFIX);
    full.push_str(name);
    Some(full)
}

/// Derive a process-unique shared-namespace name for an unnamed semaphore
/// created with process-shared visibility.
///
/// The original derives this from the wrapper allocation's address
/// (`"Global\\%p"`). A pid + monotonic counter gives the same uniqueness
/// without depending on the allocator never reusing an address.
pub fn anonymous_shared_name() -> String {
    static NEXT: AtomicU64 = AtomicU64::new(0);
    let seq = NEXT.fetch_add(1, Ordering::Relaxed);
    format!("{}psem.{}.{:x}", SHARED_NAMESPACE_PREFIX, std::process::id(), seq)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shared_name_prepends_prefix() {
        assert_eq!(shared_name("x").as_deref(), Some("Global\\x"));
    }

    #[test]
    fn shared_name_rejects_empty() {
        assert_eq!(shared_name(""), None);
    }

    #[test]
    fn shared_name_rejects_oversized() {
        let long = "a".repeat(NAME_MAX + 1);
        assert_eq!(shared_name(&long), None);
        let just_fits = "a".repeat(NAME_MAX);
        let full = shared_name(&just_fits).unwrap();
        assert!(full.len() < NAME_CAPACITY);
    }

    #[test]
    fn anonymous_names_are_unique_and_shared() {
        let a = anonymous_shared_name();
        let b = anonymous_shared_name();
        assert_ne!(a, b);
        assert!(a.starts_with(SHARED_NAMESPACE_PREFIX));
    }
}
