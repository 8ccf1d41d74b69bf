// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025-2026 natyamatsya contributors
//
// Bounded producer/consumer over two counting semaphores.
//
// Usage:
//   demo_sem [items] [capacity]
//
// `slots` counts free buffer slots, `items` counts filled ones — the
// classic pairing. Producers wait on `slots` before pushing and post
// `items`; consumers do the reverse.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::thread;

use psem::{Scope, Semaphore};

fn main() {
    let mut args = std::env::args().skip(1);
    let total: u32 = args
        .next()
        .and_then(|s| s.parse().ok())
        .unwrap_or(32);
    let capacity: u32 = args
        .next()
        .and_then(|s| s.parse().ok())
        .unwrap_or(4);

    let slots = Semaphore::new(capacity, Scope::ProcessPrivate).expect("create slots");
    let items = Semaphore::new(0, Scope::ProcessPrivate).expect("create items");
    let buffer: Mutex<VecDeque<u32>> = Mutex::new(VecDeque::new());

    println!("demo_sem: {total} items through a {capacity}-slot buffer");

    thread::scope(|s| {
        s.spawn(|| {
            for i in 0..total {
                slots.wait().expect("wait slots");
                buffer.lock().unwrap().push_back(i);
                items.post().expect("post items");
            }
        });

        s.spawn(|| {
            for _ in 0..total {
                items.wait().expect("wait items");
                let i = buffer.lock().unwrap().pop_front().expect("buffer item");
                slots.post().expect("post slots");
                println!("consumed item {i}");
            }
        });
    });

    println!(
        "done: slots={} items={}",
        slots.value().expect("slots value"),
        items.value().expect("items value")
    );
}
