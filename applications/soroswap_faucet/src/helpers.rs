// Copyright 2024 The Soroswap Development Community
// SPDX-License-Identifier: BSD-3-Clause

use std::sync::{Mutex, MutexGuard, PoisonError};

/// Locks `mutex`, recovering the data if a previous holder panicked.
pub fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Shortens an address for display: the first and last six characters around an ellipsis. Addresses of twelve
/// characters or fewer are returned unchanged.
pub fn truncate_address(address: &str) -> String {
    const VISIBLE: usize = 6;
    let len = address.chars().count();
    if len <= VISIBLE * 2 {
        return address.to_string();
    }
    let head = address.chars().take(VISIBLE).collect::<String>();
    let tail = address.chars().skip(len - VISIBLE).collect::<String>();
    format!("{}...{}", head, tail)
}
