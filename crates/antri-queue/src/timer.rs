// SPDX-FileCopyrightText: 2026 Antri Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Call-window countdown, derived purely from the stored call timestamp and
//! the current wall clock.
//!
//! Remaining time is never stored anywhere; displays recompute it on a
//! fixed tick. Expiry is a display signal only and never transitions ticket
//! status.

use antri_core::QueueSnapshot;

/// Default call window in seconds before a called ticket counts as overdue.
pub const DEFAULT_CALL_WINDOW_SECS: u32 = 120;

/// Seconds left in the call window that opened at `started_ms`.
///
/// `max(0, window - floor((now - started) / 1000))`, additionally clamped to
/// the window so a start timestamp from a skewed peer clock cannot display
/// more time than the window holds.
pub fn remaining_secs(started_ms: i64, now_ms: i64, window_secs: u32) -> u32 {
    let elapsed_secs = (now_ms - started_ms).div_euclid(1000);
    let window = i64::from(window_secs);
    (window - elapsed_secs).clamp(0, window) as u32
}

/// Countdown for the snapshot's active call, or `None` when no ticket is
/// being served (the countdown disappears rather than reading 0 forever).
pub fn remaining_in(snapshot: &QueueSnapshot, now_ms: i64, window_secs: u32) -> Option<u32> {
    snapshot
        .calling_started_at
        .map(|started| remaining_secs(started, now_ms, window_secs))
}

#[cfg(test)]
mod tests {
    use super::*;

    const T: i64 = 1_700_000_000_000;

    #[test]
    fn counts_down_by_whole_seconds() {
        assert_eq!(remaining_secs(T, T, 120), 120);
        assert_eq!(remaining_secs(T, T + 45_000, 120), 75);
        assert_eq!(remaining_secs(T, T + 45_999, 120), 75);
        assert_eq!(remaining_secs(T, T + 119_000, 120), 1);
    }

    #[test]
    fn clamps_to_zero_after_expiry() {
        assert_eq!(remaining_secs(T, T + 120_000, 120), 0);
        assert_eq!(remaining_secs(T, T + 130_000, 120), 0);
        assert_eq!(remaining_secs(T, T + 86_400_000, 120), 0);
    }

    #[test]
    fn future_start_reads_full_window() {
        // Peer clock skew: the call apparently starts 5s from now.
        assert_eq!(remaining_secs(T + 5_000, T, 120), 120);
    }

    #[test]
    fn no_active_call_means_no_countdown() {
        let mut snapshot = QueueSnapshot::default();
        assert_eq!(remaining_in(&snapshot, T, 120), None);

        snapshot.calling_started_at = Some(T);
        assert_eq!(remaining_in(&snapshot, T + 30_000, 120), Some(90));
    }
}
