//! Conversions between the UI's 0-based step index and the stored step count.
//!
//! The store keeps `current_step` as the number of steps reached (1-based:
//! showing the first step commits `1`). The navigator works with a 0-based
//! index into the experiment's step list. All `+1`/`-1` adjustments happen
//! here and nowhere else.

/// Index to display for a stored step count: `clamp(saved - 1, 0, total - 1)`.
///
/// Returns 0 when the experiment has no steps.
#[must_use]
pub fn index_from_saved(saved_step: u32, total_steps: usize) -> usize {
    let last = total_steps.saturating_sub(1);
    let index = usize::try_from(saved_step.saturating_sub(1)).unwrap_or(usize::MAX);
    index.min(last)
}

/// Stored step count for a displayed index: `clamp(index + 1, 0, total)`.
#[must_use]
pub fn saved_from_index(index: usize, total_steps: usize) -> u32 {
    let reached = index.saturating_add(1).min(total_steps);
    u32::try_from(reached).unwrap_or(u32::MAX)
}

/// Percentage shown for a stored step count.
///
/// Completed experiments always read 100. Otherwise
/// `round(100 * current / max(1, total))`, rounding halves up and capped at 100.
#[must_use]
pub fn percentage(current_step: u32, total_steps: usize, completed: bool) -> u8 {
    if completed {
        return 100;
    }
    if total_steps == 0 {
        return 0;
    }
    let total = u64::try_from(total_steps).unwrap_or(u64::MAX);
    let current = u64::from(current_step);
    let rounded = (current.saturating_mul(200).saturating_add(total)) / total.saturating_mul(2);
    u8::try_from(rounded.min(100)).unwrap_or(100)
}
