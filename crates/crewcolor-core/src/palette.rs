//! The fixed color palette and member count range.
//!
//! The palette only feeds the selection UI. Submissions are not checked
//! against it, so any non-empty color name is accepted.

use std::ops::RangeInclusive;

/// Selectable colors, in display order.
pub const COLORS: [&str; 18] = [
    "red", "blue", "green", "pink", "orange", "yellow", "black", "white", "purple", "brown",
    "cyan", "lime", "maroon", "rose", "banana", "gray", "tan", "coral",
];

/// Smallest member count offered by the selection page.
pub const MIN_MEMBERS: usize = 4;

/// Largest member count offered by the selection page. Also the number of
/// color slots the page pre-reads.
pub const MAX_MEMBERS: usize = 15;

/// Member counts offered by the selection page (`4..=15`).
#[must_use]
pub fn member_counts() -> RangeInclusive<usize> {
    MIN_MEMBERS..=MAX_MEMBERS
}

/// Member indices shown by the selection page (`0..15`).
#[must_use]
pub fn member_indices() -> std::ops::Range<usize> {
    0..MAX_MEMBERS
}
