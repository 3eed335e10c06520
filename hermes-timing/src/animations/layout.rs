//! Lays out the children of composite players.

use crate::animations::Player;

/// Lays children out in parallel: every child starts with its parent.
///
/// Returns the group duration: the longest child duration (0 when there is no child).
pub(crate) fn layout_group(children: &[Player]) -> f64 {
    children.iter().fold(0.0, |duration, child| {
        child.set_start_offset(0.0);
        duration.max(child.get_duration())
    })
}

/// Lays children out back to back, in order: each child starts when its predecessor ends.
///
/// Returns the sequence duration: the sum of children durations.
pub(crate) fn layout_sequence(children: &[Player]) -> f64 {
    children.iter().fold(0.0, |offset, child| {
        child.set_start_offset(offset);
        offset + child.get_duration()
    })
}
