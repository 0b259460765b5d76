//! Ordered-sequence helpers shared by every level of the document tree
//!
//! Each helper edits a `Vec` in place and reports whether anything changed.
//! Callers own the vector (they were handed the parent by value), so the
//! surrounding operation stays pure from the outside.

use serde::{Deserialize, Serialize};

/// Direction of a move within an ordered sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Towards the start of the sequence (index - 1)
    Up,
    /// Towards the end of the sequence (index + 1)
    Down,
}

impl Direction {
    /// Index of the neighbour in this direction, if it lies inside `len`
    pub fn neighbour(self, index: usize, len: usize) -> Option<usize> {
        let target = match self {
            Direction::Up => index.checked_sub(1)?,
            Direction::Down => index.checked_add(1)?,
        };
        (index < len && target < len).then_some(target)
    }
}

/// Replace the element at `index`
pub fn replace_at<T>(items: &mut [T], index: usize, value: T) -> bool {
    match items.get_mut(index) {
        Some(slot) => {
            *slot = value;
            true
        }
        None => false,
    }
}

/// Remove the element at `index`, keeping the relative order of the rest
pub fn remove_at<T>(items: &mut Vec<T>, index: usize) -> bool {
    if index < items.len() {
        items.remove(index);
        true
    } else {
        false
    }
}

/// Swap the element at `index` with its neighbour in `direction`
///
/// Moving the first element up or the last element down leaves the
/// sequence untouched.
pub fn swap_adjacent<T>(items: &mut [T], index: usize, direction: Direction) -> bool {
    match direction.neighbour(index, items.len()) {
        Some(target) => {
            items.swap(index, target);
            true
        }
        None => false,
    }
}
