//! Drag-and-drop reordering over the display order.
//!
//! A drop names a target row and which half of it the pointer was in. The
//! dragged task lands immediately before the target (upper half) or
//! immediately after it (lower half), with the destination adjusted for the
//! hole left by removing the dragged task first.

use crate::model::list::TaskList;

use super::task_ops::Outcome;

/// Which side of the target row the drop landed on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropPosition {
    Above,
    Below,
}

impl DropPosition {
    /// Classify a pointer against a target row: strictly above the vertical
    /// midpoint is `Above`, everything else `Below`.
    pub fn from_pointer(pointer_y: f64, row_top: f64, row_height: f64) -> Self {
        if pointer_y < row_top + row_height / 2.0 {
            DropPosition::Above
        } else {
            DropPosition::Below
        }
    }
}

/// Compute the destination index for moving `source` onto `target` in a list
/// of `len` items. Returns `None` for a self-drop or out-of-range indices.
pub fn resolve_drop(len: usize, source: usize, target: usize, position: DropPosition) -> Option<usize> {
    if source >= len || target >= len || source == target {
        return None;
    }
    let dest = match position {
        DropPosition::Above if target < source => target,
        DropPosition::Above => target - 1,
        DropPosition::Below if target > source => target,
        DropPosition::Below => target + 1,
    };
    Some(dest)
}

/// Remove the element at `source` and insert it at `dest` in the shortened slice
pub fn splice_move<T>(items: &mut Vec<T>, source: usize, dest: usize) {
    let item = items.remove(source);
    items.insert(dest, item);
}

/// Apply a drop to the list. Indices address the current display order; the
/// moved display sequence becomes the new storage order.
///
/// Because the display order is re-derived afterwards, a move only sticks
/// among tasks sharing the same completion state and priority.
pub fn move_task(list: &mut TaskList, source: usize, target: usize, position: DropPosition) -> Outcome {
    let mut order = list.display_ids();
    let Some(dest) = resolve_drop(order.len(), source, target, position) else {
        return Outcome::Unchanged;
    };
    if dest == source {
        return Outcome::Unchanged;
    }
    splice_move(&mut order, source, dest);
    list.reorder(&order);
    Outcome::Changed
}
