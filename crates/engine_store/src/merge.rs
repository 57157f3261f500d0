//! The k-way merge step behind every query.
//!
//! Each requested column contributes one [`Cursor`]. On every iteration the
//! query collects the cursors' head ids and asks [`step`] what to do:
//!
//! 1. any head is the sentinel: the intersection is complete;
//! 2. all heads agree: that entity matches, every cursor moves on;
//! 3. otherwise every cursor sitting on the minimum id moves on.
//!
//! Each iteration advances at least one cursor, so a pass costs at most the
//! sum of the column lengths.

use crate::entity::Entity;

/// What the merge loop does next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Step {
    /// Some cursor reached the sentinel.
    Exhausted,
    /// Every cursor is on this entity.
    Match(Entity),
    /// Cursors on this id cannot match and must advance.
    Lagging(Entity),
}

/// Decide the next merge action from the cursors' head ids.
///
/// An empty head set is exhausted from the start.
pub(crate) fn step(heads: &[Entity]) -> Step {
    let Some(&first) = heads.first() else {
        return Step::Exhausted;
    };
    let mut min = first;
    let mut all_equal = true;
    for &head in heads {
        if head.is_end() {
            return Step::Exhausted;
        }
        all_equal &= head == first;
        min = min.min(head);
    }
    if all_equal {
        Step::Match(first)
    } else {
        Step::Lagging(min)
    }
}

/// A forward-only position in one column's entries, sentinel included.
///
/// Entries are handed out at most once, so the mutable borrows yielded by
/// [`take`](Self::take) never overlap.
#[derive(Debug)]
pub(crate) struct Cursor<'w, T> {
    rest: &'w mut [(Entity, T)],
}

impl<'w, T> Cursor<'w, T> {
    pub(crate) fn new(entries: &'w mut [(Entity, T)]) -> Self {
        Self { rest: entries }
    }

    /// The id under the cursor. A drained cursor reads as the sentinel.
    pub(crate) fn head(&self) -> Entity {
        self.rest.first().map_or(Entity::END_OF_LIST, |(entity, _)| *entity)
    }

    /// Skip the current entry.
    pub(crate) fn advance(&mut self) {
        if let Some((_, tail)) = std::mem::take(&mut self.rest).split_first_mut() {
            self.rest = tail;
        }
    }

    /// Yield the current value and move past it.
    pub(crate) fn take(&mut self) -> Option<&'w mut T> {
        let rest = std::mem::take(&mut self.rest);
        let ((_, value), tail) = rest.split_first_mut()?;
        self.rest = tail;
        Some(value)
    }
}
