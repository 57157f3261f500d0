//! Per-type component columns.
//!
//! A [`Column`] holds every `(Entity, T)` pair for one component type, kept in
//! ascending entity order and terminated by a sentinel entry whose id is
//! [`Entity::END_OF_LIST`]. Queries walk columns front to back and stop at the
//! first sentinel they see.

use std::any::Any;

use tracing::warn;

use crate::component::Component;
use crate::config::OrderPolicy;
use crate::entity::Entity;
use crate::error::StoreError;
use crate::merge::Cursor;

/// Storage for one component type.
///
/// The last entry is always the sentinel, holding `T::default()`. It is never
/// returned by lookups or iteration.
pub struct Column<T> {
    /// Live entries followed by the sentinel.
    entries: Vec<(Entity, T)>,
    /// Where new entries go.
    order: OrderPolicy,
}

impl<T: Component> Column<T> {
    /// Create an empty column: just the sentinel.
    #[must_use]
    pub fn new(order: OrderPolicy) -> Self {
        Self::with_capacity(order, 0)
    }

    /// Create an empty column with room for `capacity` entries, sentinel
    /// included.
    #[must_use]
    pub fn with_capacity(order: OrderPolicy, capacity: usize) -> Self {
        let mut entries = Vec::with_capacity(capacity.max(1));
        entries.push((Entity::END_OF_LIST, T::default()));
        Self { entries, order }
    }

    /// Returns the insertion policy of this column.
    #[must_use]
    pub fn order(&self) -> OrderPolicy {
        self.order
    }

    /// Returns the number of live entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len().saturating_sub(1)
    }

    /// Returns `true` if the column holds only its sentinel.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn live(&self) -> &[(Entity, T)] {
        &self.entries[..self.len()]
    }

    /// Returns the highest-positioned live entity, if any.
    #[must_use]
    pub fn last_entity(&self) -> Option<Entity> {
        self.live().last().map(|(entity, _)| *entity)
    }

    /// Index of the first entry for `entity`.
    fn position(&self, entity: Entity) -> Option<usize> {
        let live = self.live();
        if self.order.keeps_order() {
            let index = live.partition_point(|(e, _)| *e < entity);
            (live.get(index)?.0 == entity).then_some(index)
        } else {
            live.iter().position(|(e, _)| *e == entity)
        }
    }

    /// Returns `true` if `entity` has an entry in this column.
    #[must_use]
    pub fn contains(&self, entity: Entity) -> bool {
        self.position(entity).is_some()
    }

    /// Returns the first value stored for `entity`.
    #[must_use]
    pub fn get(&self, entity: Entity) -> Option<&T> {
        let index = self.position(entity)?;
        Some(&self.entries[index].1)
    }

    /// Returns the first value stored for `entity`, mutably.
    #[must_use]
    pub fn get_mut(&mut self, entity: Entity) -> Option<&mut T> {
        let index = self.position(entity)?;
        Some(&mut self.entries[index].1)
    }

    /// Store `value` for `entity` and return a reference to it.
    ///
    /// An entity that already has an entry gets a second one; the first keeps
    /// answering [`get`](Self::get).
    ///
    /// # Errors
    ///
    /// Under [`OrderPolicy::Strict`], returns [`StoreError::OutOfOrder`] if
    /// `entity` sorts before the last live entry. The column is unchanged.
    pub fn insert(&mut self, entity: Entity, value: T) -> Result<&mut T, StoreError> {
        let end = self.len();
        let index = match self.order {
            OrderPolicy::Sorted => self.live().partition_point(|(e, _)| *e <= entity),
            OrderPolicy::Append => {
                if let Some(last) = self.last_entity()
                    && entity < last
                {
                    warn!(
                        component = T::type_name(),
                        %entity,
                        %last,
                        "out-of-order assign; queries over this column may skip entities"
                    );
                }
                end
            }
            OrderPolicy::Strict => {
                if let Some(last) = self.last_entity()
                    && entity < last
                {
                    return Err(StoreError::OutOfOrder {
                        component: T::type_name(),
                        entity,
                        last,
                    });
                }
                end
            }
        };
        self.entries.insert(index, (entity, value));
        Ok(&mut self.entries[index].1)
    }

    /// Remove the first entry for `entity`, returning its value.
    pub fn remove(&mut self, entity: Entity) -> Option<T> {
        let index = self.position(entity)?;
        Some(self.entries.remove(index).1)
    }

    /// Returns `true` if live entries are in ascending entity order.
    #[must_use]
    pub fn is_ascending(&self) -> bool {
        self.live().is_sorted_by_key(|(entity, _)| *entity)
    }

    /// Iterate over live entries in column order.
    pub fn iter(&self) -> impl Iterator<Item = (Entity, &T)> {
        self.live().iter().map(|(entity, value)| (*entity, value))
    }

    /// Iterate mutably over live entries in column order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Entity, &mut T)> {
        let len = self.len();
        self.entries[..len]
            .iter_mut()
            .map(|(entity, value)| (*entity, value))
    }

    /// Iterate over live entity ids in column order.
    pub fn entities(&self) -> impl Iterator<Item = Entity> + '_ {
        self.live().iter().map(|(entity, _)| *entity)
    }

    /// A merge cursor over every entry, sentinel included.
    pub(crate) fn cursor(&mut self) -> Cursor<'_, T> {
        Cursor::new(&mut self.entries)
    }
}

impl<T: Component> std::fmt::Debug for Column<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Column")
            .field("component", &T::type_name())
            .field("len", &self.len())
            .field("order", &self.order)
            .finish()
    }
}

/// Type-erased view of a column, for operations that span every type.
pub(crate) trait ErasedColumn: Any + std::fmt::Debug {
    fn component_name(&self) -> &'static str;
    fn len(&self) -> usize;
    fn contains(&self, entity: Entity) -> bool;
    fn remove_entity(&mut self, entity: Entity) -> bool;
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Component> ErasedColumn for Column<T> {
    fn component_name(&self) -> &'static str {
        T::type_name()
    }

    fn len(&self) -> usize {
        Column::len(self)
    }

    fn contains(&self, entity: Entity) -> bool {
        Column::contains(self, entity)
    }

    fn remove_entity(&mut self, entity: Entity) -> bool {
        self.remove(entity).is_some()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
