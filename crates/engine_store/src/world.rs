//! The component store.
//!
//! A [`World`] owns one [`Column`] per component type that has ever been
//! assigned (and not cleared since). Systems receive the world by reference
//! and go through it for every read and write; there is no global state.
//!
//! The world is single-threaded. Columns are not required to be `Send` or
//! `Sync`, and nothing inside locks.

use std::collections::HashMap;
use std::ops::ControlFlow;

use tracing::{debug, trace};

use crate::column::{Column, ErasedColumn};
use crate::component::{Component, ComponentTypeId};
use crate::config::WorldConfig;
use crate::entity::Entity;
use crate::error::StoreError;
use crate::query::Query;

/// Typed component columns keyed by component type.
#[derive(Debug, Default)]
pub struct World {
    /// Insertion policy and sizing for new columns.
    config: WorldConfig,
    /// One column per component type. A missing key means "no column".
    pub(crate) columns: HashMap<ComponentTypeId, Box<dyn ErasedColumn>>,
}

impl World {
    /// Create an empty world with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(WorldConfig::default())
    }

    /// Create an empty world with the given configuration.
    #[must_use]
    pub fn with_config(config: WorldConfig) -> Self {
        Self {
            config,
            columns: HashMap::new(),
        }
    }

    /// Returns the world's configuration.
    #[must_use]
    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    /// Returns the column for `T`, if one exists.
    #[must_use]
    pub fn column<T: Component>(&self) -> Option<&Column<T>> {
        self.columns
            .get(&ComponentTypeId::of::<T>())?
            .as_any()
            .downcast_ref::<Column<T>>()
    }

    fn column_mut<T: Component>(&mut self) -> Option<&mut Column<T>> {
        self.columns
            .get_mut(&ComponentTypeId::of::<T>())?
            .as_any_mut()
            .downcast_mut::<Column<T>>()
    }

    fn column_or_create<T: Component>(&mut self) -> &mut Column<T> {
        let WorldConfig {
            order,
            column_capacity,
        } = self.config;
        let column = self
            .columns
            .entry(ComponentTypeId::of::<T>())
            .or_insert_with(|| {
                debug!(component = T::type_name(), ?order, "creating column");
                Box::new(Column::<T>::with_capacity(order, column_capacity))
            });
        match column.as_any_mut().downcast_mut::<Column<T>>() {
            Some(column) => column,
            None => unreachable!("column keyed by the TypeId of its component"),
        }
    }

    /// Create the column for `T` if it does not exist yet.
    ///
    /// Assigning creates columns on demand; registering up front only makes
    /// the empty column visible to [`column`](Self::column) and
    /// [`column_count`](Self::column_count).
    pub fn register<T: Component>(&mut self) {
        self.column_or_create::<T>();
    }

    /// Attach `value` to `entity` and return a reference to the stored value.
    ///
    /// Creates the column on first use. Assigning twice to the same entity
    /// stores a second entry; lookups keep returning the first.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::OutOfOrder`] under
    /// [`OrderPolicy::Strict`](crate::OrderPolicy::Strict) when `entity` sorts
    /// before the column's last entry.
    pub fn assign<T: Component>(&mut self, entity: Entity, value: T) -> Result<&mut T, StoreError> {
        trace!(component = T::type_name(), %entity, "assign");
        self.column_or_create::<T>().insert(entity, value)
    }

    /// Attach `T::default()` to `entity`.
    ///
    /// # Errors
    ///
    /// Same as [`assign`](Self::assign).
    pub fn assign_default<T: Component>(&mut self, entity: Entity) -> Result<&mut T, StoreError> {
        self.assign(entity, T::default())
    }

    /// Returns the `T` attached to `entity`.
    #[must_use]
    pub fn get<T: Component>(&self, entity: Entity) -> Option<&T> {
        self.column::<T>()?.get(entity)
    }

    /// Returns the `T` attached to `entity`, mutably.
    #[must_use]
    pub fn get_mut<T: Component>(&mut self, entity: Entity) -> Option<&mut T> {
        self.column_mut::<T>()?.get_mut(entity)
    }

    /// Returns `true` if `entity` has a `T`.
    #[must_use]
    pub fn has<T: Component>(&self, entity: Entity) -> bool {
        self.column::<T>().is_some_and(|column| column.contains(entity))
    }

    /// Returns the number of `T` entries. Zero when the column does not exist.
    #[must_use]
    pub fn len<T: Component>(&self) -> usize {
        self.column::<T>().map_or(0, Column::len)
    }

    /// Detach the `T` from `entity` and return it.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if `entity` has no `T`, including when
    /// the column does not exist.
    pub fn remove<T: Component>(&mut self, entity: Entity) -> Result<T, StoreError> {
        let removed = self
            .column_mut::<T>()
            .and_then(|column| column.remove(entity));
        trace!(component = T::type_name(), %entity, found = removed.is_some(), "remove");
        removed.ok_or(StoreError::NotFound {
            entity,
            component: T::type_name(),
        })
    }

    /// Drop the column for `T`, sentinel included, returning how many entries
    /// it held.
    ///
    /// Afterwards `T` behaves as if it was never assigned; the next
    /// [`assign`](Self::assign) builds a fresh column.
    pub fn clear<T: Component>(&mut self) -> usize {
        let dropped = self
            .columns
            .remove(&ComponentTypeId::of::<T>())
            .map_or(0, |column| column.len());
        debug!(component = T::type_name(), dropped, "cleared column");
        dropped
    }

    /// Drop every column.
    pub fn clear_all(&mut self) {
        debug!(columns = self.columns.len(), "clearing all columns");
        self.columns.clear();
    }

    /// Remove `entity` from every column, returning how many components it
    /// lost.
    pub fn despawn(&mut self, entity: Entity) -> usize {
        let removed = self
            .columns
            .values_mut()
            .filter_map(|column| column.remove_entity(entity).then(|| column.component_name()))
            .inspect(|component| trace!(%entity, component, "despawn removed component"))
            .count();
        debug!(%entity, removed, "despawned");
        removed
    }

    /// Returns `true` if any column holds `entity`.
    #[must_use]
    pub fn is_alive(&self, entity: Entity) -> bool {
        self.columns.values().any(|column| column.contains(entity))
    }

    /// Returns `true` if a column for `T` exists.
    #[must_use]
    pub fn contains_column<T: Component>(&self) -> bool {
        self.columns.contains_key(&ComponentTypeId::of::<T>())
    }

    /// Returns the number of existing columns.
    #[must_use]
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Visit, in ascending entity order, every entity that has all of the
    /// component types in `Q`, returning how many were visited.
    ///
    /// `Q` is a tuple of component types; the visitor gets the entity and a
    /// tuple of mutable references in the same order.
    ///
    /// ```rust
    /// use engine_store::{Component, Entity, World};
    ///
    /// #[derive(Debug, Default)]
    /// struct Position(f32);
    /// #[derive(Debug, Default)]
    /// struct Velocity(f32);
    ///
    /// impl Component for Position {
    ///     fn type_name() -> &'static str { "Position" }
    /// }
    /// impl Component for Velocity {
    ///     fn type_name() -> &'static str { "Velocity" }
    /// }
    ///
    /// let mut world = World::new();
    /// let e = Entity::new(1).unwrap();
    /// world.assign(e, Position(0.0)).unwrap();
    /// world.assign(e, Velocity(2.5)).unwrap();
    ///
    /// world
    ///     .enumerate::<(Position, Velocity), _>(|_, (position, velocity)| {
    ///         position.0 += velocity.0;
    ///     })
    ///     .unwrap();
    /// assert_eq!(world.get::<Position>(e).unwrap().0, 2.5);
    /// ```
    ///
    /// A type without a column yields no matches; so does `()`.
    ///
    /// The visitor cannot add, remove or clear components while the pass
    /// runs: the world stays mutably borrowed until it returns.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::AliasedQuery`] if `Q` names a type twice.
    pub fn enumerate<'w, Q, V>(&'w mut self, mut visitor: V) -> Result<usize, StoreError>
    where
        Q: Query,
        V: FnMut(Entity, Q::Item<'w>),
    {
        self.enumerate_until::<Q, _>(move |entity, item| {
            visitor(entity, item);
            ControlFlow::Continue(())
        })
    }

    /// Like [`enumerate`](Self::enumerate), but the visitor decides whether
    /// the scan goes on. Returning [`ControlFlow::Break`] stops it after the
    /// current entity.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::AliasedQuery`] if `Q` names a type twice.
    pub fn enumerate_until<'w, Q, V>(&'w mut self, visitor: V) -> Result<usize, StoreError>
    where
        Q: Query,
        V: FnMut(Entity, Q::Item<'w>) -> ControlFlow<()>,
    {
        Q::run(self, visitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OrderPolicy;

    #[derive(Debug, Default, Clone, PartialEq)]
    struct Transform {
        x: f32,
        y: f32,
    }

    #[derive(Debug, Default, Clone, PartialEq)]
    struct Destination {
        x: f32,
        y: f32,
    }

    impl Component for Transform {
        fn type_name() -> &'static str {
            "Transform"
        }
    }

    impl Component for Destination {
        fn type_name() -> &'static str {
            "Destination"
        }
    }

    fn e(id: u64) -> Entity {
        Entity::new(id).unwrap()
    }

    #[test]
    fn test_column_created_lazily() {
        let mut world = World::new();
        assert!(!world.contains_column::<Transform>());
        assert!(world.get::<Transform>(e(0)).is_none());
        assert_eq!(world.len::<Transform>(), 0);

        world.assign_default::<Transform>(e(0)).unwrap();
        assert!(world.contains_column::<Transform>());
        assert_eq!(world.column_count(), 1);
        assert_eq!(world.len::<Transform>(), 1);
    }

    #[test]
    fn test_assign_then_get_every_id() {
        let mut world = World::new();
        for id in 1..=20 {
            world
                .assign(e(id), Transform { x: id as f32, y: -(id as f32) })
                .unwrap();
        }
        for id in 1..=20 {
            assert_eq!(
                world.get::<Transform>(e(id)),
                Some(&Transform { x: id as f32, y: -(id as f32) })
            );
        }
        assert!(world.get::<Transform>(e(21)).is_none());
        assert!(world.get::<Transform>(e(0)).is_none());
    }

    #[test]
    fn test_assign_returns_live_reference() {
        let mut world = World::new();
        let transform = world.assign_default::<Transform>(e(0)).unwrap();
        transform.x = 400.0;
        transform.y = 400.0;
        assert_eq!(
            world.get::<Transform>(e(0)),
            Some(&Transform { x: 400.0, y: 400.0 })
        );

        world.get_mut::<Transform>(e(0)).unwrap().x = 1.0;
        assert_eq!(world.get::<Transform>(e(0)).unwrap().x, 1.0);
    }

    #[test]
    fn test_remove_then_absent() {
        let mut world = World::new();
        world.assign(e(0), Destination { x: 10.0, y: 10.0 }).unwrap();
        world.assign(e(1), Destination::default()).unwrap();

        let removed = world.remove::<Destination>(e(0)).unwrap();
        assert_eq!(removed, Destination { x: 10.0, y: 10.0 });
        assert!(!world.has::<Destination>(e(0)));

        let mut seen = Vec::new();
        world
            .enumerate::<(Destination,), _>(|entity, _| seen.push(entity))
            .unwrap();
        assert_eq!(seen, vec![e(1)]);
    }

    #[test]
    fn test_remove_missing_is_not_found() {
        let mut world = World::new();
        let err = world.remove::<Destination>(e(3)).unwrap_err();
        assert_eq!(
            err,
            StoreError::NotFound {
                entity: e(3),
                component: "Destination",
            }
        );

        world.assign_default::<Destination>(e(1)).unwrap();
        assert!(world.remove::<Destination>(e(3)).is_err());
        assert_eq!(world.len::<Destination>(), 1);
    }

    #[test]
    fn test_clear_then_reassign() {
        let mut world = World::new();
        for id in [1, 2, 3] {
            world.assign_default::<Transform>(e(id)).unwrap();
        }
        assert_eq!(world.clear::<Transform>(), 3);
        assert!(!world.contains_column::<Transform>());
        assert!(world.get::<Transform>(e(1)).is_none());
        assert_eq!(
            world
                .enumerate::<(Transform,), _>(|_, _| panic!("cleared column visited"))
                .unwrap(),
            0
        );

        world.assign(e(9), Transform { x: 9.0, y: 0.0 }).unwrap();
        let column = world.column::<Transform>().unwrap();
        assert_eq!(column.len(), 1);
        assert_eq!(column.entities().collect::<Vec<_>>(), vec![e(9)]);
        assert_eq!(world.clear::<Destination>(), 0);
    }

    #[test]
    fn test_register_creates_empty_column() {
        let mut world = World::new();
        world.register::<Transform>();
        world.register::<Transform>();
        assert!(world.contains_column::<Transform>());
        assert_eq!(world.column_count(), 1);
        assert!(world.column::<Transform>().unwrap().is_empty());
    }

    #[test]
    fn test_despawn_removes_from_every_column() {
        let mut world = World::new();
        world.assign_default::<Transform>(e(0)).unwrap();
        world.assign_default::<Destination>(e(0)).unwrap();
        world.assign_default::<Transform>(e(1)).unwrap();

        assert!(world.is_alive(e(0)));
        assert_eq!(world.despawn(e(0)), 2);
        assert!(!world.is_alive(e(0)));
        assert!(world.is_alive(e(1)));
        assert_eq!(world.despawn(e(0)), 0);
    }

    #[test]
    fn test_clear_all() {
        let mut world = World::new();
        world.assign_default::<Transform>(e(0)).unwrap();
        world.assign_default::<Destination>(e(0)).unwrap();
        world.clear_all();
        assert_eq!(world.column_count(), 0);
        assert!(!world.is_alive(e(0)));
    }

    #[test]
    fn test_config_applies_to_new_columns() {
        let config = WorldConfig::new()
            .with_order(OrderPolicy::Strict)
            .with_column_capacity(16);
        let mut world = World::with_config(config);
        world.assign_default::<Transform>(e(5)).unwrap();
        assert_eq!(world.column::<Transform>().unwrap().order(), OrderPolicy::Strict);
        assert!(matches!(
            world.assign_default::<Transform>(e(4)),
            Err(StoreError::OutOfOrder { .. })
        ));
        assert_eq!(world.len::<Transform>(), 1);
    }

    #[test]
    fn test_move_toward_destination_and_stop() {
        let mut world = World::new();
        world.assign(e(0), Transform { x: 0.0, y: 0.0 }).unwrap();
        world.assign(e(0), Destination { x: 3.0, y: 0.0 }).unwrap();

        for _ in 0..10 {
            let Some(destination) = world.get::<Destination>(e(0)).cloned() else {
                break;
            };
            let transform = world.get_mut::<Transform>(e(0)).unwrap();
            transform.x += 1.0;
            if (transform.x - destination.x).abs() < f32::EPSILON {
                world.remove::<Destination>(e(0)).unwrap();
            }
        }

        assert_eq!(world.get::<Transform>(e(0)).unwrap().x, 3.0);
        assert!(!world.has::<Destination>(e(0)));
    }
}
