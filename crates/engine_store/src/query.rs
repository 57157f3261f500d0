//! Compile-time specialised multi-column queries.
//!
//! [`Query`] is implemented for tuples of up to eight component types. Each
//! implementation borrows the requested columns from the [`World`] at once,
//! puts one cursor on each and runs a sorted merge join, handing the visitor
//! one mutable reference per column for every entity present in all of them.
//!
//! The merge assumes every column is ascending. Under
//! [`OrderPolicy::Append`](crate::OrderPolicy::Append) that is the caller's
//! job; an out-of-order column makes the join skip entities, never visit one
//! twice.

use std::ops::ControlFlow;

use crate::column::Column;
use crate::component::{Component, ComponentTypeId};
use crate::entity::Entity;
use crate::error::StoreError;
use crate::merge::{self, Cursor, Step};
use crate::world::World;

mod sealed {
    pub trait Sealed {}
}

/// A fixed set of component types to intersect.
///
/// Implemented for `()` and for tuples `(A,)` through `(A, B, C, D, E, F, G, H)`
/// where every element is a [`Component`].
pub trait Query: sealed::Sealed {
    /// What the visitor receives for each matching entity.
    type Item<'w>;

    /// Number of component types in the query.
    const ARITY: usize;

    /// Reject queries naming one component type more than once.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::AliasedQuery`] with the first repeated type.
    fn check_aliasing() -> Result<(), StoreError>;

    /// Run the merge join over `world`, returning how many entities were
    /// visited.
    ///
    /// Callers go through [`World::enumerate`].
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::AliasedQuery`] without touching any column if
    /// [`check_aliasing`](Self::check_aliasing) fails.
    #[doc(hidden)]
    fn run<'w, V>(world: &'w mut World, visitor: V) -> Result<usize, StoreError>
    where
        V: FnMut(Entity, Self::Item<'w>) -> ControlFlow<()>;
}

impl sealed::Sealed for () {}

impl Query for () {
    type Item<'w> = ();

    const ARITY: usize = 0;

    fn check_aliasing() -> Result<(), StoreError> {
        Ok(())
    }

    fn run<'w, V>(_world: &'w mut World, _visitor: V) -> Result<usize, StoreError>
    where
        V: FnMut(Entity, Self::Item<'w>) -> ControlFlow<()>,
    {
        Ok(0)
    }
}

fn first_alias(ids: &[(ComponentTypeId, &'static str)]) -> Option<&'static str> {
    ids.iter().enumerate().find_map(|(i, (id, name))| {
        ids[i + 1..]
            .iter()
            .any(|(other, _)| other == id)
            .then_some(*name)
    })
}

macro_rules! impl_query {
    ($count:expr; $($name:ident $cursor:ident),+) => {
        impl<$($name: Component),+> sealed::Sealed for ($($name,)+) {}

        impl<$($name: Component),+> Query for ($($name,)+) {
            type Item<'w> = ($(&'w mut $name,)+);

            const ARITY: usize = $count;

            fn check_aliasing() -> Result<(), StoreError> {
                let ids = [$((ComponentTypeId::of::<$name>(), $name::type_name()),)+];
                match first_alias(&ids) {
                    Some(component) => Err(StoreError::AliasedQuery { component }),
                    None => Ok(()),
                }
            }

            fn run<'w, V>(world: &'w mut World, mut visitor: V) -> Result<usize, StoreError>
            where
                V: FnMut(Entity, Self::Item<'w>) -> ControlFlow<()>,
            {
                // `get_disjoint_mut` panics on repeated keys.
                Self::check_aliasing()?;
                let [$($cursor),+] = world
                    .columns
                    .get_disjoint_mut([$(&ComponentTypeId::of::<$name>()),+]);
                $(
                    let Some(mut $cursor): Option<Cursor<'w, $name>> = $cursor
                        .and_then(|column| column.as_any_mut().downcast_mut::<Column<$name>>())
                        .map(Column::cursor)
                    else {
                        tracing::trace!(component = $name::type_name(), "no column; query is empty");
                        return Ok(0);
                    };
                )+

                let mut visited = 0;
                loop {
                    match merge::step(&[$($cursor.head()),+]) {
                        Step::Exhausted => break,
                        Step::Match(entity) => {
                            let ($(Some($cursor),)+) = ($($cursor.take(),)+) else {
                                unreachable!("every cursor sits on the matched entity");
                            };
                            visited += 1;
                            if visitor(entity, ($($cursor,)+)).is_break() {
                                break;
                            }
                        }
                        Step::Lagging(min) => {
                            $(
                                if $cursor.head() == min {
                                    $cursor.advance();
                                }
                            )+
                        }
                    }
                }
                Ok(visited)
            }
        }
    };
}

impl_query!(1; A a);
impl_query!(2; A a, B b);
impl_query!(3; A a, B b, C c);
impl_query!(4; A a, B b, C c, D d);
impl_query!(5; A a, B b, C c, D d, E e);
impl_query!(6; A a, B b, C c, D d, E e, F f);
impl_query!(7; A a, B b, C c, D d, E e, F f, G g);
impl_query!(8; A a, B b, C c, D d, E e, F f, G g, H h);
