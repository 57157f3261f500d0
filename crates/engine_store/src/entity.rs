//! Entity identifiers and allocation.
//!
//! An [`Entity`] is a `u64` identifier with no storage of its own. It is
//! "alive" while at least one column holds an entry for it.
//!
//! The value [`Entity::END_OF_LIST`] is reserved: it terminates every column
//! and orders after every valid id. It can never be built through the public
//! constructors, so a live entry can never be mistaken for the sentinel.

use serde::{Deserialize, Serialize};

use crate::error::StoreError;

/// An entity identifier.
///
/// Ordering follows the raw id, with [`Entity::END_OF_LIST`] greater than
/// every valid entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u64", into = "u64")]
pub struct Entity(u64);

impl Entity {
    /// The column terminator. Never a valid entity.
    pub const END_OF_LIST: Entity = Entity(u64::MAX);

    /// The largest id a live entity may have.
    pub const MAX: Entity = Entity(u64::MAX - 1);

    /// Create an entity from a raw id.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidEntity`] if `id` is the reserved
    /// end-of-list value.
    pub const fn new(id: u64) -> Result<Self, StoreError> {
        if id == Self::END_OF_LIST.0 {
            return Err(StoreError::InvalidEntity(id));
        }
        Ok(Self(id))
    }

    /// Returns the raw `u64` identifier.
    #[must_use]
    pub const fn id(self) -> u64 {
        self.0
    }

    /// Returns `true` if this is the end-of-list sentinel.
    #[must_use]
    pub const fn is_end(self) -> bool {
        self.0 == Self::END_OF_LIST.0
    }
}

impl TryFrom<u64> for Entity {
    type Error = StoreError;

    fn try_from(id: u64) -> Result<Self, Self::Error> {
        Self::new(id)
    }
}

impl From<Entity> for u64 {
    fn from(entity: Entity) -> Self {
        entity.0
    }
}

impl std::fmt::Display for Entity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_end() {
            f.write_str("Entity(END)")
        } else {
            write!(f, "Entity({})", self.0)
        }
    }
}

/// Hands out strictly increasing entity ids.
///
/// Ids from one allocator arrive in ascending order, which is what the
/// [`Append`](crate::OrderPolicy::Append) policy needs to keep columns sorted.
#[derive(Debug)]
pub struct EntityAllocator {
    next_id: u64,
}

impl EntityAllocator {
    /// Creates a new allocator. The first id handed out is 1.
    #[must_use]
    pub fn new() -> Self {
        Self { next_id: 1 }
    }

    /// Creates an allocator whose first id is `first`.
    #[must_use]
    pub fn starting_at(first: u64) -> Self {
        Self { next_id: first }
    }

    /// Allocates a fresh entity id.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidEntity`] once the id space is exhausted.
    pub fn allocate(&mut self) -> Result<Entity, StoreError> {
        let entity = Entity::new(self.next_id)?;
        self.next_id += 1;
        Ok(entity)
    }

    /// Returns the id the next call to [`allocate`](Self::allocate) will use.
    #[must_use]
    pub fn peek(&self) -> u64 {
        self.next_id
    }
}

impl Default for EntityAllocator {
    fn default() -> Self {
        Self::new()
    }
}
