//! Store error types.

use crate::entity::Entity;

/// Errors surfaced by the component store.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// The reserved end-of-list value was offered as an entity id.
    #[error("entity id {0} is reserved as the end-of-list marker")]
    InvalidEntity(u64),

    /// The entity has no entry in the component's column.
    #[error("component {component} not found on {entity}")]
    NotFound {
        /// The entity that was looked up.
        entity: Entity,
        /// Name of the component type.
        component: &'static str,
    },

    /// An assignment would break ascending order under the strict policy.
    #[error("{entity} assigned to {component} after {last}; ids must not decrease")]
    OutOfOrder {
        /// Name of the component type.
        component: &'static str,
        /// The rejected entity.
        entity: Entity,
        /// The last live entity in the column.
        last: Entity,
    },

    /// A query named the same component type more than once.
    #[error("component {component} requested more than once in a single query")]
    AliasedQuery {
        /// Name of the repeated component type.
        component: &'static str,
    },
}
