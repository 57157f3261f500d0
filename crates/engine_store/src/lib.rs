//! # engine_store
//!
//! The entity-component store behind the space engine: typed component
//! columns keyed by entity id, and queries that intersect any fixed
//! combination of columns in a single sorted merge pass.
//!
//! This crate provides:
//!
//! - [`Entity`]: `u64` entity ids with a reserved end-of-list sentinel.
//! - [`EntityAllocator`]: monotonically increasing id allocator.
//! - [`Component`]: the contract all stored data must satisfy.
//! - [`Column`]: sorted, sentinel-terminated storage for one component type.
//! - [`World`]: the store (assign, look up, remove, clear, enumerate).
//! - [`Query`]: tuples of component types that [`World::enumerate`] can
//!   intersect.
//! - [`WorldConfig`] / [`OrderPolicy`]: how columns keep their order.

pub mod column;
pub mod component;
pub mod config;
pub mod entity;
pub mod error;
mod merge;
pub mod query;
pub mod world;

pub use column::Column;
pub use component::{Component, ComponentTypeId};
pub use config::{OrderPolicy, WorldConfig};
pub use entity::{Entity, EntityAllocator};
pub use error::StoreError;
pub use query::Query;
pub use world::World;
