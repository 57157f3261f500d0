//! Core [`Component`] trait and its type identity.
//!
//! A component is any `Default + 'static` type that names itself. The default
//! value fills the sentinel slot at the end of every column, so a type with
//! no sensible default cannot be a component.

use std::any::TypeId;

/// Identifies a component type inside a [`World`](crate::World).
///
/// Backed by [`TypeId`], so two distinct Rust types never share a column even
/// when their [`Component::type_name`] strings collide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ComponentTypeId(TypeId);

impl ComponentTypeId {
    /// The identifier for component type `T`.
    #[must_use]
    pub fn of<T: Component>() -> Self {
        Self(TypeId::of::<T>())
    }
}

/// The core component trait.
///
/// # Examples
///
/// ```rust
/// use engine_store::Component;
///
/// #[derive(Debug, Default)]
/// struct Health {
///     current: f32,
///     max: f32,
/// }
///
/// impl Component for Health {
///     fn type_name() -> &'static str { "Health" }
/// }
/// ```
pub trait Component: Default + 'static {
    /// A human-readable name for this component type, used in logs and
    /// errors.
    fn type_name() -> &'static str;

    /// Returns the [`ComponentTypeId`] for this component.
    fn component_type_id() -> ComponentTypeId {
        ComponentTypeId::of::<Self>()
    }
}
