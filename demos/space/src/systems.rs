//! Setup, command, update and render passes for the space demo.
//!
//! Each pass takes the [`World`] by reference; none of them keep state of
//! their own.

use engine_store::{Entity, EntityAllocator, StoreError, World};
use glam::{Quat, Vec2, Vec3};
use tracing::{debug, info};

use crate::components::{Destination, Rectangle, Transform, Triangle};

/// Squared distance under which a mover counts as arrived.
pub const ARRIVAL_DISTANCE_SQUARED: f32 = 15.0;

/// Entities created by [`setup`].
#[derive(Debug, Clone, Copy)]
pub struct Scene {
    /// The square that follows move commands.
    pub square: Entity,
    /// A triangle that stays put.
    pub triangle: Entity,
}

/// Populate the world with the starting scene.
///
/// # Errors
///
/// Propagates store errors from assignment.
pub fn setup(world: &mut World) -> Result<Scene, StoreError> {
    let mut allocator = EntityAllocator::starting_at(0);

    let square = allocator.allocate()?;
    world.assign_default::<Transform>(square)?.position = Vec3::new(400.0, 400.0, 0.0);
    world.assign_default::<Rectangle>(square)?;

    let triangle = allocator.allocate()?;
    let transform = world.assign_default::<Transform>(triangle)?;
    transform.position = Vec3::new(200.0, 200.0, 0.0);
    transform.orientation = Quat::from_axis_angle(Vec3::Z, 0.0);
    world.assign_default::<Triangle>(triangle)?;

    info!(%square, %triangle, "scene ready");
    Ok(Scene { square, triangle })
}

/// Send `entity` towards `target`, replacing any destination it already has.
///
/// # Errors
///
/// Propagates store errors from assignment.
pub fn command_move(world: &mut World, entity: Entity, target: Vec2) -> Result<(), StoreError> {
    debug!(%entity, x = target.x, y = target.y, "move command");
    match world.get_mut::<Destination>(entity) {
        Some(destination) => destination.position = target,
        None => {
            world.assign(entity, Destination { position: target })?;
        }
    }
    Ok(())
}

/// Step every entity with a destination `speed` units towards it, dropping
/// the destination on arrival. Returns how many entities arrived.
///
/// # Errors
///
/// Propagates store errors from the query and removals.
pub fn update(world: &mut World, speed: f32) -> Result<usize, StoreError> {
    let mut arrived = Vec::new();
    world.enumerate::<(Transform, Destination), _>(|entity, (transform, destination)| {
        let dir = (destination.position - transform.xy()).normalize_or_zero();
        transform.position += (dir * speed).extend(0.0);
        if transform.xy().distance_squared(destination.position) < ARRIVAL_DISTANCE_SQUARED {
            arrived.push(entity);
        }
    })?;

    // Structural changes wait until the pass is over.
    for &entity in &arrived {
        world.remove::<Destination>(entity)?;
        info!(%entity, "arrived");
    }
    Ok(arrived.len())
}

/// The shape a draw call uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// Three-vertex line loop.
    Triangle,
    /// Four-vertex line loop.
    Rectangle,
}

impl Shape {
    /// Vertices in the line loop.
    #[must_use]
    pub fn vertex_count(self) -> u32 {
        match self {
            Self::Triangle => 3,
            Self::Rectangle => 4,
        }
    }
}

/// One draw a renderer would issue.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Draw {
    /// The drawn entity.
    pub entity: Entity,
    /// Which line loop to draw.
    pub shape: Shape,
    /// Model transform.
    pub model: glam::Mat4,
}

/// Collect the frame's draws: triangles first, then rectangles.
///
/// # Errors
///
/// Propagates store errors from the queries.
pub fn render(world: &mut World) -> Result<Vec<Draw>, StoreError> {
    let mut draws = Vec::new();
    world.enumerate::<(Transform, Triangle), _>(|entity, (transform, _)| {
        draws.push(draw(entity, Shape::Triangle, transform));
    })?;
    world.enumerate::<(Transform, Rectangle), _>(|entity, (transform, _)| {
        draws.push(draw(entity, Shape::Rectangle, transform));
    })?;
    Ok(draws)
}

fn draw(entity: Entity, shape: Shape, transform: &Transform) -> Draw {
    Draw {
        entity,
        shape,
        model: glam::Mat4::from_rotation_translation(transform.orientation, transform.position),
    }
}
