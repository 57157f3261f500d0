//! # space
//!
//! Headless run of the space scene: a square that flies to a target point and
//! a triangle that stays put. Each tick runs the update pass and then the
//! render pass, logging the draws a renderer would issue.
//!
//! ```text
//! RUST_LOG=space=debug cargo run -p space -- --ticks 200 --target 420,380
//! ```

mod components;
mod systems;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use glam::Vec2;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use components::Transform;
use engine_store::{World, WorldConfig};

#[derive(Parser)]
#[command(name = "space", about = "Headless space demo over the component store")]
struct Args {
    /// Number of update + render ticks to run
    #[arg(short, long, default_value_t = 120)]
    ticks: u64,

    /// JSON file holding a `WorldConfig`
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Where to send the square, as `X,Y`
    #[arg(long, value_parser = parse_point, default_value = "450,380")]
    target: Vec2,

    /// Units moved per tick
    #[arg(long, default_value_t = 1.0)]
    speed: f32,
}

fn parse_point(s: &str) -> Result<Vec2, String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected X,Y, got {s:?}"))?;
    let x = x.trim().parse::<f32>().map_err(|e| e.to_string())?;
    let y = y.trim().parse::<f32>().map_err(|e| e.to_string())?;
    Ok(Vec2::new(x, y))
}

fn load_config(path: Option<&PathBuf>) -> Result<WorldConfig> {
    let Some(path) = path else {
        return Ok(WorldConfig::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    let config = serde_json::from_str(&text)
        .with_context(|| format!("parsing config {}", path.display()))?;
    Ok(config)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "space=info,engine_store=info".into()),
        )
        .init();

    let args = Args::parse();
    let config = load_config(args.config.as_ref())?;
    info!(order = ?config.order, ticks = args.ticks, "space demo starting");

    let mut world = World::with_config(config);
    let scene = systems::setup(&mut world)?;
    systems::command_move(&mut world, scene.square, args.target)?;

    for tick in 0..args.ticks {
        systems::update(&mut world, args.speed)?;
        for draw in systems::render(&mut world)? {
            let position = draw.model.w_axis.truncate();
            debug!(
                tick,
                entity = draw.entity.id(),
                shape = ?draw.shape,
                vertices = draw.shape.vertex_count(),
                x = position.x,
                y = position.y,
                "draw"
            );
        }
    }

    world.enumerate::<(Transform,), _>(|entity, (transform,)| {
        let state = serde_json::to_string(transform).unwrap_or_default();
        info!(%entity, %state, "final transform");
    })?;

    info!("space demo finished");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_point() {
        assert_eq!(parse_point("1.5, -2").unwrap(), Vec2::new(1.5, -2.0));
        assert!(parse_point("12").is_err());
        assert!(parse_point("a,b").is_err());
    }

    #[test]
    fn test_args_defaults() {
        let args = Args::parse_from(["space"]);
        assert_eq!(args.ticks, 120);
        assert_eq!(args.target, Vec2::new(450.0, 380.0));
        assert!(args.config.is_none());
    }

    #[test]
    fn test_missing_config_is_default() {
        assert_eq!(load_config(None).unwrap(), WorldConfig::default());
        assert!(load_config(Some(&PathBuf::from("/nonexistent/space.json"))).is_err());
    }
}
