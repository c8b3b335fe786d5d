mod autoplay;
mod commands;
mod controller;
mod grid;
mod robot;
mod scene;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;

pub(crate) use grid::{GridSize, GridSizeError};
pub(crate) use scene::ChocolateScene;

use controller::Game;

/// Builds the scene at `size`. A fixed seed makes every board reproducible;
/// without one the generator is seeded from the OS.
pub(crate) fn build_scene(
    size: GridSize,
    seed: Option<u64>,
    autoplay_step_ticks: u32,
) -> ChocolateScene {
    let rng = match seed {
        Some(seed) => {
            info!(seed, "rng_seeded");
            StdRng::seed_from_u64(seed)
        }
        None => StdRng::from_entropy(),
    };
    ChocolateScene::new(Game::new(size, rng), autoplay_step_ticks)
}

#[cfg(test)]
mod tests;
