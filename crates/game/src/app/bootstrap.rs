use engine::{LoopConfig, Scene};
use tracing::info;
use tracing_subscriber::EnvFilter;

use super::config::{ConfigError, GameConfig};
use super::gameplay;

pub(crate) struct AppWiring {
    pub(crate) config: LoopConfig,
    pub(crate) scene: Box<dyn Scene>,
}

pub(crate) fn build_app() -> Result<AppWiring, ConfigError> {
    init_tracing();
    info!("=== Chocobots Startup ===");

    let game_config = GameConfig::load()?;
    let size = game_config.grid_size()?;
    info!(
        grid_size = size.get(),
        seed = ?game_config.seed,
        autoplay_step_ticks = game_config.autoplay_step_ticks,
        "game_config"
    );
    let scene = gameplay::build_scene(size, game_config.seed, game_config.autoplay_step_ticks);

    Ok(AppWiring {
        config: LoopConfig::default(),
        scene: Box::new(scene),
    })
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_names(true)
        .compact()
        .init();
}
