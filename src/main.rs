use anyhow::{Context, Result};
use clap::Parser;
use glam::UVec2;
use log::{error, info, warn};
use std::path::PathBuf;

use walkman_scene::cli::Cli;
use walkman_scene::input::{PointerInput, Viewport};
use walkman_scene::loader::{load_gltf, LoadProgress};
use walkman_scene::media::{MemoryVideo, ReadyState, SourceKind, VideoSource};
use walkman_scene::{SceneConfig, WalkmanScene};

const FRAME_SECS: f32 = 1.0 / 60.0;

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => SceneConfig::load(path).with_context(|| format!("Failed to read config {:?}", path))?,
        None => SceneConfig::default(),
    };
    if let Some(strategy) = cli.strategy {
        config.overlay.strategy = strategy;
    }
    let model_path = cli
        .model
        .clone()
        .unwrap_or_else(|| PathBuf::from(&config.model.path));

    let video_config = config.video.clone();
    info!(
        "Video source {} ({:?})",
        video_config.url,
        SourceKind::from_url(&video_config.url)
    );
    let mut video = MemoryVideo::new(
        video_config.url.as_str(),
        UVec2::new(video_config.width, video_config.height),
        video_config.duration_secs.unwrap_or(f64::INFINITY),
    )
    .looping(video_config.looping);
    if cli.autoplay_blocked {
        video = video.block_autoplay();
    }

    let mut scene = WalkmanScene::new(config, video, Viewport::new(cli.width, cli.height));
    let lights = scene.lights();
    info!(
        "Lighting: ambient {}, hemisphere {} ({:?} over {:?}), {} directional, exposure {}, background {:?}, environment {}",
        lights.ambient_intensity,
        lights.hemisphere.intensity,
        lights.hemisphere.sky,
        lights.hemisphere.ground,
        lights.directional.len(),
        lights.exposure,
        lights.background,
        lights.environment
    );
    let mut progress = LoadProgress::new();
    progress.item_started();
    progress.item_started();

    // Model and video finish in either order; the scene tracks both.
    scene.video_mut().set_ready_state(ReadyState::HaveEnoughData);
    if let Err(e) = scene.video_ready() {
        error!("Video texture unavailable: {e}");
    }
    progress.item_finished();
    info!("Loading {}%", progress.percent());

    match load_gltf(scene.graph_mut(), &model_path) {
        Ok(root) => {
            // Setup failures are already logged; the model stays on screen either way
            let _ = scene.attach_model(root);
        }
        Err(e) => error!("Model unavailable: {e:#}"),
    }
    progress.item_finished();
    if progress.is_complete() {
        info!("All assets loaded.");
    }

    let mut presses = cli.presses.clone();
    if let Some(root) = scene.model_root() {
        for name in &cli.buttons {
            match scene
                .graph()
                .find_by_name(root, name)
                .and_then(|node| scene.client_position_of(node))
            {
                Some(client) => presses.push(client),
                None => warn!("Button '{name}' is not on screen"),
            }
        }
    }

    for client in presses {
        let action = scene.handle_pointer(PointerInput::Down(client));
        scene.handle_pointer(PointerInput::Up);
        match action {
            Some(action) => println!("press ({:.0}, {:.0}) -> {action}", client.x, client.y),
            None => println!("press ({:.0}, {:.0}) -> nothing", client.x, client.y),
        }
        for _ in 0..60 {
            scene.update(FRAME_SECS);
        }
        scene.video_mut().advance(1.0);
    }

    let video = scene.video();
    println!("overlay: {:?}", scene.overlay_state());
    println!(
        "video: {} at {:.1}s{}",
        if video.is_paused() { "paused" } else { "playing" },
        video.current_time(),
        if video.is_muted() { " (muted)" } else { "" }
    );
    Ok(())
}
