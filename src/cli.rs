// cli.rs - Command-line interface configuration
use clap::Parser;
use glam::Vec2;
use std::path::PathBuf;

use crate::config::OverlayStrategy;

#[derive(Parser, Debug, Clone)]
#[command(name = "walkman-scene")]
#[command(about = "Interactive walkman scene: button picking and video overlay placement", long_about = None)]
pub struct Cli {
    /// glTF model to load (defaults to the config's model path)
    #[arg(long)]
    pub model: Option<PathBuf>,

    /// JSON scene config; built-in defaults when omitted
    #[arg(long)]
    pub config: Option<PathBuf>,

    #[arg(long, default_value_t = 1280.0)]
    pub width: f32,

    #[arg(long, default_value_t = 720.0)]
    pub height: f32,

    /// Override the config's overlay strategy
    #[arg(long, value_enum)]
    pub strategy: Option<OverlayStrategy>,

    /// Pointer press at client coordinates, e.g. `--press 640,360`. Repeatable.
    #[arg(long = "press", value_parser = parse_point)]
    pub presses: Vec<Vec2>,

    /// Press each named button in order, e.g. `--button PlayButton`. Repeatable.
    #[arg(long = "button")]
    pub buttons: Vec<String>,

    /// Reject playback as a browser would before any user gesture
    #[arg(long, default_value = "false")]
    pub autoplay_blocked: bool,
}

fn parse_point(s: &str) -> Result<Vec2, String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected X,Y but got '{s}'"))?;
    let parse = |v: &str| {
        v.trim()
            .parse::<f32>()
            .map_err(|e| format!("invalid coordinate '{v}': {e}"))
    };
    Ok(Vec2::new(parse(x)?, parse(y)?))
}
