pub mod camera;
pub mod cli;
pub mod config;
pub mod controls;
pub mod error;
pub mod input;
pub mod interaction;
pub mod lighting;
pub mod loader;
pub mod math;
pub mod media;
pub mod overlay;
pub mod scene;
pub mod session;

pub use config::SceneConfig;
pub use error::{ConfigError, MediaError, SetupError};
pub use interaction::Action;
pub use session::WalkmanScene;
