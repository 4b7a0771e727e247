// SquareCrop - Interactive square cropping of every image in a directory
//
// This is the library crate containing the session state machine, the
// geometry and image services and the GUI controller.
// The binary crate (main.rs) provides the GUI entry point.

pub mod config;
pub mod logging;
pub mod models;
pub mod services;
pub mod state;
pub mod ui;

// Re-export commonly used types for convenience
pub use config::ConfigManager;
pub use models::{
    Advance, CropRectangle, CropperSettings, DragRegion, Point, Session, SessionPhase, UserConfig,
};
pub use services::{FsImageBackend, ImageBackend, normalize};
pub use state::{CropOutcome, SessionController, SessionError, SessionEvent};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
