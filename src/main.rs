//! SquareCrop - Interactive square image cropper
//!
//! Main entry point for the GUI application.
//!
//! # Overview
//!
//! This binary crate provides the Slint GUI frontend. It initializes:
//! - Configuration loading ([`ConfigManager`])
//! - Logging infrastructure (daily file rotation + optional console output)
//! - The cropping session ([`SessionController`] over [`FsImageBackend`])
//! - GUI controller ([`GuiController`] - bridges the Slint window with the session)
//!
//! Everything runs on the main thread inside the Slint event loop: every
//! button press, drag and key press is handled to completion before the
//! next one.
//!
//! # Configuration Files
//!
//! Read from the `Cropper Data/` directory if present:
//! - `Cropper Settings.yaml`: recognized extensions, output folder name,
//!   sidebar label lengths and logging switches (all optional)

use anyhow::{Context, Result};
use squarecrop::ui::GuiController;
use squarecrop::{APP_NAME, ConfigManager, FsImageBackend, SessionController, VERSION};

fn main() -> Result<()> {
    // Settings come first since they decide the log level
    let config_manager = ConfigManager::new("Cropper Data")?;
    let user_config = config_manager.load_user_config()?;
    let settings = user_config.cropper_settings;

    // Keep the guard alive until exit so buffered log lines are flushed
    let _guard = squarecrop::logging::setup_logging(
        "logs",
        "squarecrop",
        settings.debug_mode,
        settings.console_logging,
    )?;

    tracing::info!("Starting {} v{}", APP_NAME, VERSION);
    tracing::info!(
        "Settings loaded from {} - extensions: {:?}, output folder: {}",
        config_manager.user_config_path(),
        settings.image_extensions,
        settings.output_folder
    );

    let session = SessionController::new(FsImageBackend::new(), settings);
    let gui_controller = GuiController::new(session).context("Failed to start the GUI")?;

    tracing::info!("GUI controller initialized, launching window");

    // Run the GUI (blocks until window is closed)
    let result = gui_controller.run();

    tracing::info!("Application shutdown complete");

    result.map_err(|e| {
        tracing::error!("GUI error: {}", e);
        anyhow::anyhow!("GUI error: {}", e)
    })
}
