// GUI Controller - Bridges the Slint window with the SessionController
//
// This module contains the GuiController which coordinates between:
// - Slint UI (MainWindow)
// - SessionController (session state machine)
// - rfd (native folder picker)
//
// It handles:
// - Forwarding button, pointer and key callbacks to the session
// - Draining session events after each action and updating the window

use crate::models::{DragRegion, Point};
use crate::services::imaging::{FsImageBackend, LoadedImage};
use crate::state::{CropOutcome, SessionController, SessionEvent};
use anyhow::{Context, Result};
use camino::Utf8PathBuf;
use slint::{ComponentHandle, Rgba8Pixel, SharedPixelBuffer};
use std::cell::RefCell;
use std::rc::Rc;
use tokio::sync::broadcast::{self, error::TryRecvError};

// Include the generated Slint code
slint::include_modules!();

type SharedController = Rc<RefCell<SessionController<FsImageBackend>>>;
type SharedEvents = Rc<RefCell<broadcast::Receiver<SessionEvent>>>;

/// GUI Controller that wires up the Slint UI with the cropping session
///
/// Everything runs on the Slint event-loop thread: each callback borrows the
/// controller, performs one operation to completion, then applies the
/// session events that operation produced.
///
/// # Example
/// ```ignore
/// let session = SessionController::new(FsImageBackend::new(), settings);
/// let gui = GuiController::new(session)?;
/// gui.run()?;  // Blocks until window is closed
/// ```
pub struct GuiController {
    /// The Slint UI window
    ui: MainWindow,

    /// Session shared with the UI callbacks
    session: SharedController,
}

impl GuiController {
    /// Create a new GUI controller around `session`
    pub fn new(session: SessionController<FsImageBackend>) -> Result<Self> {
        // Create the Slint UI
        let ui = MainWindow::new().context("Failed to create Slint UI")?;

        let events: SharedEvents = Rc::new(RefCell::new(session.subscribe()));
        let session = Rc::new(RefCell::new(session));

        // Initialize UI with current state
        Self::sync_ui_with_session(&ui, &session.borrow());

        Self::setup_callbacks(&ui, &session, &events);

        tracing::info!("GUI controller initialized");

        Ok(Self { ui, session })
    }

    /// Run the GUI (blocks until window is closed)
    pub fn run(self) -> Result<(), slint::PlatformError> {
        tracing::info!("Starting GUI event loop");
        let result = self.ui.run();

        let session = self.session.borrow();
        tracing::info!(
            "Event loop finished at image {} of {} (finished: {})",
            session.session().current_index + 1,
            session.session().filenames.len(),
            session.session().finished
        );

        result
    }

    /// Push the whole session state into the window
    ///
    /// Used at startup and whenever events were dropped.
    fn sync_ui_with_session(ui: &MainWindow, session: &SessionController<FsImageBackend>) {
        ui.set_window_title(session.window_title().into());
        ui.set_filenames_text(session.filename_listing().into());
        ui.set_status_text(session.session().status.clone().into());

        match session.current_image() {
            Some(image) => Self::show_image(ui, image),
            None => Self::clear_image(ui),
        }
        Self::show_selection(ui, session.selection());
    }

    fn setup_callbacks(ui: &MainWindow, session: &SharedController, events: &SharedEvents) {
        let ui_weak = ui.as_weak();
        let session_clone = Rc::clone(session);
        let events_clone = Rc::clone(events);

        // Select directory button
        ui.on_select_directory(move || {
            tracing::debug!("Select directory clicked");

            let Some(directory) = Self::show_folder_picker("Select directory") else {
                tracing::debug!("Folder picker cancelled");
                return;
            };

            let result = session_clone.borrow_mut().select_directory(&directory);
            if let Err(e) = result {
                tracing::warn!("Directory {} not fully opened: {}", directory, e);
            }

            if let Some(ui) = ui_weak.upgrade() {
                Self::apply_events(&ui, &session_clone.borrow(), &mut events_clone.borrow_mut());
            }
        });

        let session_clone = Rc::clone(session);

        // Pointer pressed over the image
        ui.on_drag_started(move |x, y| {
            session_clone.borrow_mut().on_drag_start(Point::new(x, y));
        });

        let ui_weak = ui.as_weak();
        let session_clone = Rc::clone(session);
        let events_clone = Rc::clone(events);

        // Pointer released over (or dragged out of) the image
        ui.on_drag_ended(move |x, y| {
            session_clone.borrow_mut().on_drag_end(Point::new(x, y));

            if let Some(ui) = ui_weak.upgrade() {
                Self::apply_events(&ui, &session_clone.borrow(), &mut events_clone.borrow_mut());
            }
        });

        let ui_weak = ui.as_weak();
        let session_clone = Rc::clone(session);
        let events_clone = Rc::clone(events);

        // Space pressed
        ui.on_confirm_crop(move || {
            let result = session_clone.borrow_mut().on_confirm();
            match result {
                Ok(CropOutcome::Saved { destination, .. }) => {
                    tracing::info!("Saved cropped image to {}", destination);
                }
                Ok(CropOutcome::Ignored) => {
                    tracing::debug!("Confirm had nothing to crop");
                }
                Err(e) => {
                    tracing::warn!("Crop not completed: {}", e);
                }
            }

            if let Some(ui) = ui_weak.upgrade() {
                Self::apply_events(&ui, &session_clone.borrow(), &mut events_clone.borrow_mut());
            }
        });

        tracing::debug!("UI callbacks configured");
    }

    /// Apply every pending session event to the window
    fn apply_events(
        ui: &MainWindow,
        session: &SessionController<FsImageBackend>,
        events: &mut broadcast::Receiver<SessionEvent>,
    ) {
        loop {
            match events.try_recv() {
                Ok(event) => Self::apply_event(ui, session, event),
                Err(TryRecvError::Lagged(skipped)) => {
                    tracing::warn!("Missed {} session events - resyncing window", skipped);
                    Self::sync_ui_with_session(ui, session);
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
            }
        }
    }

    fn apply_event(
        ui: &MainWindow,
        session: &SessionController<FsImageBackend>,
        event: SessionEvent,
    ) {
        tracing::trace!("Session event received: {:?}", event);

        match event {
            SessionEvent::DirectoryChanged { .. } | SessionEvent::SessionReset => {
                ui.set_window_title(session.window_title().into());
                ui.set_filenames_text(session.filename_listing().into());
            }
            SessionEvent::ImageLoaded { .. } => {
                // The latest image wins if several loads happened in one action
                if let Some(image) = session.current_image() {
                    Self::show_image(ui, image);
                }
            }
            SessionEvent::ImageCleared => Self::clear_image(ui),
            SessionEvent::SelectionChanged { region } => Self::show_selection(ui, region),
            SessionEvent::StatusChanged { status } => ui.set_status_text(status.into()),
            SessionEvent::CropSaved { filename, rect, .. } => {
                tracing::debug!("Crop of {} saved with {}", filename, rect);
            }
            SessionEvent::Finished => {
                tracing::info!("Directory finished");
            }
        }
    }

    /// Show `image` at its native pixel size
    fn show_image(ui: &MainWindow, image: &LoadedImage) {
        let rgba = image.pixels().to_rgba8();
        let buffer = SharedPixelBuffer::<Rgba8Pixel>::clone_from_slice(
            rgba.as_raw(),
            rgba.width(),
            rgba.height(),
        );

        ui.set_current_image(slint::Image::from_rgba8(buffer));
        ui.set_image_width(image.width() as i32);
        ui.set_image_height(image.height() as i32);
        ui.set_has_image(true);
    }

    fn clear_image(ui: &MainWindow) {
        ui.set_current_image(slint::Image::default());
        ui.set_has_image(false);
    }

    /// Outline the recorded drag, whichever direction it was made in
    fn show_selection(ui: &MainWindow, region: Option<DragRegion>) {
        match region {
            Some(region) => {
                let ordered = region.ordered();
                ui.set_selection_x(ordered.start.x);
                ui.set_selection_y(ordered.start.y);
                ui.set_selection_width(ordered.end.x.saturating_sub(ordered.start.x));
                ui.set_selection_height(ordered.end.y.saturating_sub(ordered.start.y));
                ui.set_has_selection(true);
            }
            None => ui.set_has_selection(false),
        }
    }

    /// Show a native folder picker dialog
    ///
    /// # Returns
    /// The selected directory, or None if cancelled or not valid UTF-8
    fn show_folder_picker(title: &str) -> Option<Utf8PathBuf> {
        use rfd::FileDialog;

        FileDialog::new().set_title(title).pick_folder().and_then(|path| {
            Utf8PathBuf::try_from(path)
                .map_err(|e| {
                    tracing::error!("Failed to convert path to UTF-8: {}", e);
                    e
                })
                .ok()
        })
    }
}
