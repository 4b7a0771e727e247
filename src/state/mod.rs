// Session state machine
//
// This module provides the SessionController which owns the Session, the image
// currently on screen and the operator's drag, and emits change events so the
// window can refresh without polling.

use crate::models::{
    Advance, CropRectangle, CropperSettings, DragRegion, Point, Session, SessionPhase,
};
use crate::services::imaging::{ImageBackend, ImageError, LoadedImage};
use crate::services::normalizer::normalize;
use crate::services::scanner::{DirectoryScanner, ScanError};
use camino::{Utf8Path, Utf8PathBuf};
use thiserror::Error;
use tokio::sync::broadcast;

/// Status shown when the operator confirms before dragging a region.
pub const NO_SELECTION_STATUS: &str = "Drag a region before confirming.";

/// Change events emitted when the session is modified
///
/// These events are emitted to notify interested parties (primarily the GUI)
/// about state changes without requiring them to poll the controller.
#[derive(Clone, Debug, PartialEq)]
pub enum SessionEvent {
    /// A directory was opened (or the filename list changed)
    DirectoryChanged {
        directory: Option<Utf8PathBuf>,
        total_images: usize,
    },

    /// A new current image is available for display
    ImageLoaded {
        index: usize,
        filename: String,
        width: u32,
        height: u32,
    },

    /// There is no longer a current image
    ImageCleared,

    /// The recorded drag changed (`None` once it was consumed or dropped)
    SelectionChanged { region: Option<DragRegion> },

    /// A crop was written to disk
    CropSaved {
        filename: String,
        destination: Utf8PathBuf,
        rect: CropRectangle,
    },

    /// Status text changed
    StatusChanged { status: String },

    /// The last image of the directory was processed
    Finished,

    /// Session has been reset
    SessionReset,
}

/// Errors surfaced by session operations.
///
/// Each one ends the current operation only; the message is also written to
/// the session's status text.
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("{0}")]
    Directory(#[from] ScanError),

    #[error("Could not load {filename}: {source}")]
    ImageLoad {
        filename: String,
        #[source]
        source: ImageError,
    },

    #[error("Could not save crop of {filename}: {source}")]
    ImageSave {
        filename: String,
        #[source]
        source: ImageError,
    },
}

/// What a crop confirmation did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CropOutcome {
    /// The crop was saved and the cursor moved on
    Saved {
        destination: Utf8PathBuf,
        rect: CropRectangle,
        advance: Advance,
    },

    /// No image was on screen (idle, empty, finished or halted on a bad file)
    Ignored,
}

/// Drives one cropping session over a directory of images.
///
/// The controller is the single owner of the [`Session`], the decoded
/// [`LoadedImage`] and the pending drag. Operator actions arrive one at a time
/// as plain method calls (`select_directory`, `on_drag_start`, `on_drag_end`,
/// `on_confirm`); each runs to completion before the next one.
///
/// # Related Types
///
/// - [`crate::models::Session`]: the cursor and its pure transitions
/// - [`SessionEvent`]: Event types emitted on mutations
/// - [`crate::services::imaging::ImageBackend`]: load/crop/save collaborator
/// - [`crate::ui::GuiController`]: Primary consumer of session events
pub struct SessionController<B: ImageBackend> {
    backend: B,
    scanner: DirectoryScanner,
    settings: CropperSettings,

    session: Session,
    current: Option<LoadedImage>,

    drag_start: Option<Point>,
    selection: Option<DragRegion>,

    /// Broadcast channel for emitting session change events
    events_tx: broadcast::Sender<SessionEvent>,
}

impl<B: ImageBackend> SessionController<B> {
    /// Create an idle controller
    ///
    /// # Returns
    /// A new SessionController with a broadcast channel buffer of 100 events
    pub fn new(backend: B, settings: CropperSettings) -> Self {
        let (events_tx, _) = broadcast::channel(100);
        Self {
            backend,
            scanner: DirectoryScanner::from_settings(&settings),
            settings,
            session: Session::default(),
            current: None,
            drag_start: None,
            selection: None,
            events_tx,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Owned copy of the session for callers that outlive the borrow
    pub fn snapshot(&self) -> Session {
        self.session.clone()
    }

    pub fn phase(&self) -> SessionPhase {
        self.session.phase()
    }

    pub fn settings(&self) -> &CropperSettings {
        &self.settings
    }

    pub fn current_image(&self) -> Option<&LoadedImage> {
        self.current.as_ref()
    }

    pub fn current_dimensions(&self) -> Option<(u32, u32)> {
        self.current.as_ref().map(LoadedImage::dimensions)
    }

    /// The last completed drag, if it has not been consumed by a crop yet
    pub fn selection(&self) -> Option<DragRegion> {
        self.selection
    }

    /// Subscribe to session change events
    ///
    /// Returns a receiver that will get notified of all future changes.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events_tx.subscribe()
    }

    /// Sidebar listing of the session's filenames
    pub fn filename_listing(&self) -> String {
        self.session
            .filename_listing(self.settings.label_head, self.settings.label_tail)
    }

    pub fn window_title(&self) -> String {
        self.session.window_title()
    }

    // ===== Operations =====

    /// Open `path` as the new working directory.
    ///
    /// A finished session is reset first. Any other session is replaced by
    /// the new one, so the filename list always belongs to one directory.
    /// If the scan fails the error is shown in the status text. A session
    /// that was still running is left as it was; a finished one stays reset
    /// (empty filename list, previous directory kept).
    pub fn select_directory(&mut self, path: impl AsRef<Utf8Path>) -> Result<(), SessionError> {
        let directory = path.as_ref().to_path_buf();
        tracing::info!("Directory selected: {}", directory);

        if self.session.is_finished() {
            self.reset();
        }

        let scan = match self.scanner.scan(&directory) {
            Ok(scan) => scan,
            Err(e) => {
                let err = SessionError::from(e);
                tracing::error!("Cannot use {}: {}", directory, err);
                self.set_status(err.to_string());
                return Err(err);
            }
        };

        self.clear_image();
        self.clear_selection();
        self.drag_start = None;

        let total = scan.filenames.len();
        self.update(|session| {
            *session = Session::start(directory.clone(), scan.filenames);
        });

        if total == 0 {
            tracing::warn!("No recognized images in {}", directory);
            self.set_status(format!("No images found in {}.", directory));
            return Ok(());
        }

        self.load_current()
    }

    /// Decode the image under the cursor.
    ///
    /// Does nothing when there is no current filename. A file that cannot be
    /// decoded halts the session on that file: the error goes to the status
    /// text and no image is current until another directory is chosen.
    pub fn load_current(&mut self) -> Result<(), SessionError> {
        let (Some(filename), Some(path)) = (
            self.session.current_filename().map(str::to_owned),
            self.session.current_source_path(),
        ) else {
            tracing::debug!("No current image to load ({:?})", self.phase());
            return Ok(());
        };

        match self.backend.load(&path) {
            Ok(image) => {
                let (width, height) = image.dimensions();
                let index = self.session.current_index;
                tracing::info!(
                    "Loaded {} ({}x{}) [{}/{}, {} left]",
                    filename,
                    width,
                    height,
                    index + 1,
                    self.session.filenames.len(),
                    self.session.remaining()
                );

                self.current = Some(image);
                self.emit(SessionEvent::ImageLoaded {
                    index,
                    filename,
                    width,
                    height,
                });
                Ok(())
            }
            Err(source) => {
                let err = SessionError::ImageLoad { filename, source };
                tracing::error!("{}", err);
                self.clear_image();
                self.set_status(err.to_string());
                Err(err)
            }
        }
    }

    /// Save a square crop of the current image and move on.
    ///
    /// Reversed drags are ordered before normalizing. The crop is written to
    /// `<directory>/<output folder>/<filename>`, replacing an existing file.
    /// If saving fails the cursor stays put so the operator can retry.
    /// Without a current image this is a no-op returning
    /// [`CropOutcome::Ignored`].
    pub fn confirm_crop(&mut self, region: DragRegion) -> Result<CropOutcome, SessionError> {
        let (Some(image), Some(filename), Some(destination)) = (
            self.current.as_ref(),
            self.session.current_filename().map(str::to_owned),
            self.session
                .current_output_path(&self.settings.output_folder),
        ) else {
            tracing::warn!(
                "Crop confirmed with no image on screen ({:?}) - ignoring",
                self.session.phase()
            );
            return Ok(CropOutcome::Ignored);
        };

        if region.is_reversed() {
            tracing::debug!("Reversed drag {:?} - swapping corners", region);
        }
        let ordered = region.ordered();
        let rect = normalize(ordered.start, ordered.end);
        tracing::debug!("Cropping {} to {}", filename, rect);

        if let Err(source) = self.backend.save_crop(image, rect, &destination) {
            let err = SessionError::ImageSave { filename, source };
            tracing::error!("{}", err);
            self.set_status(err.to_string());
            return Err(err);
        }

        self.emit(SessionEvent::CropSaved {
            filename,
            destination: destination.clone(),
            rect,
        });
        self.clear_selection();
        self.set_status(String::new());

        let advance = self.advance()?;
        Ok(CropOutcome::Saved {
            destination,
            rect,
            advance,
        })
    }

    /// Move to the next image, or finish the session after the last one.
    ///
    /// Loads the next image when the cursor moves. Finishing sets the
    /// "no more images" status and loads nothing.
    pub fn advance(&mut self) -> Result<Advance, SessionError> {
        let mut outcome = Advance::Unchanged;
        self.update(|session| outcome = session.advance());

        match outcome {
            Advance::Moved(index) => {
                tracing::debug!("Advanced to image {}", index + 1);
                self.load_current()?;
            }
            Advance::Finished => {
                tracing::info!(
                    "All {} image(s) processed",
                    self.session.filenames.len()
                );
                self.clear_image();
            }
            Advance::Unchanged => {
                tracing::debug!("Nothing to advance ({:?})", self.phase());
            }
        }

        Ok(outcome)
    }

    /// Clear filenames, status, cursor, current image and drag.
    ///
    /// The directory is kept.
    pub fn reset(&mut self) {
        self.update(Session::reset);
        self.clear_image();
        self.clear_selection();
        self.drag_start = None;

        tracing::info!("Session reset");
        self.emit(SessionEvent::SessionReset);
    }

    // ===== Pointer and keyboard surface =====

    /// Record where a drag started.
    pub fn on_drag_start(&mut self, point: Point) {
        tracing::debug!("Recorded start of crop drag at x: {} y: {}", point.x, point.y);
        self.drag_start = Some(point);
    }

    /// Complete a drag, replacing any previously recorded region.
    ///
    /// Returns `None` when no drag start was recorded.
    pub fn on_drag_end(&mut self, point: Point) -> Option<DragRegion> {
        let Some(start) = self.drag_start.take() else {
            tracing::warn!("Drag ended at {:?} without a recorded start", point);
            return None;
        };

        let region = DragRegion::new(start, point);
        let (dx, dy) = region.extent();
        match self.current_dimensions() {
            Some((width, height)) => tracing::debug!(
                "Recorded end of crop drag at x: {} y: {} (image {}x{}, drag {}x{})",
                point.x,
                point.y,
                width,
                height,
                dx,
                dy
            ),
            None => tracing::debug!("Recorded end of crop drag at x: {} y: {}", point.x, point.y),
        }

        self.selection = Some(region);
        self.emit(SessionEvent::SelectionChanged {
            region: Some(region),
        });
        Some(region)
    }

    /// Confirm the recorded drag.
    ///
    /// Ignored when no image is on screen; without a recorded drag the
    /// operator is asked to drag a region first.
    pub fn on_confirm(&mut self) -> Result<CropOutcome, SessionError> {
        if self.current.is_none() {
            tracing::debug!("Confirm ignored ({:?})", self.phase());
            return Ok(CropOutcome::Ignored);
        }

        match self.selection {
            Some(region) => self.confirm_crop(region),
            None => {
                self.set_status(NO_SELECTION_STATUS);
                Ok(CropOutcome::Ignored)
            }
        }
    }

    // ===== Internals =====

    /// Apply `update_fn` to the session and broadcast what changed.
    fn update<F>(&mut self, update_fn: F) -> Vec<SessionEvent>
    where
        F: FnOnce(&mut Session),
    {
        let old_session = self.session.clone();

        update_fn(&mut self.session);

        let changes = Self::detect_changes(&old_session, &self.session);
        for change in &changes {
            self.emit(change.clone());
        }

        changes
    }

    fn detect_changes(old: &Session, new: &Session) -> Vec<SessionEvent> {
        let mut changes = Vec::new();

        if old.directory != new.directory || old.filenames != new.filenames {
            changes.push(SessionEvent::DirectoryChanged {
                directory: new.directory.clone(),
                total_images: new.filenames.len(),
            });
        }

        if !old.finished && new.finished {
            changes.push(SessionEvent::Finished);
        }

        if old.status != new.status {
            changes.push(SessionEvent::StatusChanged {
                status: new.status.clone(),
            });
        }

        changes
    }

    fn emit(&self, event: SessionEvent) {
        // Ignore send errors - it's OK if no one is listening
        let _ = self.events_tx.send(event);
    }

    fn set_status(&mut self, status: impl Into<String>) {
        let status = status.into();
        self.update(|session| session.status = status);
    }

    fn clear_image(&mut self) {
        if self.current.take().is_some() {
            self.emit(SessionEvent::ImageCleared);
        }
    }

    fn clear_selection(&mut self) {
        if self.selection.take().is_some() {
            self.emit(SessionEvent::SelectionChanged { region: None });
        }
    }
}
