//! Data models for the cropper.
//!
//! This module contains the plain data structures used throughout the application:
//! - [`Point`], [`DragRegion`], [`CropRectangle`]: pointer input and the derived crop area
//! - [`Session`]: the cursor over one directory's images, with its pure transitions
//! - [`UserConfig`]: user preferences loaded from `Cropper Settings.yaml`
//!
//! # Architecture Note
//!
//! The models carry no I/O. Loading images, scanning directories and saving crops
//! happen in [`crate::services`]; [`crate::state::SessionController`] owns the live
//! [`Session`] and reports its changes as events.

pub mod config;
pub mod geometry;
pub mod session;

pub use config::{CropperSettings, UserConfig};
pub use geometry::{CropRectangle, DragRegion, Point};
pub use session::{Advance, FINISHED_STATUS, Session, SessionPhase, display_label};
