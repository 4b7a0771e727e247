//! Services module - Geometry, directory and image operations behind a session.
//!
//! These services have no dependencies on the UI layer or on the session
//! state, so each can be tested on its own.
//!
//! # Components
//!
//! - [`normalize`]: turns a raw pointer drag into a square [`CropRectangle`].
//!   Pure and total over all `i32` inputs.
//!
//! - [`DirectoryScanner`]: lists the recognized image files of a directory
//!   (by filename suffix, in directory-listing order) and creates the output
//!   folder next to them.
//!
//! - [`ImageBackend`]: load/crop/save seam used by the session.
//!   [`FsImageBackend`] implements it with the `image` crate; tests use the
//!   generated `MockImageBackend`.
//!
//! # Usage Example
//!
//! ```ignore
//! use squarecrop::services::{normalize, FsImageBackend, ImageBackend};
//! use squarecrop::Point;
//!
//! let backend = FsImageBackend::new();
//! let image = backend.load("photos/a.jpg".as_ref())?;
//! let rect = normalize(Point::new(10, 10), Point::new(50, 90));
//! backend.save_crop(&image, rect, "photos/cropped/a.jpg".as_ref())?;
//! ```
//!
//! [`CropRectangle`]: crate::models::CropRectangle

pub mod imaging;
pub mod normalizer;
pub mod scanner;

pub use imaging::{FsImageBackend, ImageBackend, ImageError, LoadedImage, crop_padded};
pub use normalizer::normalize;
pub use scanner::{DirectoryScanner, ScanError, ScanResult};
