use crate::models::CropRectangle;
use camino::{Utf8Path, Utf8PathBuf};
use image::{ColorType, DynamicImage, GenericImageView, imageops};
use thiserror::Error;

/// Largest crop side accepted. Anything bigger is almost certainly a stray
/// pointer far outside the picture.
pub const MAX_CROP_SIDE: i64 = 65_535;

/// Errors from the image backend
#[derive(Error, Debug)]
pub enum ImageError {
    #[error("Failed to open image {path}: {source}")]
    Decode {
        path: Utf8PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Failed to save image {path}: {source}")]
    Encode {
        path: Utf8PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Crop region {0} has no area")]
    EmptyCrop(CropRectangle),

    #[error("Crop region {0} is larger than {max} pixels", max = MAX_CROP_SIDE)]
    CropTooLarge(CropRectangle),
}

/// The decoded image currently on screen.
///
/// Holds the original pixels, which are both what the window shows and what
/// crops are cut from.
#[derive(Debug, Clone)]
pub struct LoadedImage {
    path: Utf8PathBuf,
    pixels: DynamicImage,
}

impl LoadedImage {
    pub fn new(path: impl Into<Utf8PathBuf>, pixels: DynamicImage) -> Self {
        Self {
            path: path.into(),
            pixels,
        }
    }

    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    pub fn pixels(&self) -> &DynamicImage {
        &self.pixels
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.pixels.dimensions()
    }
}

/// Load, crop and save operations the session needs from an image library.
#[cfg_attr(test, mockall::automock)]
pub trait ImageBackend {
    /// Decode the image at `path`.
    fn load(&self, path: &Utf8Path) -> Result<LoadedImage, ImageError>;

    /// Cut `rect` out of `image` and write it to `destination`, replacing any
    /// existing file.
    fn save_crop(
        &self,
        image: &LoadedImage,
        rect: CropRectangle,
        destination: &Utf8Path,
    ) -> Result<(), ImageError>;
}

/// [`ImageBackend`] backed by the `image` crate.
///
/// The output format follows the destination's extension, which is the
/// source filename, so crops keep their original format.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsImageBackend;

impl FsImageBackend {
    pub fn new() -> Self {
        Self
    }
}

impl ImageBackend for FsImageBackend {
    fn load(&self, path: &Utf8Path) -> Result<LoadedImage, ImageError> {
        let pixels = image::open(path).map_err(|source| ImageError::Decode {
            path: path.to_path_buf(),
            source,
        })?;

        tracing::debug!(
            "Decoded {} ({}x{}, {:?})",
            path,
            pixels.width(),
            pixels.height(),
            pixels.color()
        );

        Ok(LoadedImage::new(path, pixels))
    }

    fn save_crop(
        &self,
        image: &LoadedImage,
        rect: CropRectangle,
        destination: &Utf8Path,
    ) -> Result<(), ImageError> {
        let cropped = crop_padded(image.pixels(), rect)?;

        cropped
            .save(destination)
            .map_err(|source| ImageError::Encode {
                path: destination.to_path_buf(),
                source,
            })?;

        tracing::info!(
            "Saved {}x{} crop of {} to {}",
            cropped.width(),
            cropped.height(),
            image.path(),
            destination
        );
        Ok(())
    }
}

/// Cut `rect` out of `source`.
///
/// Parts of the rectangle outside the source are filled with zeroed pixels
/// (black, or transparent for images with alpha), so the result always has
/// exactly the rectangle's size.
pub fn crop_padded(source: &DynamicImage, rect: CropRectangle) -> Result<DynamicImage, ImageError> {
    if rect.is_degenerate() {
        return Err(ImageError::EmptyCrop(rect));
    }
    if rect.width() > MAX_CROP_SIDE || rect.height() > MAX_CROP_SIDE {
        return Err(ImageError::CropTooLarge(rect));
    }

    // Both sides were checked against MAX_CROP_SIDE above
    let width = rect.width() as u32;
    let height = rect.height() as u32;

    if rect.fits_within(source.width(), source.height()) {
        return Ok(source.crop_imm(rect.left as u32, rect.top as u32, width, height));
    }

    let mut canvas = blank_like(source, width, height);
    paste(&mut canvas, source, -rect.left, -rect.top);
    Ok(canvas)
}

/// Copy `source` onto `canvas` at `(x, y)` without leaving the source's
/// sample type.
///
/// `canvas` must come from [`blank_like`] for `source`. Pasting one
/// `DynamicImage` onto another goes through `Rgba<u8>`, which would squeeze
/// 16-bit and float samples through 8 bits.
fn paste(canvas: &mut DynamicImage, source: &DynamicImage, x: i64, y: i64) {
    use DynamicImage as D;

    match (canvas, source) {
        (D::ImageLuma8(dst), D::ImageLuma8(src)) => imageops::replace(dst, src, x, y),
        (D::ImageLumaA8(dst), D::ImageLumaA8(src)) => imageops::replace(dst, src, x, y),
        (D::ImageRgb8(dst), D::ImageRgb8(src)) => imageops::replace(dst, src, x, y),
        (D::ImageRgba8(dst), D::ImageRgba8(src)) => imageops::replace(dst, src, x, y),
        (D::ImageLuma16(dst), D::ImageLuma16(src)) => imageops::replace(dst, src, x, y),
        (D::ImageLumaA16(dst), D::ImageLumaA16(src)) => imageops::replace(dst, src, x, y),
        (D::ImageRgb16(dst), D::ImageRgb16(src)) => imageops::replace(dst, src, x, y),
        (D::ImageRgba16(dst), D::ImageRgba16(src)) => imageops::replace(dst, src, x, y),
        (D::ImageRgb32F(dst), D::ImageRgb32F(src)) => imageops::replace(dst, src, x, y),
        (D::ImageRgba32F(dst), D::ImageRgba32F(src)) => imageops::replace(dst, src, x, y),
        (canvas, source) => {
            tracing::debug!(
                "Pasting {:?} onto {:?} through 8-bit RGBA",
                source.color(),
                canvas.color()
            );
            imageops::replace(canvas, source, x, y)
        }
    }
}

/// Zeroed image with the same color layout as `source`.
fn blank_like(source: &DynamicImage, width: u32, height: u32) -> DynamicImage {
    match source.color() {
        ColorType::L8 => DynamicImage::new_luma8(width, height),
        ColorType::La8 => DynamicImage::new_luma_a8(width, height),
        ColorType::Rgb8 => DynamicImage::new_rgb8(width, height),
        ColorType::L16 => DynamicImage::new_luma16(width, height),
        ColorType::La16 => DynamicImage::new_luma_a16(width, height),
        ColorType::Rgb16 => DynamicImage::new_rgb16(width, height),
        ColorType::Rgba16 => DynamicImage::new_rgba16(width, height),
        ColorType::Rgb32F => DynamicImage::new_rgb32f(width, height),
        ColorType::Rgba32F => DynamicImage::new_rgba32f(width, height),
        _ => DynamicImage::new_rgba8(width, height),
    }
}
