//! Integration tests for SessionController over real image files
//!
//! These tests verify that a session:
//! - Lists only recognized images and creates the output folder
//! - Writes square crops next to the sources and advances through them
//! - Stops on unreadable files and failed saves without losing its place
//! - Can be reset and started again

use camino::Utf8PathBuf;
use image::{DynamicImage, GenericImageView, Rgb, RgbImage};
use squarecrop::models::FINISHED_STATUS;
use squarecrop::{
    Advance, CropOutcome, CropperSettings, DragRegion, FsImageBackend, Point, SessionController,
    SessionError, SessionPhase,
};
use std::fs;
use tempfile::TempDir;

fn create_photo_dir() -> (TempDir, Utf8PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let dir = Utf8PathBuf::try_from(temp_dir.path().to_path_buf()).unwrap();
    (temp_dir, dir)
}

fn write_image(dir: &Utf8PathBuf, name: &str, width: u32, height: u32) {
    let image = RgbImage::from_fn(width, height, |x, y| Rgb([x as u8, y as u8, 128]));
    DynamicImage::ImageRgb8(image).save(dir.join(name)).unwrap();
}

fn new_controller() -> SessionController<FsImageBackend> {
    SessionController::new(FsImageBackend::new(), CropperSettings::default())
}

fn drag(controller: &mut SessionController<FsImageBackend>, from: (i32, i32), to: (i32, i32)) {
    controller.on_drag_start(Point::new(from.0, from.1));
    controller.on_drag_end(Point::new(to.0, to.1));
}

#[test]
fn test_mixed_directory_lists_only_images() {
    let (_temp_dir, dir) = create_photo_dir();
    write_image(&dir, "a.jpg", 40, 30);
    fs::write(dir.join("b.txt"), "not an image").unwrap();
    write_image(&dir, "c.png", 20, 20);

    let mut controller = new_controller();
    controller.select_directory(&dir).unwrap();

    // Same order as the directory listing, never re-sorted
    let listed: Vec<String> = fs::read_dir(&dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().into_string().unwrap())
        .filter(|name| name.ends_with(".jpg") || name.ends_with(".png"))
        .collect();
    assert_eq!(controller.session().filenames, listed);

    let mut sorted = listed.clone();
    sorted.sort();
    assert_eq!(sorted, vec!["a.jpg", "c.png"]);
    assert!(dir.join("cropped").is_dir());
    assert_eq!(controller.phase(), SessionPhase::Ready);
    assert!(controller.current_image().is_some());
}

#[test]
fn test_single_image_directory_finishes() {
    let (_temp_dir, dir) = create_photo_dir();
    write_image(&dir, "only.png", 100, 100);

    let mut controller = new_controller();
    controller.select_directory(&dir).unwrap();
    drag(&mut controller, (10, 10), (50, 90));

    let outcome = controller.on_confirm().unwrap();

    let CropOutcome::Saved {
        destination,
        rect,
        advance,
    } = outcome
    else {
        panic!("Expected a saved crop, got {:?}", outcome);
    };
    assert_eq!(destination, dir.join("cropped").join("only.png"));
    assert_eq!(rect.width(), 80);
    assert_eq!(advance, Advance::Finished);

    let saved = image::open(&destination).unwrap();
    assert_eq!(saved.dimensions(), (80, 80));
    // Left 30 columns lie outside the source and are padded
    assert_eq!(saved.to_rgb8().get_pixel(0, 0), &Rgb([0, 0, 0]));
    assert_eq!(saved.to_rgb8().get_pixel(30, 0), &Rgb([0, 10, 128]));

    assert!(controller.session().finished);
    assert_eq!(controller.session().status, FINISHED_STATUS);
    assert_eq!(controller.phase(), SessionPhase::Finished);

    // A stray confirm after the end changes nothing
    let second = controller
        .confirm_crop(DragRegion::new(Point::new(0, 0), Point::new(10, 10)))
        .unwrap();
    assert_eq!(second, CropOutcome::Ignored);
    assert!(controller.session().finished);
    assert_eq!(controller.session().status, FINISHED_STATUS);
}

#[test]
fn test_advances_through_every_image() {
    let (_temp_dir, dir) = create_photo_dir();
    write_image(&dir, "one.png", 60, 40);
    write_image(&dir, "two.png", 50, 50);
    write_image(&dir, "three.jpg", 30, 70);

    let mut controller = new_controller();
    controller.select_directory(&dir).unwrap();
    let total = controller.session().filenames.len();
    assert_eq!(total, 3);

    let mut last_index = 0;
    for step in 0..total {
        let index = controller.session().current_index;
        assert!(index >= last_index);
        last_index = index;

        let (width, height) = controller.current_dimensions().unwrap();
        let side = width.min(height) as i32;
        drag(&mut controller, (0, 0), (side, side));

        let outcome = controller.on_confirm().unwrap();
        let expected = if step + 1 == total {
            Advance::Finished
        } else {
            Advance::Moved(step + 1)
        };
        assert!(
            matches!(outcome, CropOutcome::Saved { advance, .. } if advance == expected),
            "Unexpected outcome at step {}: {:?}",
            step,
            outcome
        );
    }

    assert!(controller.session().finished);
    for name in ["one.png", "two.png", "three.jpg"] {
        let saved = image::open(dir.join("cropped").join(name)).unwrap();
        let (width, height) = saved.dimensions();
        assert_eq!(width, height, "{} is not square", name);
    }
    assert_eq!(
        image::open(dir.join("cropped").join("one.png"))
            .unwrap()
            .dimensions(),
        (40, 40)
    );
}

#[test]
fn test_save_failure_does_not_advance() {
    let (_temp_dir, dir) = create_photo_dir();
    write_image(&dir, "a.png", 50, 50);
    write_image(&dir, "b.png", 50, 50);

    let mut controller = new_controller();
    controller.select_directory(&dir).unwrap();
    let first = controller.session().current_filename().unwrap().to_string();

    // Remove the output folder so the write fails
    fs::remove_dir_all(dir.join("cropped")).unwrap();
    drag(&mut controller, (0, 0), (20, 20));

    let err = controller.on_confirm().unwrap_err();

    assert!(matches!(err, SessionError::ImageSave { .. }));
    assert_eq!(controller.session().current_index, 0);
    assert_eq!(controller.session().current_filename(), Some(first.as_str()));
    assert!(!controller.session().finished);
    assert!(controller.session().status.contains(&first));

    // Recreate the folder and retry with the kept drag
    fs::create_dir(dir.join("cropped")).unwrap();
    let outcome = controller.on_confirm().unwrap();
    assert!(matches!(
        outcome,
        CropOutcome::Saved {
            advance: Advance::Moved(1),
            ..
        }
    ));
    assert!(controller.session().status.is_empty());
}

#[test]
fn test_zero_area_drag_is_a_save_error() {
    let (_temp_dir, dir) = create_photo_dir();
    write_image(&dir, "a.png", 50, 50);

    let mut controller = new_controller();
    controller.select_directory(&dir).unwrap();
    drag(&mut controller, (10, 10), (10, 10));

    let err = controller.on_confirm().unwrap_err();

    assert!(matches!(err, SessionError::ImageSave { .. }));
    assert!(!dir.join("cropped").join("a.png").exists());
    assert!(!controller.session().finished);
}

#[test]
fn test_corrupt_image_halts_session() {
    let (_temp_dir, dir) = create_photo_dir();
    fs::write(dir.join("broken.png"), b"this is not a png").unwrap();

    let mut controller = new_controller();
    let err = controller.select_directory(&dir).unwrap_err();

    assert!(matches!(err, SessionError::ImageLoad { .. }));
    assert!(controller.session().status.contains("broken.png"));
    assert!(controller.current_image().is_none());
    assert_eq!(controller.session().filenames, vec!["broken.png"]);
    assert_eq!(controller.on_confirm().unwrap(), CropOutcome::Ignored);
}

#[test]
fn test_missing_directory_is_rejected() {
    let (_temp_dir, dir) = create_photo_dir();

    let mut controller = new_controller();
    let err = controller.select_directory(dir.join("nope")).unwrap_err();

    assert!(matches!(err, SessionError::Directory(_)));
    assert_eq!(controller.phase(), SessionPhase::Idle);
    assert!(!controller.session().status.is_empty());
}

#[test]
fn test_empty_directory_reports_status() {
    let (_temp_dir, dir) = create_photo_dir();
    fs::write(dir.join("notes.txt"), "nothing to crop").unwrap();

    let mut controller = new_controller();
    controller.select_directory(&dir).unwrap();

    assert_eq!(controller.phase(), SessionPhase::Empty);
    assert!(controller.session().filenames.is_empty());
    assert!(controller.session().status.contains("No images found"));
    assert!(controller.current_image().is_none());
}

#[test]
fn test_reset_then_select_starts_over() {
    let (_temp_dir, dir) = create_photo_dir();
    write_image(&dir, "a.png", 30, 30);
    write_image(&dir, "b.png", 30, 30);

    let mut controller = new_controller();
    controller.select_directory(&dir).unwrap();
    drag(&mut controller, (0, 0), (10, 10));
    controller.on_confirm().unwrap();
    assert_eq!(controller.session().current_index, 1);

    controller.reset();
    assert!(controller.session().filenames.is_empty());
    assert_eq!(controller.phase(), SessionPhase::Empty);

    controller.select_directory(&dir).unwrap();

    let session = controller.snapshot();
    assert_eq!(session.filenames.len(), 2);
    assert_eq!(session.current_index, 0);
    assert!(!session.finished);
}

#[test]
fn test_custom_output_folder() {
    let (_temp_dir, dir) = create_photo_dir();
    write_image(&dir, "a.png", 30, 30);

    let settings = CropperSettings {
        output_folder: "squares".to_string(),
        ..CropperSettings::default()
    };
    let mut controller = SessionController::new(FsImageBackend::new(), settings);
    controller.select_directory(&dir).unwrap();
    drag(&mut controller, (0, 0), (15, 15));
    controller.on_confirm().unwrap();

    assert!(dir.join("squares").join("a.png").is_file());
    assert!(!dir.join("cropped").exists());
}
