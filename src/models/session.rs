use camino::{Utf8Path, Utf8PathBuf};

/// Status shown once the last image of a directory has been cropped.
pub const FINISHED_STATUS: &str = "No more images in current directory.";

/// Title shown before any directory has been chosen.
pub const WINDOW_TITLE: &str = "Image Cropper";

/// Where a session is in its lifecycle, derived from the [`Session`] fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// No directory chosen yet.
    Idle,
    /// A directory is open and `current_index` points at an image.
    Ready,
    /// The directory held no recognized images.
    Empty,
    /// Every image of the directory has been processed.
    Finished,
}

/// Result of [`Session::advance`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// The cursor moved to a new index.
    Moved(usize),
    /// The cursor ran past the last image; the session is now finished.
    Finished,
    /// Nothing to advance (idle, empty or already finished).
    Unchanged,
}

/// Cursor over the images of one directory.
///
/// All transitions are plain methods on this value so they can be exercised
/// without an image backend or a window. [`crate::state::SessionController`]
/// owns the single live instance and turns field changes into events.
///
/// `filenames` is fixed once a directory is selected; `current_index` is the
/// only cursor. While the session is not finished and `filenames` is not
/// empty, `current_index < filenames.len()` holds.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Session {
    pub directory: Option<Utf8PathBuf>,
    pub filenames: Vec<String>,
    pub current_index: usize,
    pub finished: bool,

    /// Operator-facing status or error line.
    pub status: String,
}

impl Session {
    /// Start a fresh session over `filenames` found in `directory`.
    pub fn start(directory: Utf8PathBuf, filenames: Vec<String>) -> Self {
        Self {
            directory: Some(directory),
            filenames,
            current_index: 0,
            finished: false,
            status: String::new(),
        }
    }

    pub fn phase(&self) -> SessionPhase {
        if self.directory.is_none() {
            SessionPhase::Idle
        } else if self.finished {
            SessionPhase::Finished
        } else if self.filenames.is_empty() {
            SessionPhase::Empty
        } else {
            SessionPhase::Ready
        }
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Filename under the cursor, if the session is ready.
    pub fn current_filename(&self) -> Option<&str> {
        match self.phase() {
            SessionPhase::Ready => self.filenames.get(self.current_index).map(String::as_str),
            _ => None,
        }
    }

    /// Full path of the image under the cursor.
    pub fn current_source_path(&self) -> Option<Utf8PathBuf> {
        let directory = self.directory.as_ref()?;
        self.current_filename().map(|name| directory.join(name))
    }

    /// Destination of the crop for the image under the cursor.
    pub fn current_output_path(&self, output_folder: &str) -> Option<Utf8PathBuf> {
        let directory = self.directory.as_ref()?;
        self.current_filename()
            .map(|name| directory.join(output_folder).join(name))
    }

    /// Number of images not yet cropped, including the current one.
    pub fn remaining(&self) -> usize {
        match self.phase() {
            SessionPhase::Ready => self.filenames.len() - self.current_index,
            _ => 0,
        }
    }

    /// Move the cursor to the next image or mark the session finished.
    ///
    /// Never moves the cursor backwards; once finished, only [`Session::reset`]
    /// clears the flag.
    pub fn advance(&mut self) -> Advance {
        if self.phase() != SessionPhase::Ready {
            return Advance::Unchanged;
        }

        if self.current_index < self.filenames.len() - 1 {
            self.current_index += 1;
            Advance::Moved(self.current_index)
        } else {
            self.finished = true;
            self.status = FINISHED_STATUS.to_string();
            Advance::Finished
        }
    }

    /// Clear filenames, status and cursor. The directory is kept.
    pub fn reset(&mut self) {
        self.filenames.clear();
        self.status.clear();
        self.current_index = 0;
        self.finished = false;
    }

    pub fn window_title(&self) -> String {
        match &self.directory {
            Some(directory) => format!("{} - {}", WINDOW_TITLE, directory),
            None => WINDOW_TITLE.to_string(),
        }
    }

    /// One line per filename, long names shortened with [`display_label`].
    pub fn filename_listing(&self, head: usize, tail: usize) -> String {
        self.filenames
            .iter()
            .map(|name| display_label(name, head, tail) + "\n")
            .collect()
    }

    pub fn directory(&self) -> Option<&Utf8Path> {
        self.directory.as_deref()
    }
}

/// Shorten `name` for the sidebar list.
///
/// Names longer than `head` characters keep their first `head` and last `tail`
/// characters around an ellipsis; shorter names are returned unchanged.
pub fn display_label(name: &str, head: usize, tail: usize) -> String {
    let count = name.chars().count();
    if count <= head {
        return name.to_string();
    }

    let first: String = name.chars().take(head).collect();
    let last: String = name.chars().skip(count.saturating_sub(tail)).collect();
    format!("{first}…{last}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session_with(names: &[&str]) -> Session {
        Session::start(
            Utf8PathBuf::from("/photos"),
            names.iter().map(|n| n.to_string()).collect(),
        )
    }

    #[test]
    fn test_default_session_is_idle() {
        let session = Session::default();
        assert_eq!(session.phase(), SessionPhase::Idle);
        assert_eq!(session.current_filename(), None);
        assert_eq!(session.window_title(), "Image Cropper");
    }

    #[test]
    fn test_start_session() {
        let session = session_with(&["a.jpg", "c.png"]);
        assert_eq!(session.phase(), SessionPhase::Ready);
        assert_eq!(session.current_index, 0);
        assert_eq!(session.current_filename(), Some("a.jpg"));
        assert_eq!(session.remaining(), 2);
        assert_eq!(session.window_title(), "Image Cropper - /photos");
    }

    #[test]
    fn test_empty_session() {
        let mut session = session_with(&[]);
        assert_eq!(session.phase(), SessionPhase::Empty);
        assert_eq!(session.current_filename(), None);
        assert_eq!(session.advance(), Advance::Unchanged);
        assert!(!session.finished);
    }

    #[test]
    fn test_advance_to_finish() {
        let mut session = session_with(&["a.jpg", "b.jpg"]);

        assert_eq!(session.advance(), Advance::Moved(1));
        assert_eq!(session.current_filename(), Some("b.jpg"));
        assert!(session.status.is_empty());

        assert_eq!(session.advance(), Advance::Finished);
        assert!(session.finished);
        assert_eq!(session.current_index, 1);
        assert_eq!(session.status, FINISHED_STATUS);
        assert_eq!(session.phase(), SessionPhase::Finished);
        assert_eq!(session.current_filename(), None);

        // Further advances leave the cursor and flag alone
        assert_eq!(session.advance(), Advance::Unchanged);
        assert_eq!(session.current_index, 1);
        assert!(session.finished);
    }

    #[test]
    fn test_reset_keeps_directory() {
        let mut session = session_with(&["a.jpg"]);
        session.advance();

        session.reset();

        assert!(session.filenames.is_empty());
        assert!(session.status.is_empty());
        assert_eq!(session.current_index, 0);
        assert!(!session.finished);
        assert_eq!(session.directory(), Some(Utf8Path::new("/photos")));
    }

    #[test]
    fn test_paths() {
        let session = session_with(&["a.jpg"]);
        assert_eq!(
            session.current_source_path(),
            Some(Utf8PathBuf::from("/photos/a.jpg"))
        );
        assert_eq!(
            session.current_output_path("cropped"),
            Some(Utf8PathBuf::from("/photos/cropped/a.jpg"))
        );
    }

    #[test]
    fn test_display_label() {
        assert_eq!(display_label("short.jpg", 10, 5), "short.jpg");
        assert_eq!(display_label("exactly10c", 10, 5), "exactly10c");
        assert_eq!(
            display_label("holiday_photo_0001.jpeg", 10, 5),
            "holiday_ph….jpeg"
        );
        assert_eq!(display_label("ünïcödé_name.png", 10, 5), "ünïcödé_na…e.png");
    }

    #[test]
    fn test_filename_listing() {
        let session = session_with(&["a.jpg", "a_very_long_filename.png"]);
        assert_eq!(session.filename_listing(10, 5), "a.jpg\na_very_lon…e.png\n");
    }
}
