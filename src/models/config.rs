use serde::{Deserialize, Serialize};

/// User configuration from `Cropper Settings.yaml`
///
/// Every key is optional; missing keys fall back to the built-in defaults,
/// which reproduce the classic behavior (`.jpg`/`.png`/`.jpeg`, `cropped/`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserConfig {
    #[serde(rename = "Cropper_Settings", default)]
    pub cropper_settings: CropperSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CropperSettings {
    /// Case-sensitive filename suffixes recognized as images.
    #[serde(rename = "Image Extensions", default = "default_image_extensions")]
    pub image_extensions: Vec<String>,

    /// Subdirectory (inside the chosen directory) receiving the crops.
    #[serde(rename = "Output Folder", default = "default_output_folder")]
    pub output_folder: String,

    #[serde(rename = "Label Head", default = "default_label_head")]
    pub label_head: usize,

    #[serde(rename = "Label Tail", default = "default_label_tail")]
    pub label_tail: usize,

    #[serde(rename = "Debug Mode", default)]
    pub debug_mode: bool,

    #[serde(rename = "Console Logging", default = "default_console_logging")]
    pub console_logging: bool,
}

impl Default for CropperSettings {
    fn default() -> Self {
        Self {
            image_extensions: default_image_extensions(),
            output_folder: default_output_folder(),
            label_head: default_label_head(),
            label_tail: default_label_tail(),
            debug_mode: false,
            console_logging: default_console_logging(),
        }
    }
}

fn default_image_extensions() -> Vec<String> {
    vec![".jpg".to_string(), ".png".to_string(), ".jpeg".to_string()]
}

fn default_output_folder() -> String {
    "cropped".to_string()
}

fn default_label_head() -> usize {
    10
}

fn default_label_tail() -> usize {
    5
}

fn default_console_logging() -> bool {
    true
}
