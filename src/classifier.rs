use once_cell::sync::Lazy;
use regex::Regex;

// GOPR0001.MP4 (legacy) and GH010001.MP4 / GO010001.MP4 (chapter + sequence)
static DEVICE_FILENAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:GOPR[0-9]{4}|G[HO][0-9]{6})\.MP4$").unwrap());

/// Whether `filename` follows one of the camera firmware naming schemes.
pub fn is_known_device_filename(filename: &str) -> bool {
    if filename.is_empty() {
        return false;
    }

    DEVICE_FILENAME.is_match(&filename.to_uppercase())
}
