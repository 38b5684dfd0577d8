//! Remote file names and descriptions derived from the upload form.

use chrono::{DateTime, SecondsFormat, Utc};
use std::collections::HashMap;

pub const PROJECT_LABEL: &str = "YC clip upload";
const NAME_PREFIX: &str = "YC";
const MISSING_CAMERA_CODE: &str = "NA";

/// Form metadata sent alongside the clips. Empty values count as absent.
#[derive(Debug, Default, Clone, Copy)]
pub struct ClipMetadata<'a> {
    pub camera_id: Option<&'a str>,
    pub camera_code: Option<&'a str>,
    pub location: Option<&'a str>,
    pub date_filmed: Option<&'a str>,
    pub name: Option<&'a str>,
    pub email: Option<&'a str>,
    pub share_link: Option<&'a str>,
}

impl<'a> ClipMetadata<'a> {
    pub fn from_fields(fields: &'a HashMap<String, String>) -> Self {
        let get = |key: &str| {
            fields
                .get(key)
                .map(String::as_str)
                .filter(|value| !value.is_empty())
        };

        Self {
            camera_id: get("camera_id"),
            camera_code: get("camera_code"),
            location: get("location"),
            date_filmed: get("date_filmed"),
            name: get("name"),
            email: get("email"),
            share_link: get("share_link"),
        }
    }
}

/// Keeps ASCII alphanumerics, `_` and `-`, falling back to `NA`.
pub fn sanitize_camera_code(camera_code: Option<&str>) -> String {
    let sanitized: String = camera_code
        .unwrap_or(MISSING_CAMERA_CODE)
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-')
        .collect();

    if sanitized.is_empty() {
        MISSING_CAMERA_CODE.to_owned()
    } else {
        sanitized
    }
}

pub fn iso_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// ISO-8601 instant with `:` and `.` replaced so it is usable in a filename.
pub fn timestamp_slug(at: DateTime<Utc>) -> String {
    iso_timestamp(at).replace([':', '.'], "-")
}

pub fn remote_file_name(camera_code: Option<&str>, at: DateTime<Utc>, original: &str) -> String {
    format!(
        "{NAME_PREFIX}-{code}_{slug}_{original}",
        code = sanitize_camera_code(camera_code),
        slug = timestamp_slug(at),
    )
}

pub fn describe_clip(
    metadata: &ClipMetadata<'_>,
    original: &str,
    verified: bool,
    at: DateTime<Utc>,
) -> String {
    let optional = |label: &str, value: Option<&str>| {
        value
            .map(|value| format!("{label}: {value}"))
            .unwrap_or_default()
    };

    let lines = [
        PROJECT_LABEL.to_owned(),
        format!("Original filename: {original}"),
        format!(
            "Camera ID: {}",
            metadata.camera_id.unwrap_or("unknown-camera")
        ),
        format!("Camera code: {}", metadata.camera_code.unwrap_or("no-code")),
        format!(
            "Location: {}",
            metadata.location.unwrap_or("unknown-location")
        ),
        optional("Date filmed", metadata.date_filmed),
        optional("Nickname", metadata.name),
        optional("Email", metadata.email),
        optional("Share link", metadata.share_link),
        format!("Uploaded at: {}", iso_timestamp(at)),
        format!(
            "Verified device filename: {}",
            if verified { "yes" } else { "no" }
        ),
    ];

    lines
        .into_iter()
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
