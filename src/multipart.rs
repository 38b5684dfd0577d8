use crate::error::Error;
use axum::{
    body::Bytes,
    http::{header::CONTENT_TYPE, HeaderMap},
};
use futures::stream;
use std::{collections::HashMap, convert::Infallible};
use tracing::trace;

const MULTIPART_FORM_DATA: &str = "multipart/form-data";

#[derive(Debug, Clone)]
pub struct UploadedFilePart {
    pub field_name: Option<String>,
    pub original_filename: Option<String>,
    pub mime_type: Option<String>,
    pub content: Vec<u8>,
}

impl UploadedFilePart {
    pub fn byte_size(&self) -> usize {
        self.content.len()
    }
}

#[derive(Debug, Default)]
pub struct DecodedUpload {
    pub fields: HashMap<String, String>,
    pub files: Vec<UploadedFilePart>,
}

/// Reads the whole multipart body into text fields and file parts.
///
/// A part counts as a file when its content disposition carries a filename,
/// even an empty one. Repeated text fields keep the last value.
pub async fn decode(headers: &HeaderMap, body: Bytes, is_base64: bool) -> Result<DecodedUpload, Error> {
    let content_type = headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .filter(|value| value.to_ascii_lowercase().contains(MULTIPART_FORM_DATA))
        .ok_or(Error::UnsupportedContentType)?;

    let boundary = multer::parse_boundary(content_type)?;

    let body = if is_base64 {
        let compact: Vec<u8> = body
            .iter()
            .copied()
            .filter(|byte| !byte.is_ascii_whitespace())
            .collect();
        Bytes::from(base64::decode(&compact)?)
    } else {
        body
    };

    let stream = stream::once(async move { Ok::<_, Infallible>(body) });
    let mut multipart = multer::Multipart::new(stream, boundary);
    let mut decoded = DecodedUpload::default();

    while let Some(mut field) = multipart.next_field().await? {
        let field_name = field.name().map(str::to_owned);

        match field.file_name().map(str::to_owned) {
            Some(file_name) => {
                let mime_type = field.content_type().map(|mime| mime.to_string());

                let mut content = Vec::new();
                while let Some(chunk) = field.chunk().await? {
                    content.extend_from_slice(&chunk);
                }

                trace!("Read file part {file_name:?} ({} bytes)", content.len());

                decoded.files.push(UploadedFilePart {
                    field_name,
                    original_filename: Some(file_name).filter(|name| !name.is_empty()),
                    mime_type,
                    content,
                });
            }
            None => {
                let value = field.text().await?;
                if let Some(name) = field_name {
                    decoded.fields.insert(name, value);
                }
            }
        }
    }

    Ok(decoded)
}
