use crate::{
    classifier::is_known_device_filename,
    drive::{ClientFactory, NewRemoteFile},
    error::Error,
    multipart::{self, UploadedFilePart},
    naming::{describe_clip, remote_file_name, ClipMetadata},
    response::{UploadResponse, UploadResult},
};
use axum::{
    body::Bytes,
    extract::BodyStream,
    http::{
        header::{
            ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
            ACCESS_CONTROL_ALLOW_ORIGIN, CONTENT_LENGTH,
        },
        HeaderMap, Method, StatusCode,
    },
    response::{IntoResponse, Response},
    Extension, Json,
};
use chrono::Utc;
use futures::{pin_mut, Stream, StreamExt};
use std::sync::Arc;
use tracing::info;

const DEFAULT_FILENAME: &str = "clip.mp4";
const DEFAULT_MIME_TYPE: &str = "video/mp4";
const GENERIC_MIME_TYPE: &str = "application/octet-stream";
const MAX_CONTENT_LENGTH: usize = 2048 * 1024 * 1024;
const SUCCESS_MESSAGE: &str = "Upload complete. Thanks for sharing your footage!";
const CONTENT_TRANSFER_ENCODING: &str = "content-transfer-encoding";

pub async fn upload(
    method: Method,
    headers: HeaderMap,
    Extension(factory): Extension<Arc<dyn ClientFactory>>,
    body: BodyStream,
) -> Result<Response, Error> {
    respond(method, headers, factory.as_ref(), body, MAX_CONTENT_LENGTH).await
}

async fn respond<S>(
    method: Method,
    headers: HeaderMap,
    factory: &dyn ClientFactory,
    body: S,
    limit: usize,
) -> Result<Response, Error>
where
    S: Stream<Item = Result<Bytes, axum::Error>>,
{
    match method {
        Method::OPTIONS => return Ok(preflight()),
        Method::POST => {}
        _ => return Err(Error::MethodNotAllowed),
    }

    let declared_length = headers
        .get(CONTENT_LENGTH)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse::<u64>().ok());
    if declared_length.map_or(false, |length| length > limit as u64) {
        return Err(Error::PayloadTooLarge(limit));
    }

    let body = read_body(body, limit).await?;

    let is_base64 = headers
        .get(CONTENT_TRANSFER_ENCODING)
        .and_then(|value| value.to_str().ok())
        .map_or(false, |value| value.trim().eq_ignore_ascii_case("base64"));

    let uploads = store_clips(&headers, body, is_base64, factory).await?;

    let response = UploadResponse {
        ok: true,
        message: SUCCESS_MESSAGE.to_owned(),
        uploaded_count: uploads.len(),
        uploads,
    };

    Ok((
        StatusCode::OK,
        [(ACCESS_CONTROL_ALLOW_ORIGIN, "*")],
        Json(response),
    )
        .into_response())
}

fn preflight() -> Response {
    (
        StatusCode::NO_CONTENT,
        [
            (ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
            (ACCESS_CONTROL_ALLOW_METHODS, "POST, OPTIONS"),
            (ACCESS_CONTROL_ALLOW_HEADERS, "Content-Type"),
        ],
    )
        .into_response()
}

async fn read_body<S>(body: S, limit: usize) -> Result<Bytes, Error>
where
    S: Stream<Item = Result<Bytes, axum::Error>>,
{
    pin_mut!(body);

    let mut buf = Vec::new();
    while let Some(chunk) = body.next().await {
        let chunk = chunk?;
        if buf.len() + chunk.len() > limit {
            return Err(Error::PayloadTooLarge(limit));
        }
        buf.extend_from_slice(&chunk);
    }

    Ok(Bytes::from(buf))
}

/// Decodes the form and stores every clip in order, stopping at the first
/// failure. Clips stored before a failure stay in the remote folder.
async fn store_clips(
    headers: &HeaderMap,
    body: Bytes,
    is_base64: bool,
    factory: &dyn ClientFactory,
) -> Result<Vec<UploadResult>, Error> {
    let decoded = multipart::decode(headers, body, is_base64).await?;

    if decoded.files.is_empty() {
        return Err(Error::NoFilesProvided);
    }

    let destination = factory.build()?;
    let metadata = ClipMetadata::from_fields(&decoded.fields);

    let mut uploads = Vec::with_capacity(decoded.files.len());

    for part in &decoded.files {
        let original = original_name_of(part);
        let verified = is_known_device_filename(original);
        let now = Utc::now();

        let name = remote_file_name(metadata.camera_code, now, original);
        let description = describe_clip(&metadata, original, verified, now);
        let mime_type = mime_type_of(part);

        let stored = destination
            .client
            .upload(NewRemoteFile {
                name: &name,
                parent: &destination.folder_id,
                description: &description,
                mime_type: &mime_type,
                content: &part.content,
            })
            .await?;

        info!(
            "Stored {original} as {} ({}, {} bytes, verified: {verified})",
            stored.name,
            stored.id,
            part.byte_size()
        );

        uploads.push(UploadResult {
            id: stored.id,
            name: stored.name,
            original_name: original.to_owned(),
            verified,
            size_bytes: part.byte_size(),
        });
    }

    Ok(uploads)
}

fn original_name_of(part: &UploadedFilePart) -> &str {
    part.original_filename.as_deref().unwrap_or(DEFAULT_FILENAME)
}

/// Declared type, else `video/mp4`. A generic octet-stream declaration is
/// refined by sniffing the content.
fn mime_type_of(part: &UploadedFilePart) -> String {
    match part.mime_type.as_deref() {
        None | Some("") => DEFAULT_MIME_TYPE.to_owned(),
        Some(GENERIC_MIME_TYPE) => infer::get(&part.content)
            .map_or(GENERIC_MIME_TYPE, |kind| kind.mime_type())
            .to_owned(),
        Some(declared) => declared.to_owned(),
    }
}
