//! Codec/container selection helpers.
//!
//! A mime type such as `video/webm;codecs=vp9,opus` is split into its
//! container (`video/webm`) and codec parameter.

/// Pick the first supported entry of `preferences`.
///
/// Returns `None` when nothing is supported; the encoder then falls back to
/// its default container.
pub fn select_mime_type<F>(preferences: &[String], is_supported: F) -> Option<String>
where
    F: Fn(&str) -> bool,
{
    preferences
        .iter()
        .find(|mime| is_supported(mime.as_str()))
        .cloned()
}

/// The container part of a mime type, without codec parameters.
pub fn container_of(mime_type: &str) -> &str {
    mime_type.split(';').next().unwrap_or(mime_type).trim()
}

/// File extension for a container, `webm` when unknown.
pub fn file_extension(mime_type: &str) -> &'static str {
    match container_of(mime_type) {
        "video/mp4" => "mp4",
        "video/quicktime" => "mov",
        "video/x-matroska" => "mkv",
        "video/ogg" => "ogv",
        _ => "webm",
    }
}
