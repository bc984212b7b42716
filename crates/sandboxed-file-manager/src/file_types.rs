//! File extension handling for stored uploads.
//!
//! Extensions come from the client-supplied file name when it carries a
//! usable one, and from magic number detection (`infer`) otherwise.

/// Longest extension kept from a client-supplied file name.
pub const MAX_EXTENSION_LEN: usize = 8;

/// Extract a safe, lower-cased extension from a client-supplied file name.
///
/// Only ASCII alphanumeric extensions of at most [`MAX_EXTENSION_LEN`]
/// characters survive; anything else yields `None`.
pub fn extension_from_file_name(file_name: &str) -> Option<String> {
    // Browsers on Windows may send the full client path
    let base = file_name.rsplit(['/', '\\']).next().unwrap_or(file_name);
    let (stem, ext) = base.rsplit_once('.')?;

    if stem.is_empty()
        || ext.is_empty()
        || ext.len() > MAX_EXTENSION_LEN
        || !ext.chars().all(|c| c.is_ascii_alphanumeric())
    {
        return None;
    }

    Some(ext.to_ascii_lowercase())
}

/// Detect an extension from the payload's magic number.
pub fn detect_extension(data: &[u8]) -> Option<&'static str> {
    infer::get(data).map(|kind| kind.extension())
}

/// Resolve the extension to store a payload under, preferring the
/// client-supplied file name.
pub fn resolve_extension(file_name: Option<&str>, data: &[u8]) -> Option<String> {
    file_name
        .and_then(extension_from_file_name)
        .or_else(|| detect_extension(data).map(str::to_string))
}
