// services/receipts.rs
use bytes::Bytes;
use mime::Mime;
use uuid::Uuid;

use crate::errors::{AppError, Result};

pub const MAX_RECEIPT_BYTES: usize = 10 * 1024 * 1024;

/// A deposit receipt ready to be put in object storage.
#[derive(Debug, Clone)]
pub struct Receipt {
    pub object_path: String,
    pub content_type: String,
    /// Hex md5 of the file contents.
    pub checksum: String,
    pub body: Bytes,
}

fn mime_from_extension(ext: &str) -> Option<Mime> {
    match ext.to_ascii_lowercase().as_str() {
        "png" => Some(mime::IMAGE_PNG),
        "jpg" | "jpeg" => Some(mime::IMAGE_JPEG),
        "gif" => Some(mime::IMAGE_GIF),
        "pdf" => Some(mime::APPLICATION_PDF),
        _ => None,
    }
}

fn is_accepted(content_type: &Mime) -> bool {
    content_type.type_() == mime::IMAGE || content_type.essence_str() == mime::APPLICATION_PDF.essence_str()
}

/// Check the upload and work out where it goes: `{user_id}/{hash}-{id}-{name}.{ext}`.
pub fn prepare_receipt(user_id: &str, file_name: &str, data: Vec<u8>) -> Result<Receipt> {
    if data.is_empty() {
        return Err(AppError::invalid_data("Receipt file is empty."));
    }
    if data.len() > MAX_RECEIPT_BYTES {
        return Err(AppError::invalid_data("Receipt must be 10 MB or smaller."));
    }

    let clean = sanitize_filename::sanitize(file_name).replace(' ', "_");
    let (stem, given_ext) = match clean.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => (stem.to_string(), Some(ext.to_string())),
        _ => (clean.clone(), None),
    };

    // Trust the bytes over the file name.
    let (content_type, ext) = match infer::get(&data) {
        Some(kind) => (kind.mime_type().parse::<Mime>().ok(), Some(kind.extension().to_string())),
        None => (given_ext.as_deref().and_then(mime_from_extension), given_ext.clone()),
    };

    let content_type = content_type
        .filter(is_accepted)
        .ok_or_else(|| AppError::invalid_data("Receipt must be an image or PDF."))?;
    let ext = ext.unwrap_or_else(|| "bin".to_string());

    let checksum = format!("{:x}", md5::compute(&data));
    let id = Uuid::new_v4().simple().to_string();
    let stem: String = stem
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
        .collect();
    let stem = if stem.is_empty() { "receipt".to_string() } else { stem };

    Ok(Receipt {
        object_path: format!("{}/{}-{}-{}.{}", user_id, &checksum[..12], &id[..8], stem, ext),
        content_type: content_type.essence_str().to_string(),
        checksum,
        body: Bytes::from(data),
    })
}
