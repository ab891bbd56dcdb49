//! Data models for the Schola school site.
//!
//! Field names match the browser client's JSON so stored documents stay interchangeable.

mod performance;
mod post;
mod settings;
mod testimonial;

pub use performance::*;
pub use post::*;
pub use settings::*;
pub use testimonial::*;

use chrono::Utc;

use crate::errors::AppError;

/// Largest embedded image payload accepted, in bytes.
pub const MAX_IMAGE_BYTES: usize = 2 * 1024 * 1024;

/// Generate a record id from the creation time plus a short random suffix.
///
/// The suffix keeps ids unique when several records are created in the same millisecond.
pub fn generate_id() -> String {
    let suffix = uuid::Uuid::new_v4().simple().to_string();
    format!("{}{}", Utc::now().timestamp_millis(), &suffix[..9])
}

/// Current time in milliseconds, used for placeholder image cache busting.
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Reject embedded `data:` images whose decoded payload exceeds [`MAX_IMAGE_BYTES`].
///
/// Plain URLs are accepted as-is.
pub fn validate_image(image: Option<&str>) -> Result<(), AppError> {
    let Some(image) = image else {
        return Ok(());
    };
    if !image.starts_with("data:") {
        return Ok(());
    }

    let payload = image.split_once(',').map(|(_, data)| data).unwrap_or("");
    let decoded_len = if image.contains(";base64,") {
        payload.len() / 4 * 3
    } else {
        payload.len()
    };

    if decoded_len > MAX_IMAGE_BYTES {
        return Err(AppError::Validation(
            "Image size too large. Please choose an image under 2MB.".to_string(),
        ));
    }
    Ok(())
}

/// Resolve an optional image edit: absent keeps the current image, blank clears it.
pub fn edited_image(edit: Option<String>, current: &Option<String>) -> Option<String> {
    match edit {
        Some(image) if image.trim().is_empty() => None,
        Some(image) => Some(image),
        None => current.clone(),
    }
}

/// A record stored in an id-addressed collection.
pub trait Record {
    fn id(&self) -> &str;
}

impl Record for Post {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Record for StudentPerformance {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Record for Testimonial {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Require a non-blank string field.
pub fn require_text(value: &str, message: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(message.to_string()));
    }
    Ok(())
}
