//! Alumni testimonial model matching the frontend Testimonial interface.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::{generate_id, require_text, validate_image};
use crate::errors::AppError;

/// A review left by an identified alumnus.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Testimonial {
    pub id: String,
    pub user_name: String,
    /// Class label as the alumnus typed it, e.g. "Class of 2015"
    pub user_class: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_photo: Option<String>,
    pub content: String,
    /// Star rating, 1 to 5
    pub rating: u8,
    pub date: String,
}

impl Testimonial {
    /// Build a testimonial for an alumnus whose identity has already been matched.
    ///
    /// `user_name` is the canonical name from the matched record.
    pub fn for_alumnus(
        user_name: String,
        request: SubmitTestimonialRequest,
    ) -> Result<Self, AppError> {
        require_text(&request.content, "Review content is required")?;
        if !(1..=5).contains(&request.rating) {
            return Err(AppError::Validation(
                "Rating must be between 1 and 5".to_string(),
            ));
        }
        validate_image(request.user_photo.as_deref())?;

        let user_photo = match request.user_photo.filter(|p| !p.trim().is_empty()) {
            Some(photo) => photo,
            None => avatar_url(&user_name)?,
        };

        Ok(Self {
            id: generate_id(),
            user_name,
            user_class: request.user_class,
            user_photo: Some(user_photo),
            content: request.content,
            rating: request.rating,
            date: Utc::now().to_rfc3339(),
        })
    }

    /// Apply a moderation edit. Identity fields and the date are kept; an
    /// empty photo falls back to the generated avatar.
    pub fn apply(&self, request: UpdateTestimonialRequest) -> Result<Self, AppError> {
        let content = request.content.unwrap_or_else(|| self.content.clone());
        require_text(&content, "Review content is required")?;
        let rating = request.rating.unwrap_or(self.rating);
        if !(1..=5).contains(&rating) {
            return Err(AppError::Validation(
                "Rating must be between 1 and 5".to_string(),
            ));
        }

        let user_photo = match request.user_photo {
            Some(photo) if photo.trim().is_empty() => Some(avatar_url(&self.user_name)?),
            Some(photo) => {
                validate_image(Some(&photo))?;
                Some(photo)
            }
            None => self.user_photo.clone(),
        };

        Ok(Self {
            id: self.id.clone(),
            user_name: self.user_name.clone(),
            user_class: self.user_class.clone(),
            user_photo,
            content,
            rating,
            date: self.date.clone(),
        })
    }
}

/// Generated initials avatar for alumni who did not upload a photo.
fn avatar_url(name: &str) -> Result<String, AppError> {
    reqwest::Url::parse_with_params(
        "https://ui-avatars.com/api/",
        &[("name", name), ("background", "random")],
    )
    .map(|url| url.to_string())
    .map_err(|e| AppError::Internal(format!("Invalid avatar URL: {}", e)))
}

fn default_rating() -> u8 {
    5
}

/// Alumni identity claim.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentifyAlumniRequest {
    pub name: String,
    pub user_class: String,
}

/// Confirmed alumni identity.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlumniIdentity {
    pub name: String,
    pub user_class: String,
}

/// Request body for submitting a testimonial.
///
/// The identity claim travels with the review and is re-checked on submit.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitTestimonialRequest {
    pub name: String,
    pub user_class: String,
    pub content: String,
    #[serde(default = "default_rating")]
    pub rating: u8,
    #[serde(default)]
    pub user_photo: Option<String>,
}

/// Request body for moderating a testimonial.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTestimonialRequest {
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub rating: Option<u8>,
    #[serde(default)]
    pub user_photo: Option<String>,
}
