//! Site appearance settings and admin credentials.

use serde::{Deserialize, Serialize};

use super::{require_text, validate_image};
use crate::errors::AppError;

/// Singleton site appearance record, always replaced wholesale.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SiteSettings {
    pub school_name: String,
    pub logo_url: Option<String>,
    pub marquee_text: String,
    /// Ordered hero carousel images
    pub hero_images: Vec<String>,
}

impl SiteSettings {
    pub fn validate(&self) -> Result<(), AppError> {
        require_text(&self.school_name, "School name is required")?;
        validate_image(self.logo_url.as_deref())?;
        for image in &self.hero_images {
            validate_image(Some(image))?;
        }
        Ok(())
    }
}

/// Request body for appending a hero image.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddHeroImageRequest {
    pub image_url: String,
}

/// Singleton admin login, stored as plaintext.
#[derive(Clone, Serialize, Deserialize, PartialEq)]
pub struct AdminCredentials {
    pub username: String,
    pub password: String,
}

impl AdminCredentials {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.username.is_empty() || self.password.is_empty() {
            return Err(AppError::Validation(
                "Username and password cannot be empty.".to_string(),
            ));
        }
        Ok(())
    }
}

impl std::fmt::Debug for AdminCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Request body for admin login.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Issued admin session.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub timeout_secs: u64,
}
