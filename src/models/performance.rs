//! Student performance model matching the frontend StudentPerformance interface.

use serde::{Deserialize, Serialize};

use super::{edited_image, generate_id, now_millis, require_text, validate_image};
use crate::errors::AppError;

/// Earliest and latest graduation year accepted on input.
pub const MIN_YEAR: i32 = 1900;
pub const MAX_YEAR: i32 = 2100;

/// Grade label given to records that do not specify one.
pub const DEFAULT_GRADE: &str = "12th Grade";

/// A top performer for a given year.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StudentPerformance {
    pub id: String,
    pub year: i32,
    pub student_name: String,
    pub grade: String,
    /// Aggregate score, lower is better
    pub agg: f64,
    pub achievements: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
}

impl StudentPerformance {
    /// Build a new record from a create request.
    pub fn from_request(request: CreatePerformanceRequest) -> Result<Self, AppError> {
        validate_year(request.year)?;
        validate_agg(request.agg)?;
        require_text(&request.student_name, "Student name is required")?;
        validate_image(request.photo_url.as_deref())?;

        let photo_url = request
            .photo_url
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| placeholder_photo(now_millis()));

        Ok(Self {
            id: generate_id(),
            year: request.year,
            student_name: request.student_name,
            grade: request.grade.unwrap_or_else(|| DEFAULT_GRADE.to_string()),
            agg: request.agg,
            achievements: request.achievements,
            photo_url: Some(photo_url),
        })
    }

    /// Apply an edit, keeping id and grade. An empty photo removes it.
    pub fn apply(&self, request: UpdatePerformanceRequest) -> Result<Self, AppError> {
        let year = request.year.unwrap_or(self.year);
        let agg = request.agg.unwrap_or(self.agg);
        let student_name = request
            .student_name
            .unwrap_or_else(|| self.student_name.clone());
        validate_year(year)?;
        validate_agg(agg)?;
        require_text(&student_name, "Student name is required")?;
        validate_image(request.photo_url.as_deref())?;

        Ok(Self {
            id: self.id.clone(),
            year,
            student_name,
            grade: self.grade.clone(),
            agg,
            achievements: request
                .achievements
                .unwrap_or_else(|| self.achievements.clone()),
            photo_url: edited_image(request.photo_url, &self.photo_url),
        })
    }
}

/// Placeholder portrait for records without a photo.
pub fn placeholder_photo(seed: i64) -> String {
    format!("https://picsum.photos/200/200?random={}", seed)
}

fn validate_year(year: i32) -> Result<(), AppError> {
    if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
        return Err(AppError::Validation(format!(
            "Please enter a valid year between {} and {}.",
            MIN_YEAR, MAX_YEAR
        )));
    }
    Ok(())
}

fn validate_agg(agg: f64) -> Result<(), AppError> {
    if !agg.is_finite() || agg < 0.0 {
        return Err(AppError::Validation(
            "Please enter a valid positive number for Aggregate (AGG).".to_string(),
        ));
    }
    Ok(())
}

/// Request body for creating a performance record.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePerformanceRequest {
    pub year: i32,
    pub student_name: String,
    pub agg: f64,
    #[serde(default)]
    pub achievements: String,
    #[serde(default)]
    pub grade: Option<String>,
    #[serde(default)]
    pub photo_url: Option<String>,
}

/// Request body for editing a performance record.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePerformanceRequest {
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub student_name: Option<String>,
    #[serde(default)]
    pub agg: Option<f64>,
    #[serde(default)]
    pub achievements: Option<String>,
    #[serde(default)]
    pub photo_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create(year: i32, agg: f64) -> CreatePerformanceRequest {
        CreatePerformanceRequest {
            year,
            student_name: "Ama Owusu".to_string(),
            agg,
            achievements: String::new(),
            grade: None,
            photo_url: None,
        }
    }

    #[test]
    fn test_year_range_enforced_on_input() {
        assert!(StudentPerformance::from_request(create(1900, 6.0)).is_ok());
        assert!(StudentPerformance::from_request(create(2100, 6.0)).is_ok());
        assert!(StudentPerformance::from_request(create(1899, 6.0)).is_err());
        assert!(StudentPerformance::from_request(create(2101, 6.0)).is_err());
    }

    #[test]
    fn test_agg_must_be_non_negative() {
        assert!(StudentPerformance::from_request(create(2020, -1.0)).is_err());
        assert!(StudentPerformance::from_request(create(2020, f64::NAN)).is_err());
        assert!(StudentPerformance::from_request(create(2020, 0.0)).is_ok());
    }

    #[test]
    fn test_defaults_grade_and_photo() {
        let record = StudentPerformance::from_request(create(2020, 7.0)).unwrap();
        assert_eq!(record.grade, DEFAULT_GRADE);
        assert!(record
            .photo_url
            .as_deref()
            .unwrap()
            .starts_with("https://picsum.photos/200/200?random="));
    }

    #[test]
    fn test_apply_validates_merged_values() {
        let record = StudentPerformance::from_request(create(2020, 7.0)).unwrap();
        let bad = record.apply(UpdatePerformanceRequest {
            year: Some(1800),
            student_name: None,
            agg: None,
            achievements: None,
            photo_url: None,
        });
        assert!(bad.is_err());

        let good = record
            .apply(UpdatePerformanceRequest {
                year: Some(2019),
                student_name: None,
                agg: Some(5.0),
                achievements: Some("Head Prefect".to_string()),
                photo_url: None,
            })
            .unwrap();
        assert_eq!(good.id, record.id);
        assert_eq!(good.year, 2019);
        assert_eq!(good.achievements, "Head Prefect");
        assert_eq!(good.photo_url, record.photo_url);

        let cleared = record
            .apply(UpdatePerformanceRequest {
                year: None,
                student_name: None,
                agg: None,
                achievements: None,
                photo_url: Some("  ".to_string()),
            })
            .unwrap();
        assert_eq!(cleared.photo_url, None);
    }
}
