//! News post model matching the frontend BlogPost interface.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::{edited_image, generate_id, now_millis, require_text, validate_image};
use crate::errors::AppError;

/// Post category shown as a badge on the news page.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum PostCategory {
    Announcement,
    Event,
    Reunion,
    #[default]
    News,
}

impl PostCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            PostCategory::Announcement => "Announcement",
            PostCategory::Event => "Event",
            PostCategory::Reunion => "Reunion",
            PostCategory::News => "News",
        }
    }
}

/// A news post, announcement or event.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: String,
    pub title: String,
    pub content: String,
    pub date: String,
    pub category: PostCategory,
    pub author: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl Post {
    /// Build a new post from a create request, stamping id, date and defaults.
    pub fn from_request(request: CreatePostRequest) -> Result<Self, AppError> {
        require_text(&request.title, "Title is required")?;
        require_text(&request.content, "Content is required")?;
        validate_image(request.image_url.as_deref())?;

        let image_url = request
            .image_url
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| format!("https://picsum.photos/800/400?random={}", now_millis()));

        Ok(Self {
            id: generate_id(),
            title: request.title,
            content: request.content,
            date: Utc::now().to_rfc3339(),
            category: request.category,
            author: request.author.unwrap_or_else(|| "Admin".to_string()),
            image_url: Some(image_url),
        })
    }

    /// Apply an edit, keeping id, date and author. An empty image removes it.
    pub fn apply(&self, request: UpdatePostRequest) -> Result<Self, AppError> {
        let title = request.title.unwrap_or_else(|| self.title.clone());
        let content = request.content.unwrap_or_else(|| self.content.clone());
        require_text(&title, "Title is required")?;
        require_text(&content, "Content is required")?;
        validate_image(request.image_url.as_deref())?;

        Ok(Self {
            id: self.id.clone(),
            title,
            content,
            date: self.date.clone(),
            category: request.category.unwrap_or(self.category),
            author: self.author.clone(),
            image_url: edited_image(request.image_url, &self.image_url),
        })
    }
}

/// Request body for creating a new post.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostRequest {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub category: PostCategory,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}

/// Request body for editing an existing post.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePostRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub category: Option<PostCategory>,
    #[serde(default)]
    pub image_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create(title: &str, content: &str) -> CreatePostRequest {
        CreatePostRequest {
            title: title.to_string(),
            content: content.to_string(),
            category: PostCategory::Event,
            author: None,
            image_url: None,
        }
    }

    #[test]
    fn test_from_request_fills_defaults() {
        let post = Post::from_request(create("Sports Day", "Join us on the field.")).unwrap();
        assert_eq!(post.author, "Admin");
        assert_eq!(post.category, PostCategory::Event);
        assert!(post
            .image_url
            .as_deref()
            .unwrap()
            .starts_with("https://picsum.photos/800/400?random="));
    }

    #[test]
    fn test_from_request_requires_title() {
        let result = Post::from_request(create("   ", "body"));
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[test]
    fn test_apply_keeps_identity() {
        let post = Post::from_request(create("Old", "Body")).unwrap();
        let edited = post
            .apply(UpdatePostRequest {
                title: Some("New".to_string()),
                content: None,
                category: Some(PostCategory::Reunion),
                image_url: None,
            })
            .unwrap();
        assert_eq!(edited.id, post.id);
        assert_eq!(edited.date, post.date);
        assert_eq!(edited.title, "New");
        assert_eq!(edited.content, "Body");
        assert_eq!(edited.category, PostCategory::Reunion);
        assert_eq!(edited.image_url, post.image_url);
    }

    #[test]
    fn test_apply_blank_image_removes_it() {
        let post = Post::from_request(create("Old", "Body")).unwrap();
        let edited = post
            .apply(UpdatePostRequest {
                title: None,
                content: None,
                category: None,
                image_url: Some(String::new()),
            })
            .unwrap();
        assert_eq!(edited.image_url, None);
        assert!(serde_json::to_value(&edited)
            .unwrap()
            .get("imageUrl")
            .is_none());
    }

    #[test]
    fn test_category_wire_names() {
        let json = serde_json::to_string(&PostCategory::Announcement).unwrap();
        assert_eq!(json, "\"Announcement\"");
        assert_eq!(PostCategory::Reunion.as_str(), "Reunion");
    }
}
