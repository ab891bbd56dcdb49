//! Site settings endpoints and the live change stream.

use std::convert::Infallible;
use std::time::Duration;

use axum::{
    extract::{Path, State},
    response::sse::{Event, KeepAlive, Sse},
};
use futures::stream::{Stream, StreamExt};
use tokio_stream::wrappers::BroadcastStream;

use super::{success, ApiResult, AppJson};
use crate::errors::AppError;
use crate::models::{validate_image, AddHeroImageRequest, SiteSettings};
use crate::AppState;

/// SSE event name carrying a full settings snapshot.
pub const SETTINGS_EVENT: &str = "settings-changed";

/// GET /api/settings - Current settings, seeded on first read.
pub async fn get_settings(State(state): State<AppState>) -> ApiResult<SiteSettings> {
    let settings = state.repo.get_settings().await?;
    success(settings)
}

/// GET /api/settings/events - Stream of settings snapshots after each save.
pub async fn settings_events(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = state.repo.notifier().subscribe();
    tracing::debug!(
        subscribers = state.repo.notifier().subscriber_count(),
        "Settings subscriber connected"
    );

    let stream = BroadcastStream::new(rx).filter_map(|result| async move {
        match result {
            Ok(settings) => match Event::default().event(SETTINGS_EVENT).json_data(&settings) {
                Ok(event) => Some(Ok(event)),
                Err(e) => {
                    tracing::warn!("Failed to serialize settings event: {}", e);
                    None
                }
            },
            // Lagged receivers pick up the next snapshot
            Err(e) => {
                tracing::warn!("Settings stream error: {:?}", e);
                None
            }
        }
    });

    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keep-alive"),
    )
}

/// PUT /api/admin/settings - Replace the settings wholesale.
pub async fn save_settings(
    State(state): State<AppState>,
    AppJson(settings): AppJson<SiteSettings>,
) -> ApiResult<SiteSettings> {
    settings.validate()?;
    state.repo.save_settings(settings.clone()).await?;
    success(settings)
}

/// POST /api/admin/settings/hero-images - Append a carousel image.
pub async fn add_hero_image(
    State(state): State<AppState>,
    AppJson(request): AppJson<AddHeroImageRequest>,
) -> ApiResult<SiteSettings> {
    let image = request.image_url.trim().to_string();
    if image.is_empty() {
        return Err(AppError::Validation("Image URL is required".to_string()));
    }
    validate_image(Some(&image))?;

    let settings = state
        .repo
        .modify_settings(move |settings| {
            settings.hero_images.push(image);
            Ok(())
        })
        .await?;
    success(settings)
}

/// DELETE /api/admin/settings/hero-images/{index} - Remove a carousel image by position.
pub async fn remove_hero_image(
    State(state): State<AppState>,
    Path(index): Path<usize>,
) -> ApiResult<SiteSettings> {
    let settings = state
        .repo
        .modify_settings(move |settings| {
            if index >= settings.hero_images.len() {
                return Err(AppError::NotFound(format!("Hero image {} not found", index)));
            }
            settings.hero_images.remove(index);
            Ok(())
        })
        .await?;
    success(settings)
}
