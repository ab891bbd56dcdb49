//! Testimonial and alumni identity endpoints.

use axum::extract::{Path, State};

use super::{success, ApiResult, AppJson, DeleteResult};
use crate::errors::AppError;
use crate::models::{
    AlumniIdentity, IdentifyAlumniRequest, SubmitTestimonialRequest, Testimonial,
    UpdateTestimonialRequest,
};
use crate::performance::identify_alumnus;
use crate::AppState;

/// GET /api/testimonials - Newest first.
pub async fn list_testimonials(State(state): State<AppState>) -> ApiResult<Vec<Testimonial>> {
    let testimonials = state.repo.list_testimonials().await?;
    success(testimonials)
}

/// POST /api/alumni/identify - Check an alumni claim against performance records.
pub async fn identify_alumni(
    State(state): State<AppState>,
    AppJson(request): AppJson<IdentifyAlumniRequest>,
) -> ApiResult<AlumniIdentity> {
    let records = state.repo.list_performance().await?;
    let matched = identify_alumnus(&request.name, &request.user_class, &records)?;

    success(AlumniIdentity {
        name: matched.student_name.clone(),
        user_class: request.user_class,
    })
}

/// POST /api/testimonials - Submit a review. The identity claim is re-checked.
pub async fn submit_testimonial(
    State(state): State<AppState>,
    AppJson(request): AppJson<SubmitTestimonialRequest>,
) -> ApiResult<Testimonial> {
    let records = state.repo.list_performance().await?;
    let user_name = identify_alumnus(&request.name, &request.user_class, &records)?
        .student_name
        .clone();

    let testimonial = Testimonial::for_alumnus(user_name, request)?;
    state.repo.add_testimonial(testimonial.clone()).await?;
    tracing::info!(id = %testimonial.id, "Testimonial submitted");
    success(testimonial)
}

/// PUT /api/admin/testimonials/{id} - Moderate a review.
pub async fn update_testimonial(
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(request): AppJson<UpdateTestimonialRequest>,
) -> ApiResult<Testimonial> {
    let existing = state
        .repo
        .get_testimonial(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Testimonial {} not found", id)))?;

    let updated = existing.apply(request)?;
    if !state.repo.update_testimonial(updated.clone()).await? {
        return Err(AppError::NotFound(format!("Testimonial {} not found", id)));
    }
    success(updated)
}

/// DELETE /api/admin/testimonials/{id} - Remove a review.
pub async fn delete_testimonial(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<DeleteResult> {
    let deleted = state.repo.delete_testimonial(&id).await?;
    success(DeleteResult { deleted })
}
