/**
 * Testimonial Routes
 * CRUD API endpoints for testimonials
 */
use axum::{extract::Path, http::StatusCode, Json};
use uuid::Uuid;

use crate::db::{
    self,
    models::{NewTestimonial, Testimonial, UpdateTestimonial},
};
use crate::error::{ApiError, SuccessResponse};
use crate::routes::auth::AdminClaims;

// ============================================================================
// Validation
// ============================================================================

/// Rating bounds are inclusive: 1 and 5 are valid.
pub fn validate_rating(rating: i32) -> Result<(), ApiError> {
    if (1..=5).contains(&rating) {
        Ok(())
    } else {
        Err(ApiError::Validation(
            "Rating must be between 1 and 5".to_string(),
        ))
    }
}

fn validate_new(payload: &NewTestimonial) -> Result<(), ApiError> {
    if payload.name.trim().is_empty() {
        return Err(ApiError::Validation("Name is required".to_string()));
    }
    if payload.role.trim().is_empty() {
        return Err(ApiError::Validation("Role is required".to_string()));
    }
    if payload.content.trim().is_empty() {
        return Err(ApiError::Validation("Content is required".to_string()));
    }
    validate_rating(payload.rating)
}

const TESTIMONIAL_COLUMNS: &str =
    "id, name, role, content, rating, avatar, created_at, updated_at";

// ============================================================================
// Handlers
// ============================================================================

/// GET /api/testimonials - List all testimonials (public), newest first.
pub async fn list_testimonials() -> Result<Json<Vec<Testimonial>>, ApiError> {
    let pool = db::require_pool()?;

    let testimonials = sqlx::query_as::<_, Testimonial>(&format!(
        "SELECT {TESTIMONIAL_COLUMNS} FROM testimonials ORDER BY created_at DESC"
    ))
    .fetch_all(pool.as_ref())
    .await?;

    Ok(Json(testimonials))
}

/// GET /api/testimonials/{id} - Get single testimonial (public)
pub async fn get_testimonial(Path(id): Path<Uuid>) -> Result<Json<Testimonial>, ApiError> {
    let pool = db::require_pool()?;

    let testimonial = sqlx::query_as::<_, Testimonial>(&format!(
        "SELECT {TESTIMONIAL_COLUMNS} FROM testimonials WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool.as_ref())
    .await?
    .ok_or(ApiError::NotFound("Testimonial"))?;

    Ok(Json(testimonial))
}

/// POST /api/testimonials - Create testimonial (admin)
pub async fn create_testimonial(
    AdminClaims(_claims): AdminClaims,
    Json(payload): Json<NewTestimonial>,
) -> Result<(StatusCode, Json<Testimonial>), ApiError> {
    validate_new(&payload)?;

    let pool = db::require_pool()?;

    let testimonial = sqlx::query_as::<_, Testimonial>(&format!(
        r#"
        INSERT INTO testimonials (name, role, content, rating, avatar)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING {TESTIMONIAL_COLUMNS}
        "#
    ))
    .bind(&payload.name)
    .bind(&payload.role)
    .bind(&payload.content)
    .bind(payload.rating)
    .bind(payload.avatar.unwrap_or_default())
    .fetch_one(pool.as_ref())
    .await?;

    tracing::info!(testimonial_id = %testimonial.id, "testimonial created");

    Ok((StatusCode::CREATED, Json(testimonial)))
}

/// PUT /api/testimonials/{id} - Update testimonial with merge semantics (admin)
pub async fn update_testimonial(
    AdminClaims(_claims): AdminClaims,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateTestimonial>,
) -> Result<Json<Testimonial>, ApiError> {
    if let Some(rating) = payload.rating {
        validate_rating(rating)?;
    }
    if let Some(name) = &payload.name {
        if name.trim().is_empty() {
            return Err(ApiError::Validation("Name is required".to_string()));
        }
    }

    let pool = db::require_pool()?;

    let existing = sqlx::query_as::<_, Testimonial>(&format!(
        "SELECT {TESTIMONIAL_COLUMNS} FROM testimonials WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool.as_ref())
    .await?
    .ok_or(ApiError::NotFound("Testimonial"))?;

    let name = payload.name.unwrap_or(existing.name);
    let role = payload.role.unwrap_or(existing.role);
    let content = payload.content.unwrap_or(existing.content);
    let rating = payload.rating.unwrap_or(existing.rating);
    let avatar = payload.avatar.unwrap_or(existing.avatar);

    let testimonial = sqlx::query_as::<_, Testimonial>(&format!(
        r#"
        UPDATE testimonials
        SET name = $1, role = $2, content = $3, rating = $4, avatar = $5, updated_at = now()
        WHERE id = $6
        RETURNING {TESTIMONIAL_COLUMNS}
        "#
    ))
    .bind(&name)
    .bind(&role)
    .bind(&content)
    .bind(rating)
    .bind(&avatar)
    .bind(id)
    .fetch_one(pool.as_ref())
    .await?;

    Ok(Json(testimonial))
}

/// DELETE /api/testimonials/{id} - Delete testimonial (admin)
pub async fn delete_testimonial(
    AdminClaims(_claims): AdminClaims,
    Path(id): Path<Uuid>,
) -> Result<Json<SuccessResponse>, ApiError> {
    let pool = db::require_pool()?;

    let result = sqlx::query("DELETE FROM testimonials WHERE id = $1")
        .bind(id)
        .execute(pool.as_ref())
        .await?;

    if result.rows_affected() == 0 {
        return Err(ApiError::NotFound("Testimonial"));
    }

    tracing::info!(testimonial_id = %id, "testimonial deleted");

    Ok(Json(SuccessResponse {
        success: true,
        message: Some("Testimonial deleted successfully".to_string()),
    }))
}
