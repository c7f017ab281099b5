/**
 * Project Routes
 * CRUD API endpoints for portfolio projects
 */
use axum::{extract::Path, http::StatusCode, Json};
use uuid::Uuid;

use crate::db::{
    self,
    models::{NewProject, Project, UpdateProject},
};
use crate::error::{ApiError, SuccessResponse};
use crate::routes::auth::AdminClaims;

// ============================================================================
// Validation
// ============================================================================

/// Valid project categories
pub const PROJECT_CATEGORIES: &[&str] = &["web", "mobile", "design", "other"];

fn validate_category(category: &str) -> Result<(), ApiError> {
    if PROJECT_CATEGORIES.contains(&category) {
        Ok(())
    } else {
        Err(ApiError::Validation(format!(
            "Invalid category. Valid categories: {:?}",
            PROJECT_CATEGORIES
        )))
    }
}

fn validate_new(payload: &NewProject) -> Result<(), ApiError> {
    if payload.title.trim().is_empty() {
        return Err(ApiError::Validation("Title is required".to_string()));
    }
    if payload.description.trim().is_empty() {
        return Err(ApiError::Validation("Description is required".to_string()));
    }
    if payload.image.trim().is_empty() {
        return Err(ApiError::Validation("Image is required".to_string()));
    }
    validate_category(&payload.category)
}

const PROJECT_COLUMNS: &str =
    "id, title, description, image, technologies, category, live_url, github_url, \
     featured, created_at, updated_at";

// ============================================================================
// Handlers
// ============================================================================

/// GET /api/projects - List all projects (public).
/// Ordering: featured first, then newest by creation time.
pub async fn list_projects() -> Result<Json<Vec<Project>>, ApiError> {
    let pool = db::require_pool()?;

    let projects = sqlx::query_as::<_, Project>(&format!(
        "SELECT {PROJECT_COLUMNS} FROM projects ORDER BY featured DESC, created_at DESC"
    ))
    .fetch_all(pool.as_ref())
    .await?;

    Ok(Json(projects))
}

/// GET /api/projects/{id} - Get single project (public)
pub async fn get_project(Path(id): Path<Uuid>) -> Result<Json<Project>, ApiError> {
    let pool = db::require_pool()?;

    let project = sqlx::query_as::<_, Project>(&format!(
        "SELECT {PROJECT_COLUMNS} FROM projects WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool.as_ref())
    .await?
    .ok_or(ApiError::NotFound("Project"))?;

    Ok(Json(project))
}

/// POST /api/projects - Create project (admin)
pub async fn create_project(
    AdminClaims(_claims): AdminClaims,
    Json(payload): Json<NewProject>,
) -> Result<(StatusCode, Json<Project>), ApiError> {
    validate_new(&payload)?;

    let pool = db::require_pool()?;

    let project = sqlx::query_as::<_, Project>(&format!(
        r#"
        INSERT INTO projects
            (title, description, image, technologies, category, live_url, github_url, featured)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING {PROJECT_COLUMNS}
        "#
    ))
    .bind(&payload.title)
    .bind(&payload.description)
    .bind(&payload.image)
    .bind(&payload.technologies)
    .bind(&payload.category)
    .bind(payload.live_url.unwrap_or_default())
    .bind(payload.github_url.unwrap_or_default())
    .bind(payload.featured.unwrap_or(false))
    .fetch_one(pool.as_ref())
    .await?;

    tracing::info!(project_id = %project.id, "project created");

    Ok((StatusCode::CREATED, Json(project)))
}

/// PUT /api/projects/{id} - Update project with merge semantics (admin)
pub async fn update_project(
    AdminClaims(_claims): AdminClaims,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateProject>,
) -> Result<Json<Project>, ApiError> {
    if let Some(category) = &payload.category {
        validate_category(category)?;
    }
    if let Some(title) = &payload.title {
        if title.trim().is_empty() {
            return Err(ApiError::Validation("Title is required".to_string()));
        }
    }

    let pool = db::require_pool()?;

    let existing = sqlx::query_as::<_, Project>(&format!(
        "SELECT {PROJECT_COLUMNS} FROM projects WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool.as_ref())
    .await?
    .ok_or(ApiError::NotFound("Project"))?;

    // Merge: fields absent in the payload keep their prior values.
    let title = payload.title.unwrap_or(existing.title);
    let description = payload.description.unwrap_or(existing.description);
    let image = payload.image.unwrap_or(existing.image);
    let technologies = payload.technologies.unwrap_or(existing.technologies);
    let category = payload.category.unwrap_or(existing.category);
    let live_url = payload.live_url.unwrap_or(existing.live_url);
    let github_url = payload.github_url.unwrap_or(existing.github_url);
    let featured = payload.featured.unwrap_or(existing.featured);

    let project = sqlx::query_as::<_, Project>(&format!(
        r#"
        UPDATE projects
        SET title = $1, description = $2, image = $3, technologies = $4, category = $5,
            live_url = $6, github_url = $7, featured = $8, updated_at = now()
        WHERE id = $9
        RETURNING {PROJECT_COLUMNS}
        "#
    ))
    .bind(&title)
    .bind(&description)
    .bind(&image)
    .bind(&technologies)
    .bind(&category)
    .bind(&live_url)
    .bind(&github_url)
    .bind(featured)
    .bind(id)
    .fetch_one(pool.as_ref())
    .await?;

    Ok(Json(project))
}

/// DELETE /api/projects/{id} - Delete project (admin).
/// Deleting an unknown or already-deleted id reports not-found.
pub async fn delete_project(
    AdminClaims(_claims): AdminClaims,
    Path(id): Path<Uuid>,
) -> Result<Json<SuccessResponse>, ApiError> {
    let pool = db::require_pool()?;

    let result = sqlx::query("DELETE FROM projects WHERE id = $1")
        .bind(id)
        .execute(pool.as_ref())
        .await?;

    if result.rows_affected() == 0 {
        return Err(ApiError::NotFound("Project"));
    }

    tracing::info!(project_id = %id, "project deleted");

    Ok(Json(SuccessResponse {
        success: true,
        message: Some("Project deleted successfully".to_string()),
    }))
}
