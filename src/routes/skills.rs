/**
 * Skill Routes
 * CRUD API endpoints for skills
 */
use axum::{extract::Path, http::StatusCode, Json};
use uuid::Uuid;

use crate::db::{
    self,
    models::{NewSkill, Skill, UpdateSkill},
};
use crate::error::{ApiError, SuccessResponse};
use crate::routes::auth::AdminClaims;

// ============================================================================
// Validation
// ============================================================================

/// Valid skill categories
pub const SKILL_CATEGORIES: &[&str] = &["frontend", "backend", "tools"];

/// Valid skill levels
pub const SKILL_LEVELS: &[&str] = &["Beginner", "Intermediate", "Advanced", "Expert"];

fn validate_category(category: &str) -> Result<(), ApiError> {
    if SKILL_CATEGORIES.contains(&category) {
        Ok(())
    } else {
        Err(ApiError::Validation(format!(
            "Invalid category. Valid categories: {:?}",
            SKILL_CATEGORIES
        )))
    }
}

fn validate_level(level: &str) -> Result<(), ApiError> {
    if SKILL_LEVELS.contains(&level) {
        Ok(())
    } else {
        Err(ApiError::Validation(format!(
            "Invalid level. Valid levels: {:?}",
            SKILL_LEVELS
        )))
    }
}

/// Percentage bounds are inclusive: 0 and 100 are valid.
pub fn validate_percentage(percentage: i32) -> Result<(), ApiError> {
    if (0..=100).contains(&percentage) {
        Ok(())
    } else {
        Err(ApiError::Validation(
            "Percentage must be between 0 and 100".to_string(),
        ))
    }
}

fn validate_new(payload: &NewSkill) -> Result<(), ApiError> {
    if payload.name.trim().is_empty() {
        return Err(ApiError::Validation("Name is required".to_string()));
    }
    if payload.experience.trim().is_empty() {
        return Err(ApiError::Validation("Experience is required".to_string()));
    }
    validate_category(&payload.category)?;
    validate_level(&payload.level)?;
    validate_percentage(payload.percentage)
}

const SKILL_COLUMNS: &str =
    "id, name, category, level, percentage, experience, created_at, updated_at";

// ============================================================================
// Handlers
// ============================================================================

/// GET /api/skills - List all skills (public).
/// Ordering: by category, then strongest percentage first.
pub async fn list_skills() -> Result<Json<Vec<Skill>>, ApiError> {
    let pool = db::require_pool()?;

    let skills = sqlx::query_as::<_, Skill>(&format!(
        "SELECT {SKILL_COLUMNS} FROM skills ORDER BY category ASC, percentage DESC"
    ))
    .fetch_all(pool.as_ref())
    .await?;

    Ok(Json(skills))
}

/// GET /api/skills/{id} - Get single skill (public)
pub async fn get_skill(Path(id): Path<Uuid>) -> Result<Json<Skill>, ApiError> {
    let pool = db::require_pool()?;

    let skill =
        sqlx::query_as::<_, Skill>(&format!("SELECT {SKILL_COLUMNS} FROM skills WHERE id = $1"))
            .bind(id)
            .fetch_optional(pool.as_ref())
            .await?
            .ok_or(ApiError::NotFound("Skill"))?;

    Ok(Json(skill))
}

/// POST /api/skills - Create skill (admin)
pub async fn create_skill(
    AdminClaims(_claims): AdminClaims,
    Json(payload): Json<NewSkill>,
) -> Result<(StatusCode, Json<Skill>), ApiError> {
    validate_new(&payload)?;

    let pool = db::require_pool()?;

    let skill = sqlx::query_as::<_, Skill>(&format!(
        r#"
        INSERT INTO skills (name, category, level, percentage, experience)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING {SKILL_COLUMNS}
        "#
    ))
    .bind(&payload.name)
    .bind(&payload.category)
    .bind(&payload.level)
    .bind(payload.percentage)
    .bind(&payload.experience)
    .fetch_one(pool.as_ref())
    .await?;

    tracing::info!(skill_id = %skill.id, "skill created");

    Ok((StatusCode::CREATED, Json(skill)))
}

/// PUT /api/skills/{id} - Update skill with merge semantics (admin)
pub async fn update_skill(
    AdminClaims(_claims): AdminClaims,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateSkill>,
) -> Result<Json<Skill>, ApiError> {
    if let Some(category) = &payload.category {
        validate_category(category)?;
    }
    if let Some(level) = &payload.level {
        validate_level(level)?;
    }
    if let Some(percentage) = payload.percentage {
        validate_percentage(percentage)?;
    }
    if let Some(name) = &payload.name {
        if name.trim().is_empty() {
            return Err(ApiError::Validation("Name is required".to_string()));
        }
    }

    let pool = db::require_pool()?;

    let existing =
        sqlx::query_as::<_, Skill>(&format!("SELECT {SKILL_COLUMNS} FROM skills WHERE id = $1"))
            .bind(id)
            .fetch_optional(pool.as_ref())
            .await?
            .ok_or(ApiError::NotFound("Skill"))?;

    let name = payload.name.unwrap_or(existing.name);
    let category = payload.category.unwrap_or(existing.category);
    let level = payload.level.unwrap_or(existing.level);
    let percentage = payload.percentage.unwrap_or(existing.percentage);
    let experience = payload.experience.unwrap_or(existing.experience);

    let skill = sqlx::query_as::<_, Skill>(&format!(
        r#"
        UPDATE skills
        SET name = $1, category = $2, level = $3, percentage = $4, experience = $5,
            updated_at = now()
        WHERE id = $6
        RETURNING {SKILL_COLUMNS}
        "#
    ))
    .bind(&name)
    .bind(&category)
    .bind(&level)
    .bind(percentage)
    .bind(&experience)
    .bind(id)
    .fetch_one(pool.as_ref())
    .await?;

    Ok(Json(skill))
}

/// DELETE /api/skills/{id} - Delete skill (admin)
pub async fn delete_skill(
    AdminClaims(_claims): AdminClaims,
    Path(id): Path<Uuid>,
) -> Result<Json<SuccessResponse>, ApiError> {
    let pool = db::require_pool()?;

    let result = sqlx::query("DELETE FROM skills WHERE id = $1")
        .bind(id)
        .execute(pool.as_ref())
        .await?;

    if result.rows_affected() == 0 {
        return Err(ApiError::NotFound("Skill"));
    }

    tracing::info!(skill_id = %id, "skill deleted");

    Ok(Json(SuccessResponse {
        success: true,
        message: Some("Skill deleted successfully".to_string()),
    }))
}
