//! User profile: the demographic attributes the scorers read, most
//! importantly the stored sex feeding the implicit seventh risk factor.
//! Enum-valued fields are validated against their allowed sets.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::profile::{Sex, UserProfileRow};
use crate::state::AppState;

const VALID_AGE_GROUPS: [&str; 6] = ["18-25", "26-35", "36-45", "46-55", "56-65", "65+"];
const VALID_FAMILY_HISTORY: [&str; 2] = ["Yes", "No"];
const VALID_MENSTRUAL_CYCLE: [&str; 4] = ["N/A", "Regular", "Irregular", "Postmenopausal"];
const VALID_WEATHER_SENSITIVITY: [&str; 4] = ["None", "Low", "Moderate", "High"];

#[derive(Debug, Clone, Deserialize)]
pub struct ProfileUpdate {
    pub user_id: Uuid,
    #[serde(default)]
    pub sex: Option<String>,
    #[serde(default)]
    pub age_group: Option<String>,
    #[serde(default)]
    pub family_history: Option<String>,
    #[serde(default)]
    pub menstrual_cycle: Option<String>,
    #[serde(default)]
    pub weather_sensitivity: Option<String>,
}

#[derive(Deserialize)]
pub struct UserIdQuery {
    pub user_id: Uuid,
}

#[derive(Serialize)]
pub struct ProfileResponse {
    pub profile: UserProfileRow,
}

pub fn validate_profile(update: &ProfileUpdate) -> Result<(), AppError> {
    if let Some(sex) = update.sex.as_deref() {
        if Sex::from_label(sex).is_none() {
            return Err(AppError::Validation(format!(
                "Invalid sex '{sex}'. Allowed: Male, Female, Other"
            )));
        }
    }
    check_enum("age_group", update.age_group.as_deref(), &VALID_AGE_GROUPS)?;
    check_enum(
        "family_history",
        update.family_history.as_deref(),
        &VALID_FAMILY_HISTORY,
    )?;
    check_enum(
        "menstrual_cycle",
        update.menstrual_cycle.as_deref(),
        &VALID_MENSTRUAL_CYCLE,
    )?;
    check_enum(
        "weather_sensitivity",
        update.weather_sensitivity.as_deref(),
        &VALID_WEATHER_SENSITIVITY,
    )?;
    Ok(())
}

fn check_enum(field: &str, value: Option<&str>, allowed: &[&str]) -> Result<(), AppError> {
    match value {
        Some(v) if !allowed.contains(&v) => Err(AppError::Validation(format!(
            "Invalid {field} '{v}'. Allowed: {}",
            allowed.join(", ")
        ))),
        _ => Ok(()),
    }
}

/// The stored sex attribute, if the user has completed a profile.
pub async fn stored_sex(pool: &PgPool, user_id: Uuid) -> Result<Option<Sex>, AppError> {
    let sex: Option<Option<String>> =
        sqlx::query_scalar("SELECT sex FROM user_profiles WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(pool)
            .await?;
    Ok(sex.flatten().as_deref().and_then(Sex::from_label))
}

/// GET /api/v1/profile?user_id=…
pub async fn handle_get_profile(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<ProfileResponse>, AppError> {
    let profile: Option<UserProfileRow> =
        sqlx::query_as("SELECT * FROM user_profiles WHERE user_id = $1")
            .bind(params.user_id)
            .fetch_optional(&state.db)
            .await?;
    profile
        .map(|profile| Json(ProfileResponse { profile }))
        .ok_or_else(|| AppError::NotFound("Profile not found".to_string()))
}

/// PUT /api/v1/profile
pub async fn handle_update_profile(
    State(state): State<AppState>,
    Json(update): Json<ProfileUpdate>,
) -> Result<Json<Value>, AppError> {
    validate_profile(&update)?;

    sqlx::query(
        r#"
        INSERT INTO user_profiles
            (user_id, sex, age_group, family_history, menstrual_cycle,
             weather_sensitivity, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, now())
        ON CONFLICT (user_id)
        DO UPDATE SET
            sex = EXCLUDED.sex,
            age_group = EXCLUDED.age_group,
            family_history = EXCLUDED.family_history,
            menstrual_cycle = EXCLUDED.menstrual_cycle,
            weather_sensitivity = EXCLUDED.weather_sensitivity,
            updated_at = now()
        "#,
    )
    .bind(update.user_id)
    .bind(update.sex.as_deref())
    .bind(update.age_group.as_deref())
    .bind(update.family_history.as_deref())
    .bind(update.menstrual_cycle.as_deref())
    .bind(update.weather_sensitivity.as_deref())
    .execute(&state.db)
    .await?;

    Ok(Json(json!({"message": "Profile updated"})))
}
