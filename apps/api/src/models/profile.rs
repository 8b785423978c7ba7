use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Stored sex attribute. Feeds the implicit seventh risk factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sex {
    Male,
    Female,
    Other,
}

impl Sex {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sex::Male => "Male",
            Sex::Female => "Female",
            Sex::Other => "Other",
        }
    }

    pub fn from_label(s: &str) -> Option<Self> {
        match s {
            "Male" => Some(Sex::Male),
            "Female" => Some(Sex::Female),
            "Other" => Some(Sex::Other),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserProfileRow {
    pub user_id: Uuid,
    pub sex: Option<String>,
    pub age_group: Option<String>,
    pub family_history: Option<String>,
    pub menstrual_cycle: Option<String>,
    pub weather_sensitivity: Option<String>,
    pub updated_at: DateTime<Utc>,
}
