//! Shared types used across the assistant crates.

use serde::{Deserialize, Serialize};

// -----------------------------------------------------------------------------
// Establishment classification
// -----------------------------------------------------------------------------

/// Building use classification. Drives which Fire Code (RA 9514 RIRR) requirements apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EstablishmentType {
    Residential,
    Business,
    Mercantile,
    Educational,
    Assembly,
    Industrial,
    Storage,
    #[serde(rename = "Health Care")]
    HealthCare,
    #[serde(rename = "Special Occupancy")]
    SpecialOccupancy,
    Others,
}

impl EstablishmentType {
    /// All selectable types, in the order the search form presents them.
    pub const ALL: [EstablishmentType; 10] = [
        Self::Residential,
        Self::Business,
        Self::Mercantile,
        Self::Educational,
        Self::Assembly,
        Self::Industrial,
        Self::Storage,
        Self::HealthCare,
        Self::SpecialOccupancy,
        Self::Others,
    ];

    /// Human-readable label as it appears in prompts and stored reports.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Residential => "Residential",
            Self::Business => "Business",
            Self::Mercantile => "Mercantile",
            Self::Educational => "Educational",
            Self::Assembly => "Assembly",
            Self::Industrial => "Industrial",
            Self::Storage => "Storage",
            Self::HealthCare => "Health Care",
            Self::SpecialOccupancy => "Special Occupancy",
            Self::Others => "Others",
        }
    }

    /// Parses a label back into a type (exact match on `label()`).
    pub fn parse_label(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|t| t.label() == s.trim())
    }
}

impl std::fmt::Display for EstablishmentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

// -----------------------------------------------------------------------------
// Search parameters
// -----------------------------------------------------------------------------

/// Local validation failures, raised before any request is composed or dispatched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("Please select at least one defect or add observations.")]
    NoDefects,
}

/// Establishment attributes collected by the search form. `None`/empty fields mean
/// the form is incomplete; `validate()` gates report generation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchParams {
    /// Occupancy classification; `None` until the inspector picks one.
    #[serde(default)]
    pub establishment_type: Option<EstablishmentType>,
    /// Floor area in square meters, kept as the raw string the inspector typed.
    #[serde(default)]
    pub area: String,
    /// Number of stories, kept as the raw string the inspector typed.
    #[serde(default)]
    pub stories: String,
}

impl SearchParams {
    /// All fields must be filled before a report request may be composed.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.establishment_type.is_none() {
            return Err(ValidationError::MissingField("Type of establishment"));
        }
        if self.area.trim().is_empty() {
            return Err(ValidationError::MissingField("Floor area"));
        }
        if self.stories.trim().is_empty() {
            return Err(ValidationError::MissingField("Number of stories"));
        }
        Ok(())
    }

    /// Label of the selected type, or an empty string while unselected.
    pub fn type_label(&self) -> &'static str {
        self.establishment_type.map(|t| t.label()).unwrap_or("")
    }
}

// -----------------------------------------------------------------------------
// Users and saved reports
// -----------------------------------------------------------------------------

/// One registered inspector. The password is kept only inside the stored user
/// directory; every value handed back to callers has it stripped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub email: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl User {
    pub fn new(email: impl Into<String>, name: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            name: name.into(),
            password: Some(password.into()),
        }
    }

    /// Copy of this user with the password stripped, safe to hand to callers
    /// and to persist as the session marker.
    pub fn public(&self) -> User {
        User {
            email: self.email.clone(),
            name: self.name.clone(),
            password: None,
        }
    }
}

/// One generated inspection report, snapshotted at generation time. Immutable
/// thereafter; the stored params are a value copy so later form edits never
/// alter history entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedReport {
    /// Time-based unique token.
    pub id: String,
    /// Unix timestamp in milliseconds.
    pub timestamp: i64,
    pub params: SearchParams,
    /// Rendered report markdown.
    pub result: String,
}

impl SavedReport {
    /// Snapshots the given params and result under a fresh time-based id.
    pub fn snapshot(params: &SearchParams, result: impl Into<String>) -> Self {
        let now_ms = chrono::Utc::now().timestamp_millis();
        Self {
            id: format!("{}-{}", now_ms, uuid::Uuid::new_v4().simple()),
            timestamp: now_ms,
            params: params.clone(),
            result: result.into(),
        }
    }
}

// -----------------------------------------------------------------------------
// Chat transcript
// -----------------------------------------------------------------------------

/// Author of one transcript entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

impl Role {
    /// Wire name used by the Generative Language API ("user" / "model").
    pub fn wire_name(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Model => "model",
        }
    }
}

/// One entry in a conversation transcript. Append-only per open session;
/// not persisted across sessions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub text: String,
}

impl ChatMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self { role: Role::User, text: text.into() }
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self { role: Role::Model, text: text.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn establishment_label_round_trip() {
        for t in EstablishmentType::ALL {
            assert_eq!(EstablishmentType::parse_label(t.label()), Some(t));
        }
        assert_eq!(EstablishmentType::parse_label("Health Care"), Some(EstablishmentType::HealthCare));
        assert_eq!(EstablishmentType::parse_label("Hospital"), None);
    }

    #[test]
    fn params_validation_requires_all_fields() {
        let mut params = SearchParams::default();
        assert_eq!(
            params.validate(),
            Err(ValidationError::MissingField("Type of establishment"))
        );
        params.establishment_type = Some(EstablishmentType::Mercantile);
        assert_eq!(params.validate(), Err(ValidationError::MissingField("Floor area")));
        params.area = "450".to_string();
        params.stories = "  ".to_string();
        assert_eq!(
            params.validate(),
            Err(ValidationError::MissingField("Number of stories"))
        );
        params.stories = "3".to_string();
        assert!(params.validate().is_ok());
    }

    #[test]
    fn public_user_strips_password() {
        let user = User::new("inspector@bfp.gov.ph", "Lead Inspector", "admin");
        let public = user.public();
        assert_eq!(public.email, user.email);
        assert_eq!(public.name, user.name);
        assert!(public.password.is_none());
        // Serialized public users never carry a password field.
        let json = serde_json::to_string(&public).unwrap();
        assert!(!json.contains("password"));
    }

    #[test]
    fn snapshot_copies_params_by_value() {
        let mut params = SearchParams {
            establishment_type: Some(EstablishmentType::Educational),
            area: "1200".to_string(),
            stories: "2".to_string(),
        };
        let report = SavedReport::snapshot(&params, "# Report");
        params.area = "9999".to_string();
        assert_eq!(report.params.area, "1200");
        assert!(!report.id.is_empty());
    }
}
