use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::Competition;

const NAME_REQUIRED: &str = "Name is required";
const DATE_REQUIRED: &str = "Date is required";

/// Field order of the competition form, used to sort validation errors
const FORM_FIELDS: &[&str] = &["name", "competition_date", "location"];

/// Payload for saving a competition, either from the HTML form or the JSON API.
///
/// An absent `competition_id` means insert, a present one means update.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
pub struct SaveCompetitionRequest {
    #[serde(default)]
    pub competition_id: Option<Uuid>,

    #[validate(length(min = 1, max = 255, message = "Name is required"))]
    #[serde(default)]
    pub name: String,

    #[validate(required(message = "Date is required"))]
    #[serde(default)]
    pub competition_date: Option<NaiveDate>,

    #[validate(length(max = 255, message = "Location must be at most 255 characters"))]
    #[serde(default)]
    pub location: Option<String>,
}

/// A validation failure attached to one form field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// A validated competition ready to be stored
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompetitionDraft {
    pub competition_id: Option<Uuid>,
    pub name: String,
    pub competition_date: NaiveDate,
    pub location: Option<String>,
}

/// Response containing competition details
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CompetitionResponse {
    pub competition_id: Uuid,
    pub name: String,
    pub competition_date: NaiveDate,
    pub location: Option<String>,
    pub created_at: NaiveDateTime,
}

/// Result of the dependency check for one competition
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DependentsResponse {
    pub competition_id: Uuid,
    pub has_dependents: bool,
    pub registrations: i64,
}

impl SaveCompetitionRequest {
    /// Trim text input. A blank location is stored as no location.
    pub fn normalized(mut self) -> Self {
        self.name = self.name.trim().to_string();
        self.location = self
            .location
            .map(|l| l.trim().to_string())
            .filter(|l| !l.is_empty());
        self
    }

    /// Validation errors in form order, empty when the request is valid
    pub fn field_errors(&self) -> Vec<FieldError> {
        let Err(errors) = self.validate() else {
            return Vec::new();
        };

        let mut field_errors: Vec<FieldError> = errors
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |e| {
                    FieldError::new(
                        field.to_string(),
                        e.message
                            .as_ref()
                            .map(|m| m.to_string())
                            .unwrap_or_else(|| e.code.to_string()),
                    )
                })
            })
            .collect();

        field_errors.sort_by_key(|e| {
            FORM_FIELDS
                .iter()
                .position(|f| *f == e.field)
                .unwrap_or(FORM_FIELDS.len())
        });
        field_errors
    }

    /// Normalize, validate and bind the form onto a draft record
    pub fn into_draft(self) -> Result<CompetitionDraft, Vec<FieldError>> {
        let request = self.normalized();

        let errors = request.field_errors();
        if !errors.is_empty() {
            return Err(errors);
        }

        let Some(competition_date) = request.competition_date else {
            return Err(vec![FieldError::new("competition_date", DATE_REQUIRED)]);
        };
        if request.name.is_empty() {
            return Err(vec![FieldError::new("name", NAME_REQUIRED)]);
        }

        Ok(CompetitionDraft {
            competition_id: request.competition_id,
            name: request.name,
            competition_date,
            location: request.location,
        })
    }
}

impl From<&Competition> for SaveCompetitionRequest {
    fn from(comp: &Competition) -> Self {
        Self {
            competition_id: Some(comp.competition_id),
            name: comp.name.clone(),
            competition_date: Some(comp.competition_date),
            location: comp.location.clone(),
        }
    }
}

impl From<Competition> for CompetitionDraft {
    fn from(comp: Competition) -> Self {
        Self {
            competition_id: Some(comp.competition_id),
            name: comp.name,
            competition_date: comp.competition_date,
            location: comp.location,
        }
    }
}

impl From<Competition> for CompetitionResponse {
    fn from(comp: Competition) -> Self {
        Self {
            competition_id: comp.competition_id,
            name: comp.name,
            competition_date: comp.competition_date,
            location: comp.location,
            created_at: comp.created_at,
        }
    }
}
