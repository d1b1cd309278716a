//! Request-field validation shared by the write DTOs.
//!
//! DTOs derive [`validator::Validate`]; the custom checks here plug the stored
//! enum codes into that derive, and [`From<ValidationErrors>`] turns a failed
//! run into a single [`CoreError::Validation`] message.

use std::collections::HashSet;

use validator::{ValidationError, ValidationErrors, ValidationErrorsKind};

use crate::codes::{self, ArcType, IdeaType};
use crate::error::CoreError;
use crate::types::EntityId;

/// Maximum length of name/title style columns.
pub const MAX_NAME_LENGTH: u64 = 255;

/// Message attached to missing required fields.
pub const REQUIRED_MESSAGE: &str = "This field is required.";

fn code_error(err: CoreError) -> ValidationError {
    let mut out = ValidationError::new("invalid_choice");
    if let CoreError::Validation(msg) = err {
        out.message = Some(msg.into());
    }
    out
}

pub fn validate_gender_code(code: &str) -> Result<(), ValidationError> {
    codes::parse_gender(code).map(|_| ()).map_err(code_error)
}

pub fn validate_arc_type_code(code: &str) -> Result<(), ValidationError> {
    ArcType::parse(code).map(|_| ()).map_err(code_error)
}

pub fn validate_idea_type_code(code: &str) -> Result<(), ValidationError> {
    IdeaType::parse(code).map(|_| ()).map_err(code_error)
}

pub fn validate_relationship_type_codes(types: &[String]) -> Result<(), ValidationError> {
    codes::parse_relationship_types(types)
        .map(|_| ())
        .map_err(code_error)
}

/// Flatten validator output into `field: message` pairs, sorted by field so
/// the response is stable.
pub fn describe(errors: &ValidationErrors) -> String {
    let mut parts: Vec<String> = errors
        .errors()
        .iter()
        .filter_map(|(field, kind)| match kind {
            ValidationErrorsKind::Field(errs) => {
                let messages: Vec<String> = errs
                    .iter()
                    .map(|e| match &e.message {
                        Some(m) => m.to_string(),
                        None if e.code == "required" => REQUIRED_MESSAGE.to_string(),
                        None if e.code == "length" => "Ensure this field has between 1 and 255 characters.".to_string(),
                        None => format!("Invalid value ({})", e.code),
                    })
                    .collect();
                Some(format!("{field}: {}", messages.join(" ")))
            }
            _ => None,
        })
        .collect();
    parts.sort();
    parts.join("; ")
}

impl From<ValidationErrors> for CoreError {
    fn from(errors: ValidationErrors) -> Self {
        CoreError::Validation(describe(&errors))
    }
}

/// Drop repeated ids while keeping first-seen order.
pub fn dedup_ids(ids: &[EntityId]) -> Vec<EntityId> {
    let mut seen = HashSet::with_capacity(ids.len());
    ids.iter().copied().filter(|id| seen.insert(*id)).collect()
}
