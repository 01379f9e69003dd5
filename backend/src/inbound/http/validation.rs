//! Shared validation helpers for inbound HTTP adapters.
//!
//! Every helper returns an `invalid_request` [`Error`] whose details name
//! the offending field and a stable machine-readable code.

use std::str::FromStr;

use serde_json::json;

use crate::domain::{
    ContentCategory, Email, Error, NameError, ResourceName, UserValidationError, Username,
};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MissingField,
    InvalidUuid,
    InvalidValue,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::MissingField => "missing_field",
            ErrorCode::InvalidUuid => "invalid_uuid",
            ErrorCode::InvalidValue => "invalid_value",
        }
    }
}

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(self) -> &'static str {
        self.0
    }
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    let field = field.as_str();
    Error::invalid_request(format!("missing required field: {field}")).with_details(json!({
        "field": field,
        "code": ErrorCode::MissingField.as_str(),
    }))
}

pub(crate) fn invalid_value_error(field: FieldName, message: impl Into<String>) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field.as_str(),
        "code": ErrorCode::InvalidValue.as_str(),
    }))
}

/// Parse a UUID-backed identifier from a path segment.
pub(crate) fn parse_id<T: FromStr>(value: &str, field: FieldName) -> Result<T, Error> {
    value.parse().map_err(|_| {
        let name = field.as_str();
        Error::invalid_request(format!("{name} must be a valid UUID")).with_details(json!({
            "field": name,
            "value": value,
            "code": ErrorCode::InvalidUuid.as_str(),
        }))
    })
}

/// Parse the `category` query value; absent means `home`.
pub(crate) fn parse_category(value: Option<&str>) -> Result<ContentCategory, Error> {
    let Some(raw) = value else {
        return Ok(ContentCategory::default());
    };
    raw.parse().map_err(|_| {
        let allowed: Vec<&str> = ContentCategory::ALL.iter().map(|c| c.as_str()).collect();
        Error::invalid_request(format!("unknown category: {raw}")).with_details(json!({
            "field": "category",
            "value": raw,
            "allowed": allowed,
            "code": ErrorCode::InvalidValue.as_str(),
        }))
    })
}

pub(crate) fn parse_name(value: &str, field: FieldName) -> Result<ResourceName, Error> {
    ResourceName::new(value).map_err(|err: NameError| invalid_value_error(field, err.to_string()))
}

pub(crate) fn parse_username(value: &str) -> Result<Username, Error> {
    Username::new(value).map_err(|err| user_field_error(FieldName::new("username"), &err))
}

pub(crate) fn parse_email(value: &str) -> Result<Email, Error> {
    Email::new(value).map_err(|err| user_field_error(FieldName::new("email"), &err))
}

fn user_field_error(field: FieldName, err: &UserValidationError) -> Error {
    invalid_value_error(field, err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ErrorCode as DomainCode, StudyId};
    use rstest::rstest;

    #[rstest]
    fn missing_category_defaults_to_home() {
        assert_eq!(parse_category(None).expect("default"), ContentCategory::Home);
    }

    #[rstest]
    fn unknown_category_lists_allowed_values() {
        let err = parse_category(Some("public")).expect_err("unknown");
        assert_eq!(err.code(), DomainCode::InvalidRequest);
        let details = err.details().expect("details");
        assert_eq!(details["allowed"][5], "self");
        assert_eq!(details["value"], "public");
    }

    #[rstest]
    fn malformed_ids_report_field() {
        let err = parse_id::<StudyId>("abc", FieldName::new("studyId")).expect_err("bad id");
        let details = err.details().expect("details");
        assert_eq!(details["field"], "studyId");
        assert_eq!(details["code"], "invalid_uuid");
    }

    #[rstest]
    #[case("")]
    #[case("  ")]
    fn blank_names_are_invalid(#[case] raw: &str) {
        let err = parse_name(raw, FieldName::new("name")).expect_err("blank");
        assert_eq!(err.message(), "name must not be empty");
    }

    #[rstest]
    fn bad_username_reports_field() {
        let err = parse_username("no spaces").expect_err("invalid");
        assert_eq!(err.details().expect("details")["field"], "username");
    }
}
