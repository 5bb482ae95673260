//! Incoming analysis request

use serde::{Deserialize, Serialize};

use crate::error::AnalysisError;

/// Building category of the analysed site
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildingType {
    /// Detached house
    #[default]
    House,
    Apartment,
}

/// POST /api/v1/analysis body
///
/// Immutable once accepted by the lifecycle manager.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRequest {
    pub address: String,
    #[serde(default, alias = "building_type")]
    pub building_type: BuildingType,
    /// Result notification address (optional)
    #[serde(default)]
    pub email: Option<String>,
}

impl AnalysisRequest {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            building_type: BuildingType::default(),
            email: None,
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_building_type(mut self, building_type: BuildingType) -> Self {
        self.building_type = building_type;
        self
    }

    /// Check the fields that can be rejected without calling any provider
    pub fn validate(&self) -> Result<(), AnalysisError> {
        if self.address.trim().is_empty() {
            return Err(AnalysisError::InvalidAddress(
                "Address must not be empty".to_string(),
            ));
        }
        if let Some(email) = &self.email {
            if !is_valid_email(email) {
                return Err(AnalysisError::InvalidEmail(email.clone()));
            }
        }
        Ok(())
    }
}

/// Structural email check: one `@`, non-empty local part, dotted domain, no whitespace
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let mut parts = email.split('@');
    let (Some(local), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
        return false;
    };
    if local.is_empty() || domain.is_empty() {
        return false;
    }
    let labels: Vec<&str> = domain.split('.').collect();
    labels.len() >= 2 && labels.iter().all(|label| !label.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_building_type_defaults_to_house() {
        let request: AnalysisRequest =
            serde_json::from_str(r#"{"address": "경기도 수원시 영통구 광교로 156"}"#).unwrap();
        assert_eq!(request.building_type, BuildingType::House);
        assert!(request.email.is_none());
    }

    #[test]
    fn test_snake_case_building_type_accepted() {
        let request: AnalysisRequest = serde_json::from_str(
            r#"{"address": "경기도 성남시", "building_type": "apartment"}"#,
        )
        .unwrap();
        assert_eq!(request.building_type, BuildingType::Apartment);
    }

    #[test]
    fn test_unknown_building_type_rejected() {
        let parsed = serde_json::from_str::<AnalysisRequest>(
            r#"{"address": "경기도 성남시", "buildingType": "castle"}"#,
        );
        assert!(parsed.is_err());
    }

    #[test]
    fn test_blank_address_rejected() {
        let err = AnalysisRequest::new("   ").validate().unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidAddress(_)));
    }

    #[test]
    fn test_email_validation() {
        assert!(is_valid_email("user@example.com"));
        assert!(is_valid_email("first.last@mail.solarscan.kr"));
        assert!(!is_valid_email("user@localhost"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("user@@example.com"));
        assert!(!is_valid_email("user@example..com"));
        assert!(!is_valid_email("us er@example.com"));

        let err = AnalysisRequest::new("경기도 수원시")
            .with_email("not-an-email")
            .validate()
            .unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidEmail(_)));
    }
}
