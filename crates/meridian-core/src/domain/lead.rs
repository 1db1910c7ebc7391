//! Contact-form leads. Never persisted; only the notification email outlives
//! the request.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// What the prospect wants to talk about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Interest {
    Strategy,
    Engineering,
    CloudMigration,
    DataAnalytics,
    Training,
    Other,
}

impl Interest {
    pub fn as_str(&self) -> &'static str {
        match self {
            Interest::Strategy => "strategy",
            Interest::Engineering => "engineering",
            Interest::CloudMigration => "cloud-migration",
            Interest::DataAnalytics => "data-analytics",
            Interest::Training => "training",
            Interest::Other => "other",
        }
    }

    /// Human label used in the notification email.
    pub fn label(&self) -> &'static str {
        match self {
            Interest::Strategy => "Technology strategy",
            Interest::Engineering => "Software engineering",
            Interest::CloudMigration => "Cloud migration",
            Interest::DataAnalytics => "Data & analytics",
            Interest::Training => "Team training",
            Interest::Other => "Something else",
        }
    }
}

impl fmt::Display for Interest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Interest {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "strategy" => Ok(Interest::Strategy),
            "engineering" => Ok(Interest::Engineering),
            "cloud-migration" => Ok(Interest::CloudMigration),
            "data-analytics" => Ok(Interest::DataAnalytics),
            "training" => Ok(Interest::Training),
            "other" => Ok(Interest::Other),
            other => Err(DomainError::Validation(format!(
                "Unknown interest '{other}'"
            ))),
        }
    }
}

/// Raw contact-form body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LeadSubmission {
    pub name: Option<String>,
    pub email: Option<String>,
    pub company: Option<String>,
    pub interest: Option<String>,
    pub message: Option<String>,
    pub consent: Option<bool>,
}

/// A validated lead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lead {
    pub name: String,
    pub email: String,
    pub company: Option<String>,
    pub interest: Interest,
    pub message: String,
}

fn required(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl TryFrom<LeadSubmission> for Lead {
    type Error = DomainError;

    fn try_from(raw: LeadSubmission) -> Result<Self, Self::Error> {
        let (Some(name), Some(email), Some(interest), Some(message), Some(consent)) = (
            required(raw.name),
            required(raw.email),
            required(raw.interest),
            required(raw.message),
            raw.consent,
        ) else {
            return Err(DomainError::validation("Missing required fields"));
        };

        if !consent {
            return Err(DomainError::validation(
                "Consent is required to process your request",
            ));
        }
        if !email.contains('@') {
            return Err(DomainError::validation("Invalid email address"));
        }

        Ok(Self {
            name,
            email,
            company: required(raw.company),
            interest: interest.parse()?,
            message,
        })
    }
}

/// Mask an address for logging: `jane@acme.io` becomes `j***@acme.io`.
pub fn mask_email(email: &str) -> String {
    match email.find('@') {
        Some(at_pos) => {
            let (local, domain) = email.split_at(at_pos);
            let masked_local = match local.chars().next() {
                Some(first) if local.len() > 1 => format!("{first}***"),
                _ => "***".to_string(),
            };
            format!("{masked_local}{domain}")
        }
        None => "***".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete() -> LeadSubmission {
        LeadSubmission {
            name: Some("Jane Doe".into()),
            email: Some("jane@acme.io".into()),
            company: Some("".into()),
            interest: Some("cloud-migration".into()),
            message: Some("We need help moving off our datacenter.".into()),
            consent: Some(true),
        }
    }

    #[test]
    fn test_complete_submission_parses() {
        let lead = Lead::try_from(complete()).unwrap();
        assert_eq!(lead.interest, Interest::CloudMigration);
        assert_eq!(lead.company, None);
    }

    #[test]
    fn test_missing_consent_rejected() {
        let raw = LeadSubmission {
            consent: None,
            ..complete()
        };
        assert!(matches!(
            Lead::try_from(raw),
            Err(DomainError::Validation(msg)) if msg == "Missing required fields"
        ));
    }

    #[test]
    fn test_declined_consent_rejected() {
        let raw = LeadSubmission {
            consent: Some(false),
            ..complete()
        };
        assert!(Lead::try_from(raw).is_err());
    }

    #[test]
    fn test_unknown_interest_rejected() {
        let raw = LeadSubmission {
            interest: Some("crypto".into()),
            ..complete()
        };
        assert!(Lead::try_from(raw).is_err());
    }

    #[test]
    fn test_mask_email() {
        assert_eq!(mask_email("jane@acme.io"), "j***@acme.io");
        assert_eq!(mask_email("j@acme.io"), "***@acme.io");
        assert_eq!(mask_email("nobody"), "***");
    }
}
