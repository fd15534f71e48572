//! User profile model

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{ApiError, Result};

/// Gender choices accepted by the profile endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    #[serde(rename = "M")]
    Male,
    #[serde(rename = "F")]
    Female,
    #[serde(rename = "O")]
    Other,
}

impl Gender {
    pub const fn code(self) -> &'static str {
        match self {
            Self::Male => "M",
            Self::Female => "F",
            Self::Other => "O",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Male => "Male",
            Self::Female => "Female",
            Self::Other => "Other",
        };
        f.write_str(label)
    }
}

impl FromStr for Gender {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "M" | "MALE" => Ok(Self::Male),
            "F" | "FEMALE" => Ok(Self::Female),
            "O" | "OTHER" => Ok(Self::Other),
            _ => Err(ApiError::field("gender", "Choose one of M, F, or O.")),
        }
    }
}

/// The signed-in user's profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub username: String,
    /// Read-only; never sent back on update
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    /// URL of the uploaded or generated avatar
    #[serde(default)]
    pub profile_picture: Option<String>,
    #[serde(default, deserialize_with = "deserialize_blank_gender")]
    pub gender: Option<Gender>,
    #[serde(default)]
    pub date_joined: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_login: Option<DateTime<Utc>>,
}

// The backend stores an unset gender as either null or "".
fn deserialize_blank_gender<'de, D>(deserializer: D) -> std::result::Result<Option<Gender>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(code) => code.parse().map(Some).map_err(serde::de::Error::custom),
    }
}

/// Editable profile fields
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfilePatch {
    pub bio: Option<String>,
    pub gender: Option<Gender>,
}

impl ProfilePatch {
    pub const fn is_empty(&self) -> bool {
        self.bio.is_none() && self.gender.is_none()
    }

    pub(crate) fn form_fields(&self) -> Vec<(String, String)> {
        let mut fields = Vec::new();
        if let Some(bio) = &self.bio {
            fields.push(("bio".to_string(), bio.clone()));
        }
        if let Some(gender) = self.gender {
            fields.push(("gender".to_string(), gender.code().to_string()));
        }
        fields
    }
}

/// A file uploaded alongside a profile update
#[derive(Clone, PartialEq, Eq)]
pub struct Attachment {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl fmt::Debug for Attachment {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Attachment")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_deserializes_with_missing_optionals() {
        let profile: UserProfile =
            serde_json::from_str(r#"{"username":"ada","gender":"F","bio":null}"#).unwrap();
        assert_eq!(profile.username, "ada");
        assert_eq!(profile.gender, Some(Gender::Female));
        assert!(profile.bio.is_none());
        assert!(profile.date_joined.is_none());
    }

    #[test]
    fn blank_gender_reads_as_unset() {
        let profile: UserProfile =
            serde_json::from_str(r#"{"username":"ada","gender":""}"#).unwrap();
        assert!(profile.gender.is_none());
    }

    #[test]
    fn gender_parses_codes_and_names() {
        assert_eq!("m".parse::<Gender>().unwrap(), Gender::Male);
        assert_eq!("Other".parse::<Gender>().unwrap(), Gender::Other);
        assert!("x".parse::<Gender>().is_err());
    }

    #[test]
    fn patch_form_fields_skip_unset_values() {
        let patch = ProfilePatch {
            bio: None,
            gender: Some(Gender::Other),
        };
        assert_eq!(
            patch.form_fields(),
            vec![("gender".to_string(), "O".to_string())]
        );
    }

    #[test]
    fn attachment_debug_omits_bytes() {
        let attachment = Attachment {
            file_name: "me.png".to_string(),
            content_type: "image/png".to_string(),
            bytes: vec![1, 2, 3],
        };
        let rendered = format!("{attachment:?}");
        assert!(rendered.contains("len: 3"));
        assert!(!rendered.contains("[1, 2, 3]"));
    }
}
