//! Profile model for storage and API.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Profile stored in the profiles collection, one per identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Profile {
    /// Subject claim of the owning identity (also used as document ID)
    pub user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default)]
    pub name: String,
    /// When the profile was first written (RFC3339)
    pub created_at: String,
    /// Last mutation (RFC3339); absent until the first create/update call
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// Field-level profile mutation. Only present fields are written.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileChanges {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub updated_at: String,
}

impl ProfileChanges {
    /// Names of the stored fields this change set touches, `updatedAt` always included.
    pub fn field_paths(&self) -> Vec<&'static str> {
        let mut fields = vec!["updatedAt"];
        if self.name.is_some() {
            fields.push("name");
        }
        if self.email.is_some() {
            fields.push("email");
        }
        fields
    }

    /// Apply the change set to a stored record.
    pub fn apply_to(&self, profile: &mut Profile) {
        if let Some(name) = &self.name {
            profile.name = name.clone();
        }
        if let Some(email) = &self.email {
            profile.email = Some(email.clone());
        }
        profile.updated_at = Some(self.updated_at.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ada() -> Profile {
        Profile {
            user_id: "sub-ada".to_string(),
            email: Some("ada@example.com".to_string()),
            name: "Ada L".to_string(),
            created_at: "2024-01-01T00:00:00.000Z".to_string(),
            updated_at: None,
        }
    }

    #[test]
    fn wire_format_is_camel_case() {
        let json = serde_json::to_value(ada()).unwrap();
        assert_eq!(json["userId"], "sub-ada");
        assert_eq!(json["createdAt"], "2024-01-01T00:00:00.000Z");
        assert!(json.get("updatedAt").is_none());
    }

    #[test]
    fn name_only_change_keeps_email() {
        let mut profile = ada();
        let changes = ProfileChanges {
            name: Some("Ada".to_string()),
            email: None,
            updated_at: "2024-02-01T00:00:00.000Z".to_string(),
        };

        assert_eq!(changes.field_paths(), vec!["updatedAt", "name"]);
        changes.apply_to(&mut profile);

        assert_eq!(profile.name, "Ada");
        assert_eq!(profile.email.as_deref(), Some("ada@example.com"));
        assert_eq!(
            profile.updated_at.as_deref(),
            Some("2024-02-01T00:00:00.000Z")
        );
    }

    #[test]
    fn change_set_serializes_only_present_fields() {
        let changes = ProfileChanges {
            name: None,
            email: Some("new@example.com".to_string()),
            updated_at: "t".to_string(),
        };
        let json = serde_json::to_value(&changes).unwrap();
        assert!(json.get("name").is_none());
        assert_eq!(json["email"], "new@example.com");
        assert_eq!(json["updatedAt"], "t");
    }

    #[test]
    fn change_set_reads_back_from_partial_document() {
        let changes: ProfileChanges = serde_json::from_value(serde_json::json!({
            "name": "Ada",
            "updatedAt": "2024-02-01T00:00:00.000Z"
        }))
        .unwrap();

        assert_eq!(changes.name.as_deref(), Some("Ada"));
        assert!(changes.email.is_none());
        assert_eq!(changes.field_paths(), vec!["updatedAt", "name"]);
    }
}
