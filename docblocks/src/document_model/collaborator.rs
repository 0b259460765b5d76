//! Collaborators attached to a shared document

use serde::{Deserialize, Serialize};
use std::fmt;

/// Access level granted to a collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Read-only access
    Viewer,
    /// May edit the document
    Editor,
    /// Created the document; may also manage who has access
    Owner,
}

impl Role {
    /// Whether this role may change the document content
    pub fn can_edit(self) -> bool {
        matches!(self, Role::Editor | Role::Owner)
    }

    /// Whether this role may add or remove collaborators
    pub fn can_manage_collaborators(self) -> bool {
        self == Role::Owner
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Role::Viewer => "viewer",
            Role::Editor => "editor",
            Role::Owner => "owner",
        };
        f.write_str(name)
    }
}

/// Public profile of a collaborator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub email: String,

    #[serde(default)]
    pub full_name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

impl Profile {
    /// Up to two initials from the full name, falling back to the email
    pub fn initials(&self) -> String {
        let from_name: String = self
            .full_name
            .split_whitespace()
            .filter_map(|word| word.chars().next())
            .flat_map(char::to_uppercase)
            .take(2)
            .collect();

        if from_name.is_empty() {
            self.email
                .chars()
                .next()
                .map(|c| c.to_uppercase().collect::<String>())
                .unwrap_or_default()
        } else {
            from_name
        }
    }
}

/// A user with access to a document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collaborator {
    pub id: String,
    pub user_id: String,
    pub role: Role,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub added_by: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub added_at: Option<String>,

    pub profile: Profile,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_permissions() {
        assert!(!Role::Viewer.can_edit());
        assert!(Role::Editor.can_edit());
        assert!(Role::Owner.can_edit());
        assert!(!Role::Editor.can_manage_collaborators());
        assert!(Role::Owner.can_manage_collaborators());
    }

    #[test]
    fn test_initials() {
        let profile = Profile {
            email: "ada@example.com".to_string(),
            full_name: "ada byron lovelace".to_string(),
            avatar_url: None,
        };
        assert_eq!(profile.initials(), "AB");

        let anonymous = Profile {
            full_name: String::new(),
            ..profile
        };
        assert_eq!(anonymous.initials(), "A");
    }

    #[test]
    fn test_collaborator_json() {
        let json = r#"{
            "id": "c1",
            "user_id": "u1",
            "role": "editor",
            "profile": { "email": "e@example.com", "full_name": "E" }
        }"#;
        let collaborator: Collaborator = serde_json::from_str(json).unwrap();
        assert_eq!(collaborator.role, Role::Editor);
        assert_eq!(collaborator.profile.avatar_url, None);
    }
}
