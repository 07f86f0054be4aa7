//! Data models for Stash
//!
//! Defines the core data structures: users, sessions, and items.
//! An item is either a free-form note or a bookmarked link, owned by
//! exactly one user.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Error, Result};

/// Public identity of a registered user
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    /// Unique identifier
    pub id: Uuid,
    /// Email address (unique across all users)
    pub email: String,
    /// Display name
    pub name: String,
    /// When the account was created
    pub created_at: DateTime<Utc>,
}

/// A user as stored in the credential collection
///
/// Carries the password hash in addition to the public fields.
/// The hash never leaves this record; sessions are derived via
/// [`UserRecord::session`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserRecord {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    /// Salted Argon2id hash of the password
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl UserRecord {
    /// The public fields of this record
    pub fn public(&self) -> User {
        User {
            id: self.id,
            email: self.email.clone(),
            name: self.name.clone(),
            created_at: self.created_at,
        }
    }

    /// Derive a session from this record's public fields
    pub fn session(&self) -> Session {
        Session {
            user: self.public(),
        }
    }
}

/// The currently authenticated user
///
/// Holds public fields only. At most one session is persisted per
/// process; it is set on login/signup, restored at startup, and cleared
/// on logout.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Session {
    pub user: User,
}

impl Session {
    /// Id of the acting user
    pub fn user_id(&self) -> Uuid {
        self.user.id
    }
}

/// Kind of stored item
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Note,
    Link,
}

impl std::fmt::Display for ItemKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ItemKind::Note => write!(f, "note"),
            ItemKind::Link => write!(f, "link"),
        }
    }
}

/// A stored note or link
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Item {
    /// Unique identifier
    pub id: Uuid,
    /// Owner; only this user may read or mutate the item
    pub user_id: Uuid,
    /// Note or link
    pub kind: ItemKind,
    /// Display title
    pub title: String,
    /// Body content; opaque rich-text markup, never parsed here
    pub content: String,
    /// Target URL, present iff `kind` is `Link`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Tags in user-authored order (duplicates allowed)
    #[serde(default)]
    pub tags: Vec<String>,
    /// Whether the item is publicly shared
    #[serde(default)]
    pub is_public: bool,
    /// Opaque public share token, present iff `is_public`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub share_id: Option<String>,
    /// When this item was created
    pub created_at: DateTime<Utc>,
    /// When this item was last updated
    pub updated_at: DateTime<Utc>,
}

/// Caller-supplied fields for creating an item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewItem {
    pub kind: ItemKind,
    pub title: String,
    pub content: String,
    pub url: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub is_public: bool,
}

impl NewItem {
    /// Check the field invariants for this input
    pub fn validate(&self) -> Result<()> {
        validate_fields(self.kind, &self.title, &self.content, self.url.as_deref())
    }
}

/// Partial patch for updating an item
///
/// `None` fields are left untouched. The `is_public`/`share_id` coupling
/// is preserved by the repository when the patch is applied.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ItemPatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub url: Option<String>,
    pub tags: Option<Vec<String>>,
    pub is_public: Option<bool>,
    pub share_id: Option<String>,
}

impl ItemPatch {
    /// True if the patch changes nothing
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.content.is_none()
            && self.url.is_none()
            && self.tags.is_none()
            && self.is_public.is_none()
            && self.share_id.is_none()
    }
}

/// Validate the field invariants shared by create and update:
/// non-empty title and content after trimming, and a URL present
/// exactly when the item is a link.
pub(crate) fn validate_fields(
    kind: ItemKind,
    title: &str,
    content: &str,
    url: Option<&str>,
) -> Result<()> {
    if title.trim().is_empty() {
        return Err(Error::Validation("title is required".into()));
    }
    if content.trim().is_empty() {
        return Err(Error::Validation("content is required".into()));
    }
    match kind {
        ItemKind::Link => match url {
            Some(u) if !u.trim().is_empty() => Ok(()),
            _ => Err(Error::Validation("url is required for links".into())),
        },
        ItemKind::Note => {
            if url.is_some() {
                return Err(Error::Validation("notes must not have a url".into()));
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_note() -> NewItem {
        NewItem {
            kind: ItemKind::Note,
            title: "Meeting notes".to_string(),
            content: "<p>Discussed roadmap</p>".to_string(),
            url: None,
            tags: vec!["work".to_string()],
            is_public: false,
        }
    }

    #[test]
    fn test_note_validates() {
        assert!(new_note().validate().is_ok());
    }

    #[test]
    fn test_blank_title_rejected() {
        let mut input = new_note();
        input.title = "   ".to_string();
        assert!(matches!(input.validate(), Err(Error::Validation(_))));
    }

    #[test]
    fn test_blank_content_rejected() {
        let mut input = new_note();
        input.content = String::new();
        assert!(matches!(input.validate(), Err(Error::Validation(_))));
    }

    #[test]
    fn test_link_requires_url() {
        let mut input = new_note();
        input.kind = ItemKind::Link;
        assert!(matches!(input.validate(), Err(Error::Validation(_))));

        input.url = Some("  ".to_string());
        assert!(matches!(input.validate(), Err(Error::Validation(_))));

        input.url = Some("https://e.com".to_string());
        assert!(input.validate().is_ok());
    }

    #[test]
    fn test_note_rejects_url() {
        let mut input = new_note();
        input.url = Some("https://e.com".to_string());
        assert!(matches!(input.validate(), Err(Error::Validation(_))));
    }

    #[test]
    fn test_session_has_public_fields_only() {
        let record = UserRecord {
            id: Uuid::new_v4(),
            email: "ann@x.com".to_string(),
            name: "Ann".to_string(),
            password_hash: "$argon2id$...".to_string(),
            created_at: Utc::now(),
        };

        let session = record.session();
        assert_eq!(session.user.name, "Ann");
        assert_eq!(session.user_id(), record.id);

        // The serialized session must never carry the hash
        let json = serde_json::to_string(&session).unwrap();
        assert!(!json.contains("password_hash"));
        assert!(!json.contains("argon2id"));
    }

    #[test]
    fn test_item_kind_serde() {
        assert_eq!(serde_json::to_string(&ItemKind::Note).unwrap(), "\"note\"");
        assert_eq!(serde_json::to_string(&ItemKind::Link).unwrap(), "\"link\"");
        assert_eq!(ItemKind::Link.to_string(), "link");
    }

    #[test]
    fn test_item_serialization_round_trip() {
        let now = Utc::now();
        let item = Item {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            kind: ItemKind::Link,
            title: "Example".to_string(),
            content: "<p>desc</p>".to_string(),
            url: Some("https://example.com".to_string()),
            tags: vec!["rust".to_string(), "rust".to_string()],
            is_public: true,
            share_id: Some("share-abc".to_string()),
            created_at: now,
            updated_at: now,
        };

        let json = serde_json::to_string(&item).unwrap();
        let back: Item = serde_json::from_str(&json).unwrap();
        assert_eq!(item, back);
        // Duplicate tags survive the round trip in order
        assert_eq!(back.tags, vec!["rust", "rust"]);
    }

    #[test]
    fn test_patch_is_empty() {
        assert!(ItemPatch::default().is_empty());
        let patch = ItemPatch {
            title: Some("x".to_string()),
            ..Default::default()
        };
        assert!(!patch.is_empty());
    }
}
