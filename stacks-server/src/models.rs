//! Request and response models for the stacks record service

use serde::{Deserialize, Serialize};

// ============================================================================
// Books
// ============================================================================

/// A catalogued book
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Book {
    pub id: i64,
    pub title: String,
    pub author: String,
    /// Short blurb, nominally capped at 144 characters (not store-enforced)
    pub review: Option<String>,
}

/// Payload for POST /book/add. Required-ness of `title` and `author` is
/// enforced by the store's NOT NULL constraints, not by deserialization.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateBookRequest {
    pub title: Option<String>,
    pub author: Option<String>,
    pub review: Option<String>,
}

/// Partial update for a book.
///
/// A field is written only when it is supplied: `None` and the empty
/// string both mean "leave the stored value alone", so an update cannot
/// clear a field to `""`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BookPatch {
    pub title: Option<String>,
    pub author: Option<String>,
    pub review: Option<String>,
}

impl BookPatch {
    pub fn apply(&self, book: &mut Book) {
        if let Some(title) = supplied(&self.title) {
            book.title = title.to_owned();
        }
        if let Some(author) = supplied(&self.author) {
            book.author = author.to_owned();
        }
        if let Some(review) = supplied(&self.review) {
            book.review = Some(review.to_owned());
        }
    }
}

// ============================================================================
// Users
// ============================================================================

/// A registered user row, password included. Never serialized directly;
/// responses go through [`UserView`].
#[derive(Debug, Clone)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub password: String,
}

/// The serializable subset of a user: `{id, username}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserView {
    pub id: i64,
    pub username: String,
}

impl From<User> for UserView {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
        }
    }
}

/// Payload for POST /user/add
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateUserRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Partial update for a user, under the same supplied-field policy as
/// [`BookPatch`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserPatch {
    pub username: Option<String>,
    pub password: Option<String>,
}

impl UserPatch {
    pub fn apply(&self, user: &mut User) {
        if let Some(username) = supplied(&self.username) {
            user.username = username.to_owned();
        }
        if let Some(password) = supplied(&self.password) {
            user.password = password.to_owned();
        }
    }
}

/// Treats `None` and the empty string as "not supplied".
fn supplied(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|v| !v.is_empty())
}

// ============================================================================
// Health
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub database: DatabaseHealth,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseHealth {
    pub connected: bool,
    pub path: String,
    pub size_bytes: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_book() -> Book {
        Book {
            id: 1,
            title: "Dune".to_string(),
            author: "Herbert".to_string(),
            review: Some("great".to_string()),
        }
    }

    #[test]
    fn test_patch_applies_only_supplied_fields() {
        let mut book = sample_book();
        let patch = BookPatch {
            author: Some("Frank Herbert".to_string()),
            ..Default::default()
        };
        patch.apply(&mut book);

        assert_eq!(book.author, "Frank Herbert");
        assert_eq!(book.title, "Dune");
        assert_eq!(book.review.as_deref(), Some("great"));
    }

    #[test]
    fn test_empty_string_does_not_clear_field() {
        let mut book = sample_book();
        let patch = BookPatch {
            review: Some(String::new()),
            ..Default::default()
        };
        patch.apply(&mut book);

        assert_eq!(book.review.as_deref(), Some("great"));
    }

    #[test]
    fn test_user_view_drops_password() {
        let user = User {
            id: 7,
            username: "paul".to_string(),
            password: "atreides".to_string(),
        };

        let json = serde_json::to_string(&UserView::from(user)).unwrap();
        assert!(json.contains("paul"));
        assert!(!json.contains("atreides"));
        assert!(!json.contains("password"));
    }
}
