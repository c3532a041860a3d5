//! Client-side copies of the backend's data entities.
//!
//! All of these records are owned and persisted by the PhotoFlex backend;
//! the client only holds ephemeral snapshots of them, deserialized from the
//! backend's JSON responses. Field names follow the backend's camelCase
//! wire format exactly.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A unique, immutable user ID assigned by the backend.
pub type UserId = u64;
pub type PinId = u64;
pub type BoardId = u64;
pub type CommentId = u64;
pub type LikeId = u64;

/// A PhotoFlex user account.
///
/// The `username` is unique within the system and doubles as the
/// `@mention` token for this user.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub user_id: UserId,
    pub username: String,
    pub email: String,
    /// URL of the user's profile picture.
    #[serde(default)]
    pub profile_picture: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_date: Option<DateTime<Utc>>,
}

/// A single image post, optionally associated with one board.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pin {
    pub pin_id: PinId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "imageURL")]
    pub image_url: String,
    pub user: User,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub board: Option<BoardRef>,
    #[serde(default)]
    pub like_count: u64,
    #[serde(default)]
    pub is_liked: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_date: Option<DateTime<Utc>>,
}

/// A named, owned collection of pins with a visibility flag.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Board {
    pub board_id: BoardId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub is_private: bool,
    pub user: User,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_date: Option<DateTime<Utc>>,
}

/// A comment on a pin. Mentions inside `text` are not stored separately;
/// they are re-derived from the text on every render.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub comment_id: CommentId,
    pub text: String,
    pub user: User,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pin: Option<PinRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_date: Option<DateTime<Utc>>,
}

/// A like on a pin.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Like {
    pub like_id: LikeId,
    pub user: User,
    pub pin: PinRef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_date: Option<DateTime<Utc>>,
}

/// A by-ID reference to a pin, as used in creation payloads
/// and nested response fields.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PinRef {
    pub pin_id: PinId,
}

/// A by-ID reference to a board.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardRef {
    pub board_id: BoardId,
}

/// A by-ID reference to a user.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRef {
    pub user_id: UserId,
}

/// Payload for creating a new user account (signup).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub profile_picture: String,
    pub created_date: DateTime<Utc>,
}

/// Payload for creating a new pin.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPin {
    pub title: String,
    pub description: String,
    #[serde(rename = "imageURL")]
    pub image_url: String,
    pub user: UserRef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub board: Option<BoardRef>,
    pub created_date: DateTime<Utc>,
}

/// Payload for creating a new board.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBoard {
    pub name: String,
    pub description: String,
    pub is_private: bool,
    pub user: UserRef,
    pub created_date: DateTime<Utc>,
}

/// Payload for posting a new comment on a pin.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewComment {
    pub text: String,
    pub pin: PinRef,
    pub user: UserRef,
    pub created_date: DateTime<Utc>,
}

/// Payload for liking a pin.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewLike {
    pub pin: PinRef,
    pub user: UserRef,
    pub created_date: DateTime<Utc>,
}

#[cfg(test)]
pub(crate) fn test_user(user_id: UserId, username: &str) -> User {
    User {
        user_id,
        username: username.to_string(),
        email: format!("{username}@example.com"),
        profile_picture: String::new(),
        bio: String::new(),
        created_date: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_deserializes_from_backend_camel_case() {
        let json = r#"{
            "userId": 7,
            "username": "alice",
            "email": "alice@example.com",
            "profilePicture": "https://example.com/alice.png",
            "bio": "Just another PhotoFlex user!"
        }"#;
        let user: User = serde_json::from_str(json).unwrap();
        assert_eq!(user.user_id, 7);
        assert_eq!(user.username, "alice");
        assert_eq!(user.profile_picture, "https://example.com/alice.png");
        assert!(user.created_date.is_none());
    }

    #[test]
    fn pin_image_url_uses_backend_field_name() {
        let pin = Pin {
            pin_id: 1,
            title: "Sunset".into(),
            description: String::new(),
            image_url: "https://example.com/sunset.jpg".into(),
            user: test_user(1, "alice"),
            board: None,
            like_count: 0,
            is_liked: false,
            created_date: None,
        };
        let json = serde_json::to_value(&pin).unwrap();
        // The backend spells this field "imageURL", not "imageUrl".
        assert_eq!(json["imageURL"], "https://example.com/sunset.jpg");
    }

    #[test]
    fn new_comment_serializes_nested_references() {
        let payload = NewComment {
            text: "hey @alice".into(),
            pin: PinRef { pin_id: 42 },
            user: UserRef { user_id: 7 },
            created_date: Utc::now(),
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["pin"]["pinId"], 42);
        assert_eq!(json["user"]["userId"], 7);
    }
}
