//! Authentication models shared by the client and the reference backend

use serde::{de, Deserialize, Deserializer, Serialize};
use std::fmt;

/// User roles for authorization
///
/// Backend role strings are loosely typed, so parsing never fails:
/// anything unrecognized lands in [`Role::Unknown`] and is handled by the
/// configured [`UnknownRolePolicy`](crate::config::UnknownRolePolicy).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    /// Learner - browses tutors, documents and chat
    Student,
    /// Teacher - creates exams and plans sessions
    Tutor,
    /// Learns and teaches
    Both,
    /// Administrator - full access, including the admin area
    Admin,
    /// Any role string this build does not recognize
    Unknown,
}

impl Role {
    /// Parse a backend role string. `super_admin` is a legacy spelling of `admin`.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "student" => Role::Student,
            "tutor" => Role::Tutor,
            "both" => Role::Both,
            "admin" | "super_admin" => Role::Admin,
            _ => Role::Unknown,
        }
    }

    /// Map the choice a user makes on the sign-up form to a role.
    ///
    /// Accepts plain role names as well as labels such as
    /// "I want to learn", "I want to teach" and "Both Learn and Teach".
    pub fn from_signup_choice(choice: &str) -> Self {
        let lowered = choice.trim().to_ascii_lowercase();
        if lowered.contains("both") {
            Role::Both
        } else if lowered.contains("teach") || lowered.contains("tutor") {
            Role::Tutor
        } else if lowered.contains("learn") || lowered.contains("student") {
            Role::Student
        } else {
            Role::parse(&lowered)
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::Tutor => "tutor",
            Role::Both => "both",
            Role::Admin => "admin",
            Role::Unknown => "unknown",
        }
    }

    pub fn is_admin(&self) -> bool {
        *self == Role::Admin
    }
}

impl From<String> for Role {
    fn from(value: String) -> Self {
        Role::parse(&value)
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        role.as_str().to_string()
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// User record as the backend sends it
///
/// Only `id` is mandatory; the identity mapper fills in the rest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    #[serde(deserialize_with = "id_from_string_or_number")]
    pub id: String,

    #[serde(rename = "fullName", alias = "name", alias = "full_name", default)]
    pub full_name: Option<String>,

    #[serde(default)]
    pub email: Option<String>,

    #[serde(default)]
    pub role: Option<String>,

    #[serde(default)]
    pub subjects: Option<Vec<String>>,

    #[serde(default)]
    pub bio: Option<String>,
}

impl UserRecord {
    /// Minimal record with only an id and a role
    pub fn new(id: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            full_name: None,
            email: None,
            role: Some(role.into()),
            subjects: None,
            bio: None,
        }
    }
}

fn id_from_string_or_number<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(de::Error::custom(format!("invalid user id: {}", other))),
    }
}

/// Login credentials
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Registration payload as sent to the backend
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub full_name: String,
    pub email: String,
    pub password: String,
    pub role: String,
    #[serde(default)]
    pub subjects: Vec<String>,
    #[serde(default)]
    pub bio: String,
}

/// Registration form fields as collected from the user
#[derive(Debug, Clone, Default)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
    /// Role choice as shown on the form, e.g. "Both Learn and Teach"
    pub role: String,
    pub subjects: Vec<String>,
    pub bio: String,
}

impl Registration {
    pub fn to_request(&self) -> RegisterRequest {
        RegisterRequest {
            full_name: self.name.clone(),
            email: self.email.clone(),
            password: self.password.clone(),
            role: Role::from_signup_choice(&self.role).to_string(),
            subjects: self.subjects.clone(),
            bio: self.bio.clone(),
        }
    }
}

/// Body returned by the login and register endpoints
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthResponse {
    #[serde(default)]
    pub success: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<UserRecord>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl AuthResponse {
    /// Human readable reason the backend gave, if any
    pub fn reason(&self) -> Option<&str> {
        self.error
            .as_deref()
            .or(self.message.as_deref())
            .filter(|m| !m.trim().is_empty())
    }
}
