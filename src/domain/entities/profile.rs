use serde::{Deserialize, Serialize};

/// Platform role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Teacher,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::Teacher => "teacher",
            Role::Admin => "admin",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "student" => Some(Role::Student),
            "teacher" => Some(Role::Teacher),
            "admin" => Some(Role::Admin),
            _ => None,
        }
    }
}

/// Profile row linked to an auth user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub id: String,
    pub username: String,
    pub role: Role,
    #[serde(default)]
    pub points: i64,
}

impl Profile {
    pub fn is_student(&self) -> bool {
        self.role == Role::Student
    }

    /// Teachers and admins manage quizzes
    pub fn is_professor(&self) -> bool {
        matches!(self.role, Role::Teacher | Role::Admin)
    }
}

/// Free-form metadata attached at sign-up
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

/// Authenticated user as returned by the auth service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub user_metadata: UserMetadata,
}

impl AuthUser {
    /// full_name, then name, then username, then email
    pub fn display_name(&self) -> &str {
        let meta = &self.user_metadata;
        [&meta.full_name, &meta.name, &meta.username, &self.email]
            .into_iter()
            .filter_map(|v| v.as_deref())
            .find(|v| !v.is_empty())
            .unwrap_or("")
    }

    pub fn initials(&self) -> String {
        let words: Vec<&str> = self.display_name().split_whitespace().collect();
        let first_letter = |w: &str| w.chars().next().map(|c| c.to_uppercase().to_string());

        match words.as_slice() {
            [] => String::new(),
            [only] => first_letter(only).unwrap_or_default(),
            [first, second, ..] => {
                let mut initials = first_letter(first).unwrap_or_default();
                initials.push_str(&first_letter(second).unwrap_or_default());
                initials
            }
        }
    }
}
