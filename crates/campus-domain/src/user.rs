//! User domain types.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Account role.
///
/// Wire and storage format: lowercase string (`student`, `faculty`, `staff`, `admin`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Student,
    Faculty,
    Staff,
    Admin,
}

/// Returned when a role string matches none of the known roles.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid role: {0}")]
pub struct UnknownRole(pub String);

impl UserRole {
    pub const ALL: [UserRole; 4] = [Self::Student, Self::Faculty, Self::Staff, Self::Admin];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Student => "student",
            Self::Faculty => "faculty",
            Self::Staff => "staff",
            Self::Admin => "admin",
        }
    }

    pub fn is_admin(self) -> bool {
        self == Self::Admin
    }

    /// Admin and faculty see every uploaded file and may delete them.
    pub fn can_manage_files(self) -> bool {
        matches!(self, Self::Admin | Self::Faculty)
    }

    /// Admin and staff maintain the inventory and decide issue requests.
    pub fn can_manage_inventory(self) -> bool {
        matches!(self, Self::Admin | Self::Staff)
    }

    /// Roles whose profile must carry a department.
    pub fn requires_department(self) -> bool {
        matches!(self, Self::Student | Self::Faculty | Self::Staff)
    }

    /// Roles whose profile must carry a roll number.
    pub fn requires_roll_number(self) -> bool {
        self == Self::Student
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = UnknownRole;

    /// Case-insensitive, surrounding whitespace ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|role| role.as_str() == normalized)
            .ok_or_else(|| UnknownRole(s.trim().to_owned()))
    }
}

/// Department code embedded in a roll number (`22ucc084` -> `UCC`).
///
/// Returns `None` when the roll number is too short to carry one.
pub fn department_from_roll_number(roll_number: &str) -> Option<String> {
    roll_number
        .get(2..5)
        .map(str::to_ascii_uppercase)
}
