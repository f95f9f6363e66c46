use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{db::entities::user, error::AppError};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Manager,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Manager => "manager",
            Role::Admin => "admin",
        }
    }

    /// Managers and admins see every task and category; plain users are
    /// scoped to records they own or were assigned.
    pub fn is_elevated(&self) -> bool {
        matches!(self, Role::Manager | Role::Admin)
    }
}

impl TryFrom<&str> for Role {
    type Error = ();

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "user" => Ok(Role::User),
            "manager" => Ok(Role::Manager),
            "admin" => Ok(Role::Admin),
            _ => Err(()),
        }
    }
}

pub trait RequiredRole {
    fn allows(role: Role) -> bool;
}

pub struct ManagerRole;

impl RequiredRole for ManagerRole {
    fn allows(role: Role) -> bool {
        role.is_elevated()
    }
}

pub struct AdminRole;

impl RequiredRole for AdminRole {
    fn allows(role: Role) -> bool {
        matches!(role, Role::Admin)
    }
}

/// Access-token claim set. `jti` ties the token to exactly one refresh-token
/// ledger row; the refresh flow recovers it from an expired token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub jti: String,
    pub iat: usize,
    pub exp: usize,
}

impl Claims {
    pub fn principal(&self) -> Result<Principal, AppError> {
        let user_id = Uuid::parse_str(&self.sub)
            .map_err(|_| AppError::unauthorized("Invalid token claims"))?;
        let jti = Uuid::parse_str(&self.jti)
            .map_err(|_| AppError::unauthorized("Invalid token claims"))?;
        Ok(Principal {
            user_id,
            role: self.role,
            jti,
        })
    }
}

/// The authenticated identity threaded into every service call. Derived from
/// validated claims, never read from ambient state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Principal {
    pub user_id: Uuid,
    pub role: Role,
    pub jti: Uuid,
}

#[derive(Debug, Serialize)]
pub struct TokenBundle {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: &'static str,
    pub expires_in: usize,
    pub user: UserSummary,
}

/// What callers get to see of a user record. Never carries the password hash.
#[derive(Debug, Clone, Serialize)]
pub struct UserSummary {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub is_active: bool,
    pub created_at: chrono::DateTime<chrono::FixedOffset>,
    pub last_login_at: Option<chrono::DateTime<chrono::FixedOffset>>,
}

impl From<&user::Model> for UserSummary {
    fn from(user: &user::Model) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            role: Role::try_from(user.role.as_str()).unwrap_or(Role::User),
            is_active: user.is_active,
            created_at: user.created_at,
            last_login_at: user.last_login_at,
        }
    }
}
