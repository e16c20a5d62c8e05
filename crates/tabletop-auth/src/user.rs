//! User types.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tabletop_commerce::ids::UserId;
use tabletop_db::schema::{ROLE_ADMIN, ROLE_USER};

/// User role for authorization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Role {
    /// Store administrator.
    Admin,
    /// Regular customer.
    #[default]
    Customer,
}

impl Role {
    /// Row id in the `roles` table.
    pub fn id(&self) -> i64 {
        match self {
            Role::Admin => ROLE_ADMIN,
            Role::Customer => ROLE_USER,
        }
    }

    /// Map a `roles` row id. Unknown ids get the least privilege.
    pub fn from_id(id: i64) -> Self {
        if id == ROLE_ADMIN {
            Role::Admin
        } else {
            Role::Customer
        }
    }

    /// Get role as string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Customer => "customer",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "customer" | "user" => Ok(Role::Customer),
            _ => Err(()),
        }
    }
}

/// The logged-in user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthUser {
    pub id: UserId,
    pub username: String,
    pub email: Option<String>,
    pub role: Role,
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// A `users` row including credentials.
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub id: UserId,
    pub username: String,
    pub email: Option<String>,
    pub role: Role,
    pub password_hash: Vec<u8>,
    pub password_salt: Vec<u8>,
    pub created_at: NaiveDateTime,
}

impl From<&UserRecord> for AuthUser {
    fn from(record: &UserRecord) -> Self {
        AuthUser {
            id: record.id,
            username: record.username.clone(),
            email: record.email.clone(),
            role: record.role,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_ids() {
        assert_eq!(Role::Admin.id(), 1);
        assert_eq!(Role::Customer.id(), 2);
        assert_eq!(Role::from_id(1), Role::Admin);
        assert_eq!(Role::from_id(2), Role::Customer);
        assert_eq!(Role::from_id(99), Role::Customer);
    }

    #[test]
    fn test_role_parse() {
        assert_eq!("admin".parse::<Role>(), Ok(Role::Admin));
        assert_eq!("user".parse::<Role>(), Ok(Role::Customer));
        assert!("root".parse::<Role>().is_err());
    }

    #[test]
    fn test_is_admin() {
        let user = AuthUser {
            id: UserId::new(1),
            username: "admin".into(),
            email: None,
            role: Role::Admin,
        };
        assert!(user.is_admin());
        let customer = AuthUser {
            role: Role::Customer,
            ..user
        };
        assert!(!customer.is_admin());
    }
}
