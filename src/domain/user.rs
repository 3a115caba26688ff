use crate::error::{RentalError, Result};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Admin,
    Customer,
}

impl Role {
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
    type Err = RentalError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "admin" => Ok(Role::Admin),
            "customer" => Ok(Role::Customer),
            other => Err(RentalError::Validation(format!("unknown role '{other}'"))),
        }
    }
}

/// An account holder. The role tag selects which menu and operations are
/// offered; there is no subclassing, just explicit branching on `role`.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: u32,
    pub username: String,
    pub password: String,
    pub email: String,
    pub role: Role,
}

impl User {
    pub fn new(id: u32, username: String, password: String, email: String, role: Role) -> Self {
        Self {
            id,
            username,
            password,
            email,
            role,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Registration rules: username 3-20 chars without spaces, password at least
/// 6 chars, email must carry both '@' and '.'.
pub fn validate_registration(username: &str, password: &str, email: &str) -> Result<()> {
    if username.len() < 3 || username.len() > 20 || username.contains(' ') {
        return Err(RentalError::Validation(
            "username: must be 3-20 characters with no spaces".into(),
        ));
    }
    if password.len() < 6 {
        return Err(RentalError::Validation(
            "password: must be at least 6 characters".into(),
        ));
    }
    if !email.contains('@') || !email.contains('.') {
        return Err(RentalError::Validation(
            "email: must contain '@' and '.'".into(),
        ));
    }
    Ok(())
}
