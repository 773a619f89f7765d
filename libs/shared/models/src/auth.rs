use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Serialize, Deserialize)]
pub struct JwtHeader {
    pub alg: String,
    pub typ: String,
}

/// Kind of account a session token was issued for. Each kind lives in its
/// own store table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccountRole {
    Patient,
    Hospital,
    Clinic,
    Doctor,
}

impl AccountRole {
    pub fn table(&self) -> &'static str {
        match self {
            AccountRole::Patient => "users",
            AccountRole::Hospital => "hospitals",
            AccountRole::Clinic => "clinics",
            AccountRole::Doctor => "doctors",
        }
    }

    /// Hospitals and clinics employ doctors.
    pub fn is_organization(&self) -> bool {
        matches!(self, AccountRole::Hospital | AccountRole::Clinic)
    }

    pub fn is_provider(&self) -> bool {
        !matches!(self, AccountRole::Patient)
    }
}

impl fmt::Display for AccountRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccountRole::Patient => write!(f, "Patient"),
            AccountRole::Hospital => write!(f, "Hospital"),
            AccountRole::Clinic => write!(f, "Clinic"),
            AccountRole::Doctor => write!(f, "Doctor"),
        }
    }
}

impl FromStr for AccountRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Patient" => Ok(AccountRole::Patient),
            "Hospital" => Ok(AccountRole::Hospital),
            "Clinic" => Ok(AccountRole::Clinic),
            "Doctor" | "Consultant" => Ok(AccountRole::Doctor),
            other => Err(format!("Unknown account role: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtClaims {
    pub sub: String,
    pub role: AccountRole,
    pub email: Option<String>,
    pub iat: Option<u64>,
    pub exp: Option<u64>,
}

/// Identity recovered from a verified token, before the account row is
/// looked up.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenIdentity {
    pub id: String,
    pub role: AccountRole,
    pub email: Option<String>,
}

/// Authenticated caller attached to request extensions by the auth
/// middleware. `account` is the stored row with credentials removed.
#[derive(Debug, Clone)]
pub struct Principal {
    pub id: String,
    pub role: AccountRole,
    pub email: Option<String>,
    pub account: Value,
}

impl Principal {
    pub fn is_organization(&self) -> bool {
        self.role.is_organization()
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub success: bool,
    pub message: String,
    pub role: AccountRole,
    pub user: Value,
}
