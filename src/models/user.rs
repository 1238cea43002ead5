//! User model and JWT claims

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{Decode, Encode, FromRow, Postgres};
use utoipa::ToSchema;
use validator::Validate;

use crate::error::AppError;

/// Role slug (string identifier)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum RoleSlug {
    /// Regular member: browse, file requests and bookings
    Member,
    /// Depot steward: approve requests, assign vehicles, run reconciliation
    Steward,
    /// Administrator: item/vehicle/user management, total adjustments
    Admin,
}

impl RoleSlug {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoleSlug::Member => "member",
            RoleSlug::Steward => "steward",
            RoleSlug::Admin => "admin",
        }
    }
}

impl std::fmt::Display for RoleSlug {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for RoleSlug {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "member" => Ok(RoleSlug::Member),
            "steward" => Ok(RoleSlug::Steward),
            "admin" => Ok(RoleSlug::Admin),
            _ => Err(format!("Invalid role slug: {}", s)),
        }
    }
}

impl From<String> for RoleSlug {
    fn from(s: String) -> Self {
        s.parse().unwrap_or(RoleSlug::Member)
    }
}

// SQLx conversion for RoleSlug
impl sqlx::Type<Postgres> for RoleSlug {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<Postgres>>::type_info()
    }
}

impl<'r> Decode<'r, Postgres> for RoleSlug {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s: String = Decode::<Postgres>::decode(value)?;
        s.parse().map_err(|e: String| e.into())
    }
}

impl Encode<'_, Postgres> for RoleSlug {
    fn encode_by_ref(&self, buf: &mut sqlx::postgres::PgArgumentBuffer) -> sqlx::encode::IsNull {
        let s: String = self.as_str().to_string();
        <String as Encode<Postgres>>::encode(s, buf)
    }
}

/// User record
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct User {
    pub id: i32,
    pub login: String,
    /// Hashed password (argon2)
    #[serde(skip_serializing)]
    pub password: String,
    pub name: Option<String>,
    pub role: RoleSlug,
    pub crea_date: Option<DateTime<Utc>>,
}

/// Create user request (admin only)
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateUser {
    #[validate(length(min = 3, message = "Login must be at least 3 characters"))]
    pub login: String,
    #[validate(length(min = 4, message = "Password must be at least 4 characters"))]
    pub password: String,
    pub name: Option<String>,
    pub role: Option<RoleSlug>,
}

/// JWT Claims for authenticated users
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserClaims {
    pub sub: String,
    pub user_id: i32,
    pub role: RoleSlug,
    pub exp: i64,
    pub iat: i64,
}

impl UserClaims {
    /// Create a new JWT token
    pub fn create_token(&self, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{encode, EncodingKey, Header};
        encode(
            &Header::default(),
            self,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
    }

    /// Parse JWT token
    pub fn from_token(token: &str, secret: &str) -> Result<Self, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{decode, DecodingKey, Validation};
        let token_data = decode::<Self>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )?;
        Ok(token_data.claims)
    }

    pub fn is_admin(&self) -> bool {
        self.role == RoleSlug::Admin
    }

    pub fn is_steward(&self) -> bool {
        matches!(self.role, RoleSlug::Steward | RoleSlug::Admin)
    }

    /// Require steward privileges (approvals, assignments, reconciliation)
    pub fn require_steward(&self) -> Result<(), AppError> {
        if self.is_steward() {
            Ok(())
        } else {
            Err(AppError::Authorization(
                "Steward privileges required".to_string(),
            ))
        }
    }

    /// Require admin privileges
    pub fn require_admin(&self) -> Result<(), AppError> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(AppError::Authorization(
                "Administrator privileges required".to_string(),
            ))
        }
    }
}
