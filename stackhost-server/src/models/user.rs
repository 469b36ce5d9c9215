//! User record and validated input types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use super::ValidationError;

/// Database-generated surrogate key (`SERIAL`)
pub type UserId = i32;

/// Fields that must be present on create and update
const REQUIRED_FIELDS: &str = "Name and email";

/// A persisted user as returned to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Parse a path segment into a user id.
///
/// Only a plain base-10 integer that fits the column type is accepted;
/// `"12abc"`, `"1.5"` and `""` are all rejected.
pub fn parse_user_id(raw: &str) -> Result<UserId, ValidationError> {
    raw.parse::<UserId>()
        .map_err(|_| ValidationError::InvalidId { resource: "user" })
}

/// Request body accepted by create and update.
///
/// Every field is optional at the wire level so that a missing field is
/// reported as a validation failure rather than a parse failure.
///
/// `phone` keeps absent (`None`) apart from explicit `null` (`Some(None)`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserPayload {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub phone: Option<Option<String>>,
}

/// Wraps any value that appears in the body, `null` included, in `Some`.
fn present<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

impl UserPayload {
    /// Check required fields and produce the value the store accepts.
    pub fn validate(self) -> Result<NewUser, ValidationError> {
        let mut user = NewUser::new(
            self.name.unwrap_or_default(),
            self.email.unwrap_or_default(),
            None,
        )?;
        user.phone = match self.phone {
            None => PhoneChange::Keep,
            Some(None) => PhoneChange::Clear,
            Some(Some(phone)) => PhoneChange::from_value(phone),
        };
        Ok(user)
    }
}

/// What a write does to the stored `phone`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PhoneChange {
    /// Field absent: an update leaves the column as is, a create stores NULL
    Keep,
    /// `null` or blank: the column becomes NULL
    Clear,
    Set(String),
}

impl PhoneChange {
    fn from_value(phone: String) -> Self {
        if phone.trim().is_empty() {
            Self::Clear
        } else {
            Self::Set(phone)
        }
    }
}

/// Validated user fields, ready for INSERT or UPDATE.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    name: String,
    email: String,
    phone: PhoneChange,
}

impl NewUser {
    /// Build from raw fields.
    ///
    /// # Rules
    /// - `name` and `email` must contain a non-whitespace character
    /// - `None` leaves the stored `phone` alone; a blank value clears it
    ///
    /// # Example
    /// ```
    /// use stackhost_server::models::NewUser;
    ///
    /// assert!(NewUser::new("Alice".into(), "alice@example.com".into(), None).is_ok());
    /// assert!(NewUser::new("Bob".into(), "".into(), None).is_err());
    /// ```
    pub fn new(name: String, email: String, phone: Option<String>) -> Result<Self, ValidationError> {
        if name.trim().is_empty() || email.trim().is_empty() {
            return Err(ValidationError::Required {
                fields: REQUIRED_FIELDS,
            });
        }

        let phone = phone.map_or(PhoneChange::Keep, PhoneChange::from_value);
        Ok(Self { name, email, phone })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    /// Value to write, `None` for NULL. Ignored on update when
    /// [`keeps_phone`](Self::keeps_phone) is true.
    pub fn phone(&self) -> Option<&str> {
        match &self.phone {
            PhoneChange::Set(phone) => Some(phone),
            PhoneChange::Keep | PhoneChange::Clear => None,
        }
    }

    pub fn keeps_phone(&self) -> bool {
        self.phone == PhoneChange::Keep
    }

    pub fn phone_change(&self) -> &PhoneChange {
        &self.phone
    }
}
