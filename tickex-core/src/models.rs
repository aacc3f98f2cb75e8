use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Placeholder stored when a ticket is created without a screenshot.
pub const DEFAULT_SCREENSHOT: &str = "https://example.com/default-screenshot.jpg";

/// A registered account. The password hash never leaves this crate;
/// callers are handed a [`UserProfile`] instead.
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub phone: String,
    pub gender: String,
    pub age: i32,
    pub profile_image: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// The sanitized view of a user record returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub gender: String,
    pub age: i32,
    pub profile_image: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            phone: user.phone,
            gender: user.gender,
            age: user.age,
            profile_image: user.profile_image,
            created_at: user.created_at,
        }
    }
}

/// Registration payload. Everything is optional at the wire level so the
/// service can produce field-level validation errors instead of decode
/// failures.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewUser {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub confirm_password: Option<String>,
    pub phone: Option<String>,
    pub gender: Option<String>,
    pub age: Option<i32>,
}

/// Partial profile update. A supplied email is ignored (immutable after
/// registration); the password confirmation is validated and then dropped,
/// never stored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub gender: Option<String>,
    pub age: Option<i32>,
    pub profile_image: Option<String>,
    pub password: Option<String>,
    pub confirm_password: Option<String>,
}

/// The subset of user columns a profile update may touch, resolved by the
/// account service after validation and hashing.
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub gender: Option<String>,
    pub age: Option<i32>,
    pub profile_image: Option<String>,
    pub password_hash: Option<String>,
}

/// A seat offering listed on the marketplace.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ticket {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub gender: String,
    pub age: i32,
    pub departure: String,
    pub destination: String,
    #[serde(rename = "date")]
    pub travel_date: NaiveDate,
    #[serde(rename = "time")]
    pub travel_time: String,
    pub price: i32,
    pub seat: String,
    #[serde(rename = "class")]
    pub fare_class: String,
    pub screenshot: String,
    pub additional_info: Option<String>,
    pub whatsapp_number: Option<String>,
    pub instagram_link: Option<String>,
    pub facebook_link: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Ticket creation payload. Contact fields may be omitted; they fall back
/// to the caller's verified claims.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TicketForm {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub gender: Option<String>,
    pub age: Option<i32>,
    pub departure: Option<String>,
    pub destination: Option<String>,
    pub date: Option<NaiveDate>,
    pub time: Option<String>,
    pub price: Option<i32>,
    pub seat: Option<String>,
    #[serde(rename = "class")]
    pub fare_class: Option<String>,
    pub screenshot: Option<String>,
    pub additional_info: Option<String>,
    pub whatsapp_number: Option<String>,
    pub instagram_link: Option<String>,
    pub facebook_link: Option<String>,
}

/// Search criteria. All three fields are required; the service rejects
/// partial queries.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TicketSearch {
    pub departure: Option<String>,
    pub destination: Option<String>,
    pub date: Option<NaiveDate>,
}

/// The reduced projection returned to searchers. Deliberately excludes the
/// owner's contact details.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TicketSummary {
    pub name: String,
    #[serde(rename = "time")]
    pub travel_time: String,
    pub screenshot: String,
    #[serde(rename = "class")]
    pub fare_class: String,
    pub price: i32,
}

impl From<&Ticket> for TicketSummary {
    fn from(ticket: &Ticket) -> Self {
        Self {
            name: ticket.name.clone(),
            travel_time: ticket.travel_time.clone(),
            screenshot: ticket.screenshot.clone(),
            fare_class: ticket.fare_class.clone(),
            price: ticket.price,
        }
    }
}

/// Drops values that are empty after trimming, so blank strings behave
/// like missing fields during validation.
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
