use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::User;

/// Verified claims of an authenticated caller, decoded from a token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Identity {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub gender: String,
    pub age: i32,
}

impl From<&User> for Identity {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            phone: user.phone.clone(),
            gender: user.gender.clone(),
            age: user.age,
        }
    }
}
