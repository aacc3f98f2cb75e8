use std::sync::Arc;

use tracing::{debug, info};
use uuid::Uuid;

use crate::models::{non_blank, NewUser, ProfileUpdate, User, UserChanges, UserProfile};
use crate::repository::{RepoError, UserRepository};
use crate::{CoreError, CoreResult};

const BCRYPT_COST: u32 = 10;

const INVALID_CREDENTIALS_MSG: &str = "Invalid email or password.";

/// Registration, authentication and profile management over the
/// credential store.
pub struct AccountService {
    users: Arc<dyn UserRepository>,
}

impl AccountService {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    /// Create a new account. The password confirmation is checked and then
    /// discarded; only a single bcrypt hash is ever stored.
    pub async fn register(&self, form: NewUser) -> CoreResult<UserProfile> {
        let name = required(form.name, "name")?;
        let email = required(form.email, "email")?;
        let password = required(form.password, "password")?;
        let confirm_password = required(form.confirm_password, "confirm_password")?;
        let phone = required(form.phone, "phone")?;
        let gender = required(form.gender, "gender")?;
        let age = positive_age(form.age)?;

        if password != confirm_password {
            return Err(CoreError::ValidationError(
                "Passwords do not match.".to_string(),
            ));
        }

        let password_hash = hash_password(&password)?;

        let user = User {
            id: Uuid::new_v4(),
            name,
            email,
            password_hash,
            phone,
            gender,
            age,
            profile_image: None,
            created_at: chrono::Utc::now(),
        };

        match self.users.insert(&user).await {
            Ok(()) => {
                info!("Registered user {}", user.id);
                Ok(UserProfile::from(user))
            }
            Err(RepoError::Duplicate) => Err(CoreError::ConflictError(
                "An account with this email already exists.".to_string(),
            )),
            Err(e) => Err(e.into()),
        }
    }

    /// Verify credentials and return the matching user. Failure is uniform
    /// regardless of whether the email exists or the password was wrong.
    pub async fn authenticate(&self, email: &str, password: &str) -> CoreResult<User> {
        let Some(user) = self.users.find_by_email(email).await? else {
            debug!("Login rejected: unknown email");
            return Err(CoreError::AuthenticationError(
                INVALID_CREDENTIALS_MSG.to_string(),
            ));
        };

        let matches = bcrypt::verify(password, &user.password_hash)
            .map_err(|e| CoreError::InternalError(e.to_string()))?;
        if !matches {
            debug!("Login rejected for user {}: bad password", user.id);
            return Err(CoreError::AuthenticationError(
                INVALID_CREDENTIALS_MSG.to_string(),
            ));
        }

        Ok(user)
    }

    pub async fn get_profile(&self, user_id: Uuid) -> CoreResult<UserProfile> {
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| CoreError::NotFoundError("User not found.".to_string()))?;
        Ok(UserProfile::from(user))
    }

    /// Apply a partial profile update. Email is immutable after
    /// registration; a supplied value is dropped. A new password requires a
    /// matching confirmation and is re-hashed at the deployed cost.
    pub async fn update_profile(
        &self,
        user_id: Uuid,
        update: ProfileUpdate,
    ) -> CoreResult<UserProfile> {
        if update.email.is_some() {
            debug!("Ignoring email change for user {}", user_id);
        }

        let password = non_blank(update.password);
        let confirm_password = non_blank(update.confirm_password);
        let password_hash = match (password, confirm_password) {
            (None, None) => None,
            (Some(p), Some(c)) if p == c => Some(hash_password(&p)?),
            _ => {
                return Err(CoreError::ValidationError(
                    "Passwords do not match.".to_string(),
                ))
            }
        };

        if let Some(name) = &update.name {
            if name.trim().is_empty() {
                return Err(CoreError::ValidationError(
                    "Field 'name' must not be empty.".to_string(),
                ));
            }
        }
        if let Some(phone) = &update.phone {
            if phone.trim().is_empty() {
                return Err(CoreError::ValidationError(
                    "Field 'phone' must not be empty.".to_string(),
                ));
            }
        }
        if let Some(gender) = &update.gender {
            if gender.trim().is_empty() {
                return Err(CoreError::ValidationError(
                    "Field 'gender' must not be empty.".to_string(),
                ));
            }
        }
        if let Some(age) = update.age {
            if age <= 0 {
                return Err(CoreError::ValidationError(
                    "Field 'age' must be a positive number.".to_string(),
                ));
            }
        }

        let changes = UserChanges {
            name: update.name,
            phone: update.phone,
            gender: update.gender,
            age: update.age,
            profile_image: update.profile_image,
            password_hash,
        };

        let user = self
            .users
            .update(user_id, &changes)
            .await?
            .ok_or_else(|| CoreError::NotFoundError("User not found.".to_string()))?;

        info!("Profile updated for user {}", user_id);
        Ok(UserProfile::from(user))
    }
}

fn required(value: Option<String>, field: &str) -> CoreResult<String> {
    non_blank(value)
        .ok_or_else(|| CoreError::ValidationError(format!("Field '{}' is required.", field)))
}

fn positive_age(age: Option<i32>) -> CoreResult<i32> {
    match age {
        Some(a) if a > 0 => Ok(a),
        Some(_) => Err(CoreError::ValidationError(
            "Field 'age' must be a positive number.".to_string(),
        )),
        None => Err(CoreError::ValidationError(
            "Field 'age' is required.".to_string(),
        )),
    }
}

fn hash_password(password: &str) -> CoreResult<String> {
    bcrypt::hash(password, BCRYPT_COST).map_err(|e| CoreError::InternalError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryUserRepository;

    fn service() -> AccountService {
        AccountService::new(Arc::new(MemoryUserRepository::new()))
    }

    fn registration(email: &str) -> NewUser {
        NewUser {
            name: Some("Asha Verma".to_string()),
            email: Some(email.to_string()),
            password: Some("hunter22".to_string()),
            confirm_password: Some("hunter22".to_string()),
            phone: Some("9876543210".to_string()),
            gender: Some("female".to_string()),
            age: Some(28),
        }
    }

    #[tokio::test]
    async fn test_register_and_authenticate() {
        let service = service();

        let profile = service
            .register(registration("asha@example.com"))
            .await
            .unwrap();
        assert_eq!(profile.email, "asha@example.com");

        // Correct credentials succeed
        let user = service
            .authenticate("asha@example.com", "hunter22")
            .await
            .unwrap();
        assert_eq!(user.id, profile.id);

        // Wrong password and unknown email fail identically
        let bad_password = service
            .authenticate("asha@example.com", "wrong")
            .await
            .unwrap_err();
        let unknown_email = service
            .authenticate("nobody@example.com", "hunter22")
            .await
            .unwrap_err();
        assert_eq!(bad_password.to_string(), unknown_email.to_string());
    }

    #[tokio::test]
    async fn test_register_rejects_mismatched_passwords() {
        let service = service();
        let mut form = registration("asha@example.com");
        form.confirm_password = Some("different".to_string());

        let err = service.register(form).await.unwrap_err();
        assert!(matches!(err, CoreError::ValidationError(_)));
    }

    #[tokio::test]
    async fn test_register_rejects_duplicate_email() {
        let service = service();
        service
            .register(registration("asha@example.com"))
            .await
            .unwrap();

        let err = service
            .register(registration("asha@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::ConflictError(_)));
    }

    #[tokio::test]
    async fn test_register_requires_all_fields() {
        let service = service();
        let mut form = registration("asha@example.com");
        form.phone = Some("   ".to_string());

        let err = service.register(form).await.unwrap_err();
        assert!(matches!(err, CoreError::ValidationError(_)));
    }

    #[tokio::test]
    async fn test_update_profile_ignores_email() {
        let service = service();
        let profile = service
            .register(registration("asha@example.com"))
            .await
            .unwrap();

        let updated = service
            .update_profile(
                profile.id,
                ProfileUpdate {
                    name: Some("Asha V.".to_string()),
                    email: Some("new@example.com".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.name, "Asha V.");
        assert_eq!(updated.email, "asha@example.com");
    }

    #[tokio::test]
    async fn test_update_profile_password_change() {
        let service = service();
        let profile = service
            .register(registration("asha@example.com"))
            .await
            .unwrap();

        // Mismatch is rejected
        let err = service
            .update_profile(
                profile.id,
                ProfileUpdate {
                    password: Some("newpass99".to_string()),
                    confirm_password: Some("other".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::ValidationError(_)));

        // Matching pair replaces the hash
        service
            .update_profile(
                profile.id,
                ProfileUpdate {
                    password: Some("newpass99".to_string()),
                    confirm_password: Some("newpass99".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert!(service
            .authenticate("asha@example.com", "newpass99")
            .await
            .is_ok());
        assert!(service
            .authenticate("asha@example.com", "hunter22")
            .await
            .is_err());
    }

    #[tokio::test]
    async fn test_profile_of_missing_user() {
        let service = service();
        let err = service.get_profile(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, CoreError::NotFoundError(_)));

        let err = service
            .update_profile(Uuid::new_v4(), ProfileUpdate::default())
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::NotFoundError(_)));
    }
}
