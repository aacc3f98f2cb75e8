use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use crate::models::{Ticket, User, UserChanges};
use crate::CoreError;

/// Errors surfaced by repository backends.
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    /// A store-level uniqueness constraint rejected the write.
    #[error("duplicate record")]
    Duplicate,
    #[error("{0}")]
    Other(Box<dyn std::error::Error + Send + Sync>),
}

impl From<RepoError> for CoreError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::Duplicate => CoreError::ConflictError("Duplicate record.".to_string()),
            RepoError::Other(e) => CoreError::InternalError(e.to_string()),
        }
    }
}

/// Repository trait for user records.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn insert(&self, user: &User) -> Result<(), RepoError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError>;

    /// Applies a partial update and returns the updated record, or `None`
    /// if no user with this id exists.
    async fn update(&self, id: Uuid, changes: &UserChanges) -> Result<Option<User>, RepoError>;
}

/// Repository trait for ticket records.
#[async_trait]
pub trait TicketRepository: Send + Sync {
    async fn insert(&self, ticket: &Ticket) -> Result<(), RepoError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Ticket>, RepoError>;

    /// Looks up an existing ticket by the uniqueness tuple
    /// (owner, departure, destination, date, seat).
    async fn find_duplicate(
        &self,
        owner: Uuid,
        departure: &str,
        destination: &str,
        date: NaiveDate,
        seat: &str,
    ) -> Result<Option<Ticket>, RepoError>;

    /// Case-insensitive substring match on departure/destination, exact
    /// match on the travel date.
    async fn search(
        &self,
        departure: &str,
        destination: &str,
        date: NaiveDate,
    ) -> Result<Vec<Ticket>, RepoError>;

    async fn list_all(&self) -> Result<Vec<Ticket>, RepoError>;

    /// Every ticket except those owned by `owner`.
    async fn list_excluding(&self, owner: Uuid) -> Result<Vec<Ticket>, RepoError>;
}
