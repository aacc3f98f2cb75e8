//! In-memory repository backend. Backs the service and router test suites;
//! enforces the same uniqueness rules as the Postgres schema.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use crate::models::{Ticket, User, UserChanges};
use crate::repository::{RepoError, TicketRepository, UserRepository};

#[derive(Default)]
pub struct MemoryUserRepository {
    users: Mutex<HashMap<Uuid, User>>,
}

impl MemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn insert(&self, user: &User) -> Result<(), RepoError> {
        let mut users = self.users.lock().unwrap_or_else(|e| e.into_inner());
        // Mirrors the unique index on users.email
        if users.values().any(|u| u.email == user.email) {
            return Err(RepoError::Duplicate);
        }
        users.insert(user.id, user.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        let users = self.users.lock().unwrap_or_else(|e| e.into_inner());
        Ok(users.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        let users = self.users.lock().unwrap_or_else(|e| e.into_inner());
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn update(&self, id: Uuid, changes: &UserChanges) -> Result<Option<User>, RepoError> {
        let mut users = self.users.lock().unwrap_or_else(|e| e.into_inner());
        let Some(user) = users.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(name) = &changes.name {
            user.name = name.clone();
        }
        if let Some(phone) = &changes.phone {
            user.phone = phone.clone();
        }
        if let Some(gender) = &changes.gender {
            user.gender = gender.clone();
        }
        if let Some(age) = changes.age {
            user.age = age;
        }
        if let Some(image) = &changes.profile_image {
            user.profile_image = Some(image.clone());
        }
        if let Some(hash) = &changes.password_hash {
            user.password_hash = hash.clone();
        }
        Ok(Some(user.clone()))
    }
}

#[derive(Default)]
pub struct MemoryTicketRepository {
    tickets: Mutex<HashMap<Uuid, Ticket>>,
}

impl MemoryTicketRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn sorted_newest_first(mut tickets: Vec<Ticket>) -> Vec<Ticket> {
    tickets.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));
    tickets
}

#[async_trait]
impl TicketRepository for MemoryTicketRepository {
    async fn insert(&self, ticket: &Ticket) -> Result<(), RepoError> {
        let mut tickets = self.tickets.lock().unwrap_or_else(|e| e.into_inner());
        // Mirrors the unique index on (user_id, departure, destination, travel_date, seat)
        let duplicate = tickets.values().any(|t| {
            t.user_id == ticket.user_id
                && t.departure == ticket.departure
                && t.destination == ticket.destination
                && t.travel_date == ticket.travel_date
                && t.seat == ticket.seat
        });
        if duplicate {
            return Err(RepoError::Duplicate);
        }
        tickets.insert(ticket.id, ticket.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Ticket>, RepoError> {
        let tickets = self.tickets.lock().unwrap_or_else(|e| e.into_inner());
        Ok(tickets.get(&id).cloned())
    }

    async fn find_duplicate(
        &self,
        owner: Uuid,
        departure: &str,
        destination: &str,
        date: NaiveDate,
        seat: &str,
    ) -> Result<Option<Ticket>, RepoError> {
        let tickets = self.tickets.lock().unwrap_or_else(|e| e.into_inner());
        Ok(tickets
            .values()
            .find(|t| {
                t.user_id == owner
                    && t.departure == departure
                    && t.destination == destination
                    && t.travel_date == date
                    && t.seat == seat
            })
            .cloned())
    }

    async fn search(
        &self,
        departure: &str,
        destination: &str,
        date: NaiveDate,
    ) -> Result<Vec<Ticket>, RepoError> {
        let departure = departure.to_lowercase();
        let destination = destination.to_lowercase();
        let tickets = self.tickets.lock().unwrap_or_else(|e| e.into_inner());
        let matches = tickets
            .values()
            .filter(|t| {
                t.departure.to_lowercase().contains(&departure)
                    && t.destination.to_lowercase().contains(&destination)
                    && t.travel_date == date
            })
            .cloned()
            .collect();
        Ok(sorted_newest_first(matches))
    }

    async fn list_all(&self) -> Result<Vec<Ticket>, RepoError> {
        let tickets = self.tickets.lock().unwrap_or_else(|e| e.into_inner());
        Ok(sorted_newest_first(tickets.values().cloned().collect()))
    }

    async fn list_excluding(&self, owner: Uuid) -> Result<Vec<Ticket>, RepoError> {
        let tickets = self.tickets.lock().unwrap_or_else(|e| e.into_inner());
        let others = tickets
            .values()
            .filter(|t| t.user_id != owner)
            .cloned()
            .collect();
        Ok(sorted_newest_first(others))
    }
}
