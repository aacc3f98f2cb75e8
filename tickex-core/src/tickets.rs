use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use crate::identity::Identity;
use crate::models::{
    non_blank, Ticket, TicketForm, TicketSearch, TicketSummary, DEFAULT_SCREENSHOT,
};
use crate::repository::{RepoError, TicketRepository};
use crate::{CoreError, CoreResult};

const MISSING_FIELDS_MSG: &str = "Please provide all the required fields.";
const DUPLICATE_TICKET_MSG: &str =
    "You have already created a ticket for this route, date, and seat.";

/// Ticket creation, search and listing with duplicate prevention and
/// visibility filtering.
pub struct TicketService {
    tickets: Arc<dyn TicketRepository>,
}

impl TicketService {
    pub fn new(tickets: Arc<dyn TicketRepository>) -> Self {
        Self { tickets }
    }

    /// Create a ticket for the calling identity. Contact fields resolve
    /// from the payload first, then from the verified claims. At most one
    /// ticket may exist per owner for a given route, date and seat.
    pub async fn create(&self, identity: &Identity, form: TicketForm) -> CoreResult<Ticket> {
        let name = non_blank(form.name).unwrap_or_else(|| identity.name.clone());
        let email = non_blank(form.email).unwrap_or_else(|| identity.email.clone());
        let phone = non_blank(form.phone).unwrap_or_else(|| identity.phone.clone());
        let gender = non_blank(form.gender).unwrap_or_else(|| identity.gender.clone());
        let age = form.age.filter(|a| *a > 0).unwrap_or(identity.age);

        let (
            Some(departure),
            Some(destination),
            Some(date),
            Some(time),
            Some(price),
            Some(seat),
            Some(fare_class),
        ) = (
            non_blank(form.departure),
            non_blank(form.destination),
            form.date,
            non_blank(form.time),
            form.price,
            non_blank(form.seat),
            non_blank(form.fare_class),
        )
        else {
            return Err(CoreError::ValidationError(MISSING_FIELDS_MSG.to_string()));
        };

        if name.trim().is_empty()
            || email.trim().is_empty()
            || phone.trim().is_empty()
            || gender.trim().is_empty()
            || age <= 0
            || price <= 0
        {
            return Err(CoreError::ValidationError(MISSING_FIELDS_MSG.to_string()));
        }

        // Fast path: report the duplicate with a friendly message before
        // attempting the insert.
        if self
            .tickets
            .find_duplicate(identity.id, &departure, &destination, date, &seat)
            .await?
            .is_some()
        {
            return Err(CoreError::ConflictError(DUPLICATE_TICKET_MSG.to_string()));
        }

        let ticket = Ticket {
            id: Uuid::new_v4(),
            user_id: identity.id,
            name,
            email,
            phone,
            gender,
            age,
            departure,
            destination,
            travel_date: date,
            travel_time: time,
            price,
            seat,
            fare_class,
            screenshot: non_blank(form.screenshot)
                .unwrap_or_else(|| DEFAULT_SCREENSHOT.to_string()),
            additional_info: form.additional_info,
            whatsapp_number: form.whatsapp_number,
            instagram_link: form.instagram_link,
            facebook_link: form.facebook_link,
            created_at: chrono::Utc::now(),
        };

        match self.tickets.insert(&ticket).await {
            Ok(()) => {
                info!("Ticket {} created by user {}", ticket.id, identity.id);
                Ok(ticket)
            }
            // A concurrent identical submission won the race; the unique
            // index catches what the pre-check missed.
            Err(RepoError::Duplicate) => {
                Err(CoreError::ConflictError(DUPLICATE_TICKET_MSG.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Search by route and date. Departure and destination are matched
    /// case-insensitively as substrings; the date exactly. Only the summary
    /// projection is returned. An empty result is reported as not-found.
    pub async fn search(&self, query: TicketSearch) -> CoreResult<Vec<TicketSummary>> {
        let (Some(departure), Some(destination), Some(date)) = (
            non_blank(query.departure),
            non_blank(query.destination),
            query.date,
        ) else {
            return Err(CoreError::ValidationError(
                "Departure, destination, and date are required fields.".to_string(),
            ));
        };

        let tickets = self.tickets.search(&departure, &destination, date).await?;
        if tickets.is_empty() {
            return Err(CoreError::NotFoundError(
                "No tickets found matching the criteria.".to_string(),
            ));
        }

        Ok(tickets.iter().map(TicketSummary::from).collect())
    }

    pub async fn get(&self, id: Uuid) -> CoreResult<Ticket> {
        self.tickets
            .find_by_id(id)
            .await?
            .ok_or_else(|| CoreError::NotFoundError("Ticket not found.".to_string()))
    }

    /// Every ticket on the marketplace.
    pub async fn list_all(&self) -> CoreResult<Vec<Ticket>> {
        Ok(self.tickets.list_all().await?)
    }

    /// The browse view: every ticket except the caller's own.
    pub async fn browse(&self, identity: &Identity) -> CoreResult<Vec<Ticket>> {
        Ok(self.tickets.list_excluding(identity.id).await?)
    }
}
