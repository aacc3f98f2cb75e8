use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use tickex_core::models::Ticket;
use tickex_core::repository::{RepoError, TicketRepository};

use crate::user_repo::map_db_err;

pub struct PostgresTicketRepository {
    pool: PgPool,
}

impl PostgresTicketRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// Internal struct for type-safe querying
#[derive(sqlx::FromRow)]
struct TicketRow {
    id: Uuid,
    user_id: Uuid,
    name: String,
    email: String,
    phone: String,
    gender: String,
    age: i32,
    departure: String,
    destination: String,
    travel_date: NaiveDate,
    travel_time: String,
    price: i32,
    seat: String,
    fare_class: String,
    screenshot: String,
    additional_info: Option<String>,
    whatsapp_number: Option<String>,
    instagram_link: Option<String>,
    facebook_link: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<TicketRow> for Ticket {
    fn from(row: TicketRow) -> Self {
        Ticket {
            id: row.id,
            user_id: row.user_id,
            name: row.name,
            email: row.email,
            phone: row.phone,
            gender: row.gender,
            age: row.age,
            departure: row.departure,
            destination: row.destination,
            travel_date: row.travel_date,
            travel_time: row.travel_time,
            price: row.price,
            seat: row.seat,
            fare_class: row.fare_class,
            screenshot: row.screenshot,
            additional_info: row.additional_info,
            whatsapp_number: row.whatsapp_number,
            instagram_link: row.instagram_link,
            facebook_link: row.facebook_link,
            created_at: row.created_at,
        }
    }
}

const TICKET_COLUMNS: &str = "id, user_id, name, email, phone, gender, age, departure, \
     destination, travel_date, travel_time, price, seat, fare_class, screenshot, \
     additional_info, whatsapp_number, instagram_link, facebook_link, created_at";

#[async_trait]
impl TicketRepository for PostgresTicketRepository {
    async fn insert(&self, ticket: &Ticket) -> Result<(), RepoError> {
        sqlx::query(
            r#"
            INSERT INTO tickets (id, user_id, name, email, phone, gender, age, departure,
                destination, travel_date, travel_time, price, seat, fare_class, screenshot,
                additional_info, whatsapp_number, instagram_link, facebook_link, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16,
                $17, $18, $19, $20)
            "#,
        )
        .bind(ticket.id)
        .bind(ticket.user_id)
        .bind(&ticket.name)
        .bind(&ticket.email)
        .bind(&ticket.phone)
        .bind(&ticket.gender)
        .bind(ticket.age)
        .bind(&ticket.departure)
        .bind(&ticket.destination)
        .bind(ticket.travel_date)
        .bind(&ticket.travel_time)
        .bind(ticket.price)
        .bind(&ticket.seat)
        .bind(&ticket.fare_class)
        .bind(&ticket.screenshot)
        .bind(&ticket.additional_info)
        .bind(&ticket.whatsapp_number)
        .bind(&ticket.instagram_link)
        .bind(&ticket.facebook_link)
        .bind(ticket.created_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_err)?;

        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Ticket>, RepoError> {
        let row: Option<TicketRow> =
            sqlx::query_as(&format!("SELECT {TICKET_COLUMNS} FROM tickets WHERE id = $1"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(map_db_err)?;

        Ok(row.map(Ticket::from))
    }

    async fn find_duplicate(
        &self,
        owner: Uuid,
        departure: &str,
        destination: &str,
        date: NaiveDate,
        seat: &str,
    ) -> Result<Option<Ticket>, RepoError> {
        let row: Option<TicketRow> = sqlx::query_as(&format!(
            r#"
            SELECT {TICKET_COLUMNS} FROM tickets
            WHERE user_id = $1 AND departure = $2 AND destination = $3
                AND travel_date = $4 AND seat = $5
            "#
        ))
        .bind(owner)
        .bind(departure)
        .bind(destination)
        .bind(date)
        .bind(seat)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_err)?;

        Ok(row.map(Ticket::from))
    }

    async fn search(
        &self,
        departure: &str,
        destination: &str,
        date: NaiveDate,
    ) -> Result<Vec<Ticket>, RepoError> {
        let rows: Vec<TicketRow> = sqlx::query_as(&format!(
            r#"
            SELECT {TICKET_COLUMNS} FROM tickets
            WHERE departure ILIKE $1 AND destination ILIKE $2 AND travel_date = $3
            ORDER BY created_at DESC
            "#
        ))
        .bind(format!("%{}%", departure))
        .bind(format!("%{}%", destination))
        .bind(date)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_err)?;

        Ok(rows.into_iter().map(Ticket::from).collect())
    }

    async fn list_all(&self) -> Result<Vec<Ticket>, RepoError> {
        let rows: Vec<TicketRow> = sqlx::query_as(&format!(
            "SELECT {TICKET_COLUMNS} FROM tickets ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_err)?;

        Ok(rows.into_iter().map(Ticket::from).collect())
    }

    async fn list_excluding(&self, owner: Uuid) -> Result<Vec<Ticket>, RepoError> {
        let rows: Vec<TicketRow> = sqlx::query_as(&format!(
            "SELECT {TICKET_COLUMNS} FROM tickets WHERE user_id <> $1 ORDER BY created_at DESC"
        ))
        .bind(owner)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_err)?;

        Ok(rows.into_iter().map(Ticket::from).collect())
    }
}
