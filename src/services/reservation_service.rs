use sqlx::PgPool;

use crate::auth::Actor;
use crate::database::models::reservation::{ReservationInput, ReservationStatus};

use super::{count_where, ServiceError};

pub struct ReservationService {
    pool: PgPool,
}

impl ReservationService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Book an object for the acting user; new bookings start as `new`
    pub async fn create(&self, actor: &Actor, input: &ReservationInput) -> Result<i64, ServiceError> {
        if input.date_to < input.date_from {
            return Err(ServiceError::invalid(
                "date_to",
                "The date to must be a date after or equal to date from.",
            ));
        }
        if count_where(&self.pool, "SELECT COUNT(*) FROM objects WHERE id = $1", input.object_id).await? == 0 {
            return Err(ServiceError::invalid("object_id", "The selected object id is invalid."));
        }

        let row: (i64,) = sqlx::query_as(
            "INSERT INTO reservations (object_id, user_id, guest_name, phone, date_from, date_to, status, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, NOW(), NOW()) RETURNING id",
        )
        .bind(input.object_id)
        .bind(actor.id)
        .bind(&input.guest_name)
        .bind(&input.phone)
        .bind(input.date_from)
        .bind(input.date_to)
        .bind(ReservationStatus::New.as_str())
        .fetch_one(&self.pool)
        .await?;

        tracing::info!("User {} booked object {} (reservation {})", actor.id, input.object_id, row.0);
        Ok(row.0)
    }

    pub async fn set_status(&self, id: i64, status: ReservationStatus) -> Result<(), ServiceError> {
        let result = sqlx::query("UPDATE reservations SET status = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(status.as_str())
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(ServiceError::NotFound("Reservation not found".to_string()));
        }

        tracing::info!("Reservation {} is now {}", id, status);
        Ok(())
    }
}
