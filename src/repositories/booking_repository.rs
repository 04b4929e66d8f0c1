use async_trait::async_trait;
use sqlx::{PgConnection, PgPool};

use crate::models::{Booking, BookingPatch, BookingStatus, BoundaryPolicy, Interval, NewBooking};
use crate::repositories::BookingRepository;
use crate::utils::errors::{booking_conflict_error, map_booking_write_error, AppError, AppResult};
use crate::utils::validation::validate_interval;

const BOOKING_COLUMNS: &str =
    "id, user_id, vehicle_id, start_time, end_time, status, created_at, updated_at";

/// Bookings backed by Postgres.
///
/// Create and update lock the vehicle row and re-run the overlap check inside
/// the same transaction as the write, so concurrent reservations for one
/// vehicle are serialized. The `bookings_no_overlap` exclusion constraint
/// rejects anything that slips past, and both paths surface as a conflict.
pub struct PgBookingRepository {
    pool: PgPool,
    policy: BoundaryPolicy,
}

impl PgBookingRepository {
    pub fn new(pool: PgPool, policy: BoundaryPolicy) -> Self {
        Self { pool, policy }
    }

    async fn lock_vehicle(conn: &mut PgConnection, vehicle_id: i32) -> AppResult<()> {
        let locked: Option<(i32,)> =
            sqlx::query_as("SELECT id FROM vehicles WHERE id = $1 FOR UPDATE")
                .bind(vehicle_id)
                .fetch_optional(conn)
                .await?;

        locked
            .map(|_| ())
            .ok_or(AppError::VehicleNotFound(vehicle_id))
    }

    async fn has_overlap(
        &self,
        conn: &mut PgConnection,
        vehicle_id: i32,
        window: Interval,
        exclude_booking: Option<i32>,
    ) -> AppResult<bool> {
        let query = format!(
            r#"
            SELECT EXISTS (
                SELECT 1
                FROM bookings b
                WHERE b.vehicle_id = $1
                  AND b.status IN ('pending', 'confirmed')
                  AND ($4::INTEGER IS NULL OR b.id <> $4)
                  AND {}
            )
            "#,
            self.policy.sql_overlap("b", 2, 3)
        );

        let (exists,): (bool,) = sqlx::query_as(&query)
            .bind(vehicle_id)
            .bind(window.start)
            .bind(window.end)
            .bind(exclude_booking)
            .fetch_one(conn)
            .await?;

        Ok(exists)
    }

    /// Ownership lookup. A missing booking and a foreign booking look the same.
    async fn owned_booking(
        conn: &mut PgConnection,
        booking_id: i32,
        user_id: i32,
    ) -> AppResult<Booking> {
        let query = format!(
            "SELECT {} FROM bookings WHERE id = $1 AND user_id = $2 FOR UPDATE",
            BOOKING_COLUMNS
        );

        sqlx::query_as::<_, Booking>(&query)
            .bind(booking_id)
            .bind(user_id)
            .fetch_optional(conn)
            .await?
            .ok_or(AppError::BookingNotFoundOrUnauthorized)
    }
}

#[async_trait]
impl BookingRepository for PgBookingRepository {
    async fn create(&self, booking: NewBooking) -> AppResult<Booking> {
        let mut tx = self.pool.begin().await?;

        Self::lock_vehicle(&mut *tx, booking.vehicle_id).await?;

        if self
            .has_overlap(&mut *tx, booking.vehicle_id, booking.interval(), None)
            .await?
        {
            return Err(booking_conflict_error());
        }

        let query = format!(
            r#"
            INSERT INTO bookings (user_id, vehicle_id, start_time, end_time, status)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {}
            "#,
            BOOKING_COLUMNS
        );

        let created = sqlx::query_as::<_, Booking>(&query)
            .bind(booking.user_id)
            .bind(booking.vehicle_id)
            .bind(booking.start_time)
            .bind(booking.end_time)
            .bind(BookingStatus::Pending)
            .fetch_one(&mut *tx)
            .await
            .map_err(map_booking_write_error)?;

        tx.commit().await.map_err(map_booking_write_error)?;

        Ok(created)
    }

    async fn find_by_user(&self, user_id: i32) -> AppResult<Vec<Booking>> {
        let bookings = sqlx::query_as::<_, Booking>(
            r#"
            SELECT b.id, b.user_id, b.vehicle_id, v.model AS vehicle_model,
                   b.start_time, b.end_time, b.status, b.created_at, b.updated_at
            FROM bookings b
            JOIN vehicles v ON b.vehicle_id = v.id
            WHERE b.user_id = $1
            ORDER BY b.created_at DESC, b.id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(bookings)
    }

    async fn update_times(
        &self,
        booking_id: i32,
        user_id: i32,
        patch: BookingPatch,
    ) -> AppResult<Booking> {
        let mut tx = self.pool.begin().await?;

        let current = Self::owned_booking(&mut *tx, booking_id, user_id).await?;
        if !current.status.is_active() {
            return Err(AppError::BookingNotUpdatable);
        }

        let resolved = patch.resolve(&current);
        validate_interval(resolved.start, resolved.end)?;

        if resolved != current.interval() {
            Self::lock_vehicle(&mut *tx, current.vehicle_id).await?;
            if self
                .has_overlap(&mut *tx, current.vehicle_id, resolved, Some(current.id))
                .await?
            {
                return Err(booking_conflict_error());
            }
        }

        let query = format!(
            r#"
            UPDATE bookings
            SET start_time = COALESCE($1, start_time),
                end_time = COALESCE($2, end_time),
                updated_at = NOW()
            WHERE id = $3 AND status IN ('pending', 'confirmed')
            RETURNING {}
            "#,
            BOOKING_COLUMNS
        );

        let updated = sqlx::query_as::<_, Booking>(&query)
            .bind(patch.start_time)
            .bind(patch.end_time)
            .bind(booking_id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(map_booking_write_error)?
            .ok_or(AppError::BookingNotUpdatable)?;

        tx.commit().await.map_err(map_booking_write_error)?;

        Ok(updated)
    }

    async fn transition(
        &self,
        booking_id: i32,
        user_id: i32,
        to: BookingStatus,
    ) -> AppResult<Booking> {
        let mut tx = self.pool.begin().await?;

        let current = Self::owned_booking(&mut *tx, booking_id, user_id).await?;
        if !current.status.can_transition_to(to) {
            return Err(AppError::BookingNotUpdatable);
        }

        let query = format!(
            r#"
            UPDATE bookings
            SET status = $1, updated_at = NOW()
            WHERE id = $2 AND status = $3
            RETURNING {}
            "#,
            BOOKING_COLUMNS
        );

        let updated = sqlx::query_as::<_, Booking>(&query)
            .bind(to)
            .bind(booking_id)
            .bind(current.status)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(AppError::BookingNotUpdatable)?;

        tx.commit().await?;

        Ok(updated)
    }
}
