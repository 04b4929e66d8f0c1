use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::models::{
    vehicle::{MIN_BATTERY_LEVEL, NEEDS_CLEANING},
    BoundaryPolicy, Interval, Vehicle, VehicleStatus, VehicleStatusHistory, VehicleStatusPatch,
};
use crate::repositories::VehicleRepository;
use crate::utils::errors::{AppError, AppResult};

const VEHICLE_COLUMNS: &str = "v.id, v.model, v.type, v.license_plate, v.status, v.location, \
     v.battery_level, v.cleanliness_status, v.created_at, v.last_status_update";

pub struct PgVehicleRepository {
    pool: PgPool,
    policy: BoundaryPolicy,
}

impl PgVehicleRepository {
    pub fn new(pool: PgPool, policy: BoundaryPolicy) -> Self {
        Self { pool, policy }
    }
}

#[async_trait]
impl VehicleRepository for PgVehicleRepository {
    async fn find_available(&self, window: Interval) -> AppResult<Vec<Vehicle>> {
        let query = format!(
            r#"
            SELECT {columns}
            FROM vehicles v
            WHERE v.status = $3
              AND (v.battery_level IS NULL OR v.battery_level >= $4)
              AND (v.cleanliness_status IS NULL OR v.cleanliness_status <> $5)
              AND NOT EXISTS (
                  SELECT 1
                  FROM bookings b
                  WHERE b.vehicle_id = v.id
                    AND b.status IN ('pending', 'confirmed')
                    AND {overlap}
              )
            ORDER BY v.id
            "#,
            columns = VEHICLE_COLUMNS,
            overlap = self.policy.sql_overlap("b", 1, 2),
        );

        let vehicles = sqlx::query_as::<_, Vehicle>(&query)
            .bind(window.start)
            .bind(window.end)
            .bind(VehicleStatus::Available.as_str())
            .bind(MIN_BATTERY_LEVEL)
            .bind(NEEDS_CLEANING)
            .fetch_all(&self.pool)
            .await?;

        Ok(vehicles)
    }

    async fn find_by_id(&self, id: i32) -> AppResult<Option<Vehicle>> {
        let query = format!("SELECT {} FROM vehicles v WHERE v.id = $1", VEHICLE_COLUMNS);
        let vehicle = sqlx::query_as::<_, Vehicle>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(vehicle)
    }

    async fn update_status(
        &self,
        id: i32,
        patch: VehicleStatusPatch,
    ) -> AppResult<VehicleStatusHistory> {
        let mut tx = self.pool.begin().await?;

        // RETURNING gives the resolved values, which is what the history stores
        let resolved: Option<(Option<String>, Option<i32>, Option<String>, DateTime<Utc>)> =
            sqlx::query_as(
                r#"
                UPDATE vehicles
                SET location = COALESCE($1, location),
                    battery_level = COALESCE($2, battery_level),
                    cleanliness_status = COALESCE($3, cleanliness_status),
                    last_status_update = NOW()
                WHERE id = $4
                RETURNING location, battery_level, cleanliness_status, last_status_update
                "#,
            )
            .bind(patch.location)
            .bind(patch.battery_level)
            .bind(patch.cleanliness_status)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;

        let Some((location, battery_level, cleanliness_status, recorded_at)) = resolved else {
            // dropping tx rolls back
            return Err(AppError::VehicleNotFound(id));
        };

        let history = sqlx::query_as::<_, VehicleStatusHistory>(
            r#"
            INSERT INTO vehicle_status_history
                (vehicle_id, location, battery_level, cleanliness_status, recorded_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, vehicle_id, location, battery_level, cleanliness_status, recorded_at
            "#,
        )
        .bind(id)
        .bind(location)
        .bind(battery_level)
        .bind(cleanliness_status)
        .bind(recorded_at)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(history)
    }

    async fn status_history(&self, id: i32) -> AppResult<Vec<VehicleStatusHistory>> {
        if self.find_by_id(id).await?.is_none() {
            return Err(AppError::VehicleNotFound(id));
        }

        let history = sqlx::query_as::<_, VehicleStatusHistory>(
            r#"
            SELECT id, vehicle_id, location, battery_level, cleanliness_status, recorded_at
            FROM vehicle_status_history
            WHERE vehicle_id = $1
            ORDER BY recorded_at DESC, id DESC
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        Ok(history)
    }

    async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
