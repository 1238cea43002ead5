//! Vehicles repository

use chrono::Utc;
use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::{
        vehicle::{CreateVehicle, UpdateVehicle, Vehicle},
        VehicleStatus,
    },
};

#[derive(Clone)]
pub struct VehiclesRepository {
    pool: Pool<Postgres>,
}

impl VehiclesRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// List all vehicles
    pub async fn list(&self) -> AppResult<Vec<Vehicle>> {
        let rows = sqlx::query_as::<_, Vehicle>("SELECT * FROM vehicles ORDER BY label")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// Get vehicle by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Vehicle> {
        sqlx::query_as::<_, Vehicle>("SELECT * FROM vehicles WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Vehicle {} not found", id)))
    }

    /// Create vehicle
    pub async fn create(&self, data: &CreateVehicle) -> AppResult<Vehicle> {
        let row = sqlx::query_as::<_, Vehicle>(
            r#"
            INSERT INTO vehicles (label, plate, seats, status, notes)
            VALUES ($1, $2, $3, 0, $4)
            RETURNING *
            "#,
        )
        .bind(&data.label)
        .bind(&data.plate)
        .bind(data.seats)
        .bind(&data.notes)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    /// Update descriptive fields
    pub async fn update(&self, id: i32, data: &UpdateVehicle) -> AppResult<Vehicle> {
        let now = Utc::now();
        let mut sets = vec!["modif_date = $1".to_string()];
        let mut idx = 2;

        macro_rules! add_field {
            ($field:expr, $name:expr) => {
                if $field.is_some() {
                    sets.push(format!("{} = ${}", $name, idx));
                    idx += 1;
                }
            };
        }

        add_field!(data.label, "label");
        add_field!(data.plate, "plate");
        add_field!(data.seats, "seats");
        add_field!(data.notes, "notes");

        let query = format!(
            "UPDATE vehicles SET {} WHERE id = {} RETURNING *",
            sets.join(", "),
            id
        );

        let mut builder = sqlx::query_as::<_, Vehicle>(&query).bind(now);

        macro_rules! bind_field {
            ($field:expr) => {
                if let Some(ref val) = $field {
                    builder = builder.bind(val);
                }
            };
        }

        bind_field!(data.label);
        bind_field!(data.plate);
        bind_field!(data.seats);
        bind_field!(data.notes);

        builder
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Vehicle {} not found", id)))
    }

    /// Set vehicle status
    pub async fn set_status(&self, id: i32, status: VehicleStatus) -> AppResult<()> {
        let result =
            sqlx::query("UPDATE vehicles SET status = $2, modif_date = NOW() WHERE id = $1")
                .bind(id)
                .bind(i16::from(status))
                .execute(&self.pool)
                .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Vehicle {} not found", id)));
        }
        Ok(())
    }

    /// Count active vehicles (for stats)
    pub async fn count_active(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM vehicles WHERE status != 2")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
