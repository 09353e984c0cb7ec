use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::distributors::models::{
    Distributor, DistributorDetails, DistributorRow, DistributorWrite,
};
use crate::features::geocoding::Coordinates;
use crate::shared::constants::DISTRIBUTORS_TABLE;

/// Storage for distributor records
#[async_trait]
pub trait DistributorRepository: Send + Sync {
    /// Active records only, ordered by name
    async fn list_active(&self) -> Result<Vec<Distributor>>;

    /// Every record, newest first
    async fn list_all(&self) -> Result<Vec<Distributor>>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Distributor>>;

    async fn create(
        &self,
        details: &DistributorDetails,
        coordinates: Coordinates,
    ) -> Result<Distributor>;

    /// Fails with `NotFound` when no record has this id
    async fn update(
        &self,
        id: Uuid,
        details: &DistributorDetails,
        coordinates: Coordinates,
    ) -> Result<Distributor>;

    /// Permanent removal. Fails with `NotFound` when no record has this id.
    async fn delete(&self, id: Uuid) -> Result<()>;
}

const COLUMNS: &str = "id, nombre, telefono, whatsapp, pagina_web, departamento, ciudad, \
     direccion, descripcion, google_maps_url, logo_url, latitud, longitud, activo, \
     created_at, updated_at";

pub struct PgDistributorRepository {
    pool: PgPool,
}

impl PgDistributorRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Distributor with id {} not found", id))
}

#[async_trait]
impl DistributorRepository for PgDistributorRepository {
    async fn list_active(&self) -> Result<Vec<Distributor>> {
        let query = format!(
            "SELECT {} FROM {} WHERE activo = true ORDER BY nombre ASC",
            COLUMNS, DISTRIBUTORS_TABLE
        );

        let rows = sqlx::query_as::<_, DistributorRow>(&query)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(Distributor::from).collect())
    }

    async fn list_all(&self) -> Result<Vec<Distributor>> {
        let query = format!(
            "SELECT {} FROM {} ORDER BY created_at DESC",
            COLUMNS, DISTRIBUTORS_TABLE
        );

        let rows = sqlx::query_as::<_, DistributorRow>(&query)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(Distributor::from).collect())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Distributor>> {
        let query = format!(
            "SELECT {} FROM {} WHERE id = $1",
            COLUMNS, DISTRIBUTORS_TABLE
        );

        let row = sqlx::query_as::<_, DistributorRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Distributor::from))
    }

    async fn create(
        &self,
        details: &DistributorDetails,
        coordinates: Coordinates,
    ) -> Result<Distributor> {
        let write = DistributorWrite::new(details, coordinates);
        let query = format!(
            r#"
            INSERT INTO {} (
                nombre, telefono, whatsapp, pagina_web, departamento, ciudad, direccion,
                descripcion, google_maps_url, logo_url, latitud, longitud, activo
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING {}
            "#,
            DISTRIBUTORS_TABLE, COLUMNS
        );

        let row = sqlx::query_as::<_, DistributorRow>(&query)
            .bind(&write.nombre)
            .bind(&write.telefono)
            .bind(&write.whatsapp)
            .bind(&write.pagina_web)
            .bind(&write.departamento)
            .bind(&write.ciudad)
            .bind(&write.direccion)
            .bind(&write.descripcion)
            .bind(&write.google_maps_url)
            .bind(&write.logo_url)
            .bind(write.latitud)
            .bind(write.longitud)
            .bind(write.activo)
            .fetch_one(&self.pool)
            .await?;

        Ok(Distributor::from(row))
    }

    async fn update(
        &self,
        id: Uuid,
        details: &DistributorDetails,
        coordinates: Coordinates,
    ) -> Result<Distributor> {
        let write = DistributorWrite::new(details, coordinates);
        let query = format!(
            r#"
            UPDATE {}
            SET nombre = $2, telefono = $3, whatsapp = $4, pagina_web = $5,
                departamento = $6, ciudad = $7, direccion = $8, descripcion = $9,
                google_maps_url = $10, logo_url = $11, latitud = $12, longitud = $13,
                activo = $14, updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            DISTRIBUTORS_TABLE, COLUMNS
        );

        let row = sqlx::query_as::<_, DistributorRow>(&query)
            .bind(id)
            .bind(&write.nombre)
            .bind(&write.telefono)
            .bind(&write.whatsapp)
            .bind(&write.pagina_web)
            .bind(&write.departamento)
            .bind(&write.ciudad)
            .bind(&write.direccion)
            .bind(&write.descripcion)
            .bind(&write.google_maps_url)
            .bind(&write.logo_url)
            .bind(write.latitud)
            .bind(write.longitud)
            .bind(write.activo)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| not_found(id))?;

        Ok(Distributor::from(row))
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        let query = format!("DELETE FROM {} WHERE id = $1", DISTRIBUTORS_TABLE);

        let result = sqlx::query(&query).bind(id).execute(&self.pool).await?;

        if result.rows_affected() == 0 {
            return Err(not_found(id));
        }

        Ok(())
    }
}
