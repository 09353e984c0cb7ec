use async_trait::async_trait;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::core::error::Result;
use crate::features::auth::model::AdminUser;
use crate::shared::constants::{ROLE_ADMIN, USERS_TABLE};

/// Role lookup for identity-provider accounts
#[async_trait]
pub trait AdminDirectory: Send + Sync {
    /// The operator record for this account, whatever its role
    async fn find_user(&self, user_id: &str) -> Result<Option<AdminUser>>;

    /// The operator record only when its role is `admin`
    async fn find_admin(&self, user_id: &str) -> Result<Option<AdminUser>>;
}

#[derive(Debug, FromRow)]
struct UserRow {
    id: Uuid,
    email: String,
    nombre: Option<String>,
    role: String,
}

impl From<UserRow> for AdminUser {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            email: row.email,
            name: row.nombre,
            role: row.role,
        }
    }
}

pub struct PgAdminDirectory {
    pool: PgPool,
}

impl PgAdminDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AdminDirectory for PgAdminDirectory {
    async fn find_user(&self, user_id: &str) -> Result<Option<AdminUser>> {
        // provider ids that are not UUIDs cannot be in the table
        let Ok(id) = Uuid::parse_str(user_id) else {
            return Ok(None);
        };

        let query = format!(
            "SELECT id, email, nombre, role FROM {} WHERE id = $1",
            USERS_TABLE
        );

        let row = sqlx::query_as::<_, UserRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(AdminUser::from))
    }

    async fn find_admin(&self, user_id: &str) -> Result<Option<AdminUser>> {
        let Ok(id) = Uuid::parse_str(user_id) else {
            return Ok(None);
        };

        let query = format!(
            "SELECT id, email, nombre, role FROM {} WHERE id = $1 AND role = $2",
            USERS_TABLE
        );

        let row = sqlx::query_as::<_, UserRow>(&query)
            .bind(id)
            .bind(ROLE_ADMIN)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(AdminUser::from))
    }
}
