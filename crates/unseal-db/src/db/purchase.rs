//! Purchase repository: server-recorded entitlements keyed by
//! (document, payer).

use sqlx::{PgPool, Postgres};
use unseal_core::models::Purchase;
use unseal_core::AppError;
use uuid::Uuid;

#[derive(Clone)]
pub struct PurchaseRepository {
    pool: PgPool,
}

impl PurchaseRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Record a purchase. Idempotent: if the pair already exists the
    /// existing row is returned and nothing is charged again.
    #[tracing::instrument(skip(self), fields(db.table = "purchases", document_id = %document_id, payer_id = %payer_id))]
    pub async fn create(
        &self,
        document_id: Uuid,
        payer_id: Uuid,
        amount_cents: i32,
    ) -> Result<Purchase, AppError> {
        let inserted: Option<Purchase> = sqlx::query_as::<Postgres, Purchase>(
            r#"
            INSERT INTO purchases (id, document_id, payer_id, amount_cents)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (document_id, payer_id) DO NOTHING
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(document_id)
        .bind(payer_id)
        .bind(amount_cents)
        .fetch_optional(&self.pool)
        .await?;

        if let Some(purchase) = inserted {
            return Ok(purchase);
        }

        // Conflict path: the pair was already purchased.
        self.get(document_id, payer_id).await?.ok_or_else(|| {
            AppError::Internal("Purchase conflict but no existing row found".to_string())
        })
    }

    /// Fetch the purchase for a (document, payer) pair, if any.
    #[tracing::instrument(skip(self), fields(db.table = "purchases", document_id = %document_id, payer_id = %payer_id))]
    pub async fn get(
        &self,
        document_id: Uuid,
        payer_id: Uuid,
    ) -> Result<Option<Purchase>, AppError> {
        let purchase: Option<Purchase> = sqlx::query_as::<Postgres, Purchase>(
            "SELECT * FROM purchases WHERE document_id = $1 AND payer_id = $2",
        )
        .bind(document_id)
        .bind(payer_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(purchase)
    }

    /// Whether the payer holds an entitlement for the document. Checked on
    /// every download access.
    pub async fn exists(&self, document_id: Uuid, payer_id: Uuid) -> Result<bool, AppError> {
        Ok(self.get(document_id, payer_id).await?.is_some())
    }

    /// All document ids the payer has unlocked, in one query (avoids N+1
    /// when building listings).
    #[tracing::instrument(skip(self), fields(db.table = "purchases", payer_id = %payer_id))]
    pub async fn unlocked_document_ids(&self, payer_id: Uuid) -> Result<Vec<Uuid>, AppError> {
        let ids: Vec<(Uuid,)> =
            sqlx::query_as("SELECT document_id FROM purchases WHERE payer_id = $1")
                .bind(payer_id)
                .fetch_all(&self.pool)
                .await?;
        Ok(ids.into_iter().map(|(id,)| id).collect())
    }
}
