use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Server-recorded entitlement for one (document, payer) pair.
///
/// A purchase exists at most once per pair; unlocking an already-unlocked
/// document returns the existing row without charging again.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Purchase {
    pub id: Uuid,
    pub document_id: Uuid,
    pub payer_id: Uuid,
    pub amount_cents: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PurchaseResponse {
    pub id: Uuid,
    pub document_id: Uuid,
    pub amount_cents: i32,
    pub created_at: DateTime<Utc>,
}

impl From<Purchase> for PurchaseResponse {
    fn from(p: Purchase) -> Self {
        PurchaseResponse {
            id: p.id,
            document_id: p.document_id,
            amount_cents: p.amount_cents,
            created_at: p.created_at,
        }
    }
}
