//! Transaction endpoints: discount/tax/total preview and checkout.
//!
//! Subtotal, tax and total are opaque numbers computed by the backend for
//! a business/purchase-type pair. The client never does discount math; a
//! failed or empty preview renders as zeros, not stale values.

use serde_json::Value;

use crate::error::ApiError;
use crate::model::{LoyaltyProgram, Promotion};

use super::{coerce_array, Backend};

/// What kind of purchase the preview is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PurchaseType {
    Appointment,
    Product,
}

impl PurchaseType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Appointment => "appointment",
            Self::Product => "product",
        }
    }
}

/// Backend-computed money preview plus the raw applicable discount rules.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TransactionPreview {
    pub subtotal: f64,
    pub tax: f64,
    pub total: f64,
    pub promotions: Vec<Promotion>,
    pub rewards: Vec<LoyaltyProgram>,
}

impl Backend {
    pub async fn transaction_details(
        &self,
        business_id: i64,
        purchase_type: PurchaseType,
    ) -> Result<TransactionPreview, ApiError> {
        let body = self
            .get_envelope_query(
                "/transactions/details",
                &[
                    ("business_id", business_id.to_string()),
                    ("purchase_type", purchase_type.as_str().to_string()),
                ],
            )
            .await?;
        Ok(preview_from_body(&body))
    }

    /// Finalize the purchase. Pass-through; amounts were already fixed by
    /// the preview on the backend side.
    pub async fn checkout(&self, payload: &Value) -> Result<(), ApiError> {
        self.post_envelope("/transactions/checkout/", payload).await?;
        Ok(())
    }
}

/// Money fields default to zero when absent or non-numeric; discount
/// arrays coerce defensively. The UI must never fabricate values.
fn preview_from_body(body: &Value) -> TransactionPreview {
    TransactionPreview {
        subtotal: money(body, "subtotal"),
        tax: money(body, "tax"),
        total: money(body, "total"),
        promotions: coerce_array(body.get("promotions")),
        rewards: coerce_array(body.get("rewards")),
    }
}

fn money(body: &Value, key: &str) -> f64 {
    body.get(key).and_then(Value::as_f64).unwrap_or(0.0)
}
