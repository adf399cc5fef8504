//! Checkout discount summary.
//!
//! Display-only: subtotal, tax and total come precomputed from the
//! backend, and the component's sole computation is merging the
//! promotions and loyalty-rewards arrays into one applied-discounts list
//! for rendering. A failed or empty preview renders as zeros with no
//! discount rows; the UI never fabricates values and never shows stale
//! values from a previous business.

use tracing::warn;

use crate::backend::checkout::{PurchaseType, TransactionPreview};
use crate::backend::Backend;

/// One row in the applied-discounts list.
#[derive(Debug, Clone, PartialEq)]
pub struct AppliedDiscount {
    pub name: String,
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct DiscountSummary {
    pub subtotal: f64,
    pub tax: f64,
    pub total: f64,
    pub discounts: Vec<AppliedDiscount>,
    /// Inline fetch error, if the preview call failed.
    pub error: Option<String>,
}

impl DiscountSummary {
    /// The zero state: all monetary fields 0, no discount rows.
    pub fn zero() -> Self {
        Self::default()
    }

    pub fn from_preview(preview: TransactionPreview) -> Self {
        let mut discounts = Vec::with_capacity(preview.promotions.len() + preview.rewards.len());
        for promotion in preview.promotions {
            discounts.push(AppliedDiscount {
                name: promotion.name,
                amount: promotion.discount_amount,
            });
        }
        for reward in preview.rewards {
            discounts.push(AppliedDiscount {
                name: reward.name.unwrap_or_else(|| "Loyalty reward".to_string()),
                amount: reward.reward_value,
            });
        }
        Self {
            subtotal: preview.subtotal,
            tax: preview.tax,
            total: preview.total,
            discounts,
            error: None,
        }
    }
}

/// Fetch and shape the discount preview for a business/purchase-type
/// pair. Failure degrades to the zero state carrying the error inline.
pub async fn load_summary(
    backend: &Backend,
    business_id: i64,
    purchase_type: PurchaseType,
) -> DiscountSummary {
    match backend.transaction_details(business_id, purchase_type).await {
        Ok(preview) => DiscountSummary::from_preview(preview),
        Err(e) => {
            warn!(business_id, error = %e, "discount preview failed, rendering zero state");
            DiscountSummary {
                error: Some(e.to_string()),
                ..DiscountSummary::zero()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{LoyaltyProgram, Promotion, ThresholdType};

    #[test]
    fn test_zero_state() {
        let summary = DiscountSummary::zero();
        assert_eq!(summary.subtotal, 0.0);
        assert_eq!(summary.tax, 0.0);
        assert_eq!(summary.total, 0.0);
        assert!(summary.discounts.is_empty());
    }

    #[test]
    fn test_merges_promotions_and_rewards_into_common_shape() {
        let preview = TransactionPreview {
            subtotal: 50.0,
            tax: 4.0,
            total: 44.0,
            promotions: vec![Promotion {
                id: Some(1),
                name: "Autumn special".to_string(),
                discount_amount: 5.0,
                starts_on: None,
                ends_on: None,
                weekdays: Vec::new(),
            }],
            rewards: vec![LoyaltyProgram {
                threshold_type: ThresholdType::Appointments,
                threshold_value: 10.0,
                reward_type: "discount".to_string(),
                reward_value: 5.0,
                name: None,
            }],
        };

        let summary = DiscountSummary::from_preview(preview);
        assert_eq!(summary.total, 44.0);
        assert_eq!(
            summary.discounts,
            vec![
                AppliedDiscount {
                    name: "Autumn special".to_string(),
                    amount: 5.0
                },
                AppliedDiscount {
                    name: "Loyalty reward".to_string(),
                    amount: 5.0
                },
            ]
        );
    }

    #[test]
    fn test_empty_preview_has_no_rows() {
        let summary = DiscountSummary::from_preview(TransactionPreview::default());
        assert_eq!(summary, DiscountSummary::zero());
    }
}
