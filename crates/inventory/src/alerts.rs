//! Alert engine: classify each product's aggregate stock against its reorder point.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use stockroom_core::{DomainError, DomainResult, ProductId};

use crate::ledger::{StockLedger, WarehouseStock};
use crate::model::{AlertAcknowledgment, Product};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertStatus {
    Critical,
    Low,
    Overstocked,
    Adequate,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
}

impl Severity {
    /// Sort key; lower is more urgent.
    pub fn rank(self) -> u8 {
        match self {
            Severity::Critical => 0,
            Severity::High => 1,
            Severity::Medium => 2,
            Severity::Low => 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub status: AlertStatus,
    pub severity: Severity,
    pub recommended_action: &'static str,
    pub reorder_quantity: i64,
}

/// Tier a stock level against a reorder point.
///
/// - critical: `total < 0.5 * reorder_point`, reorder up to `2 * reorder_point`
/// - low: `total < reorder_point`, reorder up to `1.5 * reorder_point` (rounded up)
/// - overstocked: `total > 3 * reorder_point`
/// - adequate: everything else, including `total == reorder_point`
///
/// A zero reorder point makes any positive stock overstocked.
pub fn classify(total: i64, reorder_point: u32) -> Classification {
    let rp = i64::from(reorder_point);

    // Totals come from stored data, so saturate rather than overflow.
    if total.saturating_mul(2) < rp {
        Classification {
            status: AlertStatus::Critical,
            severity: Severity::Critical,
            recommended_action: "Immediate reorder required",
            reorder_quantity: (2 * rp).saturating_sub(total),
        }
    } else if total < rp {
        // ceil(1.5 * rp - total); the numerator is positive in this branch.
        Classification {
            status: AlertStatus::Low,
            severity: Severity::High,
            recommended_action: "Reorder recommended",
            reorder_quantity: (3 * rp - 2 * total + 1) / 2,
        }
    } else if total > 3 * rp {
        Classification {
            status: AlertStatus::Overstocked,
            severity: Severity::Medium,
            recommended_action: "Consider redistribution or promotion",
            reorder_quantity: 0,
        }
    } else {
        Classification {
            status: AlertStatus::Adequate,
            severity: Severity::Low,
            recommended_action: "No action needed",
            reorder_quantity: 0,
        }
    }
}

/// One product's stock status, reorder recommendation and acknowledgment state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StockAlert {
    pub product_id: ProductId,
    pub sku: String,
    pub product_name: String,
    pub category: String,
    pub current_stock: i64,
    pub reorder_point: u32,
    pub unit_cost: Decimal,
    pub status: AlertStatus,
    pub severity: Severity,
    pub recommended_action: String,
    pub reorder_quantity: i64,
    pub estimated_cost: Decimal,
    pub warehouse_breakdown: Vec<WarehouseStock>,
    pub acknowledged: bool,
    pub acknowledged_at: Option<DateTime<Utc>>,
    pub acknowledged_by: Option<String>,
}

/// One alert per product, most severe first. Equal severities keep catalog order.
pub fn compute_alerts(
    products: &[Product],
    ledger: &StockLedger<'_>,
    acknowledgments: &[AlertAcknowledgment],
) -> Vec<StockAlert> {
    let mut alerts: Vec<StockAlert> = products
        .iter()
        .map(|product| {
            let total = ledger.total_quantity(product.id);
            let c = classify(total, product.reorder_point);
            let ack = acknowledgments
                .iter()
                .find(|a| a.product_id == product.id && a.acknowledged);

            StockAlert {
                product_id: product.id,
                sku: product.sku.clone(),
                product_name: product.name.clone(),
                category: product.category.clone(),
                current_stock: total,
                reorder_point: product.reorder_point,
                unit_cost: product.unit_cost,
                status: c.status,
                severity: c.severity,
                recommended_action: c.recommended_action.to_string(),
                reorder_quantity: c.reorder_quantity,
                estimated_cost: Decimal::from(c.reorder_quantity) * product.unit_cost,
                warehouse_breakdown: ledger.breakdown(product.id),
                acknowledged: ack.is_some(),
                acknowledged_at: ack.and_then(|a| a.acknowledged_at),
                acknowledged_by: ack.and_then(|a| a.acknowledged_by.clone()),
            }
        })
        .collect();

    alerts.sort_by_key(|a| a.severity.rank());
    alerts
}

/// Dashboard roll-up of a set of alerts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertSummary {
    pub total: usize,
    pub critical: usize,
    pub low: usize,
    pub overstocked: usize,
    pub adequate: usize,
    /// Critical or low alerts nobody has acknowledged yet.
    pub unacknowledged_actionable: usize,
    pub total_reorder_cost: Decimal,
}

impl AlertSummary {
    pub fn from_alerts(alerts: &[StockAlert]) -> Self {
        alerts.iter().fold(Self::default(), |mut s, a| {
            s.total += 1;
            match a.status {
                AlertStatus::Critical => s.critical += 1,
                AlertStatus::Low => s.low += 1,
                AlertStatus::Overstocked => s.overstocked += 1,
                AlertStatus::Adequate => s.adequate += 1,
            }
            if matches!(a.status, AlertStatus::Critical | AlertStatus::Low) && !a.acknowledged {
                s.unacknowledged_actionable += 1;
            }
            s.total_reorder_cost += a.estimated_cost;
            s
        })
    }
}

/// Upsert an acknowledgment for a product.
///
/// Returns the new collection (at most one record per product) and the stored
/// record. A blank author falls back to `default_actor`.
pub fn acknowledge(
    acknowledgments: &[AlertAcknowledgment],
    product_id: Option<ProductId>,
    acknowledged_by: Option<&str>,
    default_actor: &str,
    now: DateTime<Utc>,
) -> DomainResult<(Vec<AlertAcknowledgment>, AlertAcknowledgment)> {
    let product_id = product_id.ok_or_else(|| DomainError::validation("productId is required"))?;

    let author = acknowledged_by
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .unwrap_or(default_actor);

    let record = AlertAcknowledgment {
        product_id,
        acknowledged: true,
        acknowledged_at: Some(now),
        acknowledged_by: Some(author.to_string()),
    };

    let mut updated: Vec<AlertAcknowledgment> = acknowledgments
        .iter()
        .filter(|a| a.product_id != product_id)
        .cloned()
        .collect();
    updated.push(record.clone());

    Ok((updated, record))
}

/// Drop any acknowledgment for a product. Succeeds when there was none.
pub fn unacknowledge(
    acknowledgments: &[AlertAcknowledgment],
    product_id: Option<ProductId>,
) -> DomainResult<Vec<AlertAcknowledgment>> {
    let product_id = product_id.ok_or_else(|| DomainError::validation("productId is required"))?;

    Ok(acknowledgments
        .iter()
        .filter(|a| a.product_id != product_id)
        .cloned()
        .collect())
}
