//! Transfer engine: validate and plan a stock movement between two warehouses.
//!
//! Planning is pure. It takes the current collections and returns the updated
//! stock collection plus the new transfer record; persisting both is the
//! caller's job.

use chrono::{DateTime, Utc};
use serde::de::{Error as _, IgnoredAny};
use serde::{Deserialize, Deserializer, Serialize};

use stockroom_core::{DomainError, DomainResult, ProductId, WarehouseId, next_id};

use crate::ledger::StockLedger;
use crate::model::{Product, StockEntry, Transfer, TransferStatus, Warehouse};

pub const UNKNOWN_PRODUCT: &str = "Unknown Product";
pub const UNKNOWN_WAREHOUSE: &str = "Unknown Warehouse";

/// Quantity exactly as the caller supplied it.
///
/// Kept loose so that a fractional, non-numeric or oddly typed amount is
/// reported as an invalid quantity rather than a malformed request.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RequestedQuantity {
    Whole(i64),
    Fractional(f64),
    Text(String),
    Unsupported(IgnoredAny),
}

impl RequestedQuantity {
    /// The amount if it is a positive whole number.
    pub fn positive_whole(&self) -> Option<i64> {
        let n = match self {
            RequestedQuantity::Whole(n) => *n,
            RequestedQuantity::Fractional(f) => {
                if f.fract() != 0.0 || *f <= 0.0 || *f > i64::MAX as f64 {
                    return None;
                }
                *f as i64
            }
            RequestedQuantity::Text(s) => s.trim().parse::<i64>().ok()?,
            RequestedQuantity::Unsupported(_) => return None,
        };
        (n > 0).then_some(n)
    }
}

impl From<i64> for RequestedQuantity {
    fn from(value: i64) -> Self {
        RequestedQuantity::Whole(value)
    }
}

/// Id given either as a JSON number or as a numeric string (`"3"`).
fn lenient_id<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: From<u64>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Number(u64),
        Text(String),
    }

    match Option::<RawId>::deserialize(deserializer)? {
        None => Ok(None),
        Some(RawId::Number(n)) => Ok(Some(T::from(n))),
        Some(RawId::Text(s)) => s
            .trim()
            .parse::<u64>()
            .map(|n| Some(T::from(n)))
            .map_err(|_| D::Error::custom(format!("invalid id: {s:?}"))),
    }
}

/// Incoming transfer request. Every field is optional until validated.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferRequest {
    #[serde(default, deserialize_with = "lenient_id")]
    pub product_id: Option<ProductId>,
    #[serde(default, deserialize_with = "lenient_id")]
    pub from_warehouse_id: Option<WarehouseId>,
    #[serde(default, deserialize_with = "lenient_id")]
    pub to_warehouse_id: Option<WarehouseId>,
    pub quantity: Option<RequestedQuantity>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// A request that passed the shape checks (fields present, distinct warehouses,
/// positive quantity). Reference checks happen in [`plan_transfer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedTransfer {
    pub product_id: ProductId,
    pub from_warehouse_id: WarehouseId,
    pub to_warehouse_id: WarehouseId,
    pub quantity: i64,
    pub notes: Option<String>,
}

impl TransferRequest {
    pub fn new(
        product_id: ProductId,
        from_warehouse_id: WarehouseId,
        to_warehouse_id: WarehouseId,
        quantity: i64,
    ) -> Self {
        Self {
            product_id: Some(product_id),
            from_warehouse_id: Some(from_warehouse_id),
            to_warehouse_id: Some(to_warehouse_id),
            quantity: Some(quantity.into()),
            notes: None,
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Field presence, distinct warehouses and a positive whole quantity, checked in that order.
    pub fn validate(&self) -> DomainResult<ValidatedTransfer> {
        let mut missing = Vec::new();
        if self.product_id.is_none() {
            missing.push("productId");
        }
        if self.from_warehouse_id.is_none() {
            missing.push("fromWarehouseId");
        }
        if self.to_warehouse_id.is_none() {
            missing.push("toWarehouseId");
        }
        if self.quantity.is_none() {
            missing.push("quantity");
        }

        let (Some(product_id), Some(from), Some(to), Some(quantity)) = (
            self.product_id,
            self.from_warehouse_id,
            self.to_warehouse_id,
            self.quantity.as_ref(),
        ) else {
            return Err(DomainError::validation(format!(
                "Missing required fields: {}",
                missing.join(", ")
            )));
        };

        if from == to {
            return Err(DomainError::validation(
                "Source and destination warehouses must be different",
            ));
        }

        let quantity = quantity
            .positive_whole()
            .ok_or_else(|| DomainError::validation("Quantity must be a positive integer"))?;

        let notes = self
            .notes
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string);

        Ok(ValidatedTransfer {
            product_id,
            from_warehouse_id: from,
            to_warehouse_id: to,
            quantity,
            notes,
        })
    }
}

/// Result of a successful plan: the full updated stock collection and the
/// transfer record to append.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferOutcome {
    pub stock: Vec<StockEntry>,
    pub transfer: Transfer,
    /// `true` when the destination had no entry for the product yet.
    pub created_destination_entry: bool,
}

/// Validate a request against current state and compute its effect.
pub fn plan_transfer(
    request: &TransferRequest,
    products: &[Product],
    warehouses: &[Warehouse],
    stock: &[StockEntry],
    transfers: &[Transfer],
    now: DateTime<Utc>,
) -> DomainResult<TransferOutcome> {
    let cmd = request.validate()?;

    if !products.iter().any(|p| p.id == cmd.product_id) {
        return Err(DomainError::not_found("Product"));
    }

    let source_warehouse = warehouses
        .iter()
        .find(|w| w.id == cmd.from_warehouse_id)
        .ok_or_else(|| DomainError::not_found("Warehouse"))?;
    if !warehouses.iter().any(|w| w.id == cmd.to_warehouse_id) {
        return Err(DomainError::not_found("Warehouse"));
    }

    // A missing source entry reads as zero available, which never covers a positive quantity.
    let available = StockLedger::new(stock, warehouses).quantity_at(cmd.product_id, cmd.from_warehouse_id);
    if available < cmd.quantity {
        return Err(DomainError::insufficient_stock(
            source_warehouse.name.clone(),
            available,
            cmd.quantity,
        ));
    }

    let mut updated = stock.to_vec();

    let source = updated
        .iter_mut()
        .find(|e| e.product_id == cmd.product_id && e.warehouse_id == cmd.from_warehouse_id)
        .ok_or_else(|| DomainError::insufficient_stock(source_warehouse.name.clone(), 0, cmd.quantity))?;
    source.quantity -= cmd.quantity;

    let destination = updated
        .iter_mut()
        .find(|e| e.product_id == cmd.product_id && e.warehouse_id == cmd.to_warehouse_id);
    let created_destination_entry = match destination {
        Some(entry) => {
            entry.quantity = entry
                .quantity
                .checked_add(cmd.quantity)
                .ok_or_else(|| {
                    DomainError::validation("Destination quantity would exceed the maximum stock level")
                })?;
            false
        }
        None => {
            let id = next_id(&updated);
            updated.push(StockEntry {
                id,
                product_id: cmd.product_id,
                warehouse_id: cmd.to_warehouse_id,
                quantity: cmd.quantity,
            });
            true
        }
    };

    let transfer = Transfer {
        id: next_id(transfers),
        product_id: cmd.product_id,
        from_warehouse_id: cmd.from_warehouse_id,
        to_warehouse_id: cmd.to_warehouse_id,
        quantity: cmd.quantity,
        notes: cmd.notes,
        date: now,
        status: TransferStatus::Completed,
    };

    Ok(TransferOutcome {
        stock: updated,
        transfer,
        created_destination_entry,
    })
}

/// Transfer with display names resolved for the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferView {
    #[serde(flatten)]
    pub transfer: Transfer,
    pub product_name: String,
    pub product_sku: Option<String>,
    pub from_warehouse_name: String,
    pub to_warehouse_name: String,
}

impl TransferView {
    /// Resolve names; references that no longer exist fall back to placeholder labels.
    pub fn enrich(transfer: &Transfer, products: &[Product], warehouses: &[Warehouse]) -> Self {
        let product = products.iter().find(|p| p.id == transfer.product_id);
        let warehouse_name = |id: WarehouseId| {
            warehouses
                .iter()
                .find(|w| w.id == id)
                .map(|w| w.name.clone())
                .unwrap_or_else(|| UNKNOWN_WAREHOUSE.to_string())
        };

        Self {
            transfer: transfer.clone(),
            product_name: product
                .map(|p| p.name.clone())
                .unwrap_or_else(|| UNKNOWN_PRODUCT.to_string()),
            product_sku: product.map(|p| p.sku.clone()),
            from_warehouse_name: warehouse_name(transfer.from_warehouse_id),
            to_warehouse_name: warehouse_name(transfer.to_warehouse_id),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransferFilter {
    pub product_id: Option<ProductId>,
}

/// Enriched transfers, most recent first. Same-instant transfers are ordered by descending id.
pub fn list_transfers(
    transfers: &[Transfer],
    products: &[Product],
    warehouses: &[Warehouse],
    filter: TransferFilter,
) -> Vec<TransferView> {
    let mut views: Vec<TransferView> = transfers
        .iter()
        .filter(|t| filter.product_id.is_none_or(|p| t.product_id == p))
        .map(|t| TransferView::enrich(t, products, warehouses))
        .collect();

    views.sort_by(|a, b| {
        b.transfer
            .date
            .cmp(&a.transfer.date)
            .then_with(|| b.transfer.id.cmp(&a.transfer.id))
    });
    views
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal::Decimal;
    use stockroom_core::{StockEntryId, TransferId};

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
    }

    fn product(id: u64) -> Product {
        Product {
            id: ProductId::new(id),
            sku: format!("SKU-{id}"),
            name: format!("Product {id}"),
            category: "General".to_string(),
            unit_cost: Decimal::new(200, 2),
            reorder_point: 100,
        }
    }

    fn warehouse(id: u64, name: &str) -> Warehouse {
        Warehouse {
            id: WarehouseId::new(id),
            name: name.to_string(),
            location: String::new(),
        }
    }

    fn entry(id: u64, product: u64, warehouse: u64, quantity: i64) -> StockEntry {
        StockEntry {
            id: StockEntryId::new(id),
            product_id: ProductId::new(product),
            warehouse_id: WarehouseId::new(warehouse),
            quantity,
        }
    }

    fn request(product: u64, from: u64, to: u64, quantity: i64) -> TransferRequest {
        TransferRequest::new(
            ProductId::new(product),
            WarehouseId::new(from),
            WarehouseId::new(to),
            quantity,
        )
    }

    struct Fixture {
        products: Vec<Product>,
        warehouses: Vec<Warehouse>,
        stock: Vec<StockEntry>,
        transfers: Vec<Transfer>,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                products: vec![product(1), product(2)],
                warehouses: vec![warehouse(1, "Main Warehouse"), warehouse(2, "Overflow"), warehouse(3, "Retail")],
                stock: vec![entry(1, 1, 1, 40), entry(2, 1, 3, 5), entry(3, 2, 1, 10)],
                transfers: vec![],
            }
        }

        fn plan(&self, req: &TransferRequest) -> DomainResult<TransferOutcome> {
            plan_transfer(req, &self.products, &self.warehouses, &self.stock, &self.transfers, at(0))
        }
    }

    #[test]
    fn moves_stock_into_new_destination_entry() {
        let fx = Fixture::new();
        let out = fx.plan(&request(1, 1, 2, 10)).unwrap();

        let ledger = StockLedger::new(&out.stock, &fx.warehouses);
        assert_eq!(ledger.quantity_at(ProductId::new(1), WarehouseId::new(1)), 30);
        assert_eq!(ledger.quantity_at(ProductId::new(1), WarehouseId::new(2)), 10);
        assert!(out.created_destination_entry);

        let created = ledger.entry(ProductId::new(1), WarehouseId::new(2)).unwrap();
        assert_eq!(created.id, StockEntryId::new(4));

        assert_eq!(out.transfer.id, TransferId::new(1));
        assert_eq!(out.transfer.quantity, 10);
        assert_eq!(out.transfer.status, TransferStatus::Completed);
        assert_eq!(out.transfer.date, at(0));
    }

    #[test]
    fn increments_existing_destination_entry() {
        let fx = Fixture::new();
        let out = fx.plan(&request(1, 1, 3, 15)).unwrap();

        assert!(!out.created_destination_entry);
        assert_eq!(out.stock.len(), fx.stock.len());
        let ledger = StockLedger::new(&out.stock, &fx.warehouses);
        assert_eq!(ledger.quantity_at(ProductId::new(1), WarehouseId::new(3)), 20);
        assert_eq!(ledger.quantity_at(ProductId::new(1), WarehouseId::new(1)), 25);
    }

    #[test]
    fn draining_source_keeps_zero_entry() {
        let fx = Fixture::new();
        let out = fx.plan(&request(1, 1, 2, 40)).unwrap();
        let source = out.stock.iter().find(|e| e.id == StockEntryId::new(1)).unwrap();
        assert_eq!(source.quantity, 0);
    }

    #[test]
    fn transfer_id_follows_max_existing() {
        let mut fx = Fixture::new();
        let mut first = fx.plan(&request(1, 1, 2, 1)).unwrap().transfer;
        first.id = TransferId::new(7);
        fx.transfers.push(first);

        let out = fx.plan(&request(1, 1, 2, 1)).unwrap();
        assert_eq!(out.transfer.id, TransferId::new(8));
    }

    #[test]
    fn missing_fields_are_listed() {
        let fx = Fixture::new();
        let req = TransferRequest {
            product_id: Some(ProductId::new(1)),
            ..TransferRequest::default()
        };
        let err = fx.plan(&req).unwrap_err();
        assert_eq!(
            err,
            DomainError::validation("Missing required fields: fromWarehouseId, toWarehouseId, quantity")
        );
    }

    #[test]
    fn same_warehouse_checked_before_quantity() {
        let fx = Fixture::new();
        let err = fx.plan(&request(1, 2, 2, -5)).unwrap_err();
        assert_eq!(
            err,
            DomainError::validation("Source and destination warehouses must be different")
        );
    }

    #[test]
    fn rejects_non_positive_and_fractional_quantities() {
        let fx = Fixture::new();
        for q in [
            RequestedQuantity::Whole(0),
            RequestedQuantity::Whole(-3),
            RequestedQuantity::Fractional(2.5),
            RequestedQuantity::Fractional(-4.0),
            RequestedQuantity::Fractional(1e300),
            RequestedQuantity::Text("ten".to_string()),
            RequestedQuantity::Unsupported(IgnoredAny),
        ] {
            let req = TransferRequest {
                quantity: Some(q),
                ..request(1, 1, 2, 1)
            };
            let err = fx.plan(&req).unwrap_err();
            assert_eq!(err, DomainError::validation("Quantity must be a positive integer"));
        }
    }

    #[test]
    fn whole_valued_float_quantity_is_accepted() {
        let fx = Fixture::new();
        let req = TransferRequest {
            quantity: Some(RequestedQuantity::Fractional(10.0)),
            ..request(1, 1, 2, 1)
        };
        assert_eq!(fx.plan(&req).unwrap().transfer.quantity, 10);
    }

    #[test]
    fn destination_overflow_names_the_limit() {
        let mut fx = Fixture::new();
        fx.stock.push(entry(4, 1, 2, i64::MAX));
        let err = fx.plan(&request(1, 1, 2, 1)).unwrap_err();
        assert_eq!(
            err,
            DomainError::validation("Destination quantity would exceed the maximum stock level")
        );
    }

    #[test]
    fn same_warehouse_reported_despite_odd_field_types() {
        let req: TransferRequest = serde_json::from_value(serde_json::json!({
            "productId": "1",
            "fromWarehouseId": "2",
            "toWarehouseId": 2,
            "quantity": true
        }))
        .unwrap();
        assert_eq!(req.product_id, Some(ProductId::new(1)));
        assert_eq!(req.from_warehouse_id, Some(WarehouseId::new(2)));
        assert_eq!(
            req.validate().unwrap_err(),
            DomainError::validation("Source and destination warehouses must be different")
        );
    }

    #[test]
    fn absent_and_null_ids_read_as_missing() {
        let req: TransferRequest = serde_json::from_value(serde_json::json!({
            "productId": null,
            "quantity": 1
        }))
        .unwrap();
        assert_eq!(req.product_id, None);
        assert_eq!(req.from_warehouse_id, None);
        assert!(serde_json::from_value::<TransferRequest>(serde_json::json!({ "productId": "abc" })).is_err());
    }

    #[test]
    fn numeric_text_quantity_is_accepted() {
        let fx = Fixture::new();
        let req = TransferRequest {
            quantity: Some(RequestedQuantity::Text(" 12 ".to_string())),
            ..request(1, 1, 2, 1)
        };
        assert_eq!(fx.plan(&req).unwrap().transfer.quantity, 12);
    }

    #[test]
    fn unknown_product_is_not_found() {
        let fx = Fixture::new();
        assert_eq!(fx.plan(&request(9, 1, 2, 1)).unwrap_err(), DomainError::not_found("Product"));
    }

    #[test]
    fn unknown_warehouses_are_not_found() {
        let fx = Fixture::new();
        assert_eq!(fx.plan(&request(1, 9, 2, 1)).unwrap_err(), DomainError::not_found("Warehouse"));
        assert_eq!(fx.plan(&request(1, 1, 9, 1)).unwrap_err(), DomainError::not_found("Warehouse"));
    }

    #[test]
    fn overdraw_reports_available_and_requested() {
        let fx = Fixture::new();
        let err = fx.plan(&request(1, 1, 2, 41)).unwrap_err();
        assert_eq!(err, DomainError::insufficient_stock("Main Warehouse", 40, 41));
    }

    #[test]
    fn missing_source_entry_is_insufficient_stock() {
        let fx = Fixture::new();
        let err = fx.plan(&request(2, 2, 1, 1)).unwrap_err();
        assert_eq!(err, DomainError::insufficient_stock("Overflow", 0, 1));
    }

    #[test]
    fn notes_are_trimmed_and_blank_dropped() {
        let fx = Fixture::new();
        let out = fx.plan(&request(1, 1, 2, 1).with_notes("  restock  ")).unwrap();
        assert_eq!(out.transfer.notes.as_deref(), Some("restock"));

        let out = fx.plan(&request(1, 1, 2, 1).with_notes("   ")).unwrap();
        assert_eq!(out.transfer.notes, None);
    }

    #[test]
    fn listing_is_newest_first_with_fallback_names() {
        let fx = Fixture::new();
        let mk = |id: u64, product: u64, from: u64, secs: i64| Transfer {
            id: TransferId::new(id),
            product_id: ProductId::new(product),
            from_warehouse_id: WarehouseId::new(from),
            to_warehouse_id: WarehouseId::new(2),
            quantity: 1,
            notes: None,
            date: at(secs),
            status: TransferStatus::Completed,
        };
        let transfers = vec![mk(1, 1, 1, 10), mk(2, 42, 77, 30), mk(3, 1, 1, 20), mk(4, 2, 1, 30)];

        let views = list_transfers(&transfers, &fx.products, &fx.warehouses, TransferFilter::default());
        let ids: Vec<u64> = views.iter().map(|v| v.transfer.id.get()).collect();
        assert_eq!(ids, vec![4, 2, 3, 1]);

        let dangling = &views[1];
        assert_eq!(dangling.product_name, UNKNOWN_PRODUCT);
        assert_eq!(dangling.product_sku, None);
        assert_eq!(dangling.from_warehouse_name, UNKNOWN_WAREHOUSE);
        assert_eq!(dangling.to_warehouse_name, "Overflow");
    }

    #[test]
    fn listing_filters_by_product() {
        let fx = Fixture::new();
        let a = fx.plan(&request(1, 1, 2, 1)).unwrap().transfer;
        let mut b = fx.plan(&request(2, 1, 2, 1)).unwrap().transfer;
        b.id = TransferId::new(2);

        let filter = TransferFilter {
            product_id: Some(ProductId::new(2)),
        };
        let views = list_transfers(&[a, b], &fx.products, &fx.warehouses, filter);
        assert_eq!(views.len(), 1);
        assert_eq!(views[0].product_name, "Product 2");
    }

    #[test]
    fn request_deserializes_loose_quantity() {
        let req: TransferRequest = serde_json::from_value(serde_json::json!({
            "productId": 1,
            "fromWarehouseId": 1,
            "toWarehouseId": 2,
            "quantity": 2.5
        }))
        .unwrap();
        assert_eq!(req.quantity, Some(RequestedQuantity::Fractional(2.5)));
        assert_eq!(req.notes, None);
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 256,
                ..ProptestConfig::default()
            })]

            /// Property: a successful transfer never changes the product's total stock.
            #[test]
            fn transfer_conserves_total(
                source in 0i64..500,
                dest in proptest::option::of(0i64..500),
                qty in 1i64..600,
            ) {
                let warehouses = vec![warehouse(1, "A"), warehouse(2, "B")];
                let mut stock = vec![entry(1, 1, 1, source)];
                if let Some(d) = dest {
                    stock.push(entry(2, 1, 2, d));
                }
                let before = StockLedger::new(&stock, &warehouses);

                match plan_transfer(&request(1, 1, 2, qty), &[product(1)], &warehouses, &stock, &[], at(0)) {
                    Ok(out) => {
                        let after = StockLedger::new(&out.stock, &warehouses);
                        prop_assert_eq!(after.total_quantity(ProductId::new(1)), before.total_quantity(ProductId::new(1)));
                        let src_after = after.quantity_at(ProductId::new(1), WarehouseId::new(1));
                        prop_assert_eq!(src_after, source - qty);
                        prop_assert!(src_after >= 0);
                    }
                    Err(e) => {
                        prop_assert!(qty > source);
                        let msg = e.to_string();
                        let available = format!("Available: {source}");
                        let requested = format!("Requested: {qty}");
                        prop_assert!(msg.contains(&available));
                        prop_assert!(msg.contains(&requested));
                    }
                }
            }

            /// Property: same source and destination is always rejected the same way.
            #[test]
            fn same_warehouse_always_rejected(
                product_id in 0u64..20,
                wh in 0u64..20,
                qty in -100i64..100,
            ) {
                let err = request(product_id, wh, wh, qty).validate().unwrap_err();
                prop_assert_eq!(err, DomainError::validation("Source and destination warehouses must be different"));
            }
        }
    }
}
