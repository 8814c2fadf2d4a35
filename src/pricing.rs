//! Purchase price history and the cheapest-offer index
//!
//! History rows are append-only facts written by the receive transition;
//! the index is rebuilt per call. The dataset here is a single kitchen's
//! suppliers, so a lazy scan beats a persistent structure.

use crate::timestamp::TimeStamp;
use chrono::Utc;

/// Denormalized record of one completed purchase. Immutable once written.
#[derive(minicbor::Encode, minicbor::Decode, Debug, Clone, PartialEq)]
pub struct PriceHistoryEntry {
    /// The request whose receipt produced this row. Also the storage key,
    /// which makes a retried receive confirmation overwrite rather than
    /// double-record.
    #[n(0)]
    pub request_id: String,
    #[n(1)]
    pub product_id: String,
    #[n(2)]
    pub product_name: String,
    #[n(3)]
    pub supplier_id: String,
    #[n(4)]
    pub supplier_name: String,
    #[n(5)]
    pub unit_price: f64,
    #[n(6)]
    pub quantity: f64,
    #[n(7)]
    pub purchased_at: TimeStamp<Utc>,
}

/// The cheapest known offer for a product, derived from price history.
/// Constructed only here.
#[derive(Debug, Clone, PartialEq)]
pub struct SupplierOffer {
    pub supplier_id: String,
    pub supplier_name: String,
    pub unit_price: f64,
    pub purchased_at: TimeStamp<Utc>,
}

impl SupplierOffer {
    fn from_entry(entry: &PriceHistoryEntry) -> Self {
        Self {
            supplier_id: entry.supplier_id.clone(),
            supplier_name: entry.supplier_name.clone(),
            unit_price: entry.unit_price,
            purchased_at: entry.purchased_at.clone(),
        }
    }
}

/// Returns the cheapest known offer for `product_id`, or `None` when no
/// price history exists for that product (no recommendation possible).
///
/// Matching is by product id only; name-based matching is unsupported.
/// Ties on price are broken by the most recent purchase, then by the
/// lowest supplier id so the winner is stable across calls.
pub fn cheapest_offer(product_id: &str, entries: &[PriceHistoryEntry]) -> Option<SupplierOffer> {
    entries
        .iter()
        .filter(|e| e.product_id == product_id)
        .min_by(|a, b| {
            a.unit_price
                .total_cmp(&b.unit_price)
                .then_with(|| b.purchased_at.cmp(&a.purchased_at))
                .then_with(|| a.supplier_id.cmp(&b.supplier_id))
        })
        .map(SupplierOffer::from_entry)
}

/// Per-line display price for a request's own product. A supplier group
/// can span products at distinct prices, so callers resolve each line
/// here instead of reusing the group-header offer.
pub fn line_price(product_id: &str, entries: &[PriceHistoryEntry]) -> Option<f64> {
    cheapest_offer(product_id, entries).map(|offer| offer.unit_price)
}
