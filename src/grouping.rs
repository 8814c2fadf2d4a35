//! Procurement grouping engine
//!
//! Partitions pending purchase requests into supplier-assigned groups
//! using the cheapest-offer index. A pure function of its inputs: the
//! same requests and history always produce the same grouping, and no
//! state is carried between calls.

use crate::pricing::{PriceHistoryEntry, SupplierOffer, cheapest_offer};
use crate::request::{PurchaseRequest, RequestStatus};
use std::collections::BTreeMap;

/// One supplier's share of the pending workload.
#[derive(Debug, Clone, PartialEq)]
pub struct SupplierGroup {
    /// The offer that won the assignment. Requests for distinct products
    /// keep their own line price; this is not a blended group price.
    pub offer: SupplierOffer,
    pub requests: Vec<PurchaseRequest>,
}

/// Result of one grouping pass. Every pending input request lands in
/// exactly one supplier group or in `unassigned`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Grouping {
    pub groups: BTreeMap<String, SupplierGroup>,
    pub unassigned: Vec<PurchaseRequest>,
}

impl Grouping {
    pub fn assigned_count(&self) -> usize {
        self.groups.values().map(|g| g.requests.len()).sum()
    }

    pub fn total_count(&self) -> usize {
        self.assigned_count() + self.unassigned.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty() && self.unassigned.is_empty()
    }
}

/// Groups pending requests by their cheapest-offer supplier. Requests in
/// any other lifecycle state are not considered; requests whose product
/// has no price history go to `unassigned`.
pub fn group_by_supplier(
    requests: &[PurchaseRequest],
    history: &[PriceHistoryEntry],
) -> Grouping {
    // one offer lookup per distinct product, not per request
    let mut offers: BTreeMap<String, Option<SupplierOffer>> = BTreeMap::new();
    for request in requests.iter().filter(|r| r.status == RequestStatus::Pending) {
        offers
            .entry(request.product_id.clone())
            .or_insert_with(|| cheapest_offer(&request.product_id, history));
    }

    group_with_offers(requests, &offers)
}

/// Grouping pass over precomputed per-product offers. Used directly when
/// the data store exposes a materialized cheapest-offers view.
pub fn group_with_offers(
    requests: &[PurchaseRequest],
    offers: &BTreeMap<String, Option<SupplierOffer>>,
) -> Grouping {
    let mut grouping = Grouping::default();

    for request in requests.iter().filter(|r| r.status == RequestStatus::Pending) {
        match offers.get(&request.product_id).and_then(|o| o.as_ref()) {
            Some(offer) => {
                grouping
                    .groups
                    .entry(offer.supplier_id.clone())
                    .or_insert_with(|| SupplierGroup {
                        offer: offer.clone(),
                        requests: vec![],
                    })
                    .requests
                    .push(request.clone());
            }
            None => grouping.unassigned.push(request.clone()),
        }
    }

    grouping
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Product, Unit};
    use crate::request::RequestDraft;
    use crate::timestamp::TimeStamp;

    fn pending(product: &Product, amount: f64) -> PurchaseRequest {
        RequestDraft::new()
            .product(&product.id)
            .amount(amount)
            .build(product)
            .unwrap()
    }

    fn history_row(product: &Product, supplier_id: &str, unit_price: f64) -> PriceHistoryEntry {
        PriceHistoryEntry {
            request_id: format!("req_{}_{}", product.id, supplier_id),
            product_id: product.id.clone(),
            product_name: product.name.clone(),
            supplier_id: supplier_id.to_string(),
            supplier_name: supplier_id.to_string(),
            unit_price,
            quantity: 1.0,
            purchased_at: TimeStamp::new(),
        }
    }

    #[test]
    fn partitions_every_pending_request_exactly_once() {
        let tomato = Product::new("Tomato", Unit::Kg);
        let flour = Product::new("Flour", Unit::Sack);
        let saffron = Product::new("Saffron", Unit::Gram);

        let requests = vec![
            pending(&tomato, 4.0),
            pending(&flour, 2.0),
            pending(&saffron, 10.0), // no price history
        ];
        let history = vec![
            history_row(&tomato, "sup_a", 9.0),
            history_row(&tomato, "sup_b", 7.5),
            history_row(&flour, "sup_b", 30.0),
        ];

        let grouping = group_by_supplier(&requests, &history);

        assert_eq!(grouping.total_count(), requests.len());
        assert_eq!(grouping.groups.len(), 1);
        let group = &grouping.groups["sup_b"];
        assert_eq!(group.requests.len(), 2);
        assert_eq!(grouping.unassigned.len(), 1);
        assert_eq!(grouping.unassigned[0].product_id, saffron.id);
    }

    #[test]
    fn ignores_non_pending_requests() {
        let tomato = Product::new("Tomato", Unit::Kg);
        let mut ordered = pending(&tomato, 1.0);
        ordered.mark_ordered().unwrap();

        let history = vec![history_row(&tomato, "sup_a", 9.0)];
        let grouping = group_by_supplier(&[ordered], &history);

        assert!(grouping.is_empty());
    }

    #[test]
    fn same_inputs_same_grouping() {
        let tomato = Product::new("Tomato", Unit::Kg);
        let requests = vec![pending(&tomato, 4.0)];
        let history = vec![
            history_row(&tomato, "sup_a", 8.0),
            history_row(&tomato, "sup_b", 8.0),
        ];

        let first = group_by_supplier(&requests, &history);
        let second = group_by_supplier(&requests, &history);

        assert_eq!(first, second);
    }
}
