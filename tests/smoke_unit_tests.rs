//! Smoke-screen unit tests for procurement core components
//!
//! These tests span the codebase, testing behavior in isolation from
//! integration scenarios. They are intended as smoke-screen coverage and
//! generally test the happy path plus the obvious rejections.

use chrono::{Datelike, Timelike, Utc};
use kitchen_procurement::{
    catalog::{Product, ServiceArea, Unit},
    ids,
    pricing::{PriceHistoryEntry, cheapest_offer},
    request::{ReceivedDetails, RequestDraft, RequestStatus},
    timestamp::TimeStamp,
};

// IDS MODULE TESTS
#[cfg(test)]
mod ids_tests {
    use super::*;

    /// The generators produce bech32 strings carrying the record prefix
    #[test]
    fn generates_valid_ids_with_prefix() {
        let product = ids::product_id();
        let supplier = ids::supplier_id();
        let request = ids::request_id();

        assert!(product.starts_with("prod_1"));
        assert!(supplier.starts_with("sup_1"));
        assert!(request.starts_with("req_1"));
        assert!(product.len() > 10); // UUID should produce substantial output
    }

    /// The constant prefixes must all be encodable hrps, so the
    /// generators can never fall back to an unprefixed id
    #[test]
    fn known_prefixes_are_valid_hrps() {
        for hrp in [ids::PRODUCT_HRP, ids::SUPPLIER_HRP, ids::REQUEST_HRP] {
            let id = ids::new_prefixed_id(hrp).unwrap();
            assert!(id.starts_with(hrp));
        }
    }

    #[test]
    fn handles_empty_hrp() {
        // Empty prefix should fail
        let result = ids::new_prefixed_id("");
        assert!(result.is_err());
    }

    #[test]
    fn generates_unique_ids() {
        let id1 = ids::request_id();
        let id2 = ids::request_id();
        let id3 = ids::request_id();

        assert_ne!(id1, id2);
        assert_ne!(id2, id3);
        assert_ne!(id1, id3);
    }
}

// TIMESTAMP MODULE TESTS
#[cfg(test)]
mod timestamp_tests {
    use super::*;

    #[test]
    fn timestamp_new_creates_current_time() {
        let ts = TimeStamp::new();
        let now = Utc::now();

        let diff = (now - ts.to_datetime_utc()).num_seconds().abs();
        assert!(diff < 1); // Should be within 1 second
    }

    #[test]
    fn timestamp_new_with_creates_specific_time() {
        let ts = TimeStamp::new_with(2024, 6, 15, 10, 30, 0);
        let dt = ts.to_datetime_utc();

        assert_eq!(dt.year(), 2024);
        assert_eq!(dt.month(), 6);
        assert_eq!(dt.day(), 15);
        assert_eq!(dt.hour(), 10);
        assert_eq!(dt.minute(), 30);
    }

    #[test]
    fn timestamp_cbor_roundtrip() {
        let original = TimeStamp::new();

        let encoded = minicbor::to_vec(&original).unwrap();
        let decoded: TimeStamp<Utc> = minicbor::decode(&encoded).unwrap();

        assert_eq!(original, decoded);
    }
}

// CATALOG MODULE TESTS
#[cfg(test)]
mod catalog_tests {
    use super::*;

    #[test]
    fn product_new_trims_and_stamps() {
        let product = Product::new("  Tomato ", Unit::Kg);

        assert_eq!(product.name, "Tomato");
        assert!(product.id.starts_with("prod_1"));
    }

    #[test]
    fn unit_catalog_is_closed() {
        assert_eq!(Unit::parse("kg"), Some(Unit::Kg));
        assert_eq!(Unit::parse("jar"), Some(Unit::Jar));
        assert_eq!(Unit::parse("barrel"), None);
    }

    #[test]
    fn service_area_catalog_is_closed() {
        assert_eq!(
            ServiceArea::parse("meat products"),
            Some(ServiceArea::MeatProducts)
        );
        assert_eq!(ServiceArea::parse("stationery"), None);
    }
}

// REQUEST LIFECYCLE TESTS
#[cfg(test)]
mod lifecycle_tests {
    use super::*;

    #[test]
    fn transition_matrix() {
        use RequestStatus::*;

        assert!(Pending.can_advance_to(Ordered));
        assert!(Ordered.can_advance_to(Received));

        assert!(!Pending.can_advance_to(Received));
        assert!(!Pending.can_advance_to(Pending));
        assert!(!Ordered.can_advance_to(Pending));
        assert!(!Ordered.can_advance_to(Ordered));
        assert!(!Received.can_advance_to(Pending));
        assert!(!Received.can_advance_to(Ordered));
        assert!(!Received.can_advance_to(Received));
    }

    #[test]
    fn editability_and_terminality() {
        assert!(RequestStatus::Pending.is_editable());
        assert!(!RequestStatus::Ordered.is_editable());
        assert!(!RequestStatus::Received.is_editable());

        assert!(RequestStatus::Received.is_terminal());
        assert!(!RequestStatus::Ordered.is_terminal());
    }

    #[test]
    fn receipt_totals_for_the_worked_example() {
        // unit price 12.5, amount 4, VAT 20% -> 50.0 excl, 60.0 incl
        let details = ReceivedDetails::compute("sup_a", "ABC Foods", 12.5, 20.0, 4.0);

        assert_eq!(details.total_excl_vat, 50.0);
        assert_eq!(details.total_incl_vat, 60.0);
    }

    #[test]
    fn zero_vat_keeps_totals_equal() {
        let details = ReceivedDetails::compute("sup_a", "ABC Foods", 7.0, 0.0, 3.0);

        assert_eq!(details.total_excl_vat, 21.0);
        assert_eq!(details.total_incl_vat, 21.0);
    }

    #[test]
    fn draft_validation_requires_product_and_positive_amount() {
        let product = Product::new("Tomato", Unit::Kg);

        assert!(RequestDraft::new().amount(1.0).build(&product).is_err());
        assert!(
            RequestDraft::new()
                .product(&product.id)
                .amount(-2.0)
                .build(&product)
                .is_err()
        );
        assert!(
            RequestDraft::new()
                .product(&product.id)
                .amount(0.25)
                .build(&product)
                .is_ok()
        );
    }
}

// PRICING INDEX TESTS
#[cfg(test)]
mod pricing_tests {
    use super::*;

    fn entry(product_id: &str, supplier_id: &str, price: f64, ts: TimeStamp<Utc>) -> PriceHistoryEntry {
        PriceHistoryEntry {
            request_id: ids::request_id(),
            product_id: product_id.to_string(),
            product_name: "product".to_string(),
            supplier_id: supplier_id.to_string(),
            supplier_name: supplier_id.to_string(),
            unit_price: price,
            quantity: 1.0,
            purchased_at: ts,
        }
    }

    /// cheapest_offer returns None iff no entry exists for the product
    #[test]
    fn none_without_history() {
        assert!(cheapest_offer("prod_x", &[]).is_none());

        let rows = [entry("prod_y", "sup_a", 4.0, TimeStamp::new())];
        assert!(cheapest_offer("prod_x", &rows).is_none());
        assert!(cheapest_offer("prod_y", &rows).is_some());
    }

    /// lowest price wins regardless of row order or timestamps
    #[test]
    fn lowest_price_wins() {
        let t1 = TimeStamp::new_with(2024, 1, 1, 0, 0, 0);
        let t2 = TimeStamp::new_with(2024, 2, 1, 0, 0, 0);
        let rows = [
            entry("prod_x", "sup_a", 10.0, t1),
            entry("prod_x", "sup_b", 8.0, t2),
        ];

        let offer = cheapest_offer("prod_x", &rows).unwrap();
        assert_eq!(offer.supplier_id, "sup_b");
        assert_eq!(offer.unit_price, 8.0);
    }

    /// a price tie resolves to the same supplier on every call
    #[test]
    fn tie_break_is_deterministic() {
        let rows = [
            entry("prod_x", "sup_a", 8.0, TimeStamp::new_with(2024, 1, 1, 0, 0, 0)),
            entry("prod_x", "sup_b", 8.0, TimeStamp::new_with(2024, 2, 1, 0, 0, 0)),
        ];

        let first = cheapest_offer("prod_x", &rows).unwrap();
        for _ in 0..10 {
            assert_eq!(cheapest_offer("prod_x", &rows).unwrap(), first);
        }
        // most recent record wins the tie
        assert_eq!(first.supplier_id, "sup_b");
    }
}
