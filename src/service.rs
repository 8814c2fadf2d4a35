//! Service layer API for the procurement workflow
use crate::catalog::{Product, Supplier, is_positive_amount, names_collide};
use crate::error::{ProcurementError, Result};
use crate::grouping::{Grouping, group_by_supplier, group_with_offers};
use crate::pricing::PriceHistoryEntry;
use crate::request::{PurchaseRequest, ReceivedDetails, RequestDraft, RequestStatus};
use crate::store::DataStore;
use std::collections::BTreeMap;

/// Head counts for the overview panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RequestSummary {
    pub products: usize,
    pub suppliers: usize,
    pub pending: usize,
    pub ordered: usize,
    pub received: usize,
}

pub struct ProcurementService<S: DataStore> {
    store: S,
    // in future we could add a config for procurement roles
}

impl<S: DataStore> ProcurementService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    // CATALOG

    /// Create or update a product. Names are unique case-insensitively
    /// across all other products; a row may keep its own name on update.
    pub fn save_product(&self, product: Product) -> Result<Product> {
        if product.name.trim().is_empty() {
            return Err(ProcurementError::validation("product name is required"));
        }
        let duplicate = self
            .store
            .list_products()?
            .into_iter()
            .any(|other| other.id != product.id && names_collide(&other.name, &product.name));
        if duplicate {
            return Err(ProcurementError::validation(format!(
                "a product named \"{}\" already exists",
                product.name.trim()
            )));
        }

        self.store.upsert_product(&product)?;
        self.require_product(&product.id)
    }

    pub fn delete_product(&self, id: &str) -> Result<()> {
        self.store.delete_product(id)
    }

    pub fn products(&self) -> Result<Vec<Product>> {
        self.store.list_products()
    }

    /// Create or update a supplier; same uniqueness rule as products,
    /// applied to the company name. Service areas are deduplicated.
    pub fn save_supplier(&self, mut supplier: Supplier) -> Result<Supplier> {
        if supplier.company_name.trim().is_empty() {
            return Err(ProcurementError::validation("company name is required"));
        }
        let duplicate = self.store.list_suppliers()?.into_iter().any(|other| {
            other.id != supplier.id && names_collide(&other.company_name, &supplier.company_name)
        });
        if duplicate {
            return Err(ProcurementError::validation(format!(
                "a supplier named \"{}\" already exists",
                supplier.company_name.trim()
            )));
        }
        supplier.dedup_service_areas();

        self.store.upsert_supplier(&supplier)?;
        self.require_supplier(&supplier.id)
    }

    pub fn delete_supplier(&self, id: &str) -> Result<()> {
        self.store.delete_supplier(id)
    }

    pub fn suppliers(&self) -> Result<Vec<Supplier>> {
        self.store.list_suppliers()
    }

    // REQUEST LIFECYCLE

    /// Create a new pending request from a draft. The referenced product
    /// must exist; its name is denormalized into the request.
    pub fn create_request(&self, draft: RequestDraft) -> Result<PurchaseRequest> {
        let product = self.resolve_draft_product(&draft)?;
        let request = draft.build(&product)?;

        self.store.upsert_request(&request)?;
        self.require_request(&request.id)
    }

    /// Edit a pending request. Ordered and received requests reject edits.
    pub fn edit_request(&self, id: &str, draft: RequestDraft) -> Result<PurchaseRequest> {
        let existing = self.require_request(id)?;
        let product = self.resolve_draft_product(&draft)?;
        let updated = draft.apply_to(&existing, &product)?;

        self.store.upsert_request(&updated)?;
        self.require_request(id)
    }

    /// Delete a request from any state. Price history is never touched.
    pub fn delete_request(&self, id: &str) -> Result<()> {
        self.store.delete_request(id)
    }

    /// Advance a pending request to `Ordered`. No side effects beyond the
    /// status write.
    pub fn mark_ordered(&self, id: &str) -> Result<PurchaseRequest> {
        let mut request = self.require_request(id)?;
        request.mark_ordered()?;

        self.store.update_request_status(id, RequestStatus::Ordered)?;
        self.require_request(id)
    }

    /// Confirm receipt of an ordered request: attaches the receipt details
    /// and appends one price-history row.
    ///
    /// The store offers no multi-object transaction, so the status row is
    /// written first and success is only reported once the history append
    /// also lands. When the append fails the status row may already be
    /// mutated; the error is surfaced and callers re-read the true state.
    /// A retry on an already-received request re-issues only the history
    /// append, which is keyed by request id and therefore never
    /// double-records.
    pub fn receive_request(
        &self,
        id: &str,
        supplier_id: &str,
        unit_price: f64,
        vat_percent: f64,
    ) -> Result<PurchaseRequest> {
        let mut request = self.require_request(id)?;

        if request.status == RequestStatus::Received {
            // retry after a prior partial failure: complete the append
            return self.replay_history_append(&request);
        }

        let supplier = self.require_supplier(supplier_id)?;
        if !is_positive_amount(unit_price) {
            return Err(ProcurementError::validation(format!(
                "unit price must be positive, got {unit_price}"
            )));
        }
        if !(vat_percent.is_finite() && vat_percent >= 0.0) {
            return Err(ProcurementError::validation(format!(
                "vat percent must be zero or more, got {vat_percent}"
            )));
        }

        let details = ReceivedDetails::compute(
            &supplier.id,
            &supplier.company_name,
            unit_price,
            vat_percent,
            request.amount,
        );
        request.mark_received(details)?;

        // status first, then history; see the non-atomic boundary note above
        self.store.upsert_request(&request)?;
        if let Err(e) = self.store.append_price_history(&history_entry(&request)?) {
            log::warn!(
                "request {id} is received but its price history append failed: {e}; \
                 retry the confirmation to complete it"
            );
            return Err(e);
        }

        self.require_request(id)
    }

    fn replay_history_append(&self, request: &PurchaseRequest) -> Result<PurchaseRequest> {
        self.store.append_price_history(&history_entry(request)?)?;
        self.require_request(&request.id)
    }

    // RECOMMENDATIONS

    /// Pending requests grouped by their cheapest-offer supplier. Uses the
    /// store's materialized offers view when available, otherwise scans
    /// the raw price-history rows.
    pub fn recommendations(&self) -> Result<Grouping> {
        let requests = self.store.list_requests()?;

        match self.store.cheapest_offers_view()? {
            Some(view) => {
                let offers: BTreeMap<_, _> =
                    view.into_iter().map(|(id, offer)| (id, Some(offer))).collect();
                Ok(group_with_offers(&requests, &offers))
            }
            None => {
                let history = self.store.list_price_history()?;
                Ok(group_by_supplier(&requests, &history))
            }
        }
    }

    pub fn pending_requests(&self) -> Result<Vec<PurchaseRequest>> {
        Ok(self
            .store
            .list_requests()?
            .into_iter()
            .filter(|r| r.status == RequestStatus::Pending)
            .collect())
    }

    pub fn requests(&self) -> Result<Vec<PurchaseRequest>> {
        self.store.list_requests()
    }

    pub fn summary(&self) -> Result<RequestSummary> {
        let requests = self.store.list_requests()?;
        let mut summary = RequestSummary {
            products: self.store.list_products()?.len(),
            suppliers: self.store.list_suppliers()?.len(),
            ..RequestSummary::default()
        };
        for request in &requests {
            match request.status {
                RequestStatus::Pending => summary.pending += 1,
                RequestStatus::Ordered => summary.ordered += 1,
                RequestStatus::Received => summary.received += 1,
            }
        }
        Ok(summary)
    }

    // LOOKUPS

    fn resolve_draft_product(&self, draft: &RequestDraft) -> Result<Product> {
        let Some(product_id) = draft.product_id() else {
            return Err(ProcurementError::validation("no product referenced"));
        };
        self.require_product(product_id)
    }

    fn require_product(&self, id: &str) -> Result<Product> {
        self.store
            .get_product(id)?
            .ok_or_else(|| ProcurementError::not_found("product", id))
    }

    fn require_supplier(&self, id: &str) -> Result<Supplier> {
        self.store
            .get_supplier(id)?
            .ok_or_else(|| ProcurementError::not_found("supplier", id))
    }

    fn require_request(&self, id: &str) -> Result<PurchaseRequest> {
        self.store
            .get_request(id)?
            .ok_or_else(|| ProcurementError::not_found("request", id))
    }
}

fn history_entry(request: &PurchaseRequest) -> Result<PriceHistoryEntry> {
    let Some(details) = &request.received else {
        return Err(ProcurementError::validation(
            "request carries no receipt details",
        ));
    };
    Ok(PriceHistoryEntry {
        request_id: request.id.clone(),
        product_id: request.product_id.clone(),
        product_name: request.product_name.clone(),
        supplier_id: details.supplier_id.clone(),
        supplier_name: details.supplier_name.clone(),
        unit_price: details.unit_price,
        quantity: request.amount,
        purchased_at: details.received_at.clone(),
    })
}
