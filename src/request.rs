//! Purchase request records and their lifecycle state machine
use crate::catalog::{Product, is_positive_amount};
use crate::error::{ProcurementError, Result};
use crate::ids;
use crate::timestamp::TimeStamp;
use chrono::Utc;
use std::fmt;

/// Lifecycle states of a purchase request.
///
/// The only legal progression is `Pending -> Ordered -> Received`;
/// `Received` is terminal.
#[derive(minicbor::Encode, minicbor::Decode, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestStatus {
    #[n(0)]
    Pending,
    #[n(1)]
    Ordered,
    #[n(2)]
    Received,
}

impl RequestStatus {
    pub fn can_advance_to(self, next: RequestStatus) -> bool {
        matches!(
            (self, next),
            (RequestStatus::Pending, RequestStatus::Ordered)
                | (RequestStatus::Ordered, RequestStatus::Received)
        )
    }

    pub fn is_terminal(self) -> bool {
        self == RequestStatus::Received
    }

    /// Field edits are only permitted before the order has been placed.
    pub fn is_editable(self) -> bool {
        self == RequestStatus::Pending
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RequestStatus::Pending => "pending",
            RequestStatus::Ordered => "ordered",
            RequestStatus::Received => "received",
        };
        write!(f, "{label}")
    }
}

/// Receipt confirmation attached to a request once it reaches `Received`.
#[derive(minicbor::Encode, minicbor::Decode, Debug, Clone, PartialEq)]
pub struct ReceivedDetails {
    #[n(0)]
    pub supplier_id: String,
    #[n(1)]
    pub supplier_name: String,
    #[n(2)]
    pub unit_price: f64,
    #[n(3)]
    pub vat_percent: f64,
    #[n(4)]
    pub total_excl_vat: f64,
    #[n(5)]
    pub total_incl_vat: f64,
    #[n(6)]
    pub received_at: TimeStamp<Utc>,
}

impl ReceivedDetails {
    /// Computes receipt totals: `total_excl_vat = unit_price * amount` and
    /// `total_incl_vat = total_excl_vat * (1 + vat_percent / 100)`.
    pub fn compute(
        supplier_id: &str,
        supplier_name: &str,
        unit_price: f64,
        vat_percent: f64,
        amount: f64,
    ) -> Self {
        let total_excl_vat = unit_price * amount;
        let total_incl_vat = total_excl_vat * (1.0 + vat_percent / 100.0);

        Self {
            supplier_id: supplier_id.to_string(),
            supplier_name: supplier_name.to_string(),
            unit_price,
            vat_percent,
            total_excl_vat,
            total_incl_vat,
            received_at: TimeStamp::new(),
        }
    }
}

#[derive(minicbor::Encode, minicbor::Decode, Debug, Clone, PartialEq)]
pub struct PurchaseRequest {
    #[n(0)]
    pub id: String,
    #[n(1)]
    pub product_id: String,
    /// Product name copied from the catalog row at create/update time.
    #[n(2)]
    pub product_name: String,
    #[n(3)]
    pub amount: f64,
    #[n(4)]
    pub brand: Option<String>,
    #[n(5)]
    pub specs: Option<String>,
    #[n(6)]
    pub note: Option<String>,
    #[n(7)]
    pub status: RequestStatus,
    #[n(8)]
    pub created_at: TimeStamp<Utc>,
    /// Present if and only if `status == Received`.
    #[n(9)]
    pub received: Option<ReceivedDetails>,
}

impl PurchaseRequest {
    /// Advances `Pending -> Ordered`.
    pub fn mark_ordered(&mut self) -> Result<()> {
        if !self.status.can_advance_to(RequestStatus::Ordered) {
            return Err(ProcurementError::InvalidState {
                action: "placing the order",
                status: self.status,
            });
        }
        self.status = RequestStatus::Ordered;
        Ok(())
    }

    /// Advances `Ordered -> Received`, attaching the receipt details.
    pub fn mark_received(&mut self, details: ReceivedDetails) -> Result<()> {
        if !self.status.can_advance_to(RequestStatus::Received) {
            return Err(ProcurementError::InvalidState {
                action: "confirming receipt",
                status: self.status,
            });
        }
        self.status = RequestStatus::Received;
        self.received = Some(details);
        Ok(())
    }
}

// used for constructing and editing requests
#[derive(Debug, Default, Clone)]
pub struct RequestDraft {
    product_id: Option<String>,
    amount: f64,
    brand: Option<String>,
    specs: Option<String>,
    note: Option<String>,
}

impl RequestDraft {
    /// Construct a new draft, the basis for a request create or edit.
    pub fn new() -> Self {
        Self::default()
    }
    pub fn product(mut self, product_id: &str) -> Self {
        self.product_id = Some(product_id.to_string());
        self
    }
    pub fn amount(mut self, amount: f64) -> Self {
        self.amount = amount;
        self
    }
    pub fn brand(mut self, brand: &str) -> Self {
        self.brand = Some(brand.to_string());
        self
    }
    pub fn specs(mut self, specs: &str) -> Self {
        self.specs = Some(specs.to_string());
        self
    }
    pub fn note(mut self, note: &str) -> Self {
        self.note = Some(note.to_string());
        self
    }

    pub fn product_id(&self) -> Option<&str> {
        self.product_id.as_deref()
    }

    fn validate(&self, product: &Product) -> Result<()> {
        match &self.product_id {
            None => return Err(ProcurementError::validation("no product referenced")),
            Some(id) if *id != product.id => {
                return Err(ProcurementError::validation(
                    "draft references a different product",
                ));
            }
            Some(_) => {}
        }
        if !is_positive_amount(self.amount) {
            return Err(ProcurementError::validation(format!(
                "amount must be positive, got {}",
                self.amount
            )));
        }
        Ok(())
    }

    /// Validates the draft and constructs a fresh `Pending` request. The
    /// product name is denormalized from the catalog row at this point.
    pub fn build(self, product: &Product) -> Result<PurchaseRequest> {
        self.validate(product)?;

        Ok(PurchaseRequest {
            id: ids::request_id(),
            product_id: product.id.clone(),
            product_name: product.name.clone(),
            amount: self.amount,
            brand: self.brand,
            specs: self.specs,
            note: self.note,
            status: RequestStatus::Pending,
            created_at: TimeStamp::new(),
            received: None,
        })
    }

    /// Applies the draft to an existing request, keeping its identity,
    /// status and creation time. Rejected unless the request is `Pending`.
    pub fn apply_to(self, existing: &PurchaseRequest, product: &Product) -> Result<PurchaseRequest> {
        if !existing.status.is_editable() {
            return Err(ProcurementError::InvalidState {
                action: "editing",
                status: existing.status,
            });
        }
        self.validate(product)?;

        Ok(PurchaseRequest {
            id: existing.id.clone(),
            product_id: product.id.clone(),
            product_name: product.name.clone(),
            amount: self.amount,
            brand: self.brand,
            specs: self.specs,
            note: self.note,
            status: existing.status,
            created_at: existing.created_at.clone(),
            received: None,
        })
    }
}
