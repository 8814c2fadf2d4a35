//! Data store collaborator contract and the sled-backed implementation
//!
//! Records are serialized with CBOR, one tree per collection. Price
//! history rows are keyed by their originating request id, so re-issuing
//! an append for the same receipt overwrites instead of double-recording.

use crate::catalog::{Product, Supplier};
use crate::error::{ProcurementError, Result};
use crate::pricing::{PriceHistoryEntry, SupplierOffer};
use crate::request::{PurchaseRequest, RequestStatus};
use sled::Tree;
use std::collections::BTreeMap;
use std::path::Path;

/// Persistence collaborator for the procurement core.
///
/// List operations return rows ordered newest-created-first for display;
/// grouping and matching logic must not depend on that order.
pub trait DataStore {
    fn list_products(&self) -> Result<Vec<Product>>;
    fn get_product(&self, id: &str) -> Result<Option<Product>>;
    fn upsert_product(&self, product: &Product) -> Result<()>;
    fn delete_product(&self, id: &str) -> Result<()>;

    fn list_suppliers(&self) -> Result<Vec<Supplier>>;
    fn get_supplier(&self, id: &str) -> Result<Option<Supplier>>;
    fn upsert_supplier(&self, supplier: &Supplier) -> Result<()>;
    fn delete_supplier(&self, id: &str) -> Result<()>;

    fn list_requests(&self) -> Result<Vec<PurchaseRequest>>;
    fn get_request(&self, id: &str) -> Result<Option<PurchaseRequest>>;
    fn upsert_request(&self, request: &PurchaseRequest) -> Result<()>;
    fn delete_request(&self, id: &str) -> Result<()>;
    fn update_request_status(&self, id: &str, status: RequestStatus) -> Result<()>;

    fn append_price_history(&self, entry: &PriceHistoryEntry) -> Result<()>;
    fn list_price_history(&self) -> Result<Vec<PriceHistoryEntry>>;

    /// Optional materialized shortcut: the cheapest current offer per
    /// product, computed store-side. `Ok(None)` means the view is
    /// unavailable and callers fall back to scanning raw history rows.
    fn cheapest_offers_view(&self) -> Result<Option<BTreeMap<String, SupplierOffer>>> {
        Ok(None)
    }
}

pub struct SledStore {
    products: Tree,
    suppliers: Tree,
    requests: Tree,
    price_history: Tree,
}

impl SledStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let db = sled::open(path)?;
        Self::with_db(&db)
    }

    pub fn with_db(db: &sled::Db) -> Result<Self> {
        Ok(Self {
            products: db.open_tree("products")?,
            suppliers: db.open_tree("suppliers")?,
            requests: db.open_tree("requests")?,
            price_history: db.open_tree("price_history")?,
        })
    }

    fn encode<T>(value: &T) -> Result<Vec<u8>>
    where
        T: minicbor::Encode<()>,
    {
        minicbor::to_vec(value).map_err(|e| ProcurementError::Codec(e.to_string()))
    }

    fn decode<T>(bytes: &[u8]) -> Result<T>
    where
        T: for<'b> minicbor::Decode<'b, ()>,
    {
        minicbor::decode(bytes).map_err(|e| ProcurementError::Codec(e.to_string()))
    }

    fn list_tree<T>(tree: &Tree) -> Result<Vec<T>>
    where
        T: for<'b> minicbor::Decode<'b, ()>,
    {
        let mut rows = Vec::new();
        for kv in tree.iter() {
            let (_, value) = kv?;
            rows.push(Self::decode(&value)?);
        }
        Ok(rows)
    }

    fn get_tree<T>(tree: &Tree, id: &str) -> Result<Option<T>>
    where
        T: for<'b> minicbor::Decode<'b, ()>,
    {
        match tree.get(id.as_bytes())? {
            Some(value) => Ok(Some(Self::decode(&value)?)),
            None => Ok(None),
        }
    }
}

impl DataStore for SledStore {
    fn list_products(&self) -> Result<Vec<Product>> {
        let mut rows: Vec<Product> = Self::list_tree(&self.products)?;
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    fn get_product(&self, id: &str) -> Result<Option<Product>> {
        Self::get_tree(&self.products, id)
    }

    fn upsert_product(&self, product: &Product) -> Result<()> {
        log::debug!("upsert product {}", product.id);
        self.products
            .insert(product.id.as_bytes(), Self::encode(product)?)?;
        Ok(())
    }

    fn delete_product(&self, id: &str) -> Result<()> {
        self.products.remove(id.as_bytes())?;
        Ok(())
    }

    fn list_suppliers(&self) -> Result<Vec<Supplier>> {
        let mut rows: Vec<Supplier> = Self::list_tree(&self.suppliers)?;
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    fn get_supplier(&self, id: &str) -> Result<Option<Supplier>> {
        Self::get_tree(&self.suppliers, id)
    }

    fn upsert_supplier(&self, supplier: &Supplier) -> Result<()> {
        log::debug!("upsert supplier {}", supplier.id);
        self.suppliers
            .insert(supplier.id.as_bytes(), Self::encode(supplier)?)?;
        Ok(())
    }

    fn delete_supplier(&self, id: &str) -> Result<()> {
        self.suppliers.remove(id.as_bytes())?;
        Ok(())
    }

    fn list_requests(&self) -> Result<Vec<PurchaseRequest>> {
        let mut rows: Vec<PurchaseRequest> = Self::list_tree(&self.requests)?;
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    fn get_request(&self, id: &str) -> Result<Option<PurchaseRequest>> {
        Self::get_tree(&self.requests, id)
    }

    fn upsert_request(&self, request: &PurchaseRequest) -> Result<()> {
        log::debug!("upsert request {} ({})", request.id, request.status);
        self.requests
            .insert(request.id.as_bytes(), Self::encode(request)?)?;
        Ok(())
    }

    fn delete_request(&self, id: &str) -> Result<()> {
        self.requests.remove(id.as_bytes())?;
        Ok(())
    }

    fn update_request_status(&self, id: &str, status: RequestStatus) -> Result<()> {
        let Some(mut request) = Self::get_tree::<PurchaseRequest>(&self.requests, id)? else {
            return Err(ProcurementError::not_found("request", id));
        };
        request.status = status;
        self.upsert_request(&request)
    }

    fn append_price_history(&self, entry: &PriceHistoryEntry) -> Result<()> {
        log::debug!(
            "append price history for request {} (product {})",
            entry.request_id,
            entry.product_id
        );
        self.price_history
            .insert(entry.request_id.as_bytes(), Self::encode(entry)?)?;
        Ok(())
    }

    fn list_price_history(&self) -> Result<Vec<PriceHistoryEntry>> {
        let mut rows: Vec<PriceHistoryEntry> = Self::list_tree(&self.price_history)?;
        rows.sort_by(|a, b| b.purchased_at.cmp(&a.purchased_at));
        Ok(rows)
    }
}
