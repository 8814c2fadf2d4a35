//! Prefixed identifier generation for catalog and workflow records
//!
//! Identifiers are uuid7 values encoded as bech32 strings with a
//! human-readable prefix, so a product id reads `prod_1...` and a
//! request id `req_1...`.

use bech32::Bech32m;
use uuid7::uuid7;

pub const PRODUCT_HRP: &str = "prod_";
pub const SUPPLIER_HRP: &str = "sup_";
pub const REQUEST_HRP: &str = "req_";

// construct a unique id from an arbitrary prefix then encode using bech32
pub fn new_prefixed_id(hrp: &str) -> anyhow::Result<String> {
    let hrp = bech32::Hrp::parse(hrp)?;
    let encode = bech32::encode::<Bech32m>(hrp, uuid7().as_bytes())?;
    Ok(encode)
}

/// Fresh product id.
pub fn product_id() -> String {
    known_prefix_id(PRODUCT_HRP)
}

/// Fresh supplier id.
pub fn supplier_id() -> String {
    known_prefix_id(SUPPLIER_HRP)
}

/// Fresh purchase-request id.
pub fn request_id() -> String {
    known_prefix_id(REQUEST_HRP)
}

// The constant prefixes above are known-valid hrps, and a uuid payload
// never exceeds the bech32 length limit.
fn known_prefix_id(hrp: &str) -> String {
    new_prefixed_id(hrp).expect("constant hrp must encode")
}
