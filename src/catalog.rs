//! Product and supplier catalog records
use crate::ids;
use crate::timestamp::TimeStamp;
use chrono::Utc;

/// Fixed unit-of-measure catalog for products.
#[derive(minicbor::Encode, minicbor::Decode, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    #[n(0)]
    Kg,
    #[n(1)]
    Gram,
    #[n(2)]
    Litre,
    #[n(3)]
    Piece,
    #[n(4)]
    Pack,
    #[n(5)]
    Box,
    #[n(6)]
    Case,
    #[n(7)]
    Sack,
    #[n(8)]
    Bucket,
    #[n(9)]
    Jar,
}

impl Unit {
    pub const ALL: [Unit; 10] = [
        Unit::Kg,
        Unit::Gram,
        Unit::Litre,
        Unit::Piece,
        Unit::Pack,
        Unit::Box,
        Unit::Case,
        Unit::Sack,
        Unit::Bucket,
        Unit::Jar,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Unit::Kg => "kg",
            Unit::Gram => "g",
            Unit::Litre => "l",
            Unit::Piece => "piece",
            Unit::Pack => "pack",
            Unit::Box => "box",
            Unit::Case => "case",
            Unit::Sack => "sack",
            Unit::Bucket => "bucket",
            Unit::Jar => "jar",
        }
    }

    pub fn parse(label: &str) -> Option<Unit> {
        Unit::ALL.iter().copied().find(|u| u.label() == label)
    }
}

/// Fixed service-area catalog for suppliers.
#[derive(
    minicbor::Encode, minicbor::Decode, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord,
)]
pub enum ServiceArea {
    #[n(0)]
    FreshProduce,
    #[n(1)]
    DryGoods,
    #[n(2)]
    FrozenFood,
    #[n(3)]
    MeatProducts,
    #[n(4)]
    Breakfast,
    #[n(5)]
    Pastry,
    #[n(6)]
    Bakery,
    #[n(7)]
    Cleaning,
}

impl ServiceArea {
    pub const ALL: [ServiceArea; 8] = [
        ServiceArea::FreshProduce,
        ServiceArea::DryGoods,
        ServiceArea::FrozenFood,
        ServiceArea::MeatProducts,
        ServiceArea::Breakfast,
        ServiceArea::Pastry,
        ServiceArea::Bakery,
        ServiceArea::Cleaning,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ServiceArea::FreshProduce => "fresh produce",
            ServiceArea::DryGoods => "dry goods",
            ServiceArea::FrozenFood => "frozen food",
            ServiceArea::MeatProducts => "meat products",
            ServiceArea::Breakfast => "breakfast",
            ServiceArea::Pastry => "pastry",
            ServiceArea::Bakery => "bakery",
            ServiceArea::Cleaning => "cleaning",
        }
    }

    pub fn parse(label: &str) -> Option<ServiceArea> {
        ServiceArea::ALL.iter().copied().find(|a| a.label() == label)
    }
}

#[derive(minicbor::Encode, minicbor::Decode, Debug, Clone, PartialEq)]
pub struct Product {
    #[n(0)]
    pub id: String,
    #[n(1)]
    pub name: String,
    #[n(2)]
    pub unit: Unit,
    #[n(3)]
    pub created_at: TimeStamp<Utc>,
}

impl Product {
    pub fn new(name: &str, unit: Unit) -> Self {
        Self {
            id: ids::product_id(),
            name: name.trim().to_string(),
            unit,
            created_at: TimeStamp::new(),
        }
    }
}

#[derive(minicbor::Encode, minicbor::Decode, Debug, Clone, PartialEq)]
pub struct Supplier {
    #[n(0)]
    pub id: String,
    #[n(1)]
    pub company_name: String,
    #[n(2)]
    pub phone: String,
    #[n(3)]
    pub contact_person: String,
    #[n(4)]
    pub email: String,
    #[n(5)]
    pub address: String,
    #[n(6)]
    pub service_areas: Vec<ServiceArea>,
    #[n(7)]
    pub created_at: TimeStamp<Utc>,
}

impl Supplier {
    pub fn new(company_name: &str) -> Self {
        Self {
            id: ids::supplier_id(),
            company_name: company_name.trim().to_string(),
            phone: String::new(),
            contact_person: String::new(),
            email: String::new(),
            address: String::new(),
            service_areas: vec![],
            created_at: TimeStamp::new(),
        }
    }

    pub fn with_contact(mut self, phone: &str, contact_person: &str, email: &str) -> Self {
        self.phone = phone.to_string();
        self.contact_person = contact_person.to_string();
        self.email = email.to_string();
        self
    }

    pub fn with_address(mut self, address: &str) -> Self {
        self.address = address.to_string();
        self
    }

    pub fn with_service_areas(mut self, areas: &[ServiceArea]) -> Self {
        self.service_areas = areas.to_vec();
        self.dedup_service_areas();
        self
    }

    /// Service areas are an unordered, deduplicated subset of the catalog.
    pub fn dedup_service_areas(&mut self) {
        self.service_areas.sort();
        self.service_areas.dedup();
    }
}

/// Requested and purchased quantities must be a positive, finite number.
pub fn is_positive_amount(amount: f64) -> bool {
    amount.is_finite() && amount > 0.0
}

/// Case-insensitive name collision check used for the uniqueness rules on
/// product and supplier names.
pub fn names_collide(a: &str, b: &str) -> bool {
    a.trim().to_lowercase() == b.trim().to_lowercase()
}
