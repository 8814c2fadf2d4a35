//! End-to-end walk through the procurement workflow against a local
//! sled database: catalog setup, request lifecycle, recommendations and
//! order-message formatting.

use kitchen_procurement::catalog::{Product, ServiceArea, Supplier, Unit};
use kitchen_procurement::dispatch::{
    Channel, NotificationDispatcher, format_for_email, format_for_messaging,
};
use kitchen_procurement::request::RequestDraft;
use kitchen_procurement::service::ProcurementService;
use kitchen_procurement::store::SledStore;

/// Stand-in for the real messaging/e-mail channel: prints the payload.
struct ConsoleDispatcher;

impl NotificationDispatcher for ConsoleDispatcher {
    fn send(&self, channel: Channel, contact: &str, message: &str) {
        println!("--> {channel:?} to {contact}:\n{message}");
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let dir = tempfile::tempdir()?;
    let service = ProcurementService::new(SledStore::open(dir.path().join("procurement.db"))?);

    // catalog
    let tomato = service.save_product(Product::new("Tomato", Unit::Kg))?;
    let flour = service.save_product(Product::new("Flour", Unit::Sack))?;

    let abc = service.save_supplier(
        Supplier::new("ABC Foods")
            .with_contact("+90 555 000 0001", "Ayla", "orders@abcfoods.example")
            .with_service_areas(&[ServiceArea::FreshProduce, ServiceArea::DryGoods]),
    )?;

    // one request goes through the full lifecycle to seed price history
    let seed = service.create_request(RequestDraft::new().product(&tomato.id).amount(10.0))?;
    service.mark_ordered(&seed.id)?;
    service.receive_request(&seed.id, &abc.id, 12.5, 20.0)?;

    // fresh pending requests to recommend on
    service.create_request(
        RequestDraft::new()
            .product(&tomato.id)
            .amount(4.0)
            .brand("Sunfield"),
    )?;
    service.create_request(RequestDraft::new().product(&flour.id).amount(2.0))?;

    let dispatcher = ConsoleDispatcher;
    let suppliers = service.suppliers()?;

    let grouping = service.recommendations()?;
    for (supplier_id, group) in &grouping.groups {
        println!(
            "supplier {} ({}): {} request(s)",
            group.offer.supplier_name,
            supplier_id,
            group.requests.len()
        );

        // whether to dispatch on an empty contact is the caller's call
        let contact = suppliers
            .iter()
            .find(|s| &s.id == supplier_id)
            .map(|s| s.phone.clone())
            .unwrap_or_default();
        dispatcher.send(Channel::Messaging, &contact, &format_for_messaging(group));

        let email = format_for_email(group);
        println!("subject: {}\n{}", email.subject, email.body);
    }
    for request in &grouping.unassigned {
        println!("no price data yet for {}", request.product_name);
    }

    println!("{:#?}", service.summary()?);

    Ok(())
}
