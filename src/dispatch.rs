//! Order-message formatting for the notification channel
//!
//! Pure formatting only. Handing the rendered payload to a messaging or
//! e-mail channel is the dispatcher's job; delivery failures never feed
//! back into domain state.

use crate::grouping::SupplierGroup;
use crate::request::PurchaseRequest;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Messaging,
    Email,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub subject: String,
    pub body: String,
}

/// External channel collaborator. Fire-and-forget from the core's
/// perspective.
pub trait NotificationDispatcher {
    fn send(&self, channel: Channel, contact: &str, message: &str);
}

/// Renders a supplier group as a short messaging-channel order list.
pub fn format_for_messaging(group: &SupplierGroup) -> String {
    let mut message = String::from("Order list:\n\n");
    for request in &group.requests {
        message.push_str(&format!("- {}\n", messaging_line(request)));
    }
    message
}

/// Renders a supplier group as an e-mail subject and body.
pub fn format_for_email(group: &SupplierGroup) -> EmailMessage {
    let mut body = String::from(
        "Dear supplier,\n\nWe would like to place an order for the following items:\n\n",
    );
    for request in &group.requests {
        body.push_str(&format!("- {}\n", email_line(request)));
    }
    body.push_str("\nBest regards.\n");

    EmailMessage {
        subject: "Purchase order request".to_string(),
        body,
    }
}

fn messaging_line(request: &PurchaseRequest) -> String {
    match &request.brand {
        Some(brand) if !brand.trim().is_empty() => {
            format!("{} ({}) [{}]", request.product_name, request.amount, brand)
        }
        _ => format!("{} ({})", request.product_name, request.amount),
    }
}

fn email_line(request: &PurchaseRequest) -> String {
    match &request.brand {
        Some(brand) if !brand.trim().is_empty() => format!(
            "{}: {} (brand: {})",
            request.product_name, request.amount, brand
        ),
        _ => format!("{}: {}", request.product_name, request.amount),
    }
}
