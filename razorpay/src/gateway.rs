use crate::Result;
use serde::{Deserialize, Serialize};

/// Recipient info attached to a payment link.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Customer {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Notification channels the gateway should use for the link.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Notify {
    pub sms: bool,
    pub email: bool,
}

impl Default for Notify {
    fn default() -> Self {
        Self {
            sms: true,
            email: true,
        }
    }
}

/// Request body for creating a payment link.
/// Amount is denominated in the smallest currency unit.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct CreateLinkRequest {
    pub amount: i64,
    pub currency: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub customer: Customer,
    /// unix seconds after which the link stops accepting payments
    pub expire_by: i64,
    pub reference_id: String,
    pub notify: Notify,
    pub reminder_enable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub callback_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub callback_method: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<serde_json::Value>,
}

/// Payment recorded against a link.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct LinkPayment {
    pub payment_id: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub created_at: i64,
}

/// A gateway hosted payment link.
///
/// `status` is passed through verbatim. The gateway documents
/// `created | partially_paid | paid | cancelled | expired` but the set is not
/// treated as closed on this side.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct PaymentLink {
    pub id: String,
    pub status: String,
    pub amount: i64,
    #[serde(default)]
    pub currency: String,
    pub short_url: String,
    #[serde(default)]
    pub expire_by: i64,
    #[serde(default)]
    pub reference_id: String,
    #[serde(default)]
    pub created_at: i64,
    #[serde(default)]
    pub payments: Vec<LinkPayment>,
}

/// A captured payment.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Payment {
    pub id: String,
    pub amount: i64,
    #[serde(default)]
    pub currency: String,
    pub status: String,
    #[serde(default)]
    pub order_id: Option<String>,
    #[serde(default)]
    pub created_at: i64,
}

/// the gateway trait for multiple backends
#[async_trait::async_trait]
pub trait Gateway {
    async fn create_payment_link(&self, req: CreateLinkRequest) -> Result<PaymentLink>;
    async fn fetch_payment_link(&self, id: &str) -> Result<PaymentLink>;
    async fn fetch_payment(&self, id: &str) -> Result<Payment>;
}
