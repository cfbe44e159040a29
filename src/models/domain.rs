use serde::{Deserialize, Serialize};

/// Point-in-time copy of a postal address. Every field may be unknown.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AddressSnapshot {
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub district: Option<String>,
    #[serde(rename = "postalCode", default)]
    pub postal_code: Option<String>,
    #[serde(rename = "addressLine1", default)]
    pub address_line1: Option<String>,
    #[serde(rename = "addressLine2", default)]
    pub address_line2: Option<String>,
    #[serde(rename = "fullName", default)]
    pub full_name: Option<String>,
}

/// Per-channel order summary. Carried through to the oracle as context only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelSummary {
    pub channel: String,
    #[serde(rename = "ordersCount")]
    pub orders_count: i64,
    #[serde(rename = "totalAmount")]
    pub total_amount: f64,
    pub currency: String,
}

/// One customer's identity snapshot being compared
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateRecord {
    #[serde(rename = "customerId")]
    pub customer_id: String,
    #[serde(rename = "firstName", default)]
    pub first_name: Option<String>,
    #[serde(rename = "lastName", default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub channels: Vec<ChannelSummary>,
    #[serde(rename = "shippingAddress", default)]
    pub shipping_address: Option<AddressSnapshot>,
    #[serde(rename = "billingAddress", default)]
    pub billing_address: Option<AddressSnapshot>,
}

impl CandidateRecord {
    /// Record with only an identifier set
    pub fn new(customer_id: impl Into<String>) -> Self {
        Self {
            customer_id: customer_id.into(),
            first_name: None,
            last_name: None,
            channels: Vec::new(),
            shipping_address: None,
            billing_address: None,
        }
    }

    /// Address used for comparison: shipping if present, else billing
    pub fn effective_address(&self) -> Option<&AddressSnapshot> {
        self.shipping_address
            .as_ref()
            .or(self.billing_address.as_ref())
    }
}
