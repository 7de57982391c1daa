use crate::domain::AddressRaw;

/// Who paid, as far as the event payload tells us.
#[derive(Debug, Clone, Default)]
pub struct CustomerDetails {
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub address: Option<AddressRaw>,
}

/// Everything the subscriber mapping needs from one payment event.
#[derive(Debug, Clone, Default)]
pub struct PaymentDetails {
    pub customer: CustomerDetails,
    pub amount_minor_units: i64,
}
