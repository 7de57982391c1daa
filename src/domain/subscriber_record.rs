use crate::domain::{DonationAmount, MailingAddress, SubscriberEmail, SubscriberName};

#[derive(Debug, Clone, PartialEq)]
pub struct SubscriberRecord {
    pub email: SubscriberEmail,
    pub name: SubscriberName,
    pub donation: DonationAmount,
    pub address: MailingAddress,
}

impl SubscriberRecord {
    /// Records are always upserted as active subscribers.
    pub const STATUS: &'static str = "subscribed";
}
