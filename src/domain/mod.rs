mod customer_details;
mod donation_amount;
mod mailing_address;
mod subscriber_email;
mod subscriber_name;
mod subscriber_record;

pub use customer_details::{CustomerDetails, PaymentDetails};
pub use donation_amount::DonationAmount;
pub use mailing_address::{AddressDefaults, AddressRaw, MailingAddress};
pub use subscriber_email::SubscriberEmail;
pub use subscriber_name::SubscriberName;
pub use subscriber_record::SubscriberRecord;
