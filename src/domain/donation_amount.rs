/// Donation in major currency units, derived from Stripe's minor-unit integers.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
#[serde(transparent)]
pub struct DonationAmount(f64);

impl DonationAmount {
    pub fn from_minor_units(minor_units: i64) -> Self {
        Self(minor_units as f64 / 100.0)
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}
