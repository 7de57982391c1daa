use serde::Serialize;

/// Address exactly as Stripe reports it; every part may be missing or null.
#[derive(Debug, Clone, Default)]
pub struct AddressRaw {
    pub line1: Option<String>,
    pub line2: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
}

/// Fallback values for the address parts Mailchimp will not accept empty.
#[derive(serde::Deserialize, Debug, Clone, PartialEq)]
pub struct AddressDefaults {
    pub street: String,
    pub postal_code: String,
    pub country: String,
}

impl Default for AddressDefaults {
    fn default() -> Self {
        Self {
            street: "N/A".to_string(),
            postal_code: "00000".to_string(),
            country: "GB".to_string(),
        }
    }
}

/// Address in the shape of Mailchimp's `ADDRESS` merge field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MailingAddress {
    pub addr1: String,
    pub addr2: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub country: String,
}

impl MailingAddress {
    pub fn normalize(raw: Option<&AddressRaw>, defaults: &AddressDefaults) -> Self {
        let empty = AddressRaw::default();
        let raw = raw.unwrap_or(&empty);

        let addr1 = raw
            .line1
            .as_deref()
            .map(|line| line.trim_matches(|c: char| c.is_whitespace() || c == ','));

        Self {
            addr1: or_default(addr1, &defaults.street),
            addr2: or_empty(raw.line2.as_deref()),
            city: or_empty(raw.city.as_deref()),
            state: or_empty(raw.state.as_deref()),
            zip: or_default(raw.postal_code.as_deref(), &defaults.postal_code),
            country: or_default(raw.country.as_deref(), &defaults.country),
        }
    }
}

fn or_empty(value: Option<&str>) -> String {
    value.unwrap_or_default().to_string()
}

fn or_default(value: Option<&str>, default: &str) -> String {
    match value {
        Some(v) if !v.trim().is_empty() => v.to_string(),
        _ => default.to_string(),
    }
}
