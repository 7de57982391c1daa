/// Used when the payment carries no cardholder name at all.
pub const UNKNOWN_NAME: &str = "Unknown";

#[derive(Debug, Clone, PartialEq)]
pub struct SubscriberName {
    first: String,
    last: String,
}

impl SubscriberName {
    /// Splits a full name on its first run of whitespace. Everything after
    /// that run becomes the last name.
    pub fn from_full_name(full_name: Option<&str>) -> Self {
        let full_name = match full_name.map(str::trim) {
            Some(name) if !name.is_empty() => name,
            _ => UNKNOWN_NAME,
        };

        match full_name.split_once(char::is_whitespace) {
            Some((first, rest)) => Self {
                first: first.to_string(),
                last: rest.trim_start().to_string(),
            },
            None => Self {
                first: full_name.to_string(),
                last: String::new(),
            },
        }
    }

    pub fn first(&self) -> &str {
        &self.first
    }

    pub fn last(&self) -> &str {
        &self.last
    }
}
