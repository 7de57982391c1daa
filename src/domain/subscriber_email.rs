#[derive(Debug, Clone, PartialEq)]
pub struct SubscriberEmail(String);

impl SubscriberEmail {
    /// Accepts any non-blank address as-is. The list provider does its own
    /// format validation and reports rejects through the upsert response.
    pub fn parse(email: String) -> Result<Self, String> {
        if email.trim().is_empty() {
            Err("Email is empty".to_string())
        } else {
            Ok(Self(email))
        }
    }
}

impl AsRef<str> for SubscriberEmail {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SubscriberEmail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
