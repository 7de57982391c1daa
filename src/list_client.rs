use std::time::Duration;
use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use crate::domain::{MailingAddress, SubscriberRecord};

/// The outbound side of the relay: somewhere subscriber records can be upserted.
#[async_trait::async_trait]
pub trait SubscriberSink: Send + Sync {
    async fn upsert_subscriber(&self, record: &SubscriberRecord) -> Result<(), SubmissionError>;
}

#[derive(thiserror::Error, Debug)]
pub enum SubmissionError {
    #[error("List provider rejected the subscriber with status {status}: {body}")]
    UpstreamSubmissionFailed { status: StatusCode, body: String },
    #[error("Failed to reach the list provider")]
    Transport(#[from] reqwest::Error),
}

pub struct MailchimpClient {
    http_client: Client,
    base_url: String,
    list_id: String,
    api_key: SecretString,
    skip_merge_validation: bool,
}

impl MailchimpClient {
    /// `timeout` of `None` keeps reqwest's default behaviour.
    pub fn new(
        base_url: String,
        list_id: String,
        api_key: SecretString,
        skip_merge_validation: bool,
        timeout: Option<Duration>,
    ) -> Result<Self, reqwest::Error> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            http_client: builder.build()?,
            base_url,
            list_id,
            api_key,
            skip_merge_validation,
        })
    }

    /// Creates the list member. An address already on the list is answered with
    /// 400 `Member Exists` and surfaces as `UpstreamSubmissionFailed`.
    #[tracing::instrument(
        name = "Add subscriber to Mailchimp list",
        skip(self, record),
        fields(list_id = %self.list_id, subscriber_email = %record.email)
    )]
    pub async fn add_member(&self, record: &SubscriberRecord) -> Result<(), SubmissionError> {
        let address = format!("{}/lists/{}/members", self.base_url, self.list_id);
        let body = UpsertMemberRequest {
            email_address: record.email.as_ref(),
            status: SubscriberRecord::STATUS,
            merge_fields: MergeFields {
                fname: record.name.first(),
                lname: record.name.last(),
                donation: record.donation.value(),
                address: &record.address,
            },
        };

        let mut request = self.http_client
            .post(address)
            .bearer_auth(self.api_key.expose_secret())
            .json(&body);
        if self.skip_merge_validation {
            request = request.query(&[("skip_merge_validation", "true")]);
        }

        let response = request.send().await?;

        match response.status() {
            StatusCode::OK | StatusCode::NO_CONTENT => Ok(()),
            status => {
                let body = response.text().await.unwrap_or_default();
                Err(SubmissionError::UpstreamSubmissionFailed { status, body })
            }
        }
    }
}

#[async_trait::async_trait]
impl SubscriberSink for MailchimpClient {
    async fn upsert_subscriber(&self, record: &SubscriberRecord) -> Result<(), SubmissionError> {
        self.add_member(record).await
    }
}

#[derive(Serialize)]
struct UpsertMemberRequest<'a> {
    email_address: &'a str,
    status: &'a str,
    merge_fields: MergeFields<'a>,
}

#[derive(Serialize)]
#[serde(rename_all = "UPPERCASE")]
struct MergeFields<'a> {
    fname: &'a str,
    lname: &'a str,
    donation: f64,
    address: &'a MailingAddress,
}
