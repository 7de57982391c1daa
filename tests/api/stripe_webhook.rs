use serde_json::{json, Value};
use wiremock::matchers::{any, header, method, path, query_param};
use wiremock::{Mock, ResponseTemplate};
use donor_sync::webhook::sign_payload;
use crate::helpers::{checkout_completed, spawn_app, LIST_ID, WEBHOOK_SECRET};

#[tokio::test]
async fn completed_checkout_is_upserted_into_the_list() {
    let app = spawn_app().await;

    Mock::given(method("POST"))
        .and(path(format!("/lists/{}/members", LIST_ID)))
        .and(query_param("skip_merge_validation", "true"))
        .and(header("Content-Type", "application/json"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&app.mailchimp_server)
        .await;

    let event = checkout_completed(
        json!({
            "email": "jane@example.com",
            "name": "Jane Doe",
            "address": {
                "line1": "1 High Street,",
                "line2": null,
                "city": "Leeds",
                "state": null,
                "postal_code": "LS1 1AA",
                "country": "GB"
            }
        }),
        2500,
    );
    let response = app.post_signed_event(&event).await;

    assert_eq!(200, response.status().as_u16());
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], "success");

    let requests = app.mailchimp_server.received_requests().await.unwrap();
    let upsert: Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(upsert["email_address"], "jane@example.com");
    assert_eq!(upsert["status"], "subscribed");
    assert_eq!(upsert["merge_fields"]["FNAME"], "Jane");
    assert_eq!(upsert["merge_fields"]["LNAME"], "Doe");
    assert_eq!(upsert["merge_fields"]["DONATION"], 25.0);
    assert_eq!(
        upsert["merge_fields"]["ADDRESS"],
        json!({
            "addr1": "1 High Street",
            "addr2": "",
            "city": "Leeds",
            "state": "",
            "zip": "LS1 1AA",
            "country": "GB"
        })
    );
}

#[tokio::test]
async fn address_with_only_a_city_gets_defaults() {
    let app = spawn_app().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&app.mailchimp_server)
        .await;

    let event = checkout_completed(
        json!({"email": "madonna@example.com", "name": "Madonna", "address": {"city": "Bath"}}),
        1000,
    );
    let response = app.post_signed_event(&event).await;

    assert_eq!(200, response.status().as_u16());
    let requests = app.mailchimp_server.received_requests().await.unwrap();
    let upsert: Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(upsert["merge_fields"]["FNAME"], "Madonna");
    assert_eq!(upsert["merge_fields"]["LNAME"], "");
    assert_eq!(
        upsert["merge_fields"]["ADDRESS"],
        json!({
            "addr1": "N/A",
            "addr2": "",
            "city": "Bath",
            "state": "",
            "zip": "00000",
            "country": "GB"
        })
    );
}

#[tokio::test]
async fn succeeded_charge_is_upserted_into_the_list() {
    let app = spawn_app().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&app.mailchimp_server)
        .await;

    let event = json!({
        "id": "evt_test_charge",
        "type": "charge.succeeded",
        "data": {"object": {
            "amount": 550,
            "receipt_email": "receipt@example.com",
            "billing_details": {"email": null, "name": null, "address": null}
        }}
    });
    let response = app.post_signed_event(&event).await;

    assert_eq!(200, response.status().as_u16());
    let requests = app.mailchimp_server.received_requests().await.unwrap();
    let upsert: Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(upsert["email_address"], "receipt@example.com");
    assert_eq!(upsert["merge_fields"]["FNAME"], "Unknown");
    assert_eq!(upsert["merge_fields"]["DONATION"], 5.5);
}

#[tokio::test]
async fn unhandled_event_types_are_ignored() {
    let app = spawn_app().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.mailchimp_server)
        .await;

    let event = json!({
        "id": "evt_test_invoice",
        "type": "invoice.paid",
        "data": {"object": {"customer_email": "jane@example.com", "amount_paid": 2500}}
    });
    let response = app.post_signed_event(&event).await;

    assert_eq!(200, response.status().as_u16());
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], "ignored");
}

#[tokio::test]
async fn event_without_email_is_skipped() {
    let app = spawn_app().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.mailchimp_server)
        .await;

    let test_cases = vec![
        (json!({"email": "", "name": "Jane Doe"}), "empty email"),
        (json!({"email": null, "name": "Jane Doe"}), "null email"),
        (json!({"name": "Jane Doe"}), "missing email"),
        (Value::Null, "missing customer details"),
    ];

    for (customer_details, description) in test_cases {
        let response = app.post_signed_event(&checkout_completed(customer_details, 100)).await;

        assert_eq!(200, response.status().as_u16(), "The API did not return 200 OK for {}.", description);
        let body: Value = response.json().await.unwrap();
        assert_eq!(body["status"], "skipped", "Unexpected status for {}.", description);
    }
}

#[tokio::test]
async fn invalid_signatures_are_rejected_with_400() {
    let app = spawn_app().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.mailchimp_server)
        .await;

    let body = checkout_completed(json!({"email": "jane@example.com"}), 100).to_string();
    let now = chrono::Utc::now().timestamp();
    let test_cases = vec![
        (None, "missing signature header"),
        (Some("garbage".to_string()), "unparsable signature header"),
        (
            Some(sign_payload("whsec_someone_else", body.as_bytes(), now).unwrap()),
            "signature from another secret",
        ),
        (
            Some(sign_payload(WEBHOOK_SECRET, b"{}", now).unwrap()),
            "signature for another payload",
        ),
        (
            Some(sign_payload(WEBHOOK_SECRET, body.as_bytes(), now - 3600).unwrap()),
            "expired timestamp",
        ),
    ];

    for (signature, description) in test_cases {
        let response = app.post_webhook(body.clone(), signature).await;

        assert_eq!(400, response.status().as_u16(), "The API did not return 400 for {}.", description);
        let error: Value = response.json().await.unwrap();
        assert_eq!(error["error"], "Invalid signature", "Unexpected error for {}.", description);
    }
}

#[tokio::test]
async fn malformed_payload_is_rejected_with_400() {
    let app = spawn_app().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.mailchimp_server)
        .await;

    let test_cases = vec![
        ("not json at all", "non-JSON body"),
        (r#"{"id": "evt_1", "data": {}}"#, "event without type"),
        ("[1, 2, 3]", "JSON that is not an event"),
    ];

    for (body, description) in test_cases {
        let signature = sign_payload(WEBHOOK_SECRET, body.as_bytes(), chrono::Utc::now().timestamp()).unwrap();
        let response = app.post_webhook(body.to_string(), Some(signature)).await;

        assert_eq!(400, response.status().as_u16(), "The API did not return 400 for {}.", description);
        let error: Value = response.json().await.unwrap();
        assert_eq!(error["error"], "Invalid payload", "Unexpected error for {}.", description);
    }
}

#[tokio::test]
async fn list_provider_failure_still_acknowledges_the_webhook() {
    let app = spawn_app().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({"title": "Member Exists"})))
        .expect(1)
        .mount(&app.mailchimp_server)
        .await;

    let event = checkout_completed(json!({"email": "jane@example.com", "name": "Jane Doe"}), 2500);
    let response = app.post_signed_event(&event).await;

    assert_eq!(200, response.status().as_u16());
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], "success");
}
