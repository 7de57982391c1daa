use actix_web::HttpResponse;

const LIVENESS_MESSAGE: &str = "Stripe to Mailchimp Webhook is Running!";

pub async fn home() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .body(LIVENESS_MESSAGE)
}

pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().finish()
}
