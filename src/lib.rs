pub mod configuration;
pub mod domain;
pub mod list_client;
pub mod routes;
pub mod startup;
pub mod subscriber_mapper;
pub mod telemetry;
pub mod webhook;
