pub mod authentication;
pub mod configuration;
pub mod domain;
pub mod story_client;
pub mod suite;
pub mod telemetry;
