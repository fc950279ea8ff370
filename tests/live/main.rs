#![cfg(feature = "live-tests")]

//! Runs the ordered suite against the real Story API.
//!
//! Build with: cargo test --test live --features live-tests
//! The target and credentials come from `configuration/` and `APP_*` variables.

use std::sync::LazyLock;
use story_spoiler::configuration::get_configuration;
use story_spoiler::suite::{self, Step, StepOutcome};
use story_spoiler::telemetry::{get_subscriber, init_subscriber};

static TRACING: LazyLock<()> = LazyLock::new(|| {
    let loglevel = std::env::var("LOGLEVEL").unwrap_or("info".to_string());
    if std::env::var("TEST_LOG").is_ok() {
        init_subscriber(get_subscriber("live".into(), loglevel, std::io::stdout));
    } else {
        init_subscriber(get_subscriber("live".into(), loglevel, std::io::sink));
    }
});

// The steps share state and must not be split into parallel tests.
#[tokio::test]
async fn story_crud_suite_passes_against_the_live_api() {
    LazyLock::force(&TRACING);
    let configuration = get_configuration().expect("Failed to read configuration.");

    let report = suite::run(&configuration)
        .await
        .expect("Failed to log in to the Story API.");

    println!("{}", report);
    assert!(matches!(
        report.outcome_of(Step::CreateStory),
        Some(StepOutcome::Passed)
    ));
    assert!(report.is_success(), "{}", report);
}
