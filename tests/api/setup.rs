use crate::helpers::spawn_api;
use story_spoiler::authentication::AuthError;
use story_spoiler::story_client::StoryClientError;
use story_spoiler::suite;
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

#[tokio::test]
async fn rejected_credentials_abort_the_suite_before_any_story_request() {
    // Arrange
    let api = spawn_api().await;
    Mock::given(method("POST"))
        .and(path("/User/Authentication"))
        .respond_with(ResponseTemplate::new(401))
        .with_priority(1)
        .mount(&api.server)
        .await;

    // Act
    let outcome = suite::run(&api.settings).await;

    // Assert
    assert!(matches!(
        outcome,
        Err(StoryClientError::Authentication(AuthError::Rejected(_)))
    ));
    let requests = api.server.received_requests().await.unwrap();
    assert!(requests.iter().all(|r| !r.url.path().starts_with("/Story/")));
}

#[tokio::test]
async fn a_login_response_without_token_aborts_the_suite() {
    let api = spawn_api().await;
    Mock::given(method("POST"))
        .and(path("/User/Authentication"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "msg": "welcome" })),
        )
        .with_priority(1)
        .mount(&api.server)
        .await;

    let outcome = suite::run(&api.settings).await;

    assert!(matches!(
        outcome,
        Err(StoryClientError::Authentication(AuthError::MissingToken(_)))
    ));
}

#[tokio::test]
async fn an_unreachable_api_aborts_the_suite() {
    let api = spawn_api().await;
    let mut settings = api.settings.clone();
    // Nothing listens on port 9 of localhost
    settings.api.base_url = "http://127.0.0.1:9".into();

    let outcome = suite::run(&settings).await;

    assert!(matches!(
        outcome,
        Err(StoryClientError::Authentication(AuthError::RequestFailed(_)))
    ));
}
