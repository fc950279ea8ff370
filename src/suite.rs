//! The ordered Story API suite.
//!
//! Steps run one after another against a single [`StoryClient`]. The only
//! state flowing between them is the identifier captured by the create step,
//! kept in a [`SuiteContext`] that is threaded through explicitly.

use crate::configuration::Settings;
use crate::domain::{StoryId, StoryPayload};
use crate::story_client::{ApiResponse, StoryClient, StoryClientError};
use crate::telemetry::error_chain_fmt;
use reqwest::StatusCode;

pub const NON_EXISTENT_STORY_ID: &str = "123";

pub const CREATED_TEXT: &str = "Successfully created!";
pub const EDITED_MSG: &str = "Successfully edited";
pub const DELETED_MSG: &str = "Deleted successfully!";
pub const NOT_FOUND_TEXT: &str = "No spoilers...";
pub const UNABLE_TO_DELETE_TEXT: &str = "Unable to delete this story spoiler!";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    CreateStory,
    EditCreatedStory,
    ListStories,
    DeleteCreatedStory,
    CreateStoryWithoutDescription,
    EditNonExistentStory,
    DeleteNonExistentStory,
    DeleteAlreadyDeletedStory,
}

impl Step {
    /// Execution order. Later steps read what `CreateStory` captured.
    pub const ORDER: [Step; 8] = [
        Step::CreateStory,
        Step::EditCreatedStory,
        Step::ListStories,
        Step::DeleteCreatedStory,
        Step::CreateStoryWithoutDescription,
        Step::EditNonExistentStory,
        Step::DeleteNonExistentStory,
        Step::DeleteAlreadyDeletedStory,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Step::CreateStory => "create_story_with_required_fields",
            Step::EditCreatedStory => "edit_created_story",
            Step::ListStories => "list_all_stories",
            Step::DeleteCreatedStory => "delete_created_story",
            Step::CreateStoryWithoutDescription => "create_story_without_description",
            Step::EditNonExistentStory => "edit_non_existent_story",
            Step::DeleteNonExistentStory => "delete_non_existent_story",
            Step::DeleteAlreadyDeletedStory => "delete_already_deleted_story",
        }
    }

    fn needs_created_story(&self) -> bool {
        matches!(
            self,
            Step::EditCreatedStory | Step::DeleteCreatedStory | Step::DeleteAlreadyDeletedStory
        )
    }
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// State shared between steps.
#[derive(Debug, Default)]
pub struct SuiteContext {
    pub created_story_id: Option<StoryId>,
}

#[derive(thiserror::Error)]
pub enum StepFailure {
    #[error("expected status {expected}, got {actual}")]
    UnexpectedStatus {
        expected: StatusCode,
        actual: StatusCode,
    },
    #[error("status {0} must not be returned here")]
    ForbiddenStatus(StatusCode),
    #[error("response body does not contain {0:?}")]
    MissingText(&'static str),
    #[error("expected message {expected:?}, got {actual:?}")]
    UnexpectedMessage {
        expected: &'static str,
        actual: Option<String>,
    },
    #[error("response carries no story identifier")]
    MissingStoryId,
    #[error("story list is empty")]
    EmptyStoryList,
    #[error("response body is not the expected JSON")]
    MalformedBody(#[source] serde_json::Error),
    #[error(transparent)]
    Request(#[from] StoryClientError),
}

impl std::fmt::Debug for StepFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

#[derive(Debug)]
pub enum StepOutcome {
    Passed,
    Failed(StepFailure),
    Skipped(&'static str),
}

#[derive(Debug)]
pub struct StepReport {
    pub step: Step,
    pub outcome: StepOutcome,
}

#[derive(Debug, Default)]
pub struct SuiteReport {
    pub steps: Vec<StepReport>,
}

impl SuiteReport {
    /// True when every step ran and passed.
    pub fn is_success(&self) -> bool {
        self.steps
            .iter()
            .all(|report| matches!(report.outcome, StepOutcome::Passed))
    }

    pub fn failures(&self) -> impl Iterator<Item = (Step, &StepFailure)> {
        self.steps.iter().filter_map(|report| match &report.outcome {
            StepOutcome::Failed(failure) => Some((report.step, failure)),
            _ => None,
        })
    }

    pub fn outcome_of(&self, step: Step) -> Option<&StepOutcome> {
        self.steps
            .iter()
            .find(|report| report.step == step)
            .map(|report| &report.outcome)
    }
}

impl std::fmt::Display for SuiteReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (mut passed, mut failed, mut skipped) = (0, 0, 0);
        for report in &self.steps {
            match &report.outcome {
                StepOutcome::Passed => {
                    passed += 1;
                    writeln!(f, "[PASS] {}", report.step)?;
                }
                StepOutcome::Failed(failure) => {
                    failed += 1;
                    writeln!(f, "[FAIL] {}: {}", report.step, failure)?;
                }
                StepOutcome::Skipped(reason) => {
                    skipped += 1;
                    writeln!(f, "[SKIP] {}: {}", report.step, reason)?;
                }
            }
        }
        write!(f, "{passed} passed, {failed} failed, {skipped} skipped")
    }
}

/// Log in with the configured credentials and run every step.
///
/// A failed login aborts before any step runs. The client is dropped once
/// the last step is done.
#[tracing::instrument(name = "Running story suite", skip_all)]
pub async fn run(settings: &Settings) -> Result<SuiteReport, StoryClientError> {
    let story_client = StoryClient::login(settings).await?;
    Ok(run_suite(&story_client).await)
}

pub async fn run_suite(story_client: &StoryClient) -> SuiteReport {
    let mut context = SuiteContext::default();
    let mut report = SuiteReport::default();
    for step in Step::ORDER {
        let outcome = run_step(step, story_client, &mut context).await;
        match &outcome {
            StepOutcome::Passed => tracing::info!(step = step.name(), "Step passed"),
            StepOutcome::Failed(failure) => {
                tracing::error!(step = step.name(), error = %failure, "Step failed")
            }
            StepOutcome::Skipped(reason) => {
                tracing::warn!(step = step.name(), reason, "Step skipped")
            }
        }
        report.steps.push(StepReport { step, outcome });
    }
    report
}

#[tracing::instrument(name = "Running suite step", skip(story_client, context), fields(step = %step))]
pub async fn run_step(
    step: Step,
    story_client: &StoryClient,
    context: &mut SuiteContext,
) -> StepOutcome {
    if step.needs_created_story() && context.created_story_id.is_none() {
        return StepOutcome::Skipped("no story was created earlier in the run");
    }
    let result = match step {
        Step::CreateStory => create_story(story_client, context).await,
        Step::EditCreatedStory => edit_created_story(story_client, context).await,
        Step::ListStories => list_stories(story_client).await,
        Step::DeleteCreatedStory => delete_created_story(story_client, context).await,
        Step::CreateStoryWithoutDescription => {
            create_story_without_description(story_client).await
        }
        Step::EditNonExistentStory => edit_non_existent_story(story_client).await,
        Step::DeleteNonExistentStory => delete_non_existent_story(story_client).await,
        Step::DeleteAlreadyDeletedStory => {
            delete_already_deleted_story(story_client, context).await
        }
    };
    match result {
        Ok(()) => StepOutcome::Passed,
        Err(failure) => StepOutcome::Failed(failure),
    }
}

fn expect_status(response: &ApiResponse, expected: StatusCode) -> Result<(), StepFailure> {
    if response.status == expected {
        Ok(())
    } else {
        Err(StepFailure::UnexpectedStatus {
            expected,
            actual: response.status,
        })
    }
}

fn expect_text(response: &ApiResponse, text: &'static str) -> Result<(), StepFailure> {
    if response.contains(text) {
        Ok(())
    } else {
        Err(StepFailure::MissingText(text))
    }
}

fn expect_msg(response: &ApiResponse, expected: &'static str) -> Result<(), StepFailure> {
    let envelope = response.envelope().map_err(StepFailure::MalformedBody)?;
    if envelope.msg.as_deref() == Some(expected) {
        Ok(())
    } else {
        Err(StepFailure::UnexpectedMessage {
            expected,
            actual: envelope.msg,
        })
    }
}

// Only called after `run_step` checked the context.
fn created_story_id(context: &SuiteContext) -> Result<&StoryId, StepFailure> {
    context
        .created_story_id
        .as_ref()
        .ok_or(StepFailure::MissingStoryId)
}

async fn create_story(
    story_client: &StoryClient,
    context: &mut SuiteContext,
) -> Result<(), StepFailure> {
    let payload = StoryPayload::new("new story", "New amazing story", "");
    let response = story_client.create_story(&payload).await?;
    expect_status(&response, StatusCode::CREATED)?;
    let story_id = response
        .envelope()
        .map_err(StepFailure::MalformedBody)?
        .story_id()
        .ok_or(StepFailure::MissingStoryId)?;
    tracing::info!(story_id = %story_id, "Captured created story");
    context.created_story_id = Some(story_id);
    expect_text(&response, CREATED_TEXT)
}

async fn edit_created_story(
    story_client: &StoryClient,
    context: &SuiteContext,
) -> Result<(), StepFailure> {
    let story_id = created_story_id(context)?;
    let payload = StoryPayload::new(
        "Edited Story",
        "This is an updated test story description",
        "",
    );
    let response = story_client
        .edit_story(story_id.as_ref(), &payload)
        .await?;
    expect_status(&response, StatusCode::OK)?;
    expect_msg(&response, EDITED_MSG)
}

async fn list_stories(story_client: &StoryClient) -> Result<(), StepFailure> {
    let response = story_client.list_stories().await?;
    expect_status(&response, StatusCode::OK)?;
    let stories = response.stories().map_err(StepFailure::MalformedBody)?;
    if stories.is_empty() {
        return Err(StepFailure::EmptyStoryList);
    }
    Ok(())
}

async fn delete_created_story(
    story_client: &StoryClient,
    context: &SuiteContext,
) -> Result<(), StepFailure> {
    let story_id = created_story_id(context)?;
    let response = story_client.delete_story(story_id.as_ref()).await?;
    expect_status(&response, StatusCode::OK)?;
    expect_msg(&response, DELETED_MSG)
}

async fn create_story_without_description(story_client: &StoryClient) -> Result<(), StepFailure> {
    let response = story_client
        .create_story(&StoryPayload::title_only("new title"))
        .await?;
    expect_status(&response, StatusCode::BAD_REQUEST)
}

async fn edit_non_existent_story(story_client: &StoryClient) -> Result<(), StepFailure> {
    let payload = StoryPayload::new(
        "Edited Non-Existing Story",
        "This is an updated test description for a non-existing story.",
        "",
    );
    let response = story_client
        .edit_story(NON_EXISTENT_STORY_ID, &payload)
        .await?;
    expect_status(&response, StatusCode::NOT_FOUND)?;
    expect_text(&response, NOT_FOUND_TEXT)
}

async fn delete_non_existent_story(story_client: &StoryClient) -> Result<(), StepFailure> {
    let response = story_client.delete_story(NON_EXISTENT_STORY_ID).await?;
    expect_status(&response, StatusCode::BAD_REQUEST)?;
    expect_text(&response, UNABLE_TO_DELETE_TEXT)
}

async fn delete_already_deleted_story(
    story_client: &StoryClient,
    context: &SuiteContext,
) -> Result<(), StepFailure> {
    let story_id = created_story_id(context)?;
    let response = story_client.delete_story(story_id.as_ref()).await?;
    if response.status == StatusCode::OK {
        return Err(StepFailure::ForbiddenStatus(response.status));
    }
    Ok(())
}
