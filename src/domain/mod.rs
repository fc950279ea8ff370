mod response_envelope;
mod story;
mod story_id;

pub use response_envelope::ResponseEnvelope;
pub use story::{Story, StoryPayload};
pub use story_id::StoryId;
