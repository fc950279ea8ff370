use crate::domain::StoryId;

/// The small JSON object the Story API answers with.
///
/// The create endpoint spells the identifier `storyId` while other endpoints
/// use `storyid`. A body may carry both; `storyId` wins when it is usable.
#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct ResponseEnvelope {
    #[serde(default)]
    pub msg: Option<String>,
    #[serde(default, rename = "storyId")]
    pub story_id: Option<String>,
    #[serde(default, rename = "storyid")]
    pub story_id_lowercase: Option<String>,
}

impl ResponseEnvelope {
    pub fn story_id(&self) -> Option<StoryId> {
        let parse = |id: &Option<String>| id.clone().and_then(|id| StoryId::parse(id).ok());
        parse(&self.story_id).or_else(|| parse(&self.story_id_lowercase))
    }
}
