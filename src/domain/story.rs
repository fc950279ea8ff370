use serde::{Deserialize, Serialize};

/// Request body for `POST /Story/Create` and `PUT /Story/Edit/{id}`.
///
/// Absent optionals are left out of the JSON body altogether, which is how
/// the validation-failure case sends a story without a description.
#[derive(Debug, Clone, Serialize)]
pub struct StoryPayload {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl StoryPayload {
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            description: Some(description.into()),
            url: Some(url.into()),
        }
    }

    pub fn title_only(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            url: None,
        }
    }
}

/// One entry of `GET /Story/All`. Every field is optional since the suite
/// only asserts on the size of the collection.
#[derive(Debug, Clone, Deserialize)]
pub struct Story {
    #[serde(default, rename = "storyId")]
    pub story_id: Option<String>,
    #[serde(default, rename = "storyid")]
    pub story_id_lowercase: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

impl Story {
    pub fn id(&self) -> Option<&str> {
        self.story_id
            .as_deref()
            .or(self.story_id_lowercase.as_deref())
    }
}
