/// Server-assigned identifier of a story.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoryId(String);

impl StoryId {
    /// Returns an instance of `StoryId` if the input is not blank.
    pub fn parse(s: String) -> Result<StoryId, String> {
        if s.trim().is_empty() {
            Err("Story identifier is empty.".to_string())
        } else {
            Ok(Self(s))
        }
    }
}

impl AsRef<str> for StoryId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for StoryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}
