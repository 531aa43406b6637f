//! Caller input rules for the generate flow.

/// Inclusive bounds on description length, in characters after trimming.
pub const DESCRIPTION_MIN_CHARS: usize = 1;
pub const DESCRIPTION_MAX_CHARS: usize = 250;

pub const DESCRIPTION_EMPTY_MSG: &str = "Description cannot be empty.";
pub const DESCRIPTION_TOO_LONG_MSG: &str = "Description is too long.";

/// A schedule description that passed the length rules. Holds the trimmed text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleDescription(String);

impl ScheduleDescription {
    /// Validate `raw`. On failure returns every violated rule's message.
    pub fn parse(raw: &str) -> Result<Self, Vec<String>> {
        let trimmed = raw.trim();
        let chars = trimmed.chars().count();
        let mut reasons = Vec::new();
        if chars < DESCRIPTION_MIN_CHARS {
            reasons.push(DESCRIPTION_EMPTY_MSG.to_string());
        }
        if chars > DESCRIPTION_MAX_CHARS {
            reasons.push(DESCRIPTION_TOO_LONG_MSG.to_string());
        }
        if reasons.is_empty() {
            Ok(Self(trimmed.to_string()))
        } else {
            Err(reasons)
        }
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}
