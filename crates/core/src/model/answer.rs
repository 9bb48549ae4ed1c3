use serde::{Deserialize, Serialize};

use crate::model::{AnswerId, Content};

/// One candidate answer of a question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    id: AnswerId,
    title: String,
    is_correct: bool,
    reveal: Content,
}

impl Answer {
    #[must_use]
    pub fn new(id: AnswerId, title: impl Into<String>, is_correct: bool, reveal: Content) -> Self {
        Self {
            id,
            title: title.into(),
            is_correct,
            reveal,
        }
    }

    #[must_use]
    pub fn id(&self) -> AnswerId {
        self.id
    }

    /// Label shown on the answer button.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn is_correct(&self) -> bool {
        self.is_correct
    }

    /// Content shown when this answer is revealed.
    #[must_use]
    pub fn reveal(&self) -> &Content {
        &self.reveal
    }
}
