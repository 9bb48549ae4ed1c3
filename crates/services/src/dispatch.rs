//! Format dispatch and the view models handed to the presentation surface.

use quiz_core::CountdownProgress;
use quiz_core::model::{Answer, AnswerId, Content, Format, Question, RevealPolicy};

/// Which of the four content groups is on screen. Exactly one is visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Visibility {
    shown: Format,
}

impl Visibility {
    #[must_use]
    pub fn only(format: Format) -> Self {
        Self { shown: format }
    }

    /// Visibility for a raw server tag; unknown tags show the image group.
    #[must_use]
    pub fn for_tag(tag: &str) -> Self {
        Self::only(Format::from_tag(tag))
    }

    #[must_use]
    pub fn for_content(content: &Content) -> Self {
        Self::only(content.format())
    }

    #[must_use]
    pub fn shown(&self) -> Format {
        self.shown
    }

    #[must_use]
    pub fn is_visible(&self, group: Format) -> bool {
        self.shown == group
    }

    /// Every group with its visibility flag, in a fixed order.
    #[must_use]
    pub fn groups(&self) -> [(Format, bool); 4] {
        Format::ALL.map(|group| (group, self.is_visible(group)))
    }
}

/// A question ready to render.
#[derive(Debug, Clone, Copy)]
pub struct QuestionView<'a> {
    pub question: &'a Question,
    pub visibility: Visibility,
    pub countdown: CountdownProgress,
    /// Media questions can be skipped before they are answered.
    pub next_enabled: bool,
    /// 1-based position of this question in the quiz.
    pub position: usize,
    pub total: usize,
}

/// Correctness marks on the answer list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Marking {
    pub selected: AnswerId,
    pub selected_correct: bool,
    pub correct: AnswerId,
}

/// An answer reveal ready to render.
#[derive(Debug, Clone, Copy)]
pub struct RevealView<'a> {
    pub question: &'a Question,
    pub selected: &'a Answer,
    /// The answer whose reveal content is displayed.
    pub shown: &'a Answer,
    pub visibility: Visibility,
    /// Present only when feedback is immediate.
    pub marking: Option<Marking>,
}

/// Decide which answer's reveal content to show for `selected`.
///
/// Immediate feedback shows the correct answer's content, which is the selected
/// answer's own content when the pick was right. Deferred feedback always shows
/// the selected answer's content and marks nothing.
#[must_use]
pub fn reveal_target<'a>(
    question: &'a Question,
    selected: &'a Answer,
    policy: RevealPolicy,
) -> (&'a Answer, Option<Marking>) {
    match policy {
        RevealPolicy::Immediate => {
            let correct = question.correct_answer();
            let shown = if selected.is_correct() { selected } else { correct };
            let marking = Marking {
                selected: selected.id(),
                selected_correct: selected.is_correct(),
                correct: correct.id(),
            };
            (shown, Some(marking))
        }
        RevealPolicy::Deferred => (selected, None),
    }
}
