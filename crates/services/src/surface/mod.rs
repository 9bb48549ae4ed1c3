//! Capabilities the controller drives. Hosts implement these for their UI toolkit.

mod media;
mod report;

pub use media::{DirectProxy, MediaPlaybackSurface, MediaProxy, MediaSlot, ProxiedMediaSurface};
pub use report::{ErrorReporter, LogErrorReporter, LogNotifier, Notifier};

use quiz_core::CountdownProgress;
use quiz_core::model::QuizSummary;

use crate::dispatch::{QuestionView, RevealView};

/// Renders controller state. Every call replaces what the previous call showed
/// for the same area of the screen.
pub trait PresentationSurface: Send + Sync {
    /// Show a question with exactly one content group visible.
    fn show_question(&self, view: &QuestionView<'_>);

    fn show_countdown(&self, progress: CountdownProgress);

    /// Show the revealed answer content below the question.
    fn show_reveal(&self, view: &RevealView<'_>);

    fn set_answers_enabled(&self, enabled: bool);

    fn set_next_enabled(&self, enabled: bool);

    /// Toggle the play/pause affordance of an audio slot.
    fn set_audio_playing(&self, slot: MediaSlot, playing: bool);

    fn show_complete(&self, summary: &QuizSummary);
}
