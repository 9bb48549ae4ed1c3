#![allow(dead_code)]

use std::collections::HashSet;
use std::error::Error;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use quiz_core::CountdownProgress;
use quiz_core::model::{
    Answer, AnswerId, Content, Format, MediaUri, Question, QuestionDraft, QuestionId, QuizSummary,
};
use services::{
    CountdownScheduler, ErrorReporter, Marking, MediaPlaybackSurface, MediaSlot, Notifier,
    PlaybackError, PresentationSurface, QuestionView, QuizCollaborators, QuizController,
    RevealView, TimerTicket,
};

/// Every effect the controller produced, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Question {
        id: QuestionId,
        shown: Format,
        next_enabled: bool,
        max_secs: u64,
    },
    Countdown(CountdownProgress),
    Reveal {
        question: QuestionId,
        selected: AnswerId,
        shown: AnswerId,
        content: Content,
        visible: Format,
        marking: Option<Marking>,
    },
    AnswersEnabled(bool),
    NextEnabled(bool),
    AudioPlaying(MediaSlot, bool),
    Complete(QuizSummary),
    Load(MediaSlot, String),
    Play(MediaSlot),
    Pause(MediaSlot),
    Resume(MediaSlot),
    Release(MediaSlot),
    TimerStart(TimerTicket, Duration),
    TimerCancel(TimerTicket),
    Error(String),
    Notify(String),
}

/// Fake for every collaborator, recording into one shared log.
#[derive(Default)]
pub struct Recorder {
    calls: Mutex<Vec<Call>>,
    failing_loads: Mutex<HashSet<MediaSlot>>,
    failing_releases: Mutex<HashSet<MediaSlot>>,
}

impl Recorder {
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.calls.lock().unwrap().clear();
    }

    pub fn fail_load(&self, slot: MediaSlot) {
        self.failing_loads.lock().unwrap().insert(slot);
    }

    pub fn fail_release(&self, slot: MediaSlot) {
        self.failing_releases.lock().unwrap().insert(slot);
    }

    pub fn reveals(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| matches!(c, Call::Reveal { .. }))
            .collect()
    }

    pub fn timer_calls(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| matches!(c, Call::TimerStart(..) | Call::TimerCancel(_)))
            .collect()
    }

    pub fn errors(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Error(context) => Some(context),
                _ => None,
            })
            .collect()
    }

    fn push(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

impl PresentationSurface for Recorder {
    fn show_question(&self, view: &QuestionView<'_>) {
        self.push(Call::Question {
            id: view.question.id(),
            shown: view.visibility.shown(),
            next_enabled: view.next_enabled,
            max_secs: view.countdown.max_secs,
        });
    }

    fn show_countdown(&self, progress: CountdownProgress) {
        self.push(Call::Countdown(progress));
    }

    fn show_reveal(&self, view: &RevealView<'_>) {
        self.push(Call::Reveal {
            question: view.question.id(),
            selected: view.selected.id(),
            shown: view.shown.id(),
            content: view.shown.reveal().clone(),
            visible: view.visibility.shown(),
            marking: view.marking,
        });
    }

    fn set_answers_enabled(&self, enabled: bool) {
        self.push(Call::AnswersEnabled(enabled));
    }

    fn set_next_enabled(&self, enabled: bool) {
        self.push(Call::NextEnabled(enabled));
    }

    fn set_audio_playing(&self, slot: MediaSlot, playing: bool) {
        self.push(Call::AudioPlaying(slot, playing));
    }

    fn show_complete(&self, summary: &QuizSummary) {
        self.push(Call::Complete(*summary));
    }
}

impl MediaPlaybackSurface for Recorder {
    fn load(&self, slot: MediaSlot, uri: &MediaUri) -> Result<(), PlaybackError> {
        self.push(Call::Load(slot, uri.to_string()));
        if self.failing_loads.lock().unwrap().contains(&slot) {
            return Err(PlaybackError::Load {
                uri: uri.to_string(),
                reason: "unsupported codec".into(),
            });
        }
        Ok(())
    }

    fn play(&self, slot: MediaSlot) -> Result<(), PlaybackError> {
        self.push(Call::Play(slot));
        Ok(())
    }

    fn pause(&self, slot: MediaSlot) -> Result<(), PlaybackError> {
        self.push(Call::Pause(slot));
        Ok(())
    }

    fn resume(&self, slot: MediaSlot) -> Result<(), PlaybackError> {
        self.push(Call::Resume(slot));
        Ok(())
    }

    fn release(&self, slot: MediaSlot) -> Result<(), PlaybackError> {
        self.push(Call::Release(slot));
        if self.failing_releases.lock().unwrap().contains(&slot) {
            return Err(PlaybackError::Release {
                slot,
                reason: "player already gone".into(),
            });
        }
        Ok(())
    }
}

impl CountdownScheduler for Recorder {
    fn start(&self, ticket: TimerTicket, duration: Duration) {
        self.push(Call::TimerStart(ticket, duration));
    }

    fn cancel(&self, ticket: TimerTicket) {
        self.push(Call::TimerCancel(ticket));
    }
}

impl ErrorReporter for Recorder {
    fn report(&self, context: &str, _error: &dyn Error) {
        self.push(Call::Error(context.to_string()));
    }
}

impl Notifier for Recorder {
    fn notify(&self, message: &str) {
        self.push(Call::Notify(message.to_string()));
    }
}

pub fn collaborators(recorder: &Arc<Recorder>) -> QuizCollaborators {
    QuizCollaborators {
        presentation: recorder.clone(),
        media: recorder.clone(),
        timers: recorder.clone(),
        errors: recorder.clone(),
        notifier: recorder.clone(),
    }
}

pub fn harness() -> (QuizController, Arc<Recorder>) {
    let recorder = Arc::new(Recorder::default());
    (QuizController::new(collaborators(&recorder)), recorder)
}

pub fn text(body: &str) -> Content {
    Content::text(body).unwrap()
}

pub fn media(format: Format, url: &str) -> Content {
    Content::media(format, MediaUri::parse(url).unwrap())
}

pub fn answer(id: u64, correct: bool, reveal: Content) -> Answer {
    Answer::new(AnswerId::new(id), format!("answer {id}"), correct, reveal)
}

pub fn question(id: u64, content: Content, duration_secs: u32, answers: Vec<Answer>) -> Question {
    QuestionDraft {
        id: QuestionId::new(id),
        title: format!("question {id}"),
        content,
        duration_secs,
        answers,
    }
    .validate()
    .unwrap()
}

/// Text question whose answers are `[A (wrong), B (correct)]` with ids 1 and 2.
pub fn text_question(id: u64) -> Question {
    question(
        id,
        text(&format!("question {id}")),
        10,
        vec![
            answer(1, false, text("A is wrong")),
            answer(2, true, text("B is right")),
        ],
    )
}

pub fn text_questions(n: u64) -> Vec<Question> {
    (1..=n).map(text_question).collect()
}
