//! The quiz progression state machine.
//!
//! A [`QuizController`] walks an ordered queue of questions: it renders each
//! one, runs its countdown, reveals an answer when the user picks one or time
//! runs out, and reports completion once the queue is empty. It owns no UI and
//! no timers; every effect goes through the collaborators it was built with,
//! and every input arrives as a method call from the host.

use std::collections::{HashSet, VecDeque};
use std::error::Error;
use std::sync::Arc;
use std::time::Duration;

use quiz_core::Countdown;
use quiz_core::model::{
    AnswerId, AnswerRecord, AnswerSource, MediaUri, Question, QuestionId, QuizDetail, QuizSummary,
    RevealPolicy,
};

use crate::dispatch::{QuestionView, RevealView, Visibility, reveal_target};
use crate::error::ProviderError;
use crate::surface::{
    ErrorReporter, LogErrorReporter, LogNotifier, MediaPlaybackSurface, MediaSlot, Notifier,
    PresentationSurface,
};
use crate::timer::{CountdownScheduler, TimerEvent, TimerTicket};

/// Everything the controller talks to.
#[derive(Clone)]
pub struct QuizCollaborators {
    pub presentation: Arc<dyn PresentationSurface>,
    pub media: Arc<dyn MediaPlaybackSurface>,
    pub timers: Arc<dyn CountdownScheduler>,
    pub errors: Arc<dyn ErrorReporter>,
    pub notifier: Arc<dyn Notifier>,
}

impl QuizCollaborators {
    /// Collaborators that report errors and notifications through `log`.
    #[must_use]
    pub fn new(
        presentation: Arc<dyn PresentationSurface>,
        media: Arc<dyn MediaPlaybackSurface>,
        timers: Arc<dyn CountdownScheduler>,
    ) -> Self {
        Self {
            presentation,
            media,
            timers,
            errors: Arc::new(LogErrorReporter),
            notifier: Arc::new(LogNotifier),
        }
    }

    #[must_use]
    pub fn with_errors(mut self, errors: Arc<dyn ErrorReporter>) -> Self {
        self.errors = errors;
        self
    }

    #[must_use]
    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizPhase {
    /// Nothing displayed yet, or the quiz loaded with no questions.
    Idle,
    /// A question is on screen and its countdown is running.
    Displaying,
    /// The current question has been resolved and its reveal is on screen.
    Revealing,
    Complete,
    Disposed,
}

/// Outcome of [`QuizController::advance`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    Displayed(QuestionId),
    Complete,
    /// The controller is complete or disposed.
    Ignored,
}

/// Outcome of [`QuizController::on_answer_selected`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    Revealed {
        record: AnswerRecord,
        /// The answer whose reveal content was rendered.
        shown: AnswerId,
    },
    Ignored,
}

#[derive(Debug, Clone, Copy)]
struct ActiveCountdown {
    ticket: TimerTicket,
    countdown: Countdown,
}

pub struct QuizController {
    collab: QuizCollaborators,
    policy: RevealPolicy,
    pending: VecDeque<Question>,
    current: Option<Question>,
    phase: QuizPhase,
    countdown: Option<ActiveCountdown>,
    last_ticket: TimerTicket,
    held_media: Vec<MediaSlot>,
    playing: HashSet<MediaSlot>,
    records: Vec<AnswerRecord>,
    total: usize,
    position: usize,
}

impl QuizController {
    #[must_use]
    pub fn new(collab: QuizCollaborators) -> Self {
        Self {
            collab,
            policy: RevealPolicy::default(),
            pending: VecDeque::new(),
            current: None,
            phase: QuizPhase::Idle,
            countdown: None,
            last_ticket: TimerTicket::default(),
            held_media: Vec::new(),
            playing: HashSet::new(),
            records: Vec::new(),
            total: 0,
            position: 0,
        }
    }

    /// Install a new queue and display its first question.
    ///
    /// Returns the id of the displayed question, or `None` when the queue is
    /// empty; the next [`advance`](Self::advance) then completes the quiz.
    pub fn start(&mut self, questions: Vec<Question>, policy: RevealPolicy) -> Option<QuestionId> {
        if self.phase == QuizPhase::Disposed {
            log::warn!("start called on a disposed quiz controller");
            return None;
        }
        self.cancel_countdown();
        self.release_media();
        self.policy = policy;
        self.total = questions.len();
        self.position = 0;
        self.pending = questions.into();
        self.current = None;
        self.records.clear();
        self.phase = QuizPhase::Idle;
        log::info!("quiz started with {} questions ({policy:?} reveal)", self.total);

        if self.pending.is_empty() {
            return None;
        }
        match self.advance() {
            Advance::Displayed(id) => Some(id),
            Advance::Complete | Advance::Ignored => None,
        }
    }

    /// Deliver the result of the quiz fetch.
    ///
    /// A failure is reported and shown to the user, and leaves an empty queue.
    pub fn on_quiz_loaded(
        &mut self,
        result: Result<QuizDetail, ProviderError>,
    ) -> Option<QuestionId> {
        match result {
            Ok(detail) => self.start(detail.questions, detail.policy),
            Err(err) => {
                self.report("loading quiz", &err);
                self.collab.notifier.notify(&err.user_message());
                self.start(Vec::new(), self.policy)
            }
        }
    }

    /// Move to the next question, or complete the quiz when none is left.
    pub fn advance(&mut self) -> Advance {
        if matches!(self.phase, QuizPhase::Complete | QuizPhase::Disposed) {
            return Advance::Ignored;
        }
        self.cancel_countdown();
        self.release_media();

        let Some(question) = self.pending.pop_front() else {
            self.current = None;
            self.phase = QuizPhase::Complete;
            let summary = self.summary();
            log::info!(
                "quiz complete: {}/{} correct, {} timed out",
                summary.correct,
                summary.total,
                summary.timed_out
            );
            self.collab.presentation.show_complete(&summary);
            return Advance::Complete;
        };

        self.position += 1;
        let id = question.id();
        let format = question.content().format();
        let countdown = Countdown::new(question.duration());
        let ticket = self.last_ticket.next();
        self.last_ticket = ticket;

        let presentation = Arc::clone(&self.collab.presentation);
        presentation.set_answers_enabled(true);
        presentation.show_question(&QuestionView {
            question: &question,
            visibility: Visibility::for_content(question.content()),
            countdown: countdown.progress(),
            next_enabled: format.is_playable(),
            position: self.position,
            total: self.total,
        });
        presentation.set_next_enabled(format.is_playable());

        self.countdown = Some(ActiveCountdown { ticket, countdown });
        self.collab.timers.start(ticket, question.duration());
        self.phase = QuizPhase::Displaying;
        log::debug!("question {id} displayed ({format}, {}s)", question.duration_secs());

        if let (Some(slot), Some(uri)) = (
            MediaSlot::for_question(format),
            question.content().media_uri(),
        ) {
            self.acquire_media(slot, uri, slot.is_audio());
        }
        self.current = Some(question);
        Advance::Displayed(id)
    }

    /// The user picked `answer` on the question being displayed.
    pub fn on_answer_selected(&mut self, answer: AnswerId) -> Selection {
        if self.phase != QuizPhase::Displaying {
            return Selection::Ignored;
        }
        let known = self
            .current
            .as_ref()
            .is_some_and(|q| q.answer(answer).is_some());
        if !known {
            log::warn!("selected answer {answer} is not part of the current question");
            return Selection::Ignored;
        }
        self.resolve(answer, AnswerSource::User)
    }

    /// A countdown reported the time left.
    pub fn on_tick(&mut self, ticket: TimerTicket, remaining: Duration) {
        if self.phase != QuizPhase::Displaying {
            return;
        }
        let Some(active) = self.countdown.as_mut().filter(|a| a.ticket == ticket) else {
            log::trace!("stale tick from countdown {}", ticket.value());
            return;
        };
        let progress = active.countdown.tick(remaining);
        self.collab.presentation.show_countdown(progress);
    }

    /// A countdown ran out. The correct answer is revealed as if it had been
    /// selected.
    pub fn on_timer_expired(&mut self, ticket: TimerTicket) -> Selection {
        if self.phase != QuizPhase::Displaying {
            return Selection::Ignored;
        }
        let Some(active) = self.countdown.as_mut().filter(|a| a.ticket == ticket) else {
            log::trace!("stale expiry from countdown {}", ticket.value());
            return Selection::Ignored;
        };
        let progress = active.countdown.expire();
        self.collab.presentation.show_countdown(progress);

        let Some(correct) = self.current.as_ref().map(|q| q.correct_answer().id()) else {
            return Selection::Ignored;
        };
        self.resolve(correct, AnswerSource::Timeout)
    }

    pub fn on_timer(&mut self, event: TimerEvent) -> Selection {
        match event {
            TimerEvent::Tick { ticket, remaining } => {
                self.on_tick(ticket, remaining);
                Selection::Ignored
            }
            TimerEvent::Expired { ticket } => self.on_timer_expired(ticket),
        }
    }

    /// Start or continue an audio slot. Returns whether the slot is playing.
    pub fn play_audio(&mut self, slot: MediaSlot) -> bool {
        if !slot.is_audio() || !self.held_media.contains(&slot) {
            return false;
        }
        if !self.playing.contains(&slot) {
            self.start_playback(slot);
        }
        self.playing.contains(&slot)
    }

    /// Pause an audio slot. Returns whether the slot is still playing.
    pub fn pause_audio(&mut self, slot: MediaSlot) -> bool {
        if !self.playing.contains(&slot) {
            return false;
        }
        match self.collab.media.pause(slot) {
            Ok(()) => {
                self.playing.remove(&slot);
                self.collab.presentation.set_audio_playing(slot, false);
                false
            }
            Err(err) => {
                self.report(&format!("pausing {slot}"), &err);
                true
            }
        }
    }

    /// The host came back to the foreground.
    pub fn on_foreground(&mut self) {
        if self.phase == QuizPhase::Disposed {
            return;
        }
        let resumable: Vec<MediaSlot> = self
            .held_media
            .iter()
            .copied()
            .filter(|slot| slot.is_video() || self.playing.contains(slot))
            .collect();
        for slot in resumable {
            if let Err(err) = self.collab.media.resume(slot) {
                self.report(&format!("resuming {slot}"), &err);
            }
        }
    }

    /// The host went to the background.
    pub fn on_background(&mut self) {
        if self.phase == QuizPhase::Disposed {
            return;
        }
        for slot in self.held_media.clone() {
            if let Err(err) = self.collab.media.pause(slot) {
                self.report(&format!("pausing {slot}"), &err);
            }
        }
    }

    /// Tear down: stop the countdown and free every media slot.
    pub fn on_dispose(&mut self) {
        if self.phase == QuizPhase::Disposed {
            return;
        }
        self.cancel_countdown();
        self.release_media();
        self.pending.clear();
        self.current = None;
        self.phase = QuizPhase::Disposed;
        log::debug!("quiz controller disposed");
    }

    #[must_use]
    pub fn phase(&self) -> QuizPhase {
        self.phase
    }

    #[must_use]
    pub fn policy(&self) -> RevealPolicy {
        self.policy
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.current.as_ref()
    }

    /// Questions not yet displayed.
    #[must_use]
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Time left on the running countdown.
    #[must_use]
    pub fn remaining(&self) -> Option<Duration> {
        self.countdown.map(|a| a.countdown.remaining())
    }

    #[must_use]
    pub fn active_ticket(&self) -> Option<TimerTicket> {
        self.countdown.map(|a| a.ticket)
    }

    #[must_use]
    pub fn held_media(&self) -> &[MediaSlot] {
        &self.held_media
    }

    #[must_use]
    pub fn is_playing(&self, slot: MediaSlot) -> bool {
        self.playing.contains(&slot)
    }

    #[must_use]
    pub fn records(&self) -> &[AnswerRecord] {
        &self.records
    }

    #[must_use]
    pub fn summary(&self) -> QuizSummary {
        QuizSummary::from_records(self.total, &self.records)
    }

    fn resolve(&mut self, answer: AnswerId, source: AnswerSource) -> Selection {
        self.cancel_countdown();
        let Some(question) = self.current.take() else {
            return Selection::Ignored;
        };
        let Some(selected) = question.answer(answer) else {
            self.current = Some(question);
            return Selection::Ignored;
        };

        let (shown, marking) = reveal_target(&question, selected, self.policy);
        let presentation = Arc::clone(&self.collab.presentation);
        presentation.set_answers_enabled(false);
        presentation.show_reveal(&RevealView {
            question: &question,
            selected,
            shown,
            visibility: Visibility::for_content(shown.reveal()),
            marking,
        });
        presentation.set_next_enabled(true);

        let record = AnswerRecord {
            question_id: question.id(),
            answer_id: selected.id(),
            is_correct: selected.is_correct(),
            source,
        };
        self.records.push(record);
        self.phase = QuizPhase::Revealing;
        log::debug!(
            "question {} resolved by {source:?} with answer {answer} (correct: {})",
            question.id(),
            record.is_correct
        );

        let shown_id = shown.id();
        let reveal = shown.reveal();
        if let (Some(slot), Some(uri)) = (MediaSlot::for_answer(reveal.format()), reveal.media_uri())
        {
            self.acquire_media(slot, uri, false);
        }
        self.current = Some(question);
        Selection::Revealed {
            record,
            shown: shown_id,
        }
    }

    fn cancel_countdown(&mut self) {
        if let Some(active) = self.countdown.take() {
            self.collab.timers.cancel(active.ticket);
        }
    }

    fn acquire_media(&mut self, slot: MediaSlot, uri: &MediaUri, autoplay: bool) {
        if self.held_media.contains(&slot) {
            self.release_slot(slot);
            self.held_media.retain(|held| *held != slot);
        }
        if let Err(err) = self.collab.media.load(slot, uri) {
            self.report(&format!("loading {slot}"), &err);
            return;
        }
        self.held_media.push(slot);
        if autoplay {
            self.start_playback(slot);
        }
    }

    fn start_playback(&mut self, slot: MediaSlot) {
        match self.collab.media.play(slot) {
            Ok(()) => {
                self.playing.insert(slot);
                if slot.is_audio() {
                    self.collab.presentation.set_audio_playing(slot, true);
                }
            }
            Err(err) => self.report(&format!("playing {slot}"), &err),
        }
    }

    fn release_media(&mut self) {
        for slot in std::mem::take(&mut self.held_media) {
            self.release_slot(slot);
        }
    }

    fn release_slot(&mut self, slot: MediaSlot) {
        if self.playing.remove(&slot) && slot.is_audio() {
            self.collab.presentation.set_audio_playing(slot, false);
        }
        if let Err(err) = self.collab.media.release(slot) {
            self.report(&format!("releasing {slot}"), &err);
        }
    }

    fn report(&self, context: &str, err: &dyn Error) {
        self.collab.errors.report(context, err);
    }
}

impl Drop for QuizController {
    fn drop(&mut self) {
        self.on_dispose();
    }
}
