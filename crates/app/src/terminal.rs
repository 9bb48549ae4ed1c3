use std::io::{self, Write};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use quiz_core::CountdownProgress;
use quiz_core::model::{Content, MediaUri, QuizResult, QuizSummary};
use services::{
    MediaPlaybackSurface, MediaSlot, Notifier, PlaybackError, PresentationSurface, QuestionView,
    RevealView,
};

/// Line-oriented stand-in for the quiz screen.
///
/// Media slots only log what a native player would do. The answer and next
/// buttons become flags the command loop checks before acting.
#[derive(Default)]
pub struct TerminalSurface {
    // Serialises multi-line blocks so countdown ticks never split them.
    out: Mutex<()>,
    answers_enabled: AtomicBool,
    next_enabled: AtomicBool,
}

impl TerminalSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn answers_enabled(&self) -> bool {
        self.answers_enabled.load(Ordering::Acquire)
    }

    pub fn next_enabled(&self) -> bool {
        self.next_enabled.load(Ordering::Acquire)
    }

    /// Collective reveal of a scored quiz.
    pub fn show_result(&self, result: &QuizResult) {
        let mut lines = vec![
            String::new(),
            format!(
                "Result: {} correct, {} wrong, {} unanswered",
                result.correct, result.wrong, result.unanswered
            ),
        ];
        for (index, question) in result.questions.iter().enumerate() {
            let mark = if question.is_correct() { "ok" } else { "x " };
            let picked = question
                .user_answer_id
                .map_or_else(|| "none".to_string(), |id| id.to_string());
            lines.push(format!(
                "  {mark} question {}: picked {picked}, correct {}",
                index + 1,
                question.correct_answer_id
            ));
        }
        self.write_block(&lines);
    }

    fn write_block(&self, lines: &[String]) {
        let _guard = match self.out.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let mut stdout = io::stdout().lock();
        for line in lines {
            let _ = writeln!(stdout, "{line}");
        }
        let _ = stdout.flush();
    }
}

fn describe(content: &Content) -> String {
    match content {
        Content::Text { body } => body.clone(),
        Content::Image { uri } => format!("[image] {uri}"),
        Content::Audio { uri } => format!("[audio] {uri}"),
        Content::Video { uri } => format!("[video] {uri}"),
    }
}

impl PresentationSurface for TerminalSurface {
    fn show_question(&self, view: &QuestionView<'_>) {
        let question = view.question;
        let mut lines = vec![
            String::new(),
            format!(
                "Question {}/{} ({}, {}s)",
                view.position,
                view.total,
                view.visibility.shown(),
                view.countdown.max_secs
            ),
            format!("  {}", question.title()),
        ];
        if question.content().text_body() != Some(question.title()) {
            lines.push(format!("  {}", describe(question.content())));
        }
        for (index, answer) in question.answers().iter().enumerate() {
            lines.push(format!("  {}) {}", index + 1, answer.title()));
        }
        if view.next_enabled {
            lines.push("  (n to skip)".into());
        }
        self.write_block(&lines);
    }

    fn show_countdown(&self, progress: CountdownProgress) {
        self.write_block(&[format!(
            "  {}s / {}s",
            progress.remaining_secs, progress.max_secs
        )]);
    }

    fn show_reveal(&self, view: &RevealView<'_>) {
        let mut lines = Vec::new();
        if let Some(marking) = view.marking {
            if marking.selected_correct {
                lines.push(format!("  Correct: {}", view.selected.title()));
            } else {
                lines.push(format!("  Wrong: {}", view.selected.title()));
                lines.push(format!("  Right answer: {}", view.shown.title()));
            }
        } else {
            lines.push(format!("  You chose: {}", view.selected.title()));
        }
        lines.push(format!("  {}", describe(view.shown.reveal())));
        lines.push("  (n for next)".into());
        self.write_block(&lines);
    }

    fn set_answers_enabled(&self, enabled: bool) {
        self.answers_enabled.store(enabled, Ordering::Release);
    }

    fn set_next_enabled(&self, enabled: bool) {
        self.next_enabled.store(enabled, Ordering::Release);
    }

    fn set_audio_playing(&self, slot: MediaSlot, playing: bool) {
        let state = if playing { "playing" } else { "stopped" };
        self.write_block(&[format!("  [{slot}] {state}")]);
    }

    fn show_complete(&self, summary: &QuizSummary) {
        self.write_block(&[
            String::new(),
            "Quiz complete".into(),
            format!("  correct:   {}/{}", summary.correct, summary.total),
            format!("  answered:  {}", summary.answered),
            format!("  timed out: {}", summary.timed_out),
            format!("  skipped:   {}", summary.skipped),
        ]);
    }
}

impl MediaPlaybackSurface for TerminalSurface {
    fn load(&self, slot: MediaSlot, uri: &MediaUri) -> Result<(), PlaybackError> {
        log::info!("{slot}: load {uri}");
        Ok(())
    }

    fn play(&self, slot: MediaSlot) -> Result<(), PlaybackError> {
        log::info!("{slot}: play");
        Ok(())
    }

    fn pause(&self, slot: MediaSlot) -> Result<(), PlaybackError> {
        log::info!("{slot}: pause");
        Ok(())
    }

    fn resume(&self, slot: MediaSlot) -> Result<(), PlaybackError> {
        log::info!("{slot}: resume");
        Ok(())
    }

    fn release(&self, slot: MediaSlot) -> Result<(), PlaybackError> {
        log::debug!("{slot}: release");
        Ok(())
    }
}

impl Notifier for TerminalSurface {
    fn notify(&self, message: &str) {
        self.write_block(&[format!("! {message}")]);
    }
}
