#![forbid(unsafe_code)]

pub mod config;
pub mod controller;
pub mod dispatch;
pub mod error;
pub mod provider;
pub mod surface;
pub mod timer;

pub use quiz_core::Clock;

pub use config::QuizConfig;
pub use controller::{Advance, QuizCollaborators, QuizController, QuizPhase, Selection};
pub use dispatch::{Marking, QuestionView, RevealView, Visibility, reveal_target};
pub use error::{ConfigError, PlaybackError, ProviderError};
pub use provider::{
    CachingQuizProvider, HttpQuizProvider, InMemoryQuizProvider, QuizDataProvider, QuizFetch,
    QuizRequest, fetch_once,
};
pub use surface::{
    DirectProxy, ErrorReporter, LogErrorReporter, LogNotifier, MediaPlaybackSurface, MediaProxy,
    MediaSlot, Notifier, PresentationSurface, ProxiedMediaSurface,
};
pub use timer::{CountdownScheduler, TimerEvent, TimerTicket, TokioCountdownScheduler};
