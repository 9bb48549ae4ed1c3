use std::fmt;
use std::sync::Arc;

use quiz_core::model::{Format, MediaUri};

use crate::error::PlaybackError;

/// Independent playback resources: one per media kind for the question and
/// one per media kind for the revealed answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaSlot {
    QuestionAudio,
    QuestionVideo,
    AnswerAudio,
    AnswerVideo,
}

impl MediaSlot {
    #[must_use]
    pub fn for_question(format: Format) -> Option<Self> {
        match format {
            Format::Audio => Some(MediaSlot::QuestionAudio),
            Format::Video => Some(MediaSlot::QuestionVideo),
            Format::Text | Format::Image => None,
        }
    }

    #[must_use]
    pub fn for_answer(format: Format) -> Option<Self> {
        match format {
            Format::Audio => Some(MediaSlot::AnswerAudio),
            Format::Video => Some(MediaSlot::AnswerVideo),
            Format::Text | Format::Image => None,
        }
    }

    #[must_use]
    pub fn is_audio(self) -> bool {
        matches!(self, MediaSlot::QuestionAudio | MediaSlot::AnswerAudio)
    }

    #[must_use]
    pub fn is_video(self) -> bool {
        !self.is_audio()
    }
}

impl fmt::Display for MediaSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MediaSlot::QuestionAudio => "question audio",
            MediaSlot::QuestionVideo => "question video",
            MediaSlot::AnswerAudio => "answer audio",
            MediaSlot::AnswerVideo => "answer video",
        })
    }
}

/// Native audio/video playback, addressed by slot.
pub trait MediaPlaybackSurface: Send + Sync {
    /// Prepare `uri` in `slot`, replacing whatever the slot held.
    ///
    /// # Errors
    ///
    /// Returns `PlaybackError::Load` if the source cannot be opened.
    fn load(&self, slot: MediaSlot, uri: &MediaUri) -> Result<(), PlaybackError>;

    /// # Errors
    ///
    /// Returns `PlaybackError` if the slot cannot start playing.
    fn play(&self, slot: MediaSlot) -> Result<(), PlaybackError>;

    /// # Errors
    ///
    /// Returns `PlaybackError` if the slot cannot pause.
    fn pause(&self, slot: MediaSlot) -> Result<(), PlaybackError>;

    /// # Errors
    ///
    /// Returns `PlaybackError` if the slot cannot resume.
    fn resume(&self, slot: MediaSlot) -> Result<(), PlaybackError>;

    /// Free the native resources behind `slot`.
    ///
    /// # Errors
    ///
    /// Returns `PlaybackError::Release` if the native player refuses.
    fn release(&self, slot: MediaSlot) -> Result<(), PlaybackError>;
}

impl<S: MediaPlaybackSurface + ?Sized> MediaPlaybackSurface for Arc<S> {
    fn load(&self, slot: MediaSlot, uri: &MediaUri) -> Result<(), PlaybackError> {
        (**self).load(slot, uri)
    }

    fn play(&self, slot: MediaSlot) -> Result<(), PlaybackError> {
        (**self).play(slot)
    }

    fn pause(&self, slot: MediaSlot) -> Result<(), PlaybackError> {
        (**self).pause(slot)
    }

    fn resume(&self, slot: MediaSlot) -> Result<(), PlaybackError> {
        (**self).resume(slot)
    }

    fn release(&self, slot: MediaSlot) -> Result<(), PlaybackError> {
        (**self).release(slot)
    }
}

/// Maps a content URL to the URL a caching proxy serves it from.
pub trait MediaProxy: Send + Sync {
    fn proxy_uri(&self, uri: &MediaUri) -> MediaUri;
}

/// No proxy: media is played from its original location.
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectProxy;

impl MediaProxy for DirectProxy {
    fn proxy_uri(&self, uri: &MediaUri) -> MediaUri {
        uri.clone()
    }
}

/// Routes remote media through a proxy before the native surface sees it.
///
/// Local files bypass the proxy.
pub struct ProxiedMediaSurface<S> {
    inner: S,
    proxy: Arc<dyn MediaProxy>,
}

impl<S: MediaPlaybackSurface> ProxiedMediaSurface<S> {
    #[must_use]
    pub fn new(inner: S, proxy: Arc<dyn MediaProxy>) -> Self {
        Self { inner, proxy }
    }

    #[must_use]
    pub fn inner(&self) -> &S {
        &self.inner
    }
}

impl<S: MediaPlaybackSurface> MediaPlaybackSurface for ProxiedMediaSurface<S> {
    fn load(&self, slot: MediaSlot, uri: &MediaUri) -> Result<(), PlaybackError> {
        if uri.is_remote() {
            let proxied = self.proxy.proxy_uri(uri);
            log::debug!("{slot}: {uri} served from {proxied}");
            self.inner.load(slot, &proxied)
        } else {
            self.inner.load(slot, uri)
        }
    }

    fn play(&self, slot: MediaSlot) -> Result<(), PlaybackError> {
        self.inner.play(slot)
    }

    fn pause(&self, slot: MediaSlot) -> Result<(), PlaybackError> {
        self.inner.pause(slot)
    }

    fn resume(&self, slot: MediaSlot) -> Result<(), PlaybackError> {
        self.inner.resume(slot)
    }

    fn release(&self, slot: MediaSlot) -> Result<(), PlaybackError> {
        self.inner.release(slot)
    }
}
