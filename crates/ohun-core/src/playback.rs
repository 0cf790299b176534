//! Speech playback orchestration
//!
//! [`SpeechPlayer`] owns the "currently playing sound" and drives a
//! [`PlaybackFacility`]: any previous sound is stopped and unloaded before new
//! speech is fetched, and every failure path clears the speaking flag.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::audio::EncodedAudio;
use crate::error::Result;
use crate::services::SpeechClient;

/// Handle to a sound loaded into a playback facility
pub type SoundId = Uuid;

/// Produces playable speech for a piece of text
#[async_trait]
pub trait SpeechSource: Send + Sync {
    async fn speak(&self, text: &str) -> Result<EncodedAudio>;
}

#[async_trait]
impl SpeechSource for SpeechClient {
    async fn speak(&self, text: &str) -> Result<EncodedAudio> {
        SpeechClient::speak(self, text).await
    }
}

/// A media player that accepts URIs, including `data:` URIs.
///
/// Completion and errors are reported back through
/// [`SpeechPlayer::handle_event`].
#[async_trait]
pub trait PlaybackFacility: Send + Sync {
    /// Load a sound without starting it
    async fn load(&self, uri: &str) -> Result<SoundId>;
    async fn play(&self, sound: SoundId) -> Result<()>;
    async fn stop(&self, sound: SoundId) -> Result<()>;
    /// Release a loaded sound
    async fn unload(&self, sound: SoundId) -> Result<()>;
}

/// Status reported by the facility for a playing sound
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaybackEvent {
    Finished,
    Failed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayOutcome {
    /// Blank text or an error message; nothing was played
    Skipped,
    Started(SoundId),
}

/// Plays speech one utterance at a time.
///
/// Overlapping [`play_text`](Self::play_text) calls take turns. The current
/// sound is only locked briefly, so a facility may report events from
/// inside `play` without deadlocking.
pub struct SpeechPlayer<S, P> {
    source: S,
    facility: P,
    turn: Mutex<()>,
    current: Mutex<Option<SoundId>>,
    speaking: AtomicBool,
}

impl<S: SpeechSource, P: PlaybackFacility> SpeechPlayer<S, P> {
    pub fn new(source: S, facility: P) -> Self {
        Self {
            source,
            facility,
            turn: Mutex::new(()),
            current: Mutex::new(None),
            speaking: AtomicBool::new(false),
        }
    }

    pub fn is_speaking(&self) -> bool {
        self.speaking.load(Ordering::SeqCst)
    }

    pub async fn current_sound(&self) -> Option<SoundId> {
        *self.current.lock().await
    }

    /// Speak `text`, replacing whatever is currently playing.
    pub async fn play_text(&self, text: &str) -> Result<PlayOutcome> {
        if text.trim().is_empty() || text.starts_with("Error:") {
            debug!("Invalid text to speak or error message, skipping playback");
            return Ok(PlayOutcome::Skipped);
        }

        let _turn = self.turn.lock().await;
        let previous = self.current.lock().await.take();
        if let Some(previous) = previous {
            info!("Stopping and unloading previous sound {}", previous);
            self.release(previous, true).await;
        }

        self.speaking.store(true, Ordering::SeqCst);
        match self.start(text).await {
            Ok(sound) => Ok(PlayOutcome::Started(sound)),
            Err(e) => {
                error!("Failed to start speech playback: {}", e);
                self.speaking.store(false, Ordering::SeqCst);
                Err(e)
            }
        }
    }

    async fn start(&self, text: &str) -> Result<SoundId> {
        let audio = self.source.speak(text).await?;
        let sound = self.facility.load(&audio.data_uri).await?;
        debug!(
            "Loaded sound {} ({:.0} ms of audio)",
            sound, audio.duration_ms
        );

        *self.current.lock().await = Some(sound);
        if let Err(e) = self.facility.play(sound).await {
            if self.take_if_current(sound).await {
                self.release(sound, false).await;
            }
            return Err(e);
        }
        Ok(sound)
    }

    /// Apply a status report from the facility. Events for a sound that is
    /// no longer current are ignored.
    pub async fn handle_event(&self, sound: SoundId, event: PlaybackEvent) {
        match &event {
            PlaybackEvent::Finished => debug!("Sound {} finished", sound),
            PlaybackEvent::Failed(message) => error!("Playback error for {}: {}", sound, message),
        }

        if self.take_if_current(sound).await {
            self.speaking.store(false, Ordering::SeqCst);
            self.release(sound, false).await;
        } else {
            debug!("Ignoring event for stale sound {}", sound);
        }
    }

    /// Unload the current sound, if any.
    pub async fn shutdown(&self) {
        let current = self.current.lock().await.take();
        if let Some(sound) = current {
            info!("Unloading sound {} on shutdown", sound);
            self.release(sound, true).await;
        }
        self.speaking.store(false, Ordering::SeqCst);
    }

    async fn take_if_current(&self, sound: SoundId) -> bool {
        let mut current = self.current.lock().await;
        if *current == Some(sound) {
            *current = None;
            true
        } else {
            false
        }
    }

    async fn release(&self, sound: SoundId, stop_first: bool) {
        if stop_first {
            if let Err(e) = self.facility.stop(sound).await {
                warn!("Error stopping sound {}: {}", sound, e);
            }
        }
        if let Err(e) = self.facility.unload(sound).await {
            warn!("Error unloading sound {}: {}", sound, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::encode_pcm_to_wav_data_uri;
    use crate::error::Error;
    use std::sync::{Arc, Mutex as StdMutex, OnceLock, Weak};
    use std::time::Duration;

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Call {
        Load,
        Play(SoundId),
        Stop(SoundId),
        Unload(SoundId),
    }

    struct FakeSource {
        fail: bool,
    }

    #[async_trait]
    impl SpeechSource for FakeSource {
        async fn speak(&self, text: &str) -> Result<EncodedAudio> {
            if self.fail {
                return Err(Error::InvalidSpeechPayload("no audio".to_string()));
            }
            let samples = vec![0.1; text.len()];
            Ok(EncodedAudio::new(
                encode_pcm_to_wav_data_uri(&samples, 16000),
                samples.len(),
                16000,
            ))
        }
    }

    #[derive(Default)]
    struct FakeFacility {
        calls: StdMutex<Vec<Call>>,
        fail_play: bool,
        fail_stop: bool,
    }

    impl FakeFacility {
        fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl PlaybackFacility for FakeFacility {
        async fn load(&self, uri: &str) -> Result<SoundId> {
            assert!(uri.starts_with("data:audio/wav;base64,"));
            self.calls.lock().unwrap().push(Call::Load);
            Ok(Uuid::new_v4())
        }

        async fn play(&self, sound: SoundId) -> Result<()> {
            self.calls.lock().unwrap().push(Call::Play(sound));
            if self.fail_play {
                return Err(Error::Playback("device busy".to_string()));
            }
            Ok(())
        }

        async fn stop(&self, sound: SoundId) -> Result<()> {
            self.calls.lock().unwrap().push(Call::Stop(sound));
            if self.fail_stop {
                return Err(Error::Playback("already stopped".to_string()));
            }
            Ok(())
        }

        async fn unload(&self, sound: SoundId) -> Result<()> {
            self.calls.lock().unwrap().push(Call::Unload(sound));
            Ok(())
        }
    }

    fn player(fail_source: bool, facility: FakeFacility) -> SpeechPlayer<FakeSource, FakeFacility> {
        SpeechPlayer::new(FakeSource { fail: fail_source }, facility)
    }

    fn started(outcome: PlayOutcome) -> SoundId {
        match outcome {
            PlayOutcome::Started(sound) => sound,
            PlayOutcome::Skipped => panic!("playback was skipped"),
        }
    }

    #[tokio::test]
    async fn test_skips_blank_and_error_text() {
        let player = player(false, FakeFacility::default());

        assert_eq!(player.play_text("   ").await.unwrap(), PlayOutcome::Skipped);
        assert_eq!(
            player.play_text("Error: translation failed").await.unwrap(),
            PlayOutcome::Skipped
        );
        assert!(!player.is_speaking());
        assert!(player.facility.calls().is_empty());
    }

    #[tokio::test]
    async fn test_play_then_finish() {
        let player = player(false, FakeFacility::default());

        let sound = started(player.play_text("Ẹ kú àárọ̀").await.unwrap());
        assert!(player.is_speaking());
        assert_eq!(player.current_sound().await, Some(sound));

        player.handle_event(sound, PlaybackEvent::Finished).await;
        assert!(!player.is_speaking());
        assert_eq!(player.current_sound().await, None);
        assert_eq!(
            player.facility.calls(),
            vec![Call::Load, Call::Play(sound), Call::Unload(sound)]
        );
    }

    #[tokio::test]
    async fn test_new_text_replaces_previous_sound() {
        let player = player(false, FakeFacility::default());

        let first = started(player.play_text("one").await.unwrap());
        let second = started(player.play_text("two").await.unwrap());

        assert_ne!(first, second);
        assert_eq!(player.current_sound().await, Some(second));
        assert_eq!(
            player.facility.calls(),
            vec![
                Call::Load,
                Call::Play(first),
                Call::Stop(first),
                Call::Unload(first),
                Call::Load,
                Call::Play(second),
            ]
        );

        // A late event from the replaced sound leaves the new one alone
        player.handle_event(first, PlaybackEvent::Finished).await;
        assert!(player.is_speaking());
        assert_eq!(player.current_sound().await, Some(second));
    }

    #[tokio::test]
    async fn test_stop_failure_does_not_block_new_playback() {
        let facility = FakeFacility {
            fail_stop: true,
            ..Default::default()
        };
        let player = player(false, facility);

        started(player.play_text("one").await.unwrap());
        let second = started(player.play_text("two").await.unwrap());
        assert_eq!(player.current_sound().await, Some(second));
    }

    #[tokio::test]
    async fn test_source_failure_clears_speaking() {
        let player = player(true, FakeFacility::default());

        assert!(player.play_text("hello").await.is_err());
        assert!(!player.is_speaking());
        assert!(player.facility.calls().is_empty());
    }

    #[tokio::test]
    async fn test_play_failure_unloads_new_sound() {
        let facility = FakeFacility {
            fail_play: true,
            ..Default::default()
        };
        let player = player(false, facility);

        let err = player.play_text("hello").await.unwrap_err();
        assert!(matches!(err, Error::Playback(_)));
        assert!(!player.is_speaking());
        assert_eq!(player.current_sound().await, None);

        let calls = player.facility.calls();
        assert_eq!(calls.len(), 3);
        assert!(matches!(calls[2], Call::Unload(_)));
    }

    #[tokio::test]
    async fn test_playback_error_event_resets_state() {
        let player = player(false, FakeFacility::default());
        let sound = started(player.play_text("hello").await.unwrap());

        player
            .handle_event(sound, PlaybackEvent::Failed("decoder error".to_string()))
            .await;
        assert!(!player.is_speaking());
        assert_eq!(player.current_sound().await, None);
    }

    #[tokio::test]
    async fn test_event_without_current_sound_is_ignored() {
        let player = player(false, FakeFacility::default());
        let sound = started(player.play_text("hello").await.unwrap());
        player.shutdown().await;
        let calls = player.facility.calls().len();

        player.handle_event(sound, PlaybackEvent::Finished).await;
        player
            .handle_event(Uuid::new_v4(), PlaybackEvent::Failed("late".to_string()))
            .await;
        assert!(!player.is_speaking());
        assert_eq!(player.current_sound().await, None);
        assert_eq!(player.facility.calls().len(), calls);
    }

    /// Reports completion from inside `play`, as some facilities do for
    /// very short sounds.
    struct InlineFacility {
        player: OnceLock<Weak<SpeechPlayer<FakeSource, InlineFacility>>>,
        unloaded: StdMutex<Vec<SoundId>>,
    }

    #[async_trait]
    impl PlaybackFacility for InlineFacility {
        async fn load(&self, _uri: &str) -> Result<SoundId> {
            Ok(Uuid::new_v4())
        }

        async fn play(&self, sound: SoundId) -> Result<()> {
            if let Some(player) = self.player.get().and_then(Weak::upgrade) {
                player.handle_event(sound, PlaybackEvent::Finished).await;
            }
            Ok(())
        }

        async fn stop(&self, _sound: SoundId) -> Result<()> {
            Ok(())
        }

        async fn unload(&self, sound: SoundId) -> Result<()> {
            self.unloaded.lock().unwrap().push(sound);
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_event_delivered_during_play_does_not_deadlock() {
        let player = Arc::new(SpeechPlayer::new(
            FakeSource { fail: false },
            InlineFacility {
                player: OnceLock::new(),
                unloaded: StdMutex::new(Vec::new()),
            },
        ));
        player
            .facility
            .player
            .set(Arc::downgrade(&player))
            .unwrap_or_else(|_| panic!("player already set"));

        let outcome = tokio::time::timeout(Duration::from_secs(5), player.play_text("hello"))
            .await
            .expect("play_text deadlocked")
            .unwrap();
        let sound = started(outcome);

        assert!(!player.is_speaking());
        assert_eq!(player.current_sound().await, None);
        assert_eq!(*player.facility.unloaded.lock().unwrap(), vec![sound]);
    }

    #[tokio::test]
    async fn test_shutdown_releases_current_sound() {
        let player = player(false, FakeFacility::default());
        let sound = started(player.play_text("hello").await.unwrap());

        player.shutdown().await;
        assert!(!player.is_speaking());
        assert_eq!(
            &player.facility.calls()[2..],
            &[Call::Stop(sound), Call::Unload(sound)]
        );
    }
}
