//! Named audio cues
//!
//! The game only ever refers to cues by name. Handles are built lazily the
//! first time a cue is used and kept in a registry keyed by cue. Playback
//! failures are logged and otherwise ignored.

use std::collections::HashMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Sound cue names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "String")]
pub enum AudioCue {
    /// Looping music during a round
    Background,
    /// Correct answer
    Success,
    /// Wrong answer
    Incorrect,
    /// Spoken how-to-play, while the help overlay is open
    Instructions,
    /// Button press
    UiClick,
}

impl AudioCue {
    pub const ALL: [AudioCue; 5] = [
        AudioCue::Background,
        AudioCue::Success,
        AudioCue::Incorrect,
        AudioCue::Instructions,
        AudioCue::UiClick,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AudioCue::Background => "background",
            AudioCue::Success => "success",
            AudioCue::Incorrect => "incorrect",
            AudioCue::Instructions => "instructions",
            AudioCue::UiClick => "uiClick",
        }
    }

    /// Music loops, everything else is a one-shot effect
    pub fn is_music(&self) -> bool {
        matches!(self, AudioCue::Background)
    }
}

impl FromStr for AudioCue {
    type Err = AudioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AudioCue::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| AudioError::UnknownCue(s.to_string()))
    }
}

impl TryFrom<String> for AudioCue {
    type Error = AudioError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// Audio failures (never fatal)
#[derive(Debug, Error)]
pub enum AudioError {
    #[error("unknown audio cue '{0}'")]
    UnknownCue(String),
    #[error("no audio source configured for cue '{}'", .0.as_str())]
    MissingSource(AudioCue),
    #[error("failed to create audio handle for '{}': {reason}", .cue.as_str())]
    Create { cue: AudioCue, reason: String },
    #[error("playback of '{}' failed: {reason}", .cue.as_str())]
    Playback { cue: AudioCue, reason: String },
}

/// Cue → resource location
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    pub sources: HashMap<AudioCue, String>,
}

impl Default for AudioConfig {
    fn default() -> Self {
        let sources = AudioCue::ALL
            .into_iter()
            .map(|cue| (cue, format!("assets/audio/{}.mp3", cue.as_str())))
            .collect();
        Self { sources }
    }
}

impl AudioConfig {
    pub fn source(&self, cue: AudioCue) -> Option<&str> {
        self.sources.get(&cue).map(String::as_str)
    }
}

/// Something that can build and drive audio handles
pub trait AudioBackend {
    type Handle;

    fn create(&mut self, cue: AudioCue, src: &str) -> Result<Self::Handle, AudioError>;
    /// Start from the beginning (one-shots) or resume (music)
    fn play(
        &mut self,
        cue: AudioCue,
        handle: &mut Self::Handle,
        volume: f32,
    ) -> Result<(), AudioError>;
    fn pause(&mut self, cue: AudioCue, handle: &mut Self::Handle) -> Result<(), AudioError>;
    /// Pause and rewind
    fn stop(&mut self, cue: AudioCue, handle: &mut Self::Handle) -> Result<(), AudioError>;
}

/// Lazily built handles keyed by cue
pub struct AudioRegistry<B: AudioBackend> {
    backend: B,
    config: AudioConfig,
    handles: HashMap<AudioCue, B::Handle>,
    master_volume: f32,
    sfx_volume: f32,
    music_volume: f32,
    muted: bool,
    /// The music has been played and not paused or stopped since
    music_active: bool,
}

impl<B: AudioBackend> AudioRegistry<B> {
    pub fn new(backend: B, config: AudioConfig) -> Self {
        Self {
            backend,
            config,
            handles: HashMap::new(),
            master_volume: 0.8,
            sfx_volume: 1.0,
            music_volume: 0.7,
            muted: false,
            music_active: false,
        }
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    /// Set music volume (0.0 - 1.0)
    pub fn set_music_volume(&mut self, vol: f32) {
        self.music_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute. Muting pauses the music so it does not keep running
    /// silently; unmuting picks it up again if it was playing.
    pub fn set_muted(&mut self, muted: bool) {
        if muted == self.muted {
            return;
        }
        self.muted = muted;
        if muted {
            self.pause_handle(AudioCue::Background);
        } else if self.music_active {
            self.play(AudioCue::Background);
        }
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Number of handles built so far
    pub fn loaded(&self) -> usize {
        self.handles.len()
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    fn effective_volume(&self, cue: AudioCue) -> f32 {
        if self.muted {
            return 0.0;
        }
        let channel = if cue.is_music() {
            self.music_volume
        } else {
            self.sfx_volume
        };
        self.master_volume * channel
    }

    fn handle(&mut self, cue: AudioCue) -> Result<&mut B::Handle, AudioError> {
        if !self.handles.contains_key(&cue) {
            let src = self
                .config
                .source(cue)
                .ok_or(AudioError::MissingSource(cue))?;
            let handle = self.backend.create(cue, src)?;
            self.handles.insert(cue, handle);
        }
        self.handles
            .get_mut(&cue)
            .ok_or(AudioError::MissingSource(cue))
    }

    fn try_play(&mut self, cue: AudioCue) -> Result<(), AudioError> {
        let vol = self.effective_volume(cue);
        if vol <= 0.0 {
            return Ok(());
        }
        // Split borrows: the handle lives in `handles`, the backend drives it
        self.handle(cue)?;
        let Self {
            backend, handles, ..
        } = self;
        match handles.get_mut(&cue) {
            Some(handle) => backend.play(cue, handle, vol),
            None => Err(AudioError::MissingSource(cue)),
        }
    }

    /// Play a cue
    pub fn play(&mut self, cue: AudioCue) {
        if cue.is_music() {
            self.music_active = true;
        }
        if let Err(e) = self.try_play(cue) {
            log::warn!("{}", e);
        }
    }

    /// Pause a cue if it has been loaded
    pub fn pause(&mut self, cue: AudioCue) {
        if cue.is_music() {
            self.music_active = false;
        }
        self.pause_handle(cue);
    }

    fn pause_handle(&mut self, cue: AudioCue) {
        let Self {
            backend, handles, ..
        } = self;
        if let Some(handle) = handles.get_mut(&cue) {
            if let Err(e) = backend.pause(cue, handle) {
                log::warn!("{}", e);
            }
        }
    }

    /// Stop and rewind a cue if it has been loaded
    pub fn stop(&mut self, cue: AudioCue) {
        if cue.is_music() {
            self.music_active = false;
        }
        let Self {
            backend, handles, ..
        } = self;
        if let Some(handle) = handles.get_mut(&cue) {
            if let Err(e) = backend.stop(cue, handle) {
                log::warn!("{}", e);
            }
        }
    }

    pub fn stop_all(&mut self) {
        for cue in AudioCue::ALL {
            self.stop(cue);
        }
    }
}

/// Backend that plays nothing (native builds, headless runs)
#[derive(Debug, Default)]
pub struct SilentBackend;

impl AudioBackend for SilentBackend {
    type Handle = ();

    fn create(&mut self, cue: AudioCue, src: &str) -> Result<(), AudioError> {
        log::debug!("Silent audio handle for '{}' ({})", cue.as_str(), src);
        Ok(())
    }

    fn play(&mut self, cue: AudioCue, _handle: &mut (), _volume: f32) -> Result<(), AudioError> {
        log::debug!("play {}", cue.as_str());
        Ok(())
    }

    fn pause(&mut self, _cue: AudioCue, _handle: &mut ()) -> Result<(), AudioError> {
        Ok(())
    }

    fn stop(&mut self, _cue: AudioCue, _handle: &mut ()) -> Result<(), AudioError> {
        Ok(())
    }
}

/// HTML `<audio>` element backend
#[cfg(target_arch = "wasm32")]
pub mod web {
    use wasm_bindgen::JsValue;
    use wasm_bindgen_futures::JsFuture;
    use web_sys::HtmlAudioElement;

    use super::{AudioBackend, AudioCue, AudioError};

    fn reason(value: &JsValue) -> String {
        value.as_string().unwrap_or_else(|| format!("{:?}", value))
    }

    #[derive(Debug, Default)]
    pub struct HtmlAudioBackend;

    impl AudioBackend for HtmlAudioBackend {
        type Handle = HtmlAudioElement;

        fn create(&mut self, cue: AudioCue, src: &str) -> Result<HtmlAudioElement, AudioError> {
            let el = HtmlAudioElement::new_with_src(src).map_err(|e| AudioError::Create {
                cue,
                reason: reason(&e),
            })?;
            el.set_loop(cue.is_music());
            el.set_preload("auto");
            Ok(el)
        }

        fn play(
            &mut self,
            cue: AudioCue,
            handle: &mut HtmlAudioElement,
            volume: f32,
        ) -> Result<(), AudioError> {
            handle.set_volume(volume as f64);
            if !cue.is_music() {
                handle.set_current_time(0.0);
            }
            let promise = handle.play().map_err(|e| AudioError::Playback {
                cue,
                reason: reason(&e),
            })?;
            // Autoplay policy rejections arrive asynchronously
            wasm_bindgen_futures::spawn_local(async move {
                if let Err(e) = JsFuture::from(promise).await {
                    let err = AudioError::Playback {
                        cue,
                        reason: reason(&e),
                    };
                    log::warn!("{}", err);
                }
            });
            Ok(())
        }

        fn pause(&mut self, cue: AudioCue, handle: &mut HtmlAudioElement) -> Result<(), AudioError> {
            handle.pause().map_err(|e| AudioError::Playback {
                cue,
                reason: reason(&e),
            })
        }

        fn stop(&mut self, cue: AudioCue, handle: &mut HtmlAudioElement) -> Result<(), AudioError> {
            self.pause(cue, handle)?;
            handle.set_current_time(0.0);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Records calls; fails creation for cues in `broken`
    #[derive(Default)]
    struct RecordingBackend {
        created: Vec<AudioCue>,
        calls: Vec<(&'static str, AudioCue)>,
        broken: Vec<AudioCue>,
        last_volume: f32,
    }

    impl AudioBackend for RecordingBackend {
        type Handle = AudioCue;

        fn create(&mut self, cue: AudioCue, _src: &str) -> Result<AudioCue, AudioError> {
            if self.broken.contains(&cue) {
                return Err(AudioError::Create {
                    cue,
                    reason: "decode error".to_string(),
                });
            }
            self.created.push(cue);
            Ok(cue)
        }

        fn play(&mut self, cue: AudioCue, _h: &mut AudioCue, volume: f32) -> Result<(), AudioError> {
            self.calls.push(("play", cue));
            self.last_volume = volume;
            Ok(())
        }

        fn pause(&mut self, cue: AudioCue, _h: &mut AudioCue) -> Result<(), AudioError> {
            self.calls.push(("pause", cue));
            Ok(())
        }

        fn stop(&mut self, cue: AudioCue, _h: &mut AudioCue) -> Result<(), AudioError> {
            self.calls.push(("stop", cue));
            Ok(())
        }
    }

    #[test]
    fn test_cue_names() {
        assert_eq!(AudioCue::UiClick.as_str(), "uiClick");
        assert_eq!("success".parse::<AudioCue>().unwrap(), AudioCue::Success);
        assert!(matches!(
            "nope".parse::<AudioCue>(),
            Err(AudioError::UnknownCue(_))
        ));
        for cue in AudioCue::ALL {
            let json = serde_json::to_string(&cue).unwrap();
            assert_eq!(json, format!("\"{}\"", cue.as_str()));
        }
    }

    #[test]
    fn test_unmute_resumes_music() {
        let mut reg = AudioRegistry::new(RecordingBackend::default(), AudioConfig::default());
        reg.play(AudioCue::Background);
        reg.set_muted(true);
        reg.set_muted(false);
        assert_eq!(
            reg.backend().calls,
            vec![
                ("play", AudioCue::Background),
                ("pause", AudioCue::Background),
                ("play", AudioCue::Background),
            ]
        );
    }

    #[test]
    fn test_unmute_leaves_paused_music_alone() {
        let mut reg = AudioRegistry::new(RecordingBackend::default(), AudioConfig::default());
        reg.play(AudioCue::Background);
        reg.pause(AudioCue::Background);
        reg.set_muted(true);
        reg.set_muted(false);
        assert_eq!(
            reg.backend().calls,
            vec![
                ("play", AudioCue::Background),
                ("pause", AudioCue::Background),
                ("pause", AudioCue::Background),
            ]
        );
    }

    #[test]
    fn test_music_started_while_muted_plays_on_unmute() {
        let mut reg = AudioRegistry::new(RecordingBackend::default(), AudioConfig::default());
        reg.set_muted(true);
        reg.play(AudioCue::Background);
        assert!(reg.backend().calls.is_empty());
        reg.set_muted(false);
        assert_eq!(reg.backend().calls, vec![("play", AudioCue::Background)]);
    }

    #[test]
    fn test_handles_built_lazily_once() {
        let mut reg = AudioRegistry::new(RecordingBackend::default(), AudioConfig::default());
        assert_eq!(reg.loaded(), 0);
        reg.play(AudioCue::Success);
        reg.play(AudioCue::Success);
        assert_eq!(reg.loaded(), 1);
        assert_eq!(reg.backend().created, vec![AudioCue::Success]);
        assert_eq!(reg.backend().calls.len(), 2);
    }

    #[test]
    fn test_stop_before_load_is_noop() {
        let mut reg = AudioRegistry::new(RecordingBackend::default(), AudioConfig::default());
        reg.stop(AudioCue::Background);
        reg.pause(AudioCue::Background);
        assert_eq!(reg.loaded(), 0);
        assert!(reg.backend().calls.is_empty());
    }

    #[test]
    fn test_create_failure_is_swallowed() {
        let backend = RecordingBackend {
            broken: vec![AudioCue::Incorrect],
            ..Default::default()
        };
        let mut reg = AudioRegistry::new(backend, AudioConfig::default());
        reg.play(AudioCue::Incorrect);
        assert_eq!(reg.loaded(), 0);
        reg.play(AudioCue::Success);
        assert_eq!(reg.loaded(), 1);
    }

    #[test]
    fn test_missing_source_is_swallowed() {
        let mut config = AudioConfig::default();
        config.sources.remove(&AudioCue::UiClick);
        let mut reg = AudioRegistry::new(RecordingBackend::default(), config);
        reg.play(AudioCue::UiClick);
        assert_eq!(reg.loaded(), 0);
    }

    #[test]
    fn test_muted_skips_playback() {
        let mut reg = AudioRegistry::new(RecordingBackend::default(), AudioConfig::default());
        reg.set_muted(true);
        reg.play(AudioCue::Success);
        assert!(reg.backend().calls.is_empty());
    }

    #[test]
    fn test_music_uses_music_volume() {
        let mut reg = AudioRegistry::new(RecordingBackend::default(), AudioConfig::default());
        reg.set_master_volume(0.5);
        reg.set_music_volume(0.5);
        reg.set_sfx_volume(1.0);
        reg.play(AudioCue::Background);
        assert!((reg.backend().last_volume - 0.25).abs() < 1e-6);
        reg.play(AudioCue::Success);
        assert!((reg.backend().last_volume - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_stop_all_touches_loaded_only() {
        let mut reg = AudioRegistry::new(RecordingBackend::default(), AudioConfig::default());
        reg.play(AudioCue::Background);
        reg.stop_all();
        assert_eq!(
            reg.backend().calls,
            vec![("play", AudioCue::Background), ("stop", AudioCue::Background)]
        );
    }

    #[test]
    fn test_config_json() {
        let config: AudioConfig =
            serde_json::from_str(r#"{"sources":{"uiClick":"click.ogg"}}"#).unwrap();
        assert_eq!(config.source(AudioCue::UiClick), Some("click.ogg"));
        assert_eq!(config.source(AudioCue::Background), None);
        assert!(serde_json::from_str::<AudioConfig>(r#"{"sources":{"drums":"x.ogg"}}"#).is_err());
    }
}
