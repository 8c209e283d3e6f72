use std::path::PathBuf;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::config::{clamp_volume, AudioConfig};
use crate::error::AudioError;
use crate::fade::{Fade, FadeStep};
use crate::locations::LocationMusicMap;
use crate::output::AudioOutput;

/// User-facing audio state for the session.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioSessionState {
    pub current_location: Option<String>,
    /// Target music volume. Kept while muted.
    pub volume: f64,
    pub muted: bool,
}

/// Icon shown on the mute button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VolumeIndicator {
    Sound,
    Muted,
}

/// Coarse playback phase, for display and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackPhase {
    Idle,
    Playing,
    FadingOut,
    FadingIn,
}

enum Track {
    Idle,
    Playing,
    FadingOut { fade: Fade, next: PathBuf },
    FadingIn { fade: Fade },
}

/// Location-driven background music with stepped cross-fades and user
/// mute/volume controls.
///
/// Owns the output exclusively. Fades only advance from [`update`], so a fade
/// can never outlive the manager.
///
/// [`update`]: AudioManager::update
pub struct AudioManager<O: AudioOutput> {
    output: O,
    locations: LocationMusicMap,
    config: AudioConfig,
    session: AudioSessionState,
    track: Track,
}

impl<O: AudioOutput> AudioManager<O> {
    pub fn new(mut output: O, locations: LocationMusicMap, config: AudioConfig) -> Self {
        let session = AudioSessionState {
            current_location: None,
            volume: config.clamped_volume(),
            muted: config.muted,
        };
        output.set_volume(if session.muted { 0.0 } else { session.volume });

        Self {
            output,
            locations,
            config,
            session,
            track: Track::Idle,
        }
    }

    /// Switch the background music to the track for `location`.
    ///
    /// Repeating the current location is a no-op. The first track starts
    /// directly; later tracks fade out the current one and fade the new one in.
    /// A new location arriving mid-fade cancels that fade and restarts the
    /// fade-out from the current level.
    pub fn play_location_music(&mut self, location: &str) {
        if self.session.current_location.as_deref() == Some(location) {
            debug!("Already playing music for '{}'", location);
            return;
        }

        let path = self.config.assets_dir.join(self.locations.resolve(location));
        self.session.current_location = Some(location.to_string());

        match self.track {
            Track::Idle => self.start_direct(path),
            _ => self.fade_out_and_switch(path),
        }
    }

    /// Fade the current track out, then switch to `next` and fade it in.
    pub fn fade_out_and_switch(&mut self, next: PathBuf) {
        if matches!(self.track, Track::FadingOut { .. } | Track::FadingIn { .. }) {
            debug!("Cancelling running fade");
        }
        let from = self.current_level();
        info!("Fading music to {:?}", next);
        self.track = Track::FadingOut {
            fade: Fade::fade_out(from, self.config.effective_fade_step(), self.config.fade_tick),
            next,
        };
    }

    /// Advance running fades by the elapsed frame time.
    pub fn update(&mut self, delta: Duration) {
        self.output.update();

        let ticks = match &mut self.track {
            Track::FadingOut { fade, .. } | Track::FadingIn { fade } => fade.advance(delta),
            Track::Idle | Track::Playing => return,
        };
        for _ in 0..ticks {
            if !self.tick() {
                break;
            }
        }
    }

    /// Flip mute. Muting silences the output without touching the stored volume.
    pub fn toggle_mute(&mut self) -> VolumeIndicator {
        self.session.muted = !self.session.muted;
        let level = self.current_level();
        self.apply_level(level);
        info!("Music {}", if self.session.muted { "muted" } else { "unmuted" });
        self.indicator()
    }

    /// Store a new target volume. Applied at once unless muted or mid-fade.
    ///
    /// While a fade is running the output level is left alone: the fade reads
    /// the new target on its next tick, so the ramp never jumps.
    pub fn set_volume(&mut self, volume: f64) {
        self.session.volume = clamp_volume(volume);
        if matches!(self.track, Track::Idle | Track::Playing) {
            self.apply_level(self.session.volume);
        }
    }

    /// Play a one-shot clip such as a character introduction.
    pub fn play_clip(&mut self, bytes: Vec<u8>) -> Result<(), AudioError> {
        self.output.play_clip(bytes)
    }

    /// Cancel any fade and pause the background track.
    pub fn shutdown(&mut self) {
        self.track = Track::Idle;
        self.output.pause();
        info!("Audio stopped");
    }

    pub fn indicator(&self) -> VolumeIndicator {
        if self.session.muted {
            VolumeIndicator::Muted
        } else {
            VolumeIndicator::Sound
        }
    }

    pub fn session(&self) -> &AudioSessionState {
        &self.session
    }

    pub fn phase(&self) -> PlaybackPhase {
        match self.track {
            Track::Idle => PlaybackPhase::Idle,
            Track::Playing => PlaybackPhase::Playing,
            Track::FadingOut { .. } => PlaybackPhase::FadingOut,
            Track::FadingIn { .. } => PlaybackPhase::FadingIn,
        }
    }

    /// Volume actually sent to the output right now.
    pub fn effective_volume(&self) -> f64 {
        if self.session.muted {
            0.0
        } else {
            self.current_level()
        }
    }

    pub fn output(&self) -> &O {
        &self.output
    }

    fn start_direct(&mut self, path: PathBuf) {
        self.output.set_source(&path);
        self.apply_level(self.session.volume);
        match self.output.play() {
            Ok(()) => {
                info!("Playing music {:?}", path);
                self.track = Track::Playing;
            }
            Err(e) => {
                warn!("Could not start music automatically: {}", e);
                self.track = Track::Idle;
            }
        }
    }

    /// Returns false once the current fade has finished or handed over to a new one.
    fn tick(&mut self) -> bool {
        let target = self.session.volume;
        let step = match &mut self.track {
            Track::FadingOut { fade, .. } | Track::FadingIn { fade } => fade.tick(target),
            Track::Idle | Track::Playing => return false,
        };

        match step {
            FadeStep::Continue(level) => {
                self.apply_level(level);
                true
            }
            FadeStep::Silent => {
                if let Track::FadingOut { next, .. } = std::mem::replace(&mut self.track, Track::Idle) {
                    self.switch_to(next);
                }
                false
            }
            FadeStep::Done(level) => {
                self.apply_level(level);
                self.track = Track::Playing;
                debug!("Fade-in complete at {:.2}", level);
                false
            }
        }
    }

    fn switch_to(&mut self, next: PathBuf) {
        self.output.pause();
        self.output.set_source(&next);
        self.apply_level(0.0);
        match self.output.play() {
            Ok(()) => {
                debug!("Switched to {:?}, fading in", next);
                self.track = Track::FadingIn {
                    fade: Fade::fade_in(self.config.effective_fade_step(), self.config.fade_tick),
                };
            }
            Err(e) => {
                warn!("Could not start music automatically: {}", e);
                self.track = Track::Idle;
            }
        }
    }

    /// Unmuted level the output should be at in the current phase.
    fn current_level(&self) -> f64 {
        match &self.track {
            Track::Idle | Track::Playing => self.session.volume,
            Track::FadingOut { fade, .. } | Track::FadingIn { fade } => fade.level(),
        }
    }

    fn apply_level(&mut self, level: f64) {
        let volume = if self.session.muted { 0.0 } else { level };
        self.output.set_volume(volume);
    }
}

impl<O: AudioOutput> Drop for AudioManager<O> {
    fn drop(&mut self) {
        if !matches!(self.track, Track::Idle) {
            self.shutdown();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Source(PathBuf),
        Play,
        Pause,
        Volume(f64),
        Clip(usize),
    }

    #[derive(Default)]
    struct RecordingOutput {
        calls: Vec<Call>,
        reject_play: bool,
    }

    impl RecordingOutput {
        fn volumes(&self) -> Vec<f64> {
            self.calls
                .iter()
                .filter_map(|c| match c {
                    Call::Volume(v) => Some(*v),
                    _ => None,
                })
                .collect()
        }

        fn last_volume(&self) -> f64 {
            self.volumes().last().copied().unwrap_or(-1.0)
        }

        fn sources(&self) -> Vec<PathBuf> {
            self.calls
                .iter()
                .filter_map(|c| match c {
                    Call::Source(p) => Some(p.clone()),
                    _ => None,
                })
                .collect()
        }

        fn plays(&self) -> usize {
            self.calls.iter().filter(|c| **c == Call::Play).count()
        }
    }

    impl AudioOutput for RecordingOutput {
        fn set_source(&mut self, path: &Path) {
            self.calls.push(Call::Source(path.to_path_buf()));
        }

        fn play(&mut self) -> Result<(), AudioError> {
            self.calls.push(Call::Play);
            if self.reject_play {
                Err(AudioError::PlaybackRejected("autoplay blocked".into()))
            } else {
                Ok(())
            }
        }

        fn pause(&mut self) {
            self.calls.push(Call::Pause);
        }

        fn set_volume(&mut self, volume: f64) {
            self.calls.push(Call::Volume(volume));
        }

        fn play_clip(&mut self, bytes: Vec<u8>) -> Result<(), AudioError> {
            self.calls.push(Call::Clip(bytes.len()));
            Ok(())
        }
    }

    const TICK: Duration = Duration::from_millis(100);

    fn manager() -> AudioManager<RecordingOutput> {
        manager_with(RecordingOutput::default())
    }

    fn manager_with(output: RecordingOutput) -> AudioManager<RecordingOutput> {
        let config = AudioConfig {
            assets_dir: PathBuf::from("assets"),
            ..Default::default()
        };
        AudioManager::new(output, LocationMusicMap::builtin(), config)
    }

    fn run_until_settled(audio: &mut AudioManager<RecordingOutput>) {
        for _ in 0..200 {
            if audio.phase() == PlaybackPhase::Playing || audio.phase() == PlaybackPhase::Idle {
                return;
            }
            audio.update(TICK);
        }
        panic!("fade never settled");
    }

    #[test]
    fn first_location_starts_directly() {
        let mut audio = manager();
        audio.play_location_music("tavern");

        assert_eq!(audio.phase(), PlaybackPhase::Playing);
        assert_eq!(audio.session().current_location.as_deref(), Some("tavern"));
        assert_eq!(
            audio.output().sources(),
            vec![PathBuf::from("assets/audio/tavern_music.mp3")]
        );
        assert_eq!(audio.output().plays(), 1);
        assert_eq!(audio.output().last_volume(), 0.3);
    }

    #[test]
    fn unmapped_location_plays_default() {
        let mut audio = manager();
        audio.play_location_music("floating_islands");
        assert_eq!(
            audio.output().sources(),
            vec![PathBuf::from("assets/audio/adventure_theme.mp3")]
        );
    }

    #[test]
    fn same_location_is_idempotent() {
        let mut audio = manager();
        audio.play_location_music("cave");
        let calls = audio.output().calls.len();

        audio.play_location_music("cave");
        assert_eq!(audio.output().calls.len(), calls);
        assert_eq!(audio.phase(), PlaybackPhase::Playing);

        audio.play_location_music("beach");
        assert_eq!(audio.phase(), PlaybackPhase::FadingOut);
        audio.play_location_music("beach");
        audio.update(TICK);
        run_until_settled(&mut audio);
        assert_eq!(audio.output().plays(), 2);
    }

    #[test]
    fn crossfade_ends_exactly_at_target_and_switches_at_silence() {
        let mut audio = manager();
        audio.set_volume(0.33);
        audio.play_location_music("tavern");
        audio.play_location_music("castle");
        run_until_settled(&mut audio);

        assert_eq!(audio.phase(), PlaybackPhase::Playing);
        assert_eq!(audio.output().last_volume(), 0.33);
        assert_eq!(audio.effective_volume(), 0.33);

        let calls = &audio.output().calls;
        let switch = calls
            .iter()
            .position(|c| *c == Call::Source(PathBuf::from("assets/audio/royal_castle.mp3")))
            .expect("switched to castle");
        let last_before_switch = calls[..switch]
            .iter()
            .rev()
            .find_map(|c| match c {
                Call::Volume(v) => Some(*v),
                _ => None,
            })
            .unwrap();
        assert!(last_before_switch > 0.0, "silence is applied after pause");
        assert_eq!(calls[switch - 1], Call::Pause);
        assert_eq!(calls[switch + 1], Call::Volume(0.0));
        assert_eq!(calls[switch + 2], Call::Play);

        // Strictly decreasing before the switch, strictly increasing after.
        let before: Vec<f64> = calls[..switch]
            .iter()
            .filter_map(|c| match c {
                Call::Volume(v) => Some(*v),
                _ => None,
            })
            .skip_while(|v| *v == 0.3 || *v == 0.33)
            .collect();
        assert!(before.windows(2).all(|w| w[0] > w[1]));
        let after: Vec<f64> = calls[switch + 1..]
            .iter()
            .filter_map(|c| match c {
                Call::Volume(v) => Some(*v),
                _ => None,
            })
            .collect();
        assert!(after.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn fade_steps_once_per_tick() {
        let mut audio = manager();
        audio.play_location_music("tavern");
        audio.play_location_music("cave");

        audio.update(Duration::from_millis(99));
        assert_eq!(audio.output().last_volume(), 0.3);
        audio.update(Duration::from_millis(1));
        assert!((audio.output().last_volume() - 0.25).abs() < 1e-9);
    }

    #[test]
    fn new_location_mid_fade_restarts_toward_new_track() {
        let mut audio = manager();
        audio.play_location_music("tavern");
        audio.play_location_music("cave");
        audio.update(TICK * 2);
        let level = audio.effective_volume();
        assert!(level < 0.3 && level > 0.0);

        audio.play_location_music("beach");
        assert_eq!(audio.phase(), PlaybackPhase::FadingOut);
        assert_eq!(audio.effective_volume(), level);

        run_until_settled(&mut audio);
        let sources = audio.output().sources();
        assert_eq!(
            sources,
            vec![
                PathBuf::from("assets/audio/tavern_music.mp3"),
                PathBuf::from("assets/audio/ocean_waves.mp3"),
            ]
        );
        assert_eq!(audio.output().last_volume(), 0.3);
    }

    #[test]
    fn new_location_during_fade_in_fades_out_from_current_level() {
        let mut audio = manager();
        audio.play_location_music("tavern");
        audio.play_location_music("cave");
        while audio.phase() != PlaybackPhase::FadingIn {
            audio.update(TICK);
        }
        audio.update(TICK * 2);
        let level = audio.effective_volume();

        audio.play_location_music("castle");
        assert_eq!(audio.phase(), PlaybackPhase::FadingOut);
        assert_eq!(audio.effective_volume(), level);
        run_until_settled(&mut audio);
        assert_eq!(audio.session().current_location.as_deref(), Some("castle"));
        assert_eq!(audio.output().last_volume(), 0.3);
    }

    #[test]
    fn set_volume_while_muted_is_silent_until_unmuted() {
        let mut audio = manager();
        audio.play_location_music("tavern");

        assert_eq!(audio.toggle_mute(), VolumeIndicator::Muted);
        assert_eq!(audio.output().last_volume(), 0.0);

        audio.set_volume(0.7);
        assert_eq!(audio.output().last_volume(), 0.0);
        assert_eq!(audio.session().volume, 0.7);

        assert_eq!(audio.toggle_mute(), VolumeIndicator::Sound);
        assert_eq!(audio.output().last_volume(), 0.7);
    }

    #[test]
    fn mute_holds_through_a_fade() {
        let mut audio = manager();
        audio.play_location_music("tavern");
        audio.toggle_mute();
        audio.play_location_music("cave");
        run_until_settled(&mut audio);

        assert!(audio
            .output()
            .volumes()
            .iter()
            .skip(2)
            .all(|v| *v == 0.0));
        audio.toggle_mute();
        assert_eq!(audio.output().last_volume(), 0.3);
    }

    #[test]
    fn volume_change_mid_fade_becomes_new_target() {
        let mut audio = manager();
        audio.play_location_music("tavern");
        audio.play_location_music("cave");
        audio.update(TICK);
        audio.set_volume(0.6);
        run_until_settled(&mut audio);
        assert_eq!(audio.output().last_volume(), 0.6);
    }

    #[test]
    fn rejected_playback_is_not_fatal() {
        let mut audio = manager_with(RecordingOutput {
            reject_play: true,
            ..Default::default()
        });
        audio.play_location_music("tavern");
        assert_eq!(audio.phase(), PlaybackPhase::Idle);
        assert_eq!(audio.session().current_location.as_deref(), Some("tavern"));

        audio.output.reject_play = false;
        audio.play_location_music("cave");
        assert_eq!(audio.phase(), PlaybackPhase::Playing);
    }

    #[test]
    fn rejected_playback_after_fade_returns_to_idle() {
        let mut audio = manager();
        audio.play_location_music("tavern");
        audio.play_location_music("cave");
        audio.output.reject_play = true;
        run_until_settled(&mut audio);
        assert_eq!(audio.phase(), PlaybackPhase::Idle);
    }

    #[test]
    fn shutdown_cancels_fade() {
        let mut audio = manager();
        audio.play_location_music("tavern");
        audio.play_location_music("cave");
        audio.shutdown();
        let calls = audio.output().calls.len();
        audio.update(TICK * 50);
        assert_eq!(audio.output().calls.len(), calls);
    }

    #[test]
    fn clips_pass_through() {
        let mut audio = manager();
        audio.play_clip(vec![1, 2, 3]).unwrap();
        assert_eq!(audio.output().calls.last(), Some(&Call::Clip(3)));
    }
}
