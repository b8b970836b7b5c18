//! Orb state machine — the 3-state audio-activity indicator.
//!
//! Driven purely by audio-activity signals from the live session. No
//! timers, no decay, no queued transitions: the most recently delivered
//! event wins immediately, and an event matching the current state is a
//! no-op so surfaces never flicker.

use serde::{Deserialize, Serialize};

/// Visual state of the orb indicator.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrbState {
    /// No audio activity in either direction.
    #[default]
    Idle,
    /// Remote model audio is playing.
    Speaking,
    /// Local microphone activity detected.
    Listening,
}

/// Audio-activity signal from the live session collaborator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AudioActivity {
    /// Remote audio frames are being played back.
    RemoteAudioPlaying,
    /// Local audio input is being detected/sent.
    LocalAudioDetected,
    /// Neither direction is active.
    Quiet,
}

impl AudioActivity {
    /// The orb state this signal maps to.
    pub fn orb_state(self) -> OrbState {
        match self {
            Self::RemoteAudioPlaying => OrbState::Speaking,
            Self::LocalAudioDetected => OrbState::Listening,
            Self::Quiet => OrbState::Idle,
        }
    }
}

/// Derives [`OrbState`] from a stream of [`AudioActivity`] signals.
#[derive(Debug, Default)]
pub struct OrbStateMachine {
    state: OrbState,
}

impl OrbStateMachine {
    /// Start in [`OrbState::Idle`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state.
    pub fn state(&self) -> OrbState {
        self.state
    }

    /// Apply an activity signal.
    ///
    /// Returns `Some(new_state)` when the state changed, `None` for a
    /// no-op (signal mapping to the current state).
    pub fn apply(&mut self, activity: AudioActivity) -> Option<OrbState> {
        let next = activity.orb_state();
        if next == self.state {
            return None;
        }
        self.state = next;
        Some(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_idle() {
        assert_eq!(OrbStateMachine::new().state(), OrbState::Idle);
    }

    #[test]
    fn activity_maps_to_state() {
        let mut orb = OrbStateMachine::new();
        assert_eq!(
            orb.apply(AudioActivity::RemoteAudioPlaying),
            Some(OrbState::Speaking)
        );
        assert_eq!(
            orb.apply(AudioActivity::LocalAudioDetected),
            Some(OrbState::Listening)
        );
        assert_eq!(orb.apply(AudioActivity::Quiet), Some(OrbState::Idle));
    }

    #[test]
    fn equal_state_is_noop() {
        let mut orb = OrbStateMachine::new();
        let _ = orb.apply(AudioActivity::RemoteAudioPlaying);
        assert_eq!(orb.apply(AudioActivity::RemoteAudioPlaying), None);
        assert_eq!(orb.state(), OrbState::Speaking);
    }

    #[test]
    fn quiet_from_idle_is_noop() {
        let mut orb = OrbStateMachine::new();
        assert_eq!(orb.apply(AudioActivity::Quiet), None);
    }

    #[test]
    fn last_event_wins() {
        let mut orb = OrbStateMachine::new();
        let _ = orb.apply(AudioActivity::LocalAudioDetected);
        let _ = orb.apply(AudioActivity::RemoteAudioPlaying);
        let _ = orb.apply(AudioActivity::LocalAudioDetected);
        assert_eq!(orb.state(), OrbState::Listening);
    }

    #[test]
    fn state_persists_without_events() {
        let mut orb = OrbStateMachine::new();
        let _ = orb.apply(AudioActivity::RemoteAudioPlaying);
        // No decay: still speaking until the next explicit signal.
        assert_eq!(orb.state(), OrbState::Speaking);
    }

    #[test]
    fn serde_snake_case() {
        assert_eq!(
            serde_json::to_string(&OrbState::Listening).unwrap(),
            "\"listening\""
        );
        assert_eq!(
            serde_json::to_string(&AudioActivity::RemoteAudioPlaying).unwrap(),
            "\"remote_audio_playing\""
        );
    }
}
