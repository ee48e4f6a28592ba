//! Status panel — effect, shader, camera, audio and connection indicators.

use crate::params::{MusicCommand, ParameterSet};
use crate::publish::Connection;

/// Last music command sent, as shown on the Audio line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioState {
    Ready,
    Playing,
    Paused,
}

impl From<MusicCommand> for AudioState {
    fn from(cmd: MusicCommand) -> Self {
        match cmd {
            MusicCommand::Play => AudioState::Playing,
            MusicCommand::Pause => AudioState::Paused,
        }
    }
}

/// One-line message at the bottom of the status panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Headline {
    Ready,
    EffectActive(u8),
    Music(MusicCommand),
    Error(String),
    WriteError,
}

impl Headline {
    pub fn text(&self) -> String {
        match self {
            Headline::Ready => "◢ SYSTEM READY ◣".to_string(),
            Headline::EffectActive(id) => format!("◢ EFFECT {id} ACTIVE ◣"),
            Headline::Music(cmd) => format!("◢ MUSIC {} ◣", cmd.as_str().to_uppercase()),
            Headline::Error(msg) => format!("◢ ERROR ◣ {msg}"),
            Headline::WriteError => "WRITE ERROR".to_string(),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Headline::Error(_) | Headline::WriteError)
    }
}

/// Status panel state not derivable from the parameter set.
#[derive(Debug, Clone)]
pub struct StatusInfo {
    pub remote: bool,
    pub connection: Connection,
    pub audio: AudioState,
    pub headline: Headline,
    pub destination: String,
}

impl StatusInfo {
    pub fn new(remote: bool, connection: Connection, destination: String) -> Self {
        Self {
            remote,
            connection,
            audio: AudioState::Ready,
            headline: Headline::Ready,
            destination,
        }
    }

    /// Remote surfaces show placeholders until a session exists.
    fn live(&self) -> bool {
        self.connection.is_ready()
    }

    pub fn title(&self) -> &'static str {
        match (self.remote, self.live()) {
            (false, _) => "◢ LUMIUS ACTIVE ◣",
            (true, true) => "◢ REMOTE ACTIVE ◣",
            (true, false) => "◢ REMOTE MODE ◣",
        }
    }

    pub fn effect_line(&self, params: &ParameterSet) -> String {
        if !self.live() {
            return "Effect: - ".to_string();
        }
        let effect = params.effect();
        format!("Effect: {} - {}", effect.id(), effect.name())
    }

    pub fn shader_line(&self, params: &ParameterSet) -> String {
        if !self.live() {
            return "Shader: - ".to_string();
        }
        format!("Shader: {}", params.effect().shader())
    }

    pub fn camera_active(&self, params: &ParameterSet) -> bool {
        self.live() && params.effect().is_camera_reactive()
    }

    pub fn camera_line(&self, params: &ParameterSet) -> &'static str {
        if self.camera_active(params) {
            "Camera: ACTIVE"
        } else {
            "Camera: INACTIVE"
        }
    }

    pub fn audio_line(&self) -> &'static str {
        if !self.live() {
            return "Audio: DISCONNECTED";
        }
        match self.audio {
            AudioState::Ready => "Audio: READY",
            AudioState::Playing => "Audio: PLAY",
            AudioState::Paused => "Audio: PAUSE",
        }
    }

    pub fn connection_line(&self) -> String {
        match &self.connection {
            Connection::Connected { host } => format!("CONNECTED {host}"),
            other => other.label().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::Effect;

    fn local() -> StatusInfo {
        StatusInfo::new(false, Connection::Local, "control.txt".to_string())
    }

    #[test]
    fn camera_follows_effect_category() {
        let status = local();
        let mut params = ParameterSet::default();
        params.set_effect(Effect::DepthScanner);
        assert!(status.camera_active(&params));
        assert_eq!(status.camera_line(&params), "Camera: ACTIVE");
        params.set_effect(Effect::ChladniPatterns);
        assert!(!status.camera_active(&params));
    }

    #[test]
    fn effect_and_shader_lines() {
        let status = local();
        let mut params = ParameterSet::default();
        params.set_effect(Effect::FaceMorph);
        assert_eq!(status.effect_line(&params), "Effect: 7 - FACE MORPH");
        assert_eq!(status.shader_line(&params), "Shader: 1");
        params.set_effect(Effect::CameraDistort);
        assert_eq!(status.shader_line(&params), "Shader: 5");
    }

    #[test]
    fn disconnected_remote_shows_placeholders() {
        let status = StatusInfo::new(true, Connection::Disconnected, String::new());
        let mut params = ParameterSet::default();
        params.set_effect(Effect::DepthScanner);
        assert_eq!(status.title(), "◢ REMOTE MODE ◣");
        assert_eq!(status.effect_line(&params), "Effect: - ");
        assert_eq!(status.shader_line(&params), "Shader: - ");
        assert!(!status.camera_active(&params));
        assert_eq!(status.audio_line(), "Audio: DISCONNECTED");
        assert_eq!(status.connection_line(), "DISCONNECTED");
    }

    #[test]
    fn connected_remote() {
        let mut status = StatusInfo::new(
            true,
            Connection::Connected {
                host: "10.0.0.2".to_string(),
            },
            String::new(),
        );
        status.audio = MusicCommand::Pause.into();
        assert_eq!(status.title(), "◢ REMOTE ACTIVE ◣");
        assert_eq!(status.audio_line(), "Audio: PAUSE");
        assert_eq!(status.connection_line(), "CONNECTED 10.0.0.2");
    }

    #[test]
    fn headline_texts() {
        assert_eq!(Headline::EffectActive(3).text(), "◢ EFFECT 3 ACTIVE ◣");
        assert_eq!(Headline::Music(MusicCommand::Play).text(), "◢ MUSIC PLAY ◣");
        assert!(Headline::WriteError.is_error());
        assert!(!Headline::Ready.is_error());
    }
}
