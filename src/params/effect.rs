//! Visual effect selector — the seven modes the visualizer understands.

use std::fmt;

/// Which family an effect belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectCategory {
    /// Purely generative, no camera input.
    Generative,
    /// Needs the camera feed.
    CameraReactive,
}

/// A visual effect, identified on the wire by 1–7.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Effect {
    #[default]
    NeuralWaves,
    ChladniPatterns,
    BurstMatrix,
    QuantumField,
    CameraDistort,
    DepthScanner,
    FaceMorph,
}

impl Effect {
    /// All effects in id order.
    pub const ALL: [Effect; 7] = [
        Effect::NeuralWaves,
        Effect::ChladniPatterns,
        Effect::BurstMatrix,
        Effect::QuantumField,
        Effect::CameraDistort,
        Effect::DepthScanner,
        Effect::FaceMorph,
    ];

    /// Wire identifier (1–7).
    pub fn id(self) -> u8 {
        match self {
            Effect::NeuralWaves => 1,
            Effect::ChladniPatterns => 2,
            Effect::BurstMatrix => 3,
            Effect::QuantumField => 4,
            Effect::CameraDistort => 5,
            Effect::DepthScanner => 6,
            Effect::FaceMorph => 7,
        }
    }

    pub fn from_id(id: u8) -> Option<Self> {
        Self::ALL.iter().copied().find(|e| e.id() == id)
    }

    /// Display name shown on buttons and in the status panel.
    pub fn name(self) -> &'static str {
        match self {
            Effect::NeuralWaves => "NEURAL WAVES",
            Effect::ChladniPatterns => "CHLADNI PATTERNS",
            Effect::BurstMatrix => "BURST MATRIX",
            Effect::QuantumField => "QUANTUM FIELD",
            Effect::CameraDistort => "CAMERA DISTORT",
            Effect::DepthScanner => "DEPTH SCANNER",
            Effect::FaceMorph => "FACE MORPH",
        }
    }

    pub fn category(self) -> EffectCategory {
        if self.id() <= 4 {
            EffectCategory::Generative
        } else {
            EffectCategory::CameraReactive
        }
    }

    /// Whether the visualizer turns the camera on for this effect.
    pub fn is_camera_reactive(self) -> bool {
        self.category() == EffectCategory::CameraReactive
    }

    /// Shader slot reported in the status panel.
    ///
    /// Generative effects use their own slot, camera distort uses slot 5,
    /// and the remaining camera effects fall back to slot 1.
    pub fn shader(self) -> u8 {
        match self.id() {
            id @ 1..=5 => id,
            _ => 1,
        }
    }

    /// Effects belonging to one category, in id order.
    pub fn in_category(category: EffectCategory) -> impl Iterator<Item = Effect> {
        Self::ALL
            .into_iter()
            .filter(move |e| e.category() == category)
    }
}

impl fmt::Display for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.id(), self.name())
    }
}
