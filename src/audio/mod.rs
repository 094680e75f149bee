pub mod cadence;
pub mod decision;
pub mod feedback;
#[cfg(feature = "audio")]
pub mod playback;
pub mod synth;

pub use cadence::BipCadence;
pub use decision::{ToneDecision, ToneKind, ToneMapper};
pub use feedback::Feedback;
#[cfg(feature = "audio")]
pub use playback::TonePlayer;
pub use synth::SquareWave;
