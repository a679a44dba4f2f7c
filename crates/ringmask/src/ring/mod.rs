pub mod angle;
pub mod arc;
pub mod compositor;
pub mod geometry;
pub mod mask;
pub mod oscillator;
pub mod path;
pub mod rotation;
pub mod two_tone;

pub use angle::{ANGLE_EPSILON, ANGLE_STEP, AngleState, ArcAngles, TickStatus};
pub use arc::LineArc;
pub use compositor::GradientCompositor;
pub use geometry::{ArcConfig, ArcGeometry, Point, Rect, Size};
pub use mask::{
    Completions, FadeEnd, HideCallback, HideOutcome, PanelLayout, ProgressMask, Title,
};
pub use oscillator::{SWEEP_INTERVAL, SweepOscillator};
pub use path::ArcPath;
pub use rotation::{RotationDriver, angle_from_matrix, rotation_matrix};
pub use two_tone::TwoToneArc;
