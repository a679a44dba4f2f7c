//! Animated circular progress and activity indicator drawn with cairo.
//!
//! [`ring`] holds the display independent model. [`gui`] hosts it inside a gtk4 widget.

pub mod gui;
pub mod macros;
pub mod params;
pub mod ring;

pub use gui::ProgressMaskView;
pub use params::{HexColor, RingKind, RingParameters};
pub use ring::{HideOutcome, ProgressMask};
