pub mod view;

pub use view::ProgressMaskView;
