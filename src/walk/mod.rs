pub mod controller;
pub mod state;

pub use controller::WalkController;
pub use state::{WalkState, WalkStatus};
