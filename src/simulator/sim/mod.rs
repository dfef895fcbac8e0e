pub mod mode;
pub mod shell;
pub mod soak;

pub use mode::StepMode;
pub use soak::{run_soak, SoakConfig, SoakReport};
