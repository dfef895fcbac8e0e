pub mod log;
pub mod trace;

pub use trace::TraceWriter;
