pub mod ai;

pub use ai::{AnalysisTransport, HttpAnalysisClient};
