pub mod orchestrator;
pub mod reports;
pub mod upsert;
pub mod views;

pub use orchestrator::*;
pub use upsert::*;
pub use views::*;
