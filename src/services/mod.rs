pub mod assistant;
pub mod catalog;
pub mod notifications;
pub mod orchestrator;
pub mod player;
pub mod providers;
pub mod recommendations;
pub mod rows;

pub use catalog::Catalog;
pub use orchestrator::Orchestrator;
