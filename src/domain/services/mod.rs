mod credential_store;
mod orchestrator;

pub use credential_store::*;
pub use orchestrator::*;
