pub(crate) mod adaptive;
pub(crate) mod orchestrator;
pub(crate) mod phase;
