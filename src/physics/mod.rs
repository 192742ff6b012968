pub(crate) mod piece;
pub(crate) mod simulation;
pub(crate) mod spring;
