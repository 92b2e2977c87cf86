pub(crate) mod engine;
pub(crate) mod environment;
pub(crate) mod registry;
