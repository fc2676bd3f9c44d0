// TallyGrid CLI library - shared between the binary and integration tests

pub mod render;
pub mod script;
