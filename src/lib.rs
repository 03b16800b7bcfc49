// Library surface for headless/integration tests and reuse.
// Keep this lean to avoid coupling to bin-only types in main.rs.
pub mod audience;
pub mod config;
pub mod decode;
pub mod game;
pub mod progression;
pub mod provider;
pub mod round;
pub mod runtime;
