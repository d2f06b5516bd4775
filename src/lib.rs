// Public API for the relay binary, integration tests and the battle page

pub mod api;
pub mod battle;
pub mod client;
pub mod config;
pub mod protocol;
pub mod state;
pub mod tts;
pub mod types;
