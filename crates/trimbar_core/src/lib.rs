pub mod correction;
pub mod drag;
pub mod error;
pub mod mapping;
pub mod playback;
pub mod session;
pub mod settings;
pub mod state;
pub mod types;
