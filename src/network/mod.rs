// Controller service networking
// HTTP protocol, the axum service, and the client the game uses to reach it

pub mod client;
pub mod protocol;
pub mod server;

pub use client::RemoteBot;
pub use protocol::PREDICT_PATH;
pub use server::{router, serve, serve_with_shutdown, ServiceState};
