mod http;
mod websocket;

pub use http::{get_status, health_check, root};
pub use websocket::websocket_handler;
