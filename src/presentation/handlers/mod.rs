pub mod api_types;
mod chat;
mod error_response;
mod health;
mod history;
mod new_chat;

pub use chat::chat_handler;
pub use health::health_handler;
pub use history::history_handler;
pub use new_chat::new_chat_handler;
