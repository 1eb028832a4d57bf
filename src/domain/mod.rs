mod conversation_record;
mod message;
mod message_role;

pub use conversation_record::ConversationRecord;
pub use message::Message;
pub use message_role::MessageRole;
