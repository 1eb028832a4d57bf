use chat_relay::domain::{ConversationRecord, Message, MessageRole};

#[test]
fn given_user_message_when_serializing_then_model_is_omitted() {
    let json = serde_json::to_value(Message::user("hi")).unwrap();
    assert_eq!(json, serde_json::json!({"role": "user", "content": "hi"}));
}

#[test]
fn given_assistant_message_when_serializing_then_model_is_included() {
    let json = serde_json::to_value(Message::assistant("hello", "mistral")).unwrap();
    assert_eq!(
        json,
        serde_json::json!({"role": "assistant", "content": "hello", "model": "mistral"})
    );
}

#[test]
fn given_roles_when_displaying_then_matches_wire_names() {
    assert_eq!(MessageRole::User.to_string(), "user");
    assert_eq!(MessageRole::Assistant.as_str(), "assistant");
}

#[test]
fn given_record_when_serializing_then_timestamp_is_rfc3339() {
    let record = ConversationRecord::new(vec![Message::user("hi")]);
    let json = serde_json::to_value(&record).unwrap();

    let timestamp = json["timestamp"].as_str().unwrap();
    assert!(chrono::DateTime::parse_from_rfc3339(timestamp).is_ok());
    assert_eq!(json["messages"][0]["content"], "hi");
}
