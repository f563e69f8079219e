use serde::Serialize;

use styrene_chat::ChatTurn;

/// Wire body for `POST /api/chat`. The credential travels in the body, not
/// in a header.
#[derive(Serialize)]
pub(crate) struct ChatRequestBody<'a> {
    pub developer_message: &'a str,
    pub user_message: &'a str,
    pub model: &'a str,
    pub api_key: &'a str,
}

impl<'a> ChatRequestBody<'a> {
    pub fn new(turn: &'a ChatTurn, api_key: &'a str) -> Self {
        Self {
            developer_message: &turn.developer_message,
            user_message: &turn.user_message,
            model: &turn.model,
            api_key,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_serializes_with_exact_field_names() {
        let turn = ChatTurn {
            developer_message: "be helpful".to_string(),
            user_message: "hi".to_string(),
            model: "gpt-4.1-mini".to_string(),
        };
        let body = ChatRequestBody::new(&turn, "sk-test");

        let value = serde_json::to_value(&body).expect("body should serialize");
        assert_eq!(value["developer_message"], "be helpful");
        assert_eq!(value["user_message"], "hi");
        assert_eq!(value["model"], "gpt-4.1-mini");
        assert_eq!(value["api_key"], "sk-test");
        assert_eq!(value.as_object().map(|o| o.len()), Some(4));
    }
}
