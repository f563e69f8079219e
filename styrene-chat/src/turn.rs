/// One outgoing exchange: the developer prompt, the user's text, and the
/// model to answer with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatTurn {
    pub developer_message: String,
    pub user_message: String,
    pub model: String,
}
