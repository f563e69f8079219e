/// Models the relay backend accepts.
pub const AVAILABLE_MODELS: &[&str] = &["gpt-4.1-mini", "gpt-4", "gpt-3.5-turbo"];

pub const DEFAULT_MODEL: &str = "gpt-4.1-mini";

pub const DEFAULT_DEVELOPER_PROMPT: &str =
    "You are a helpful AI assistant. Please provide clear and helpful responses.";

/// Whether a model id is on the allow-list.
pub fn is_supported_model(model: &str) -> bool {
    AVAILABLE_MODELS.contains(&model)
}

/// Settings applied to the next outgoing turn.
///
/// Mutable between turns; edits never retroactively affect a reply that is
/// already streaming. The credential is not held here: it lives in the relay
/// client built at gate acceptance and is immutable for the session's
/// lifetime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    pub developer_prompt: String,
    pub model: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            developer_prompt: DEFAULT_DEVELOPER_PROMPT.to_string(),
            model: DEFAULT_MODEL.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_model_is_supported() {
        assert!(is_supported_model(DEFAULT_MODEL));
    }

    #[test]
    fn unknown_model_is_rejected() {
        assert!(!is_supported_model("gpt-imaginary"));
        assert!(!is_supported_model(""));
    }
}
