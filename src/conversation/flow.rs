use super::{ConversationError, ProfileRecord};

pub const NAME_PLACEHOLDER: &str = "{name}";

/// Number of questions; the flow carries one extra terminal message.
pub const QUESTION_COUNT: usize = 5;

const DEFAULT_PROMPTS: [&str; QUESTION_COUNT + 1] = [
    "Hi there! I'm Saheli, your AI roommate matching assistant. What's your name? 😊",
    "Nice to meet you, {name}! Are you more of an introvert or extrovert?",
    "Got it! Do you smoke or drink alcohol?",
    "What's your preferred budget range for accommodation?",
    "What city are you looking for accommodation in?",
    "Perfect! Let me find some matches for you... 🔍",
];

/// Fixed, ordered prompt templates. The last entry is the terminal message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationFlow {
    prompts: Vec<String>,
}

impl Default for ConversationFlow {
    fn default() -> Self {
        Self {
            prompts: DEFAULT_PROMPTS.iter().map(|p| p.to_string()).collect(),
        }
    }
}

impl ConversationFlow {
    pub fn new(prompts: Vec<String>) -> Result<Self, ConversationError> {
        if prompts.len() != QUESTION_COUNT + 1 {
            return Err(ConversationError::FlowLength {
                expected: QUESTION_COUNT + 1,
                found: prompts.len(),
            });
        }
        Ok(Self { prompts })
    }

    pub fn len(&self) -> usize {
        self.prompts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prompts.is_empty()
    }

    pub fn terminal_step(&self) -> usize {
        self.prompts.len() - 1
    }

    pub fn template(&self, step: usize) -> Option<&str> {
        self.prompts.get(step).map(String::as_str)
    }

    /// Prompt for `step` with the collected name substituted, if there is one.
    pub fn render(&self, step: usize, profile: &ProfileRecord) -> Option<String> {
        let template = self.template(step)?;
        Some(match profile.name.as_deref() {
            Some(name) => template.replace(NAME_PLACEHOLDER, name),
            None => template.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_prompt_substitutes_name() {
        let flow = ConversationFlow::default();
        let profile = ProfileRecord {
            name: Some("Asha".to_string()),
            ..Default::default()
        };

        let rendered = flow.render(1, &profile).unwrap();
        assert_eq!(
            rendered,
            "Nice to meet you, Asha! Are you more of an introvert or extrovert?"
        );
        assert!(!rendered.contains(NAME_PLACEHOLDER));
    }

    #[test]
    fn placeholder_kept_without_a_name() {
        let flow = ConversationFlow::default();
        let rendered = flow.render(1, &ProfileRecord::default()).unwrap();
        assert!(rendered.contains(NAME_PLACEHOLDER));
    }

    #[test]
    fn rejects_wrong_prompt_count() {
        let result = ConversationFlow::new(vec!["only one".into()]);
        assert!(matches!(
            result,
            Err(ConversationError::FlowLength { expected: 6, found: 1 })
        ));
    }

    #[test]
    fn out_of_range_step_renders_nothing() {
        let flow = ConversationFlow::default();
        assert_eq!(flow.terminal_step(), 5);
        assert!(flow.render(6, &ProfileRecord::default()).is_none());
    }
}
