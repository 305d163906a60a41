use super::{ConversationError, ConversationFlow, ProfileField, ProfileRecord};
use tracing::debug;

/// What the session should do after one accepted input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advance {
    /// Ask the question at `step`; `text` is already rendered.
    Prompt { step: usize, text: String },
    /// Every question is answered; show the terminal message and start matching.
    Terminal { text: String },
    /// The walkthrough had already finished.
    Complete,
}

/// Linear walk over the flow. Steps only ever move forward.
#[derive(Debug, Clone)]
pub struct ConversationStateMachine {
    flow: ConversationFlow,
    step: usize,
    profile: ProfileRecord,
}

impl Default for ConversationStateMachine {
    fn default() -> Self {
        Self::new(ConversationFlow::default())
    }
}

impl ConversationStateMachine {
    pub fn new(flow: ConversationFlow) -> Self {
        Self {
            flow,
            step: 0,
            profile: ProfileRecord::default(),
        }
    }

    pub fn current_step(&self) -> usize {
        self.step
    }

    pub fn profile(&self) -> &ProfileRecord {
        &self.profile
    }

    pub fn flow(&self) -> &ConversationFlow {
        &self.flow
    }

    pub fn is_finished(&self) -> bool {
        self.step >= self.flow.terminal_step()
    }

    pub fn greeting(&self) -> String {
        self.flow.render(0, &self.profile).unwrap_or_default()
    }

    pub fn submit_input(&mut self, text: &str) -> Result<Advance, ConversationError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ConversationError::EmptyInput);
        }

        let Some(field) = ProfileField::for_step(self.step) else {
            debug!(step = self.step, "Input after the last question, profile left untouched");
            return Ok(Advance::Complete);
        };

        self.profile.set(field, text);
        self.step += 1;
        debug!(field = %field, step = self.step, "Profile field recorded");

        let text = self
            .flow
            .render(self.step, &self.profile)
            .ok_or(ConversationError::MissingPrompt(self.step))?;

        if self.step < self.flow.terminal_step() {
            Ok(Advance::Prompt {
                step: self.step,
                text,
            })
        } else {
            Ok(Advance::Terminal { text })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ANSWERS: [&str; 5] = ["Asha", "Introvert", "Neither", "10-15k", "Bangalore"];

    #[test]
    fn each_step_writes_only_its_field() {
        for (step, field) in ProfileField::ORDER.iter().enumerate() {
            let mut machine = ConversationStateMachine::default();
            for answer in &ANSWERS[..step] {
                machine.submit_input(answer).unwrap();
            }
            let before = machine.profile().clone();

            machine.submit_input("marker").unwrap();

            for other in ProfileField::ORDER.iter().filter(|f| *f != field) {
                assert_eq!(machine.profile().get(*other), before.get(*other));
            }
            assert_eq!(machine.profile().get(*field), Some("marker"));
        }
    }

    #[test]
    fn five_answers_fill_the_profile_in_order() {
        let mut machine = ConversationStateMachine::default();
        let mut outcomes = Vec::new();
        for answer in ANSWERS {
            outcomes.push(machine.submit_input(answer).unwrap());
        }

        assert_eq!(machine.current_step(), 5);
        assert!(machine.is_finished());
        let profile = machine.profile();
        assert_eq!(profile.name.as_deref(), Some("Asha"));
        assert_eq!(profile.personality.as_deref(), Some("Introvert"));
        assert_eq!(profile.habits.as_deref(), Some("Neither"));
        assert_eq!(profile.budget.as_deref(), Some("10-15k"));
        assert_eq!(profile.city.as_deref(), Some("Bangalore"));

        assert_eq!(
            outcomes[0],
            Advance::Prompt {
                step: 1,
                text: "Nice to meet you, Asha! Are you more of an introvert or extrovert?".into(),
            }
        );
        assert!(matches!(outcomes[4], Advance::Terminal { .. }));
    }

    #[test]
    fn input_after_terminal_step_is_a_no_op() {
        let mut machine = ConversationStateMachine::default();
        for answer in ANSWERS {
            machine.submit_input(answer).unwrap();
        }
        let before = machine.profile().clone();

        assert_eq!(machine.submit_input("one more").unwrap(), Advance::Complete);
        assert_eq!(machine.submit_input("and another").unwrap(), Advance::Complete);
        assert_eq!(machine.profile(), &before);
        assert_eq!(machine.current_step(), 5);
    }

    #[test]
    fn blank_input_is_rejected_without_advancing() {
        let mut machine = ConversationStateMachine::default();
        assert!(matches!(
            machine.submit_input("   "),
            Err(ConversationError::EmptyInput)
        ));
        assert_eq!(machine.current_step(), 0);
        assert_eq!(machine.profile(), &ProfileRecord::default());
    }

    #[test]
    fn input_is_trimmed_before_storing() {
        let mut machine = ConversationStateMachine::default();
        machine.submit_input("  Asha \n").unwrap();
        assert_eq!(machine.profile().name.as_deref(), Some("Asha"));
    }
}
