use serde::{Deserialize, Serialize};
use std::fmt;

/// Answers collected during the walkthrough, one field per question.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub personality: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub habits: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileField {
    Name,
    Personality,
    Habits,
    Budget,
    City,
}

impl ProfileField {
    /// Question order: step `i` fills `ORDER[i]`.
    pub const ORDER: [ProfileField; 5] = [
        ProfileField::Name,
        ProfileField::Personality,
        ProfileField::Habits,
        ProfileField::Budget,
        ProfileField::City,
    ];

    pub fn for_step(step: usize) -> Option<Self> {
        Self::ORDER.get(step).copied()
    }

    pub fn key(&self) -> &'static str {
        match self {
            ProfileField::Name => "name",
            ProfileField::Personality => "personality",
            ProfileField::Habits => "habits",
            ProfileField::Budget => "budget",
            ProfileField::City => "city",
        }
    }
}

impl fmt::Display for ProfileField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl ProfileRecord {
    pub fn set(&mut self, field: ProfileField, value: impl Into<String>) {
        let slot = match field {
            ProfileField::Name => &mut self.name,
            ProfileField::Personality => &mut self.personality,
            ProfileField::Habits => &mut self.habits,
            ProfileField::Budget => &mut self.budget,
            ProfileField::City => &mut self.city,
        };
        *slot = Some(value.into());
    }

    pub fn get(&self, field: ProfileField) -> Option<&str> {
        match field {
            ProfileField::Name => self.name.as_deref(),
            ProfileField::Personality => self.personality.as_deref(),
            ProfileField::Habits => self.habits.as_deref(),
            ProfileField::Budget => self.budget.as_deref(),
            ProfileField::City => self.city.as_deref(),
        }
    }

    pub fn is_complete(&self) -> bool {
        ProfileField::ORDER.iter().all(|f| self.get(*f).is_some())
    }
}
