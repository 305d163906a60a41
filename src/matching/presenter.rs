use super::{ConfettiBurst, MatchCandidate, MatchOutcome, MatchSource};
use std::time::Duration;

pub const DEFAULT_AVATAR: &str = "👤";

#[derive(Debug, Clone, PartialEq)]
pub struct MatchCard {
    pub name: String,
    pub profession: String,
    pub city: String,
    pub avatar: String,
    /// e.g. `87.6%`
    pub compatibility: String,
    pub reveal_delay: Duration,
}

impl MatchCard {
    fn from_candidate(candidate: MatchCandidate, reveal_delay: Duration) -> Self {
        Self {
            compatibility: candidate.compatibility.percentage(),
            avatar: candidate
                .avatar
                .unwrap_or_else(|| DEFAULT_AVATAR.to_string()),
            name: candidate.name,
            profession: candidate.profession,
            city: candidate.city,
            reveal_delay,
        }
    }

    pub fn compatibility_label(&self) -> String {
        format!("{} Compatible", self.compatibility)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResultsView {
    pub headline: String,
    pub cards: Vec<MatchCard>,
    pub source: MatchSource,
    pub confetti: ConfettiBurst,
    /// When the staggered card reveal starts, counted from rendering.
    pub reveal_after: Duration,
}

impl ResultsView {
    pub fn new(
        outcome: MatchOutcome,
        confetti: ConfettiBurst,
        reveal_after: Duration,
        stagger: Duration,
    ) -> Self {
        let cards: Vec<MatchCard> = outcome
            .candidates
            .into_iter()
            .enumerate()
            .map(|(i, candidate)| MatchCard::from_candidate(candidate, stagger * i as u32))
            .collect();

        Self {
            headline: format!(
                "Great news! We found {} perfect matches for you! 🎉",
                cards.len()
            ),
            cards,
            source: outcome.source,
            confetti,
            reveal_after,
        }
    }
}
