use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq)]
pub enum Compatibility {
    /// Server score in 0..=1.
    Score(f64),
    /// Ready-made label such as `95%`.
    Precomputed(String),
}

impl Compatibility {
    pub fn percentage(&self) -> String {
        match self {
            Compatibility::Score(score) => format!("{:.1}%", score * 100.0),
            Compatibility::Precomputed(label) => label.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MatchCandidate {
    pub name: String,
    pub profession: String,
    pub city: String,
    pub avatar: Option<String>,
    pub compatibility: Compatibility,
}

/// Candidate object as returned by `/match-user/{id}`.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RemoteCandidate {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub profession: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub score: f64,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct MatchesResponse {
    #[serde(default)]
    pub matches: Vec<RemoteCandidate>,
}

impl From<RemoteCandidate> for MatchCandidate {
    fn from(remote: RemoteCandidate) -> Self {
        Self {
            name: remote.name,
            profession: remote.profession,
            city: remote.city,
            avatar: remote.avatar.filter(|a| !a.trim().is_empty()),
            compatibility: Compatibility::Score(remote.score),
        }
    }
}

fn fallback(name: &str, profession: &str, city: &str, avatar: &str, compatibility: &str) -> MatchCandidate {
    MatchCandidate {
        name: name.to_string(),
        profession: profession.to_string(),
        city: city.to_string(),
        avatar: Some(avatar.to_string()),
        compatibility: Compatibility::Precomputed(compatibility.to_string()),
    }
}

/// Shown whenever live retrieval fails or comes back empty.
pub fn fallback_candidates() -> Vec<MatchCandidate> {
    vec![
        fallback("Priya Sharma", "Software Engineer", "Bangalore", "👩‍💻", "95%"),
        fallback("Ananya Gupta", "Marketing Manager", "Mumbai", "👩‍💼", "88%"),
        fallback("Kavya Reddy", "Graphic Designer", "Hyderabad", "👩‍🎨", "82%"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn score_renders_with_one_decimal() {
        assert_eq!(Compatibility::Score(0.876).percentage(), "87.6%");
        assert_eq!(Compatibility::Score(1.0).percentage(), "100.0%");
        assert_eq!(Compatibility::Score(0.0).percentage(), "0.0%");
    }

    #[test]
    fn fallback_list_has_three_percentages() {
        let candidates = fallback_candidates();
        assert_eq!(candidates.len(), 3);
        assert!(candidates
            .iter()
            .all(|c| c.compatibility.percentage().ends_with('%')));
    }

    #[test]
    fn remote_candidate_tolerates_missing_fields() {
        let response: MatchesResponse =
            serde_json::from_str(r#"{"matches":[{"name":"Meera","score":0.5,"avatar":""}]}"#).unwrap();
        let candidate = MatchCandidate::from(response.matches[0].clone());

        assert_eq!(candidate.name, "Meera");
        assert_eq!(candidate.city, "");
        assert_eq!(candidate.avatar, None);
        assert_eq!(candidate.compatibility.percentage(), "50.0%");
    }
}
