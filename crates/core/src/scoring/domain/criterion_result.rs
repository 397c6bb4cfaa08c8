use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::rubric::domain::rubric::Criterion;

/// A single diagnostic value shown next to a criterion's feedback.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DetailValue {
    Count(u64),
    Text(String),
}

impl std::fmt::Display for DetailValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DetailValue::Count(n) => write!(f, "{n}"),
            DetailValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<usize> for DetailValue {
    fn from(n: usize) -> Self {
        DetailValue::Count(n as u64)
    }
}

impl From<String> for DetailValue {
    fn from(s: String) -> Self {
        DetailValue::Text(s)
    }
}

impl From<&str> for DetailValue {
    fn from(s: &str) -> Self {
        DetailValue::Text(s.to_string())
    }
}

impl From<bool> for DetailValue {
    fn from(b: bool) -> Self {
        DetailValue::Text(if b { "Yes" } else { "No" }.to_string())
    }
}

/// Label → value pairs, kept in insertion order and serialized as a JSON object.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Details(Vec<(String, DetailValue)>);

impl Details {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, label: &str, value: impl Into<DetailValue>) -> Self {
        self.0.push((label.to_string(), value.into()));
        self
    }

    pub fn get(&self, label: &str) -> Option<&DetailValue> {
        self.0.iter().find(|(l, _)| l == label).map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &DetailValue)> {
        self.0.iter().map(|(l, v)| (l.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for Details {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (label, value) in &self.0 {
            map.serialize_entry(label, value)?;
        }
        map.end()
    }
}

/// Score and feedback for one rubric criterion.
///
/// `score` is always within `[0, max_score]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CriterionResult {
    #[serde(skip)]
    pub criterion: Criterion,
    pub name: String,
    pub score: f64,
    pub max_score: f64,
    pub feedback: String,
    /// Raw words-per-minute; only the speech-rate criterion sets this.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wpm: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Details>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keywords_found: Option<Vec<String>>,
}

impl CriterionResult {
    pub fn new(criterion: Criterion, score: f64, max_score: f64, feedback: impl Into<String>) -> Self {
        let score = if score.is_finite() { score.clamp(0.0, max_score) } else { 0.0 };
        Self {
            criterion,
            name: criterion.display_name().to_string(),
            score,
            max_score,
            feedback: feedback.into(),
            wpm: None,
            details: None,
            keywords_found: None,
        }
    }

    pub fn with_details(mut self, details: Details) -> Self {
        self.details = Some(details);
        self
    }

    pub fn with_keywords<S: AsRef<str>>(mut self, keywords: &[S]) -> Self {
        self.keywords_found = Some(keywords.iter().map(|k| k.as_ref().to_string()).collect());
        self
    }

    pub fn with_wpm(mut self, wpm: f64) -> Self {
        self.wpm = Some(wpm);
        self
    }

    /// Fraction of the criterion's weight earned, in [0, 1].
    pub fn ratio(&self) -> f64 {
        if self.max_score > 0.0 {
            self.score / self.max_score
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_score_clamped_to_max() {
        let r = CriterionResult::new(Criterion::Clarity, 17.0, 15.0, "");
        assert_relative_eq!(r.score, 15.0);
    }

    #[test]
    fn test_score_clamped_to_zero() {
        let r = CriterionResult::new(Criterion::Clarity, -1.0, 15.0, "");
        assert_relative_eq!(r.score, 0.0);
    }

    #[test]
    fn test_nan_score_becomes_zero() {
        let r = CriterionResult::new(Criterion::Clarity, f64::NAN, 15.0, "");
        assert_relative_eq!(r.score, 0.0);
    }

    #[test]
    fn test_name_from_criterion() {
        let r = CriterionResult::new(Criterion::ContentStructure, 1.0, 20.0, "ok");
        assert_eq!(r.name, "Content & Structure");
        assert_relative_eq!(r.ratio(), 0.05);
    }

    #[test]
    fn test_serialization_omits_absent_optionals() {
        let r = CriterionResult::new(Criterion::Salutation, 5.0, 5.0, "Hi");
        let json = serde_json::to_value(&r).unwrap();
        let obj = json.as_object().unwrap();
        assert_eq!(
            obj.keys().cloned().collect::<Vec<_>>(),
            vec!["feedback", "max_score", "name", "score"]
        );
    }

    #[test]
    fn test_details_serialize_in_insertion_order() {
        let details = Details::new()
            .with("Zeta", 3usize)
            .with("Alpha", "text")
            .with("Shows emotion", true);
        let json = serde_json::to_string(&details).unwrap();
        assert_eq!(json, r#"{"Zeta":3,"Alpha":"text","Shows emotion":"Yes"}"#);
    }

    #[test]
    fn test_details_lookup() {
        let details = Details::new().with("Grammar errors", 2usize);
        assert_eq!(details.get("Grammar errors"), Some(&DetailValue::Count(2)));
        assert_eq!(details.get("missing"), None);
        assert_eq!(details.len(), 1);
    }
}
