use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::content_element::{strings, ElementKeywords};

/// Largest grammar share of the language criterion; the remainder is vocabulary.
pub const GRAMMAR_SHARE: f64 = 0.6;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RubricError {
    #[error("weight for {criterion} must be a positive finite number, got {weight}")]
    InvalidWeight { criterion: Criterion, weight: f64 },
    #[error("total rubric weight must be positive, got {0}")]
    ZeroTotalWeight(f64),
    #[error("speech rate range must satisfy 0 < min <= ideal <= max, got min={min} ideal={ideal} max={max}")]
    InvalidSpeechRange { min: f64, ideal: f64, max: f64 },
    #[error("fallback {name} must be within [0, {max}], got {value}")]
    InvalidFallback {
        name: &'static str,
        value: f64,
        max: f64,
    },
}

/// The six rubric criteria, in report order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Criterion {
    Salutation,
    ContentStructure,
    SpeechRate,
    LanguageGrammar,
    Clarity,
    Engagement,
}

impl Criterion {
    pub const ALL: [Criterion; 6] = [
        Criterion::Salutation,
        Criterion::ContentStructure,
        Criterion::SpeechRate,
        Criterion::LanguageGrammar,
        Criterion::Clarity,
        Criterion::Engagement,
    ];

    pub fn display_name(self) -> &'static str {
        match self {
            Criterion::Salutation => "Salutation",
            Criterion::ContentStructure => "Content & Structure",
            Criterion::SpeechRate => "Speech Rate",
            Criterion::LanguageGrammar => "Language & Grammar",
            Criterion::Clarity => "Clarity",
            Criterion::Engagement => "Engagement",
        }
    }
}

impl std::fmt::Display for Criterion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SalutationCriterion {
    pub weight: f64,
    pub description: String,
    pub keywords: Vec<String>,
    /// Only this many leading words are searched for greetings.
    pub search_window: usize,
}

impl Default for SalutationCriterion {
    fn default() -> Self {
        Self {
            weight: 5.0,
            description: "Proper greeting and salutation at the beginning".to_string(),
            keywords: strings(&[
                "hi",
                "hello",
                "good morning",
                "good afternoon",
                "good evening",
                "good day",
            ]),
            search_window: 50,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentStructureCriterion {
    pub weight: f64,
    pub description: String,
    pub elements: ElementKeywords,
    pub order_keywords: Vec<String>,
    /// Canonical introduction the transcript is compared against semantically.
    pub ideal_introduction: String,
}

impl Default for ContentStructureCriterion {
    fn default() -> Self {
        Self {
            weight: 20.0,
            description: "Includes name, age, school/class, family, location, and hobbies with good structure".to_string(),
            elements: ElementKeywords::default(),
            order_keywords: strings(&[
                "first", "firstly", "second", "secondly", "then", "next", "finally", "lastly",
            ]),
            ideal_introduction: "My name is [name], I am [age] years old studying in [class]. \
                I come from [location]. My family consists of my parents and siblings. \
                In my free time, I enjoy [hobbies]."
                .to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeechRateCriterion {
    pub weight: f64,
    pub description: String,
    pub ideal_wpm: f64,
    pub min_wpm: f64,
    pub max_wpm: f64,
}

impl Default for SpeechRateCriterion {
    fn default() -> Self {
        Self {
            weight: 10.0,
            description: "Speech rate in words per minute (ideal: 130 WPM)".to_string(),
            ideal_wpm: 130.0,
            min_wpm: 111.0,
            max_wpm: 160.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LanguageGrammarCriterion {
    pub weight: f64,
    pub description: String,
}

impl Default for LanguageGrammarCriterion {
    fn default() -> Self {
        Self {
            weight: 10.0,
            description: "Grammar correctness and vocabulary richness".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClarityCriterion {
    pub weight: f64,
    pub description: String,
    pub filler_words: Vec<String>,
}

impl Default for ClarityCriterion {
    fn default() -> Self {
        Self {
            weight: 15.0,
            description: "Minimal use of filler words".to_string(),
            filler_words: strings(&[
                "um", "uh", "like", "you know", "actually", "basically", "right", "i mean",
                "well", "kind of", "sort of",
            ]),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngagementCriterion {
    pub weight: f64,
    pub description: String,
    pub positive_words: Vec<String>,
    pub emotion_words: Vec<String>,
}

impl Default for EngagementCriterion {
    fn default() -> Self {
        Self {
            weight: 15.0,
            description: "Positive and engaging tone".to_string(),
            positive_words: strings(&[
                "happy",
                "excited",
                "passionate",
                "love",
                "enjoy",
                "great",
                "wonderful",
                "amazing",
                "excellent",
                "enthusiastic",
            ]),
            emotion_words: strings(&[
                "feel",
                "excited",
                "passionate",
                "enthusiastic",
                "proud",
                "grateful",
                "thankful",
            ]),
        }
    }
}

/// Values substituted when a collaborator cannot produce a measurement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FallbackPolicy {
    /// Similarity reported when the embedding model fails, in [0, 1].
    pub semantic_similarity: f64,
    /// Grammar component, as a fraction of the language weight, when no
    /// grammar checker is usable.
    pub grammar_ratio: f64,
}

impl Default for FallbackPolicy {
    fn default() -> Self {
        Self {
            semantic_similarity: 0.5,
            grammar_ratio: GRAMMAR_SHARE,
        }
    }
}

/// Weighted scoring rubric. Built once and read-only afterwards.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Rubric {
    pub salutation: SalutationCriterion,
    pub content_structure: ContentStructureCriterion,
    pub speech_rate: SpeechRateCriterion,
    pub language_grammar: LanguageGrammarCriterion,
    pub clarity: ClarityCriterion,
    pub engagement: EngagementCriterion,
    pub fallbacks: FallbackPolicy,
}

impl Rubric {
    pub fn weight(&self, criterion: Criterion) -> f64 {
        match criterion {
            Criterion::Salutation => self.salutation.weight,
            Criterion::ContentStructure => self.content_structure.weight,
            Criterion::SpeechRate => self.speech_rate.weight,
            Criterion::LanguageGrammar => self.language_grammar.weight,
            Criterion::Clarity => self.clarity.weight,
            Criterion::Engagement => self.engagement.weight,
        }
    }

    pub fn description(&self, criterion: Criterion) -> &str {
        match criterion {
            Criterion::Salutation => &self.salutation.description,
            Criterion::ContentStructure => &self.content_structure.description,
            Criterion::SpeechRate => &self.speech_rate.description,
            Criterion::LanguageGrammar => &self.language_grammar.description,
            Criterion::Clarity => &self.clarity.description,
            Criterion::Engagement => &self.engagement.description,
        }
    }

    /// Normalization denominator for the overall score.
    pub fn total_weight(&self) -> f64 {
        Criterion::ALL.iter().map(|&c| self.weight(c)).sum()
    }

    pub fn validate(&self) -> Result<(), RubricError> {
        for criterion in Criterion::ALL {
            let weight = self.weight(criterion);
            if !weight.is_finite() || weight <= 0.0 {
                return Err(RubricError::InvalidWeight { criterion, weight });
            }
        }

        let total = self.total_weight();
        if !(total.is_finite() && total > 0.0) {
            return Err(RubricError::ZeroTotalWeight(total));
        }

        let rate = &self.speech_rate;
        let ordered = 0.0 < rate.min_wpm && rate.min_wpm <= rate.ideal_wpm && rate.ideal_wpm <= rate.max_wpm;
        if !ordered || !rate.max_wpm.is_finite() {
            return Err(RubricError::InvalidSpeechRange {
                min: rate.min_wpm,
                ideal: rate.ideal_wpm,
                max: rate.max_wpm,
            });
        }

        check_fallback("semantic_similarity", self.fallbacks.semantic_similarity, 1.0)?;
        check_fallback("grammar_ratio", self.fallbacks.grammar_ratio, GRAMMAR_SHARE)?;
        Ok(())
    }
}

fn check_fallback(name: &'static str, value: f64, max: f64) -> Result<(), RubricError> {
    if (0.0..=max).contains(&value) {
        Ok(())
    } else {
        Err(RubricError::InvalidFallback { name, value, max })
    }
}
