/// A problem reported by a grammar checker.
///
/// Only the count affects scoring; the rest is shown as the criterion's
/// "Grammar issues" detail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrammarIssue {
    pub message: String,
    pub offset: usize,
    pub length: usize,
    pub rule_id: String,
}

impl GrammarIssue {
    /// One-line description, e.g. `EN_A_VS_AN @ 20+1: Use "an" instead of "a".`
    pub fn summary(&self) -> String {
        format!(
            "{} @ {}+{}: {}",
            self.rule_id, self.offset, self.length, self.message
        )
    }
}

/// Domain interface for an external grammar-checking service.
pub trait GrammarChecker: Send + Sync {
    fn check(&self, text: &str) -> Result<Vec<GrammarIssue>, Box<dyn std::error::Error>>;
}
