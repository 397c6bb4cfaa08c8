use serde::{Deserialize, Serialize};

/// Pieces of information a complete self-introduction is expected to cover.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentElement {
    Name,
    SchoolClass,
    Family,
    Location,
    Hobbies,
}

impl ContentElement {
    pub const ALL: [ContentElement; 5] = [
        ContentElement::Name,
        ContentElement::SchoolClass,
        ContentElement::Family,
        ContentElement::Location,
        ContentElement::Hobbies,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ContentElement::Name => "name",
            ContentElement::SchoolClass => "school/class",
            ContentElement::Family => "family",
            ContentElement::Location => "location",
            ContentElement::Hobbies => "hobbies",
        }
    }
}

impl std::fmt::Display for ContentElement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Keyword group for each content element, one field per element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ElementKeywords {
    pub name: Vec<String>,
    pub school_class: Vec<String>,
    pub family: Vec<String>,
    pub location: Vec<String>,
    pub hobbies: Vec<String>,
}

impl ElementKeywords {
    pub fn get(&self, element: ContentElement) -> &[String] {
        match element {
            ContentElement::Name => &self.name,
            ContentElement::SchoolClass => &self.school_class,
            ContentElement::Family => &self.family,
            ContentElement::Location => &self.location,
            ContentElement::Hobbies => &self.hobbies,
        }
    }

    /// Elements paired with their keyword groups, in [`ContentElement::ALL`] order.
    pub fn iter(&self) -> impl Iterator<Item = (ContentElement, &[String])> + '_ {
        ContentElement::ALL.into_iter().map(|e| (e, self.get(e)))
    }
}

impl Default for ElementKeywords {
    fn default() -> Self {
        Self {
            name: strings(&["name", "i am", "i'm", "myself"]),
            school_class: strings(&["school", "class", "grade", "studying", "student"]),
            family: strings(&[
                "family", "father", "mother", "parents", "brother", "sister", "siblings",
            ]),
            location: strings(&["from", "live", "city", "town", "village", "place"]),
            hobbies: strings(&[
                "hobby", "hobbies", "enjoy", "love", "like", "interest", "passion", "free time",
            ]),
        }
    }
}

pub(crate) fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_iter_follows_fixed_order() {
        let keywords = ElementKeywords::default();
        let order: Vec<ContentElement> = keywords.iter().map(|(e, _)| e).collect();
        assert_eq!(order, ContentElement::ALL.to_vec());
    }

    #[test]
    fn test_get_returns_matching_group() {
        let keywords = ElementKeywords::default();
        assert!(keywords.get(ContentElement::Family).contains(&"siblings".to_string()));
        assert!(keywords.get(ContentElement::Hobbies).contains(&"free time".to_string()));
    }

    #[test]
    fn test_element_serializes_snake_case() {
        let json = serde_json::to_string(&ContentElement::SchoolClass).unwrap();
        assert_eq!(json, "\"school_class\"");
    }

    #[test]
    fn test_partial_keywords_keep_defaults() {
        let parsed: ElementKeywords = serde_json::from_str(r#"{"name": ["call me"]}"#).unwrap();
        assert_eq!(parsed.name, vec!["call me".to_string()]);
        assert_eq!(parsed.family, ElementKeywords::default().family);
    }
}
