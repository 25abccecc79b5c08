use serde::{Deserialize, Serialize};

/// Capital-area regions excluded by the default targeting policy.
pub const METRO_REGIONS: [&str; 3] = ["서울", "경기", "인천"];

/// Rights-analysis terms signalling obligations that pass to the buyer.
pub const RISK_KEYWORDS: [&str; 6] = [
    "선순위",
    "대항력",
    "인수",
    "임차인",
    "최우선변제권",
    "소액임차인",
];

/// Terms marking share sales, separately registered land, liens and injunctions.
pub const SPECIAL_PROPERTY_KEYWORDS: [&str; 8] = [
    "지분",
    "토지별도등기",
    "구분지상권",
    "법정지상권",
    "분묘기지권",
    "유치권",
    "저당",
    "가처분",
];

pub fn is_metro_region(region: &str) -> bool {
    METRO_REGIONS.contains(&region)
}

/// Closed list of terms matched as case-sensitive substrings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeywordSet {
    terms: Vec<String>,
}

impl KeywordSet {
    pub fn new<I, S>(terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let terms = terms
            .into_iter()
            .map(Into::into)
            .map(|term: String| term.trim().to_string())
            .filter(|term| !term.is_empty())
            .collect();
        Self { terms }
    }

    /// Comma-separated list, as carried by environment variables.
    pub fn parse_list(raw: &str) -> Self {
        Self::new(raw.split(','))
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn first_match(&self, text: &str) -> Option<&str> {
        self.terms
            .iter()
            .find(|term| text.contains(term.as_str()))
            .map(String::as_str)
    }
}

/// The two term sets consulted by the rights and special-property stages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordCatalog {
    pub risk: KeywordSet,
    pub special: KeywordSet,
}

impl KeywordCatalog {
    pub fn standard() -> Self {
        Self {
            risk: KeywordSet::new(RISK_KEYWORDS),
            special: KeywordSet::new(SPECIAL_PROPERTY_KEYWORDS),
        }
    }
}

impl Default for KeywordCatalog {
    fn default() -> Self {
        Self::standard()
    }
}
