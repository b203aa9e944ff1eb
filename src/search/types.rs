use crate::songs::Song;
use serde::{Deserialize, Serialize};

/// Song fields that take part in fuzzy matching, with their relative weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchField {
    Title,
    Content,
    Number,
    Kind,
}

impl SearchField {
    pub const ALL: [SearchField; 4] = [
        SearchField::Title,
        SearchField::Content,
        SearchField::Number,
        SearchField::Kind,
    ];

    pub fn weight(&self) -> f64 {
        match self {
            SearchField::Title => 2.0,
            SearchField::Content => 1.0,
            SearchField::Number => 1.0,
            SearchField::Kind => 0.5,
        }
    }

    /// Weight scaled so that all field weights add up to 1.
    pub fn normalized_weight(&self) -> f64 {
        let total: f64 = Self::ALL.iter().map(SearchField::weight).sum();
        self.weight() / total
    }
}

/// One ranked match. `score` is a distance in `[0, 1]`, 0 being exact.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit {
    pub song: Song,
    pub score: f64,
}

/// Outcome of a wholesale index rebuild.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RebuildStats {
    pub indexed: usize,
    pub skipped: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResultItem {
    #[serde(flatten)]
    pub song: Song,
    pub score: f64,
}

impl From<SearchHit> for SearchResultItem {
    fn from(hit: SearchHit) -> Self {
        Self {
            song: hit.song,
            score: hit.score,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub query: String,
    pub count: usize,
    /// Plain substring matches over title/content, reported next to the fuzzy
    /// results to spot an index that drifted from the corpus.
    #[serde(rename = "manualMatches")]
    pub manual_matches: usize,
    pub results: Vec<SearchResultItem>,
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
}
