use super::tokenizer::{normalize, word_starts};
use super::types::{RebuildStats, SearchField, SearchHit};
use crate::songs::Song;

/// Maximum per-field distance that still counts as a match.
pub const MATCH_THRESHOLD: f64 = 0.4;
/// Terms shorter than this only match by containment.
pub const MIN_MATCH_CHARS: usize = 2;

struct IndexedSong {
    song: Song,
    fields: Vec<(SearchField, String)>,
}

/// Weighted fuzzy index over the song corpus.
///
/// The index has no identity of its own: it is always replaced wholesale from
/// the full corpus, never patched.
#[derive(Default)]
pub struct SearchIndex {
    entries: Vec<IndexedSong>,
}

impl SearchIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the index contents with `corpus`.
    ///
    /// Songs without title or content are skipped (and logged) instead of
    /// failing the rebuild. The new entries are assembled off to the side and
    /// swapped in at the end.
    pub fn rebuild(&mut self, corpus: &[Song]) -> RebuildStats {
        let mut stats = RebuildStats::default();
        let mut entries = Vec::with_capacity(corpus.len());

        for song in corpus {
            if !song.is_searchable() {
                tracing::warn!("Skipping song {} in search index: missing title or content", song.id);
                stats.skipped += 1;
                continue;
            }
            entries.push(IndexedSong {
                fields: indexed_fields(song),
                song: song.clone(),
            });
            stats.indexed += 1;
        }

        self.entries = entries;
        tracing::debug!(
            "Search index rebuilt: {} indexed, {} skipped",
            stats.indexed,
            stats.skipped
        );
        stats
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Ranks every indexed song against `term`, best (lowest distance) first.
    ///
    /// Callers are expected to reject blank terms; a blank term matches nothing.
    pub fn query(&self, term: &str) -> Vec<SearchHit> {
        let term = normalize(term);
        if term.is_empty() {
            return Vec::new();
        }

        let mut hits: Vec<SearchHit> = self
            .entries
            .iter()
            .filter_map(|entry| {
                score_entry(&term, entry).map(|score| SearchHit {
                    song: entry.song.clone(),
                    score,
                })
            })
            .collect();

        // Stable sort: equal scores keep corpus order.
        hits.sort_by(|a, b| a.score.total_cmp(&b.score));
        hits
    }
}

/// Searchable songs in `corpus` whose title or content contain `term`
/// verbatim (case-insensitive).
///
/// Runs over the store's corpus rather than the index, so a count above the
/// number of fuzzy hits means the index is behind the store.
pub fn substring_matches(term: &str, corpus: &[Song]) -> usize {
    let term = normalize(term);
    if term.is_empty() {
        return 0;
    }
    corpus
        .iter()
        .filter(|song| song.is_searchable())
        .filter(|song| {
            let in_title = song
                .title
                .as_deref()
                .is_some_and(|title| normalize(title).contains(&term));
            let in_content = song
                .content_text()
                .is_some_and(|content| normalize(&content).contains(&term));
            in_title || in_content
        })
        .count()
}

fn indexed_fields(song: &Song) -> Vec<(SearchField, String)> {
    let mut fields = Vec::with_capacity(SearchField::ALL.len());
    if let Some(title) = &song.title {
        fields.push((SearchField::Title, normalize(title)));
    }
    if let Some(content) = song.content_text() {
        fields.push((SearchField::Content, normalize(&content)));
    }
    if let Some(nh) = song.nh {
        fields.push((SearchField::Number, nh.to_string()));
    }
    if let Some(kind) = &song.kind {
        fields.push((SearchField::Kind, normalize(kind.as_str())));
    }
    fields
}

/// Combines per-field distances into one score: the product of each matching
/// field's distance raised to its normalized weight. `None` when no field
/// matches.
fn score_entry(term: &str, entry: &IndexedSong) -> Option<f64> {
    let mut score = 1.0f64;
    let mut matched = false;

    for (field, text) in &entry.fields {
        if let Some(distance) = field_distance(term, text) {
            matched = true;
            score *= distance.max(f64::EPSILON).powf(field.normalized_weight());
        }
    }

    matched.then(|| score.clamp(0.0, 1.0))
}

/// Distance between an already-normalized term and field text.
///
/// Zero when the text contains the term. Otherwise the best
/// `1 - ratio` over term-sized windows starting at each word, kept only when
/// it is within [`MATCH_THRESHOLD`].
pub fn field_distance(term: &str, text: &str) -> Option<f64> {
    if term.is_empty() || text.is_empty() {
        return None;
    }
    if text.contains(term) {
        return Some(0.0);
    }

    let term_len = term.chars().count();
    if term_len < MIN_MATCH_CHARS {
        return None;
    }

    let chars: Vec<char> = text.chars().collect();
    let mut best = 1.0f64;
    for start in word_starts(&chars) {
        let end = (start + term_len).min(chars.len());
        let window = &chars[start..end];
        let similarity = rapidfuzz::fuzz::ratio(term.chars(), window.iter().copied());
        best = best.min(1.0 - similarity);
    }

    (best <= MATCH_THRESHOLD).then_some(best)
}
