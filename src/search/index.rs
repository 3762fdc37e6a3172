//! Weighted fuzzy search index.
//!
//! The index holds a lowercased, per-field projection of every
//! search-eligible item (published, not `now`). It is built once per
//! repository generation and never modified.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::fuzzy::token_score;
use crate::domain::ContentItem;
use crate::library::ContentRepository;

/// Floor for an exact (zero-edit) field score, which would otherwise zero
/// out the product. Matches carry no position penalty, so every exact
/// substring hits this floor; it is kept close to a one-edit score.
const EXACT_SCORE: f64 = 1e-3;

/// Indexed fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SearchField {
    Title,
    Tags,
    Description,
    Content,
    Category,
    TechStack,
}

impl SearchField {
    pub const ALL: [SearchField; 6] = [
        SearchField::Title,
        SearchField::Tags,
        SearchField::Description,
        SearchField::Content,
        SearchField::Category,
        SearchField::TechStack,
    ];

    fn values(self, item: &ContentItem) -> Vec<&str> {
        match self {
            SearchField::Title => vec![item.title.as_str()],
            SearchField::Tags => item.tags.iter().map(String::as_str).collect(),
            SearchField::Description => item.description.as_deref().into_iter().collect(),
            SearchField::Content => vec![item.content.as_str()],
            SearchField::Category => item.category.as_deref().into_iter().collect(),
            SearchField::TechStack => item.tech_stack.iter().map(String::as_str).collect(),
        }
    }
}

impl std::fmt::Display for SearchField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            SearchField::Title => "title",
            SearchField::Tags => "tags",
            SearchField::Description => "description",
            SearchField::Content => "content",
            SearchField::Category => "category",
            SearchField::TechStack => "techStack",
        };
        f.write_str(name)
    }
}

/// Relative field weights. Only the ratios matter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldWeights {
    #[serde(default = "default_title_weight")]
    pub title: f64,
    #[serde(default = "default_tags_weight")]
    pub tags: f64,
    #[serde(default = "default_description_weight")]
    pub description: f64,
    #[serde(default = "default_minor_weight")]
    pub content: f64,
    #[serde(default = "default_minor_weight")]
    pub category: f64,
    #[serde(default = "default_minor_weight")]
    pub tech_stack: f64,
}

fn default_title_weight() -> f64 {
    0.3
}
fn default_tags_weight() -> f64 {
    0.2
}
fn default_description_weight() -> f64 {
    0.2
}
fn default_minor_weight() -> f64 {
    0.1
}

impl Default for FieldWeights {
    fn default() -> Self {
        Self {
            title: default_title_weight(),
            tags: default_tags_weight(),
            description: default_description_weight(),
            content: default_minor_weight(),
            category: default_minor_weight(),
            tech_stack: default_minor_weight(),
        }
    }
}

impl FieldWeights {
    pub fn get(&self, field: SearchField) -> f64 {
        match field {
            SearchField::Title => self.title,
            SearchField::Tags => self.tags,
            SearchField::Description => self.description,
            SearchField::Content => self.content,
            SearchField::Category => self.category,
            SearchField::TechStack => self.tech_stack,
        }
    }

    /// Weights scaled to sum to one; negative weights count as zero
    fn normalized(&self) -> Vec<(SearchField, f64)> {
        let total: f64 = SearchField::ALL.iter().map(|f| self.get(*f).max(0.0)).sum();
        SearchField::ALL
            .iter()
            .map(|f| {
                let w = self.get(*f).max(0.0);
                (*f, if total > 0.0 { w / total } else { 0.0 })
            })
            .collect()
    }
}

/// Search tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchOptions {
    /// Allowed edits per token character: 0 = exact, 1 = anything
    #[serde(default = "default_threshold")]
    pub threshold: f64,

    /// Maximum number of results
    #[serde(default = "default_limit")]
    pub limit: usize,

    /// Query tokens shorter than this are ignored
    #[serde(default = "default_min_token_len")]
    pub min_token_len: usize,

    #[serde(default)]
    pub weights: FieldWeights,
}

fn default_threshold() -> f64 {
    0.4
}
fn default_limit() -> usize {
    6
}
fn default_min_token_len() -> usize {
    2
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
            limit: default_limit(),
            min_token_len: default_min_token_len(),
            weights: FieldWeights::default(),
        }
    }
}

impl SearchOptions {
    /// Split a query into lowercase tokens long enough to search for
    pub fn tokenize(&self, query: &str) -> Vec<Vec<char>> {
        query
            .split_whitespace()
            .map(|t| t.to_lowercase().chars().collect::<Vec<char>>())
            .filter(|t| t.len() >= self.min_token_len.max(1))
            .collect()
    }
}

/// One lowercased field value
#[derive(Debug, Clone)]
struct IndexedValue {
    chars: Vec<char>,
    /// Field-length norm: 1 / sqrt(word count)
    norm: f64,
}

impl IndexedValue {
    fn new(value: &str) -> Self {
        let words = value.split_whitespace().count().max(1);
        Self {
            chars: value.to_lowercase().chars().collect(),
            norm: 1.0 / (words as f64).sqrt(),
        }
    }
}

#[derive(Debug, Clone)]
struct IndexedField {
    field: SearchField,
    weight: f64,
    values: Vec<IndexedValue>,
}

#[derive(Debug, Clone)]
struct IndexedDoc {
    item: Arc<ContentItem>,
    fields: Vec<IndexedField>,
}

/// A ranked search result
#[derive(Debug, Clone, Serialize)]
pub struct SearchHit {
    pub item: Arc<ContentItem>,

    /// Lower is better, in (0, 1]
    pub score: f64,

    /// Fields in which at least one query token matched
    pub matched_fields: Vec<SearchField>,
}

/// Immutable fuzzy index over search-eligible items
#[derive(Debug, Clone)]
pub struct SearchIndex {
    docs: Vec<IndexedDoc>,
    options: SearchOptions,
}

impl SearchIndex {
    /// Index the published, searchable items of `repository`
    pub fn build(repository: &ContentRepository, options: SearchOptions) -> Self {
        let mut options = options;
        options.threshold = options.threshold.clamp(0.0, 1.0);
        let weights = options.weights.normalized();

        let docs: Vec<IndexedDoc> = repository
            .get_all()
            .iter()
            .filter(|item| item.is_search_eligible())
            .map(|item| IndexedDoc {
                item: Arc::clone(item),
                fields: weights
                    .iter()
                    .filter(|(_, weight)| *weight > 0.0)
                    .map(|(field, weight)| IndexedField {
                        field: *field,
                        weight: *weight,
                        values: field
                            .values(item)
                            .into_iter()
                            .filter(|v| !v.trim().is_empty())
                            .map(IndexedValue::new)
                            .collect(),
                    })
                    .filter(|f| !f.values.is_empty())
                    .collect(),
            })
            .collect();

        tracing::debug!(documents = docs.len(), "Built search index");
        Self { docs, options }
    }

    pub fn options(&self) -> &SearchOptions {
        &self.options
    }

    /// Number of indexed items
    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    /// Rank every matching item, best first, capped at `limit`.
    ///
    /// Queries with no usable tokens match nothing.
    pub fn search(&self, query: &str, limit: usize) -> Vec<SearchHit> {
        let tokens = self.options.tokenize(query);
        if tokens.is_empty() || limit == 0 {
            return Vec::new();
        }

        let mut hits: Vec<SearchHit> = self
            .docs
            .iter()
            .filter_map(|doc| self.score_doc(doc, &tokens))
            .collect();

        // Stable: equal scores keep index (newest-first) order
        hits.sort_by(|a, b| a.score.total_cmp(&b.score));
        hits.truncate(limit);
        hits
    }

    fn score_doc(&self, doc: &IndexedDoc, tokens: &[Vec<char>]) -> Option<SearchHit> {
        let threshold = self.options.threshold;
        let mut token_matched = vec![false; tokens.len()];
        let mut total = 1.0_f64;
        let mut matched_fields = Vec::new();

        for field in &doc.fields {
            // Best value of this field: (mean token score, norm)
            let mut best: Option<(f64, f64)> = None;

            for value in &field.values {
                let mut sum = 0.0;
                let mut any = false;

                for (i, token) in tokens.iter().enumerate() {
                    match token_score(token, &value.chars, threshold) {
                        Some(score) => {
                            token_matched[i] = true;
                            any = true;
                            sum += score;
                        }
                        None => sum += 1.0,
                    }
                }

                if any {
                    let mean = sum / tokens.len() as f64;
                    if best.map_or(true, |(b, _)| mean < b) {
                        best = Some((mean, value.norm));
                    }
                }
            }

            if let Some((score, norm)) = best {
                let base = if score == 0.0 { EXACT_SCORE } else { score };
                total *= base.powf(field.weight * norm);
                matched_fields.push(field.field);
            }
        }

        if !token_matched.iter().all(|m| *m) {
            return None;
        }

        Some(SearchHit {
            item: Arc::clone(&doc.item),
            score: total,
            matched_fields,
        })
    }
}
