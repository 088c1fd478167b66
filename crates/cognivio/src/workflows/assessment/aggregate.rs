use super::domain::{ElementScore, PerformanceLevel};
use super::narrative::ElementRating;
use super::normalizer::level_for;
use std::collections::HashMap;

/// How many trailing observations a summary keeps.
pub const OBSERVATION_TAIL: usize = 5;

/// Rollup of every score recorded for one element inside an aggregation window.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateElementSummary {
    pub element_id: String,
    pub element_name: String,
    pub mean: f64,
    pub count: usize,
    pub observations: Vec<String>,
}

impl AggregateElementSummary {
    pub fn level(&self) -> PerformanceLevel {
        level_for(self.mean)
    }
}

/// Element summaries keyed by element id, kept in first-seen order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ElementAggregates {
    entries: Vec<AggregateElementSummary>,
    index: HashMap<String, usize>,
}

impl ElementAggregates {
    pub fn get(&self, element_id: &str) -> Option<&AggregateElementSummary> {
        self.index.get(element_id).map(|&slot| &self.entries[slot])
    }

    pub fn iter(&self) -> std::slice::Iter<'_, AggregateElementSummary> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn overall(&self) -> Option<f64> {
        overall(self)
    }

    /// Name/mean pairs in first-seen order, as consumed by the narrative rules.
    pub fn ratings(&self) -> Vec<ElementRating> {
        self.entries
            .iter()
            .map(|summary| ElementRating::new(summary.element_name.clone(), summary.mean))
            .collect()
    }
}

impl<'a> IntoIterator for &'a ElementAggregates {
    type Item = &'a AggregateElementSummary;
    type IntoIter = std::slice::Iter<'a, AggregateElementSummary>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[derive(Default)]
struct Bucket {
    element_id: String,
    element_name: String,
    total: f64,
    count: usize,
    observations: Vec<String>,
}

/// Groups scores by exact element id and averages each group.
pub fn aggregate<'a, I>(scores: I) -> ElementAggregates
where
    I: IntoIterator<Item = &'a ElementScore>,
{
    let mut buckets: Vec<Bucket> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for score in scores {
        let slot = *index
            .entry(score.element_id().to_string())
            .or_insert_with(|| {
                buckets.push(Bucket {
                    element_id: score.element_id().to_string(),
                    element_name: score.element_name().to_string(),
                    ..Bucket::default()
                });
                buckets.len() - 1
            });

        let bucket = &mut buckets[slot];
        bucket.total += score.score();
        bucket.count += 1;
        bucket
            .observations
            .extend(score.observations().iter().cloned());
    }

    let entries = buckets
        .into_iter()
        .filter(|bucket| bucket.count > 0)
        .map(|mut bucket| {
            let skip = bucket.observations.len().saturating_sub(OBSERVATION_TAIL);
            bucket.observations.drain(..skip);
            AggregateElementSummary {
                element_id: bucket.element_id,
                element_name: bucket.element_name,
                mean: bucket.total / bucket.count as f64,
                count: bucket.count,
                observations: bucket.observations,
            }
        })
        .collect();

    ElementAggregates { entries, index }
}

/// Mean of the element means; `None` when nothing was aggregated.
pub fn overall(summaries: &ElementAggregates) -> Option<f64> {
    mean(summaries.iter().map(|summary| summary.mean))
}

pub(crate) fn mean<I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = f64>,
{
    let (total, count) = values
        .into_iter()
        .fold((0.0, 0usize), |(total, count), value| (total + value, count + 1));
    if count == 0 {
        None
    } else {
        Some(total / count as f64)
    }
}
