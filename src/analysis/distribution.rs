//! Emotion frequency distribution for the pie/bar chart

use crate::emotion::{Emotion, SampleSet};
use indexmap::IndexMap;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmotionCount {
    pub label: Emotion,
    pub count: usize,
    pub color: &'static str,
}

/// Count face and voice labels as independent observations.
///
/// Entries are in first-seen order: every face label in sample order, then
/// every voice label.
pub fn tally(samples: &SampleSet) -> Vec<EmotionCount> {
    let faces = samples.values().map(|s| &s.face);
    let voices = samples.values().map(|s| &s.voice);

    let mut counts: IndexMap<&Emotion, usize> = IndexMap::new();
    for emotion in faces.chain(voices) {
        *counts.entry(emotion).or_insert(0) += 1;
    }

    counts
        .into_iter()
        .map(|(label, count)| EmotionCount {
            label: label.clone(),
            count,
            color: label.color(),
        })
        .collect()
}

pub fn total(distribution: &[EmotionCount]) -> usize {
    distribution.iter().map(|c| c.count).sum()
}
