//! Reduce scored news into sentiment summaries

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::model::{NewsItem, Region, TimeWindow};

/// Share of positive, negative and neutral items plus the mean polarity
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SentimentSummary {
    pub positive_share: f64,
    pub negative_share: f64,
    pub neutral_share: f64,
    pub mean_sentiment: f64,
    /// Number of items the summary was built from
    pub count: usize,
}

impl SentimentSummary {
    /// Mean sentiment rescaled from [-1, 1] to [0, 1]
    pub fn scaled(&self) -> f64 {
        ((self.mean_sentiment + 1.0) / 2.0).clamp(0.0, 1.0)
    }

    /// How far the scaled sentiment sits from neutral, in [0, 1]
    pub fn distance_from_neutral(&self) -> f64 {
        ((self.scaled() - 0.5).abs() * 2.0).clamp(0.0, 1.0)
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

/// Sentiment summary for a single UTC calendar day
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailySentiment {
    pub date: NaiveDate,
    pub summary: SentimentSummary,
}

/// Buckets news polarity into positive/negative/neutral and averages it
#[derive(Debug, Clone, Copy)]
pub struct SentimentAggregator {
    /// Items strictly above this are positive
    pub positive_threshold: f64,
    /// Items strictly below this are negative
    pub negative_threshold: f64,
}

impl Default for SentimentAggregator {
    fn default() -> Self {
        Self {
            positive_threshold: 0.3,
            negative_threshold: -0.3,
        }
    }
}

impl SentimentAggregator {
    /// Summarize a set of items. An empty set yields all-zero shares and a
    /// mean of 0.
    pub fn aggregate<'a, I>(&self, items: I) -> SentimentSummary
    where
        I: IntoIterator<Item = &'a NewsItem>,
    {
        let mut items: Vec<&NewsItem> = items.into_iter().collect();
        if items.is_empty() {
            return SentimentSummary::default();
        }

        // Fixed summation order keeps the mean bit-identical across input orderings
        sort_chronologically(&mut items);

        let (mut positive, mut negative, mut neutral) = (0_usize, 0_usize, 0_usize);
        let mut total = 0.0;
        for item in &items {
            total += item.sentiment;
            if item.sentiment > self.positive_threshold {
                positive += 1;
            } else if item.sentiment < self.negative_threshold {
                negative += 1;
            } else {
                neutral += 1;
            }
        }

        let count = items.len();
        let n = count as f64;
        SentimentSummary {
            positive_share: positive as f64 / n,
            negative_share: negative as f64 / n,
            neutral_share: neutral as f64 / n,
            mean_sentiment: total / n,
            count,
        }
    }

    /// Summarize the items for `region` published inside `window`
    pub fn aggregate_region(
        &self,
        items: &[NewsItem],
        region: Region,
        window: &TimeWindow,
    ) -> SentimentSummary {
        self.aggregate(
            items
                .iter()
                .filter(|item| item.region == region && window.contains(item.published_at)),
        )
    }

    /// One summary per day that has news for `region` inside `window`,
    /// oldest first. Days without news are omitted.
    pub fn daily(
        &self,
        items: &[NewsItem],
        region: Region,
        window: &TimeWindow,
    ) -> Vec<DailySentiment> {
        let mut by_day: BTreeMap<NaiveDate, Vec<&NewsItem>> = BTreeMap::new();
        for item in items
            .iter()
            .filter(|item| item.region == region && window.contains(item.published_at))
        {
            by_day
                .entry(item.published_at.date_naive())
                .or_default()
                .push(item);
        }

        by_day
            .into_iter()
            .map(|(date, day_items)| DailySentiment {
                date,
                summary: self.aggregate(day_items),
            })
            .collect()
    }
}

fn sort_chronologically(items: &mut [&NewsItem]) {
    items.sort_by(|a, b| {
        a.published_at
            .cmp(&b.published_at)
            .then_with(|| a.id.cmp(&b.id))
            .then_with(|| a.sentiment.total_cmp(&b.sentiment))
    });
}
