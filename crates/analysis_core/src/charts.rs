//! Chart-oriented series derived from a result set.
//!
//! Only records with a non-zero `load_time_ms` feed the response-time
//! series; HTML size statistics look at the first repetition of each URL.
use serde::Serialize;

use crate::stats::NO_SPEED_RATING;
use crate::ResultSet;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResponseTimeSample {
    pub url: String,
    pub load_time_ms: f64,
    pub speed_rating: String,
    pub size_kb: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResponseTimeStats {
    /// Rounded to two decimals.
    pub mean_ms: f64,
    pub min_ms: f64,
    pub max_ms: f64,
    pub count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct SizeBuckets {
    pub up_to_100_kb: usize,
    pub up_to_500_kb: usize,
    pub up_to_1000_kb: usize,
    pub over_1000_kb: usize,
}

impl SizeBuckets {
    fn add(&mut self, size_kb: f64) {
        if size_kb <= 100.0 {
            self.up_to_100_kb += 1;
        } else if size_kb <= 500.0 {
            self.up_to_500_kb += 1;
        } else if size_kb <= 1000.0 {
            self.up_to_1000_kb += 1;
        } else {
            self.over_1000_kb += 1;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HtmlStats {
    pub urls: usize,
    pub mean_lines: f64,
    pub min_lines: i64,
    pub max_lines: i64,
    pub mean_chars: f64,
    pub min_chars: i64,
    pub max_chars: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeries {
    pub samples: Vec<ResponseTimeSample>,
    pub stats: ResponseTimeStats,
    /// Rating counts in first-seen order, `N/A` excluded.
    pub speed_distribution: Vec<(String, usize)>,
    pub size_buckets: SizeBuckets,
    pub html: Option<HtmlStats>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResponseTimePoint {
    pub url: String,
    pub load_time_ms: f64,
}

/// `None` when no record carries a non-zero load time.
pub fn chart_series(results: &ResultSet) -> Option<ChartSeries> {
    let mut samples = Vec::new();
    let mut html_lines = Vec::new();
    let mut html_chars = Vec::new();

    for (url, records) in results.iter() {
        for (index, record) in records.iter().enumerate() {
            if let Some(load_time_ms) = record.load_time_ms().value().copied().filter(|ms| *ms != 0.0) {
                samples.push(ResponseTimeSample {
                    url: url.to_string(),
                    load_time_ms,
                    speed_rating: record
                        .speed_rating()
                        .unwrap_or(NO_SPEED_RATING)
                        .to_string(),
                    size_kb: record.size_kb().value().copied().unwrap_or(0.0),
                });
            }
            if index == 0 {
                if let Some(lines) = record.html_lines().value().copied().filter(|lines| *lines > 0) {
                    html_lines.push(lines);
                    html_chars.push(record.html_chars().value().copied().unwrap_or(0));
                }
            }
        }
    }

    if samples.is_empty() {
        return None;
    }

    let times: Vec<f64> = samples.iter().map(|s| s.load_time_ms).collect();
    let mean = times.iter().sum::<f64>() / times.len() as f64;
    let stats = ResponseTimeStats {
        mean_ms: (mean * 100.0).round() / 100.0,
        min_ms: times.iter().copied().fold(f64::INFINITY, f64::min),
        max_ms: times.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        count: times.len(),
    };

    let mut speed_distribution: Vec<(String, usize)> = Vec::new();
    let mut size_buckets = SizeBuckets::default();
    for sample in &samples {
        size_buckets.add(sample.size_kb);
        if sample.speed_rating == NO_SPEED_RATING {
            continue;
        }
        match speed_distribution
            .iter_mut()
            .find(|(rating, _)| *rating == sample.speed_rating)
        {
            Some((_, count)) => *count += 1,
            None => speed_distribution.push((sample.speed_rating.clone(), 1)),
        }
    }

    Some(ChartSeries {
        samples,
        stats,
        speed_distribution,
        size_buckets,
        html: html_stats(&html_lines, &html_chars),
    })
}

fn html_stats(lines: &[i64], chars: &[i64]) -> Option<HtmlStats> {
    let (&min_lines, &max_lines) = (lines.iter().min()?, lines.iter().max()?);
    let (&min_chars, &max_chars) = (chars.iter().min()?, chars.iter().max()?);
    let mean = |values: &[i64]| (values.iter().sum::<i64>() as f64 / values.len() as f64).round();
    Some(HtmlStats {
        urls: lines.len(),
        mean_lines: mean(lines),
        min_lines,
        max_lines,
        mean_chars: mean(chars),
        min_chars,
        max_chars,
    })
}

/// One point per record; a missing load time counts as zero.
pub fn response_time_points(results: &ResultSet) -> Vec<ResponseTimePoint> {
    results
        .iter()
        .flat_map(|(url, records)| {
            records.iter().map(move |record| ResponseTimePoint {
                url: url.to_string(),
                load_time_ms: record.load_time_ms().value().copied().unwrap_or(0.0),
            })
        })
        .collect()
}
