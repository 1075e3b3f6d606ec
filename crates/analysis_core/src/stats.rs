use serde::Serialize;

use crate::ResultSet;

pub const NO_SPEED_RATING: &str = "N/A";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryStatistics {
    pub total_urls: usize,
    pub total_requests: usize,
    /// Percent of records with a 2xx status.
    pub success_rate: u32,
    /// Milliseconds; `response_time` is reported in seconds.
    pub avg_response_time: u64,
    pub avg_speed_rating: String,
    pub https_percentage: u32,
}

/// Recomputes the summary from scratch; nothing is cached.
pub fn summarize(results: &ResultSet) -> SummaryStatistics {
    let mut total_requests = 0usize;
    let mut successful = 0usize;
    let mut https = 0usize;
    let mut response_time_sum = 0.0f64;
    let mut response_time_count = 0usize;
    let mut ratings: Vec<(&str, usize)> = Vec::new();

    for record in results.records() {
        total_requests += 1;
        if record.is_success() {
            successful += 1;
        }
        if record.is_https() {
            https += 1;
        }
        if let Some(seconds) = record.response_time().value() {
            response_time_sum += seconds;
            response_time_count += 1;
        }
        if let Some(rating) = record.speed_rating() {
            match ratings.iter_mut().find(|(seen, _)| *seen == rating) {
                Some((_, count)) => *count += 1,
                None => ratings.push((rating, 1)),
            }
        }
    }

    let avg_response_time = if response_time_count > 0 {
        (response_time_sum / response_time_count as f64 * 1000.0)
            .round()
            .max(0.0) as u64
    } else {
        0
    };

    SummaryStatistics {
        total_urls: results.url_count(),
        total_requests,
        success_rate: percentage(successful, total_requests),
        avg_response_time,
        avg_speed_rating: most_frequent(&ratings)
            .unwrap_or(NO_SPEED_RATING)
            .to_string(),
        https_percentage: percentage(https, total_requests),
    }
}

/// Highest count wins; on a tie the rating seen first is kept.
fn most_frequent<'a>(counts: &[(&'a str, usize)]) -> Option<&'a str> {
    let mut best: Option<(&str, usize)> = None;
    for &(rating, count) in counts {
        if best.map_or(true, |(_, best_count)| count > best_count) {
            best = Some((rating, count));
        }
    }
    best.map(|(rating, _)| rating)
}

pub(crate) fn percentage(part: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    (100.0 * part as f64 / total as f64).round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentage_rounds_half_up() {
        assert_eq!(percentage(1, 8), 13);
        assert_eq!(percentage(1, 3), 33);
        assert_eq!(percentage(0, 0), 0);
    }

    #[test]
    fn most_frequent_prefers_first_seen_on_tie() {
        assert_eq!(most_frequent(&[("Slow", 2), ("Fast", 2)]), Some("Slow"));
        assert_eq!(most_frequent(&[("Slow", 1), ("Fast", 2)]), Some("Fast"));
        assert_eq!(most_frequent(&[]), None);
    }
}
