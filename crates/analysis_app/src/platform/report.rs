//! Plain-text rendering for terminal output.

use std::fmt::Write as _;

use analysis_core::{
    ChartSeries, Notification, NotificationLevel, ResponseTimePoint, SummaryStatistics,
    UrlPreview, UrlValidity,
};
use chrono::{DateTime, Local};

pub fn timestamp() -> String {
    format_timestamp(Local::now())
}

fn format_timestamp(at: DateTime<Local>) -> String {
    at.format("%Y-%m-%d %H:%M:%S").to_string()
}

pub fn render_summary(summary: &SummaryStatistics, generated_at: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Summary ({generated_at})");
    let _ = writeln!(out, "  URLs analyzed:      {}", summary.total_urls);
    let _ = writeln!(out, "  Total requests:     {}", summary.total_requests);
    let _ = writeln!(out, "  Success rate:       {}%", summary.success_rate);
    let _ = writeln!(out, "  Avg response time:  {} ms", summary.avg_response_time);
    let _ = writeln!(out, "  Avg speed rating:   {}", summary.avg_speed_rating);
    let _ = writeln!(out, "  HTTPS:              {}%", summary.https_percentage);
    out
}

/// `totals` is `(repetitions, total analyses)` when a count was given.
pub fn render_preview(previews: &[UrlPreview], totals: Option<(u32, u64)>) -> String {
    let mut out = String::new();
    for preview in previews {
        match &preview.validity {
            UrlValidity::Valid {
                domain,
                protocol,
                secure,
            } => {
                let lock = if *secure { "secure" } else { "insecure" };
                let _ = writeln!(out, "{}  {domain} ({protocol}, {lock})", preview.url);
            }
            UrlValidity::Invalid => {
                let _ = writeln!(out, "{}  invalid URL", preview.url);
            }
        }
    }
    if let Some((repetitions, total)) = totals {
        let _ = writeln!(
            out,
            "{} URLs x {repetitions} repetitions = {total} analyses",
            previews.len()
        );
    }
    out
}

pub fn render_notification(notification: &Notification) -> String {
    let tag = match notification.level {
        NotificationLevel::Success => "ok",
        NotificationLevel::Error => "error",
    };
    format!("[{tag}] {}", notification.message)
}

pub fn render_charts(series: &ChartSeries) -> String {
    let mut out = String::new();
    let stats = &series.stats;
    let _ = writeln!(out, "Response times ({} samples)", stats.count);
    let _ = writeln!(
        out,
        "  mean {:.2} ms, min {} ms, max {} ms",
        stats.mean_ms, stats.min_ms, stats.max_ms
    );

    let _ = writeln!(out, "Speed ratings");
    for (rating, count) in &series.speed_distribution {
        let _ = writeln!(out, "  {rating}: {count}");
    }

    let buckets = &series.size_buckets;
    let _ = writeln!(out, "Page sizes");
    let _ = writeln!(out, "  0-100 KB: {}", buckets.up_to_100_kb);
    let _ = writeln!(out, "  100-500 KB: {}", buckets.up_to_500_kb);
    let _ = writeln!(out, "  500-1000 KB: {}", buckets.up_to_1000_kb);
    let _ = writeln!(out, "  1000+ KB: {}", buckets.over_1000_kb);

    if let Some(html) = &series.html {
        let _ = writeln!(out, "HTML ({} URLs)", html.urls);
        let _ = writeln!(
            out,
            "  lines: mean {}, min {}, max {}",
            html.mean_lines, html.min_lines, html.max_lines
        );
        let _ = writeln!(
            out,
            "  chars: mean {}, min {}, max {}",
            html.mean_chars, html.min_chars, html.max_chars
        );
    }
    out
}

/// Per-request load times; zero marks a request without one.
pub fn render_points(points: &[ResponseTimePoint]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Load time per request");
    for point in points {
        let _ = writeln!(out, "  {}  {} ms", point.url, point.load_time_ms);
    }
    out
}
