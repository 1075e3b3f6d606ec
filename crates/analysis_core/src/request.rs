use serde::Serialize;
use serde_json::Value;

use crate::AnalysisError;

pub const MIN_REPETITIONS: u32 = 1;
pub const MAX_REPETITIONS: u32 = 100;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UrlEntry {
    pub url: String,
    pub repetitions: u32,
}

/// A validated batch: non-empty, every entry sharing the same repetition count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisRequest {
    entries: Vec<UrlEntry>,
}

impl AnalysisRequest {
    pub fn entries(&self) -> &[UrlEntry] {
        &self.entries
    }

    pub fn urls(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.url.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn repetitions(&self) -> u32 {
        self.entries
            .first()
            .map(|entry| entry.repetitions)
            .unwrap_or(MIN_REPETITIONS)
    }

    /// Number of (url, repetition) executions the backend will run.
    pub fn total_analyses(&self) -> u64 {
        self.entries
            .iter()
            .map(|entry| u64::from(entry.repetitions))
            .sum()
    }
}

/// Parses the raw URL file text and repetition input, then validates both.
pub fn parse_input(raw_json: &str, repetitions: &str) -> Result<AnalysisRequest, AnalysisError> {
    let repetitions = parse_repetitions(repetitions)?;
    let urls: Value = serde_json::from_str(raw_json)
        .map_err(|err| AnalysisError::MalformedInput(format!("invalid JSON: {err}")))?;
    build_request(&urls, repetitions)
}

/// Validates an already-parsed URL list against a raw repetition count.
pub fn validate(urls: &Value, repetitions: &str) -> Result<AnalysisRequest, AnalysisError> {
    let repetitions = parse_repetitions(repetitions)?;
    build_request(urls, repetitions)
}

/// Accepts only integers in `[1, 100]`.
pub fn parse_repetitions(raw: &str) -> Result<u32, AnalysisError> {
    let trimmed = raw.trim();
    let value: i64 = trimmed
        .parse()
        .map_err(|_| AnalysisError::RepetitionCountOutOfRange(format!("{trimmed:?}")))?;
    if value < i64::from(MIN_REPETITIONS) || value > i64::from(MAX_REPETITIONS) {
        return Err(AnalysisError::RepetitionCountOutOfRange(value.to_string()));
    }
    Ok(value as u32)
}

fn build_request(urls: &Value, repetitions: u32) -> Result<AnalysisRequest, AnalysisError> {
    let items = urls.as_array().ok_or_else(|| {
        AnalysisError::MalformedInput("the file must contain a JSON array of URLs".to_string())
    })?;
    if items.is_empty() {
        return Err(AnalysisError::MalformedInput(
            "the URL array is empty".to_string(),
        ));
    }

    let mut entries = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        let url = item
            .as_str()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .ok_or_else(|| {
                AnalysisError::MalformedInput(format!(
                    "entry {} is not a non-empty URL string",
                    index + 1
                ))
            })?;
        entries.push(UrlEntry {
            url: url.to_string(),
            repetitions,
        });
    }
    Ok(AnalysisRequest { entries })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum UrlValidity {
    Valid {
        domain: String,
        protocol: String,
        secure: bool,
    },
    Invalid,
}

/// Advisory per-URL breakdown shown before submitting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UrlPreview {
    pub url: String,
    pub validity: UrlValidity,
}

/// Extracts hostname and protocol; parse failures degrade to `Invalid`.
pub fn preview(url: &str) -> UrlPreview {
    let validity = match url::Url::parse(url) {
        Ok(parsed) => match parsed.host_str() {
            Some(host) => {
                let protocol = parsed.scheme().to_string();
                UrlValidity::Valid {
                    domain: host.to_string(),
                    secure: protocol == "https",
                    protocol,
                }
            }
            None => UrlValidity::Invalid,
        },
        Err(_) => UrlValidity::Invalid,
    };
    UrlPreview {
        url: url.to_string(),
        validity,
    }
}

pub fn preview_all(request: &AnalysisRequest) -> Vec<UrlPreview> {
    request.urls().map(preview).collect()
}
