use std::fmt::Display;

use crate::{AnalysisError, Field, MetricRecord, ResultSet};

pub const JSON_EXPORT_FILENAME: &str = "resultados.json";
pub const CSV_EXPORT_FILENAME: &str = "resultados.csv";

pub const CSV_HEADERS: [&str; 18] = [
    "URL",
    "Repetition",
    "Status",
    "LoadTimeMs",
    "SizeKb",
    "SpeedRating",
    "ImageCount",
    "ScriptCount",
    "CssCount",
    "HttpsEnabled",
    "SecurityHeaders",
    "SslGrade",
    "MetaDescriptionPresent",
    "H1Count",
    "H2Count",
    "H3Count",
    "AltTextImages",
    "AriaLabels",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportFormat {
    Json,
    Csv,
}

impl ExportFormat {
    pub fn filename(self) -> &'static str {
        match self {
            ExportFormat::Json => JSON_EXPORT_FILENAME,
            ExportFormat::Csv => CSV_EXPORT_FILENAME,
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            ExportFormat::Json => "application/json",
            ExportFormat::Csv => "text/csv",
        }
    }
}

/// Serialized export ready to be written under `filename`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportDocument {
    pub format: ExportFormat,
    pub filename: String,
    pub contents: String,
}

pub fn export(results: &ResultSet, format: ExportFormat) -> Result<ExportDocument, AnalysisError> {
    let contents = match format {
        ExportFormat::Json => export_json(results)?,
        ExportFormat::Csv => export_csv(results)?,
    };
    Ok(ExportDocument {
        format,
        filename: format.filename().to_string(),
        contents,
    })
}

/// Pretty-printed JSON of the whole result set.
pub fn export_json(results: &ResultSet) -> Result<String, AnalysisError> {
    if results.is_empty() {
        return Err(AnalysisError::NoDataToExport);
    }
    serde_json::to_string_pretty(results).map_err(|err| AnalysisError::Serialization(err.to_string()))
}

/// Header row plus one row per (url, repetition).
pub fn export_csv(results: &ResultSet) -> Result<String, AnalysisError> {
    if results.is_empty() {
        return Err(AnalysisError::NoDataToExport);
    }
    let mut writer = CsvWriter::new(',');
    writer.write_row(&CSV_HEADERS);
    for (url, records) in results.iter() {
        for (index, record) in records.iter().enumerate() {
            writer.write_row(&csv_row(url, index + 1, record));
        }
    }
    Ok(writer.finish())
}

fn csv_row(url: &str, repetition: usize, r: &MetricRecord) -> [String; 18] {
    [
        url.to_string(),
        repetition.to_string(),
        cell(&r.status()),
        cell(&r.load_time_ms()),
        cell(&r.size_kb()),
        r.speed_rating().unwrap_or_default().to_string(),
        cell(&r.image_count()),
        cell(&r.script_count()),
        cell(&r.css_count()),
        yes_no(r.is_https()),
        cell(&r.security_headers()),
        cell(&r.ssl_grade()),
        yes_no(r.has_meta_description()),
        cell(&r.h1_count()),
        cell(&r.h2_count()),
        cell(&r.h3_count()),
        r.alt_text_images().to_string(),
        cell(&r.aria_labels()),
    ]
}

fn cell<T: Display>(field: &Field<T>) -> String {
    field.value().map(ToString::to_string).unwrap_or_default()
}

fn yes_no(flag: bool) -> String {
    let text = if flag { "Yes" } else { "No" };
    text.to_string()
}

/// Delimited-text encoder; quotes fields containing the delimiter, quotes or line breaks.
#[derive(Debug)]
pub struct CsvWriter {
    delimiter: char,
    buffer: String,
    rows: usize,
}

impl CsvWriter {
    pub fn new(delimiter: char) -> Self {
        Self {
            delimiter,
            buffer: String::new(),
            rows: 0,
        }
    }

    pub fn write_row<S: AsRef<str>>(&mut self, fields: &[S]) {
        if self.rows > 0 {
            self.buffer.push('\n');
        }
        self.rows += 1;
        for (index, field) in fields.iter().enumerate() {
            if index > 0 {
                self.buffer.push(self.delimiter);
            }
            self.push_field(field.as_ref());
        }
    }

    fn push_field(&mut self, field: &str) {
        let needs_quotes = field
            .chars()
            .any(|c| c == self.delimiter || c == '"' || c == '\n' || c == '\r');
        if !needs_quotes {
            self.buffer.push_str(field);
            return;
        }
        self.buffer.push('"');
        for c in field.chars() {
            if c == '"' {
                self.buffer.push('"');
            }
            self.buffer.push(c);
        }
        self.buffer.push('"');
    }

    pub fn finish(self) -> String {
        self.buffer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_fields_are_joined_unquoted() {
        let mut writer = CsvWriter::new(',');
        writer.write_row(&["a", "b"]);
        writer.write_row(&["1", ""]);
        assert_eq!(writer.finish(), "a,b\n1,");
    }

    #[test]
    fn fields_with_delimiters_quotes_and_newlines_are_quoted() {
        let mut writer = CsvWriter::new(',');
        writer.write_row(&["nginx, gzip", "say \"hi\"", "two\nlines"]);
        assert_eq!(
            writer.finish(),
            "\"nginx, gzip\",\"say \"\"hi\"\"\",\"two\nlines\""
        );
    }

    #[test]
    fn empty_rows_still_produce_line_breaks() {
        let mut writer = CsvWriter::new(';');
        writer.write_row(&[""]);
        writer.write_row(&["x;y"]);
        assert_eq!(writer.finish(), "\n\"x;y\"");
    }
}
