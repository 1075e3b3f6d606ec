use analysis_core::{
    parse_input, preview, validate, AnalysisError, UrlValidity, MAX_REPETITIONS,
};
use serde_json::json;

#[test]
fn accepts_array_and_copies_repetitions_to_every_entry() {
    for repetitions in [1u32, 7, MAX_REPETITIONS] {
        let urls = json!(["https://a.example.com", "http://b.example.com", "c"]);
        let request = validate(&urls, &repetitions.to_string()).expect("valid request");

        assert_eq!(request.len(), 3);
        assert!(request
            .entries()
            .iter()
            .all(|entry| entry.repetitions == repetitions));
        assert_eq!(request.repetitions(), repetitions);
        assert_eq!(request.total_analyses(), 3 * u64::from(repetitions));
    }
}

#[test]
fn keeps_submission_order_and_trims_urls() {
    let request = parse_input(r#"["  https://b.com ", "https://a.com"]"#, "2").unwrap();
    let urls: Vec<_> = request.urls().collect();
    assert_eq!(urls, vec!["https://b.com", "https://a.com"]);
}

#[test]
fn rejects_out_of_range_and_non_integer_repetitions() {
    let urls = json!(["https://a.com"]);
    for raw in ["0", "101", "-1", "1.5", "abc", ""] {
        let err = validate(&urls, raw).unwrap_err();
        assert!(
            matches!(err, AnalysisError::RepetitionCountOutOfRange(_)),
            "{raw:?} gave {err:?}"
        );
    }
}

#[test]
fn rejects_empty_and_non_array_input() {
    for urls in [
        json!([]),
        json!({"urls": ["https://a.com"]}),
        json!("https://a.com"),
        json!(42),
        json!([1, 2]),
        json!(["https://a.com", "   "]),
    ] {
        let err = validate(&urls, "3").unwrap_err();
        assert!(matches!(err, AnalysisError::MalformedInput(_)), "{urls} gave {err:?}");
    }
}

#[test]
fn unparsable_file_is_malformed_input() {
    let err = parse_input("[\"https://a.com\"", "1").unwrap_err();
    assert!(matches!(err, AnalysisError::MalformedInput(_)));
}

#[test]
fn repetitions_are_checked_before_the_url_list() {
    let err = parse_input("not json", "0").unwrap_err();
    assert!(matches!(err, AnalysisError::RepetitionCountOutOfRange(_)));
}

#[test]
fn malformed_urls_are_accepted_and_previewed_as_invalid() {
    let request = parse_input(r#"["not a url", "https://example.com/path"]"#, "1").unwrap();
    assert_eq!(request.len(), 2);

    assert_eq!(preview("not a url").validity, UrlValidity::Invalid);
    assert_eq!(
        preview("https://example.com/path").validity,
        UrlValidity::Valid {
            domain: "example.com".to_string(),
            protocol: "https".to_string(),
            secure: true,
        }
    );
    assert_eq!(
        preview("http://plain.example.org").validity,
        UrlValidity::Valid {
            domain: "plain.example.org".to_string(),
            protocol: "http".to_string(),
            secure: false,
        }
    );
}
