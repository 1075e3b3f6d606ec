use analysis_core::{summarize, ResultSet, SummaryStatistics};
use pretty_assertions::assert_eq;
use serde_json::json;

fn results(value: serde_json::Value) -> ResultSet {
    serde_json::from_value(value).expect("result set")
}

#[test]
fn empty_result_set_is_all_zero() {
    assert_eq!(
        summarize(&ResultSet::new()),
        SummaryStatistics {
            total_urls: 0,
            total_requests: 0,
            success_rate: 0,
            avg_response_time: 0,
            avg_speed_rating: "N/A".to_string(),
            https_percentage: 0,
        }
    );
}

#[test]
fn mixed_statuses_average_and_https_share() {
    let set = results(json!({
        "http://a": [
            {"status": 200, "response_time": 0.2, "https_enabled": false},
            {"status": 404, "response_time": 0.4, "https_enabled": true}
        ]
    }));

    let stats = summarize(&set);
    assert_eq!(stats.total_urls, 1);
    assert_eq!(stats.total_requests, 2);
    assert_eq!(stats.success_rate, 50);
    assert_eq!(stats.avg_response_time, 300);
    assert_eq!(stats.https_percentage, 50);
    assert_eq!(stats.avg_speed_rating, "N/A");
}

#[test]
fn records_without_response_time_are_excluded_from_the_mean() {
    let set = results(json!({
        "http://a": [{"status": 200, "response_time": 1.5}, {"status": 201}],
        "http://b": [{"status": null, "response_time": null}]
    }));

    let stats = summarize(&set);
    assert_eq!(stats.total_urls, 2);
    assert_eq!(stats.total_requests, 3);
    assert_eq!(stats.avg_response_time, 1500);
    assert_eq!(stats.success_rate, 67);
}

#[test]
fn speed_rating_tie_resolves_to_first_seen() {
    let set = results(json!({
        "http://a": [{"speed_rating": "Fast"}, {"speed_rating": "Slow"}],
        "http://b": [{"speed_rating": "Slow"}, {"speed_rating": "Fast"}]
    }));
    assert_eq!(summarize(&set).avg_speed_rating, "Fast");

    let set = results(json!({
        "http://a": [{"speed_rating": "Slow"}, {"speed_rating": "Fast"}],
        "http://b": [{"speed_rating": "Fast"}, {"speed_rating": "Slow"}]
    }));
    assert_eq!(summarize(&set).avg_speed_rating, "Slow");
}

#[test]
fn speed_rating_majority_wins() {
    let set = results(json!({
        "http://a": [{"speed_rating": "Slow"}, {"speed_rating": "Fast"}, {"speed_rating": "Fast"}, {}]
    }));
    assert_eq!(summarize(&set).avg_speed_rating, "Fast");
}

#[test]
fn status_boundaries() {
    let set = results(json!({
        "http://a": [{"status": 199}, {"status": 200}, {"status": 299}, {"status": 300}]
    }));
    assert_eq!(summarize(&set).success_rate, 50);
}

#[test]
fn mistyped_fields_do_not_discard_the_set() {
    let set: ResultSet = serde_json::from_str(
        r#"{"http://a":[{"status":200,"response_time":0.5}],"http://b":[{"status":"200","html_lines":12.0,"https_enabled":"yes"}]}"#,
    )
    .expect("lenient parse");
    let stats = summarize(&set);
    assert_eq!(stats.total_urls, 2);
    assert_eq!(stats.total_requests, 2);
    assert_eq!(stats.success_rate, 50);
    assert_eq!(stats.avg_response_time, 500);
    assert_eq!(stats.https_percentage, 0);
}
