use std::sync::Once;

use analysis_core::{
    update, AppState, Effect, ExportFormat, JobPhase, Msg, NotificationLevel, ResultSet,
};
use pretty_assertions::assert_eq;
use serde_json::json;

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(analysis_logging::initialize_for_tests);
}

fn submit(state: AppState, urls_json: &str, repetitions: &str) -> (AppState, Vec<Effect>) {
    update(
        state,
        Msg::SubmitRequested {
            urls_json: urls_json.to_string(),
            repetitions: repetitions.to_string(),
        },
    )
}

fn accepted(state: AppState, job_id: &str) -> AppState {
    let generation = match state.phase() {
        JobPhase::Submitted { generation } => *generation,
        other => panic!("expected Submitted, got {other:?}"),
    };
    let (state, effects) = update(
        state,
        Msg::JobAccepted {
            generation,
            job_id: job_id.to_string(),
        },
    );
    assert_eq!(
        effects,
        vec![Effect::StartPolling {
            job_id: job_id.to_string()
        }]
    );
    state
}

fn sample_results() -> ResultSet {
    serde_json::from_value(json!({
        "https://a.com": [{"status": 200, "response_time": 0.1, "https_enabled": true}]
    }))
    .unwrap()
}

#[test]
fn valid_submission_emits_submit_job() {
    init_logging();
    let (mut state, effects) = submit(AppState::new(), r#"["https://a.com","https://b.com"]"#, "3");

    assert_eq!(state.phase(), &JobPhase::Submitted { generation: 1 });
    assert!(state.view().busy);
    assert!(state.consume_dirty());
    match effects.as_slice() {
        [Effect::SubmitJob {
            generation,
            request,
        }] => {
            assert_eq!(*generation, 1);
            assert_eq!(request.len(), 2);
            assert_eq!(request.repetitions(), 3);
        }
        other => panic!("unexpected effects {other:?}"),
    }
}

#[test]
fn invalid_submission_notifies_and_changes_nothing() {
    init_logging();
    let (mut state, effects) = submit(AppState::new(), "[]", "3");

    assert!(effects.is_empty());
    assert_eq!(state.phase(), &JobPhase::Idle);
    let notes = state.take_notifications();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].level, NotificationLevel::Error);
    assert!(notes[0].message.starts_with("malformed input"));

    let (mut state, effects) = submit(state, r#"["https://a.com"]"#, "101");
    assert!(effects.is_empty());
    assert!(state.take_notifications()[0]
        .message
        .starts_with("repetition count out of range"));
}

#[test]
fn done_on_first_tick_goes_straight_to_done() {
    init_logging();
    let (state, _) = submit(AppState::new(), r#"["https://a.com"]"#, "1");
    let state = accepted(state, "job-1");

    let (mut state, effects) = update(
        state,
        Msg::JobCompleted {
            job_id: "job-1".to_string(),
            result: sample_results(),
        },
    );

    assert!(effects.is_empty());
    assert_eq!(
        state.phase(),
        &JobPhase::Done {
            job_id: "job-1".to_string()
        }
    );
    let view = state.view();
    assert!(!view.busy);
    assert!(view.exports_enabled);
    assert_eq!(view.progress, Some(100));
    assert_eq!(view.summary.unwrap().success_rate, 100);
    assert_eq!(state.results(), Some(&sample_results()));
    assert_eq!(state.take_notifications()[0].level, NotificationLevel::Success);
}

#[test]
fn progress_is_clamped_and_may_go_backwards() {
    init_logging();
    let (state, _) = submit(AppState::new(), r#"["https://a.com"]"#, "1");
    let state = accepted(state, "job-1");

    let progress = |state: AppState, value: i64| {
        update(
            state,
            Msg::ProgressReported {
                job_id: "job-1".to_string(),
                progress: value,
            },
        )
        .0
    };

    let state = progress(state, 60);
    assert_eq!(state.view().progress, Some(60));
    assert_eq!(state.view().progress_label().as_deref(), Some("60% completed"));
    let state = progress(state, 40);
    assert_eq!(state.view().progress, Some(40));
    let state = progress(state, 250);
    assert_eq!(state.view().progress, Some(100));
    let state = progress(state, -5);
    assert_eq!(state.view().progress, Some(0));
}

#[test]
fn poll_failure_is_terminal_and_late_events_are_ignored() {
    init_logging();
    let (state, _) = submit(AppState::new(), r#"["https://a.com"]"#, "1");
    let state = accepted(state, "job-1");

    let (mut state, effects) = update(
        state,
        Msg::PollFailed {
            job_id: "job-1".to_string(),
            message: "connection refused".to_string(),
        },
    );
    assert!(effects.is_empty());
    assert!(matches!(state.phase(), JobPhase::Failed { reason } if reason.contains("connection refused")));
    assert!(!state.view().busy);
    assert_eq!(state.take_notifications().len(), 1);

    let (state, _) = update(
        state,
        Msg::JobCompleted {
            job_id: "job-1".to_string(),
            result: sample_results(),
        },
    );
    assert!(matches!(state.phase(), JobPhase::Failed { .. }));
    assert!(state.results().is_none());
}

#[test]
fn late_running_after_done_is_ignored() {
    init_logging();
    let (state, _) = submit(AppState::new(), r#"["https://a.com"]"#, "1");
    let state = accepted(state, "job-1");
    let (state, _) = update(
        state,
        Msg::JobCompleted {
            job_id: "job-1".to_string(),
            result: sample_results(),
        },
    );
    let before = state.clone();
    let (state, _) = update(
        state,
        Msg::ProgressReported {
            job_id: "job-1".to_string(),
            progress: 50,
        },
    );
    assert_eq!(state, before);
}

#[test]
fn submission_failure_returns_to_resubmittable_state() {
    init_logging();
    let (state, _) = submit(AppState::new(), r#"["https://a.com"]"#, "1");
    let (mut state, _) = update(
        state,
        Msg::SubmissionFailed {
            generation: 1,
            message: "http status 500".to_string(),
        },
    );
    assert!(matches!(state.phase(), JobPhase::Failed { .. }));
    assert!(state.take_notifications()[0].message.contains("http status 500"));

    let (state, effects) = submit(state, r#"["https://a.com"]"#, "1");
    assert_eq!(state.phase(), &JobPhase::Submitted { generation: 2 });
    assert_eq!(effects.len(), 1);
}

#[test]
fn new_submission_cancels_running_poller_and_ignores_old_job() {
    init_logging();
    let (state, _) = submit(AppState::new(), r#"["https://a.com"]"#, "1");
    let state = accepted(state, "job-1");

    let (state, effects) = submit(state, r#"["https://b.com"]"#, "2");
    assert_eq!(effects.len(), 2);
    assert_eq!(
        effects[0],
        Effect::CancelPolling {
            job_id: "job-1".to_string()
        }
    );
    assert!(matches!(effects[1], Effect::SubmitJob { generation: 2, .. }));

    // Stale acceptance for the first generation is dropped.
    let (state, effects) = update(
        state,
        Msg::JobAccepted {
            generation: 1,
            job_id: "job-stale".to_string(),
        },
    );
    assert!(effects.is_empty());
    assert_eq!(state.phase(), &JobPhase::Submitted { generation: 2 });

    let state = accepted(state, "job-2");
    let (state, _) = update(
        state,
        Msg::JobCompleted {
            job_id: "job-1".to_string(),
            result: sample_results(),
        },
    );
    assert!(state.results().is_none());
    assert!(matches!(state.phase(), JobPhase::Polling { job_id, .. } if job_id == "job-2"));
}

#[test]
fn previous_results_survive_until_the_next_job_completes() {
    init_logging();
    let (state, _) = submit(AppState::new(), r#"["https://a.com"]"#, "1");
    let state = accepted(state, "job-1");
    let (state, _) = update(
        state,
        Msg::JobCompleted {
            job_id: "job-1".to_string(),
            result: sample_results(),
        },
    );

    let (state, _) = submit(state, r#"["https://b.com"]"#, "1");
    assert_eq!(state.results(), Some(&sample_results()));

    let state = accepted(state, "job-2");
    let replacement: ResultSet =
        serde_json::from_value(json!({"https://b.com": [{"status": 500}]})).unwrap();
    let (state, _) = update(
        state,
        Msg::JobCompleted {
            job_id: "job-2".to_string(),
            result: replacement.clone(),
        },
    );
    assert_eq!(state.results(), Some(&replacement));
}

#[test]
fn export_without_results_reports_no_data() {
    init_logging();
    let (mut state, effects) = update(AppState::new(), Msg::ExportRequested(ExportFormat::Json));
    assert!(effects.is_empty());
    assert_eq!(state.take_notifications()[0].message, "no results to export");
}

#[test]
fn export_after_completion_emits_write_effect() {
    init_logging();
    let (state, _) = submit(AppState::new(), r#"["https://a.com"]"#, "1");
    let state = accepted(state, "job-1");
    let (state, _) = update(
        state,
        Msg::JobCompleted {
            job_id: "job-1".to_string(),
            result: sample_results(),
        },
    );

    let (_state, effects) = update(state, Msg::ExportRequested(ExportFormat::Csv));
    match effects.as_slice() {
        [Effect::WriteExport(doc)] => {
            assert_eq!(doc.filename, "resultados.csv");
            assert_eq!(doc.contents.lines().count(), 2);
        }
        other => panic!("unexpected effects {other:?}"),
    }
}
