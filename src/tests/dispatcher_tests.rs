use super::*;
use crate::bus::testing::RecordingSink;
use crate::row::{Owner, RowId};
use chrono::{TimeZone, Utc};
use tempfile::TempDir;

type TestDispatcher = ActionDispatcher<RecordingSink<DeleteCommand>, RecordingSink<UpdateCommand>>;

fn create_test_dispatcher() -> TestDispatcher {
    ActionDispatcher::new(RecordingSink::default(), RecordingSink::default())
}

#[test]
fn test_paused_schedule_end_to_end() {
    let dispatcher = create_test_dispatcher();
    let row = Row::new(1, "ops", RunState::Paused)
        .with_next_activation(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());

    let dispatched = dispatcher.request_status_change(&row);

    let expected = UpdateCommand {
        id: RowId::Number(1),
        state: RunState::Active,
    };
    assert_eq!(dispatched, Dispatched::Sent(Command::Update(expected.clone())));
    assert_eq!(dispatcher.updates.published(), vec![expected]);
    assert!(dispatcher.deletes.published().is_empty());
}

#[test]
fn test_running_run_is_paused() {
    let dispatcher = create_test_dispatcher();
    let row = Row::new(2, "ops", RunState::Running);

    dispatcher.request_status_change(&row);

    assert_eq!(
        dispatcher.updates.published(),
        vec![UpdateCommand {
            id: RowId::Number(2),
            state: RunState::Paused,
        }]
    );
}

#[test]
fn test_status_change_without_transition_is_silent() {
    let dispatcher = create_test_dispatcher();

    for state in [RunState::Done, RunState::Aborted, RunState::Error] {
        let row = Row::new(3, "ops", state);
        assert_eq!(
            dispatcher.request_status_change(&row),
            Dispatched::NoTransition
        );
    }

    assert!(dispatcher.updates.published().is_empty());
    assert!(dispatcher.deletes.published().is_empty());
}

#[test]
fn test_abort_is_never_gated() {
    let dispatcher = create_test_dispatcher();

    for state in RunState::ALL {
        dispatcher.request_abort(&Row::new(4, "ops", state));
    }

    let published = dispatcher.updates.published();
    assert_eq!(published.len(), RunState::ALL.len());
    assert!(published.iter().all(|cmd| cmd.state == RunState::Aborted));
}

#[test]
fn test_double_abort_emits_two_identical_commands() {
    let dispatcher = create_test_dispatcher();
    let row = Row::new("run-5", "ops", RunState::Running);

    dispatcher.request_abort(&row);
    dispatcher.request_abort(&row);

    let published = dispatcher.updates.published();
    assert_eq!(published.len(), 2);
    assert_eq!(published[0], published[1]);
    assert_eq!(published[0].id, RowId::from("run-5"));
}

#[test]
fn test_double_toggle_is_not_serialized() {
    let dispatcher = create_test_dispatcher();
    let row = Row::new(6, "ops", RunState::Active);

    dispatcher.request_status_change(&row);
    dispatcher.request_status_change(&row);

    assert_eq!(dispatcher.updates.published().len(), 2);
}

#[test]
fn test_delete_carries_owner_verbatim() {
    let dispatcher = create_test_dispatcher();
    let row = Row::new(7, "Team Cassandra <ops@example.com>", RunState::Done);

    let dispatched = dispatcher.request_delete(&row);

    let published = dispatcher.deletes.published();
    assert_eq!(published.len(), 1);
    assert_eq!(
        published[0].owner,
        Owner::from("Team Cassandra <ops@example.com>")
    );
    assert_eq!(published[0].id, RowId::Number(7));
    assert_eq!(
        dispatched,
        Dispatched::Sent(Command::Delete(published[0].clone()))
    );
    assert!(dispatcher.updates.published().is_empty());
}

#[test]
fn test_dispatcher_logs_commands_and_no_ops() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let logger = Arc::new(
        StructuredLogger::new("dispatch-test", temp_dir.path()).expect("Failed to create logger"),
    );
    let dispatcher = create_test_dispatcher().with_logger(logger.clone());

    dispatcher.request_abort(&Row::new(8, "ops", RunState::Running));
    dispatcher.request_status_change(&Row::new(8, "ops", RunState::Done));

    let content = std::fs::read_to_string(logger.path()).expect("Failed to read log file");
    let types: Vec<String> = content
        .lines()
        .map(|line| {
            let value: serde_json::Value = serde_json::from_str(line).unwrap();
            value["event"]["type"].as_str().unwrap().to_string()
        })
        .collect();
    assert_eq!(types, vec!["CommandSent", "NoTransition"]);
}

#[tokio::test]
async fn test_shared_subjects_deliver_to_subscribers() {
    let channels = ConsoleChannels::new(8);
    let mut updates = channels.updates.subscribe();
    let mut deletes = channels.deletes.subscribe();
    let dispatcher: ActionDispatcher = ActionDispatcher::for_channels(&channels);
    let row = Row::new(9, "ops", RunState::NotStarted);

    dispatcher.request_status_change(&row);
    dispatcher.request_delete(&row);

    assert_eq!(
        updates.recv().await.unwrap(),
        UpdateCommand {
            id: RowId::Number(9),
            state: RunState::Running,
        }
    );
    assert_eq!(deletes.recv().await.unwrap(), DeleteCommand::from(&row));
}
