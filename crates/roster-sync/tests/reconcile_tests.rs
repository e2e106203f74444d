//! Reconciliation pass tests against an in-memory directory.

mod common;

use common::*;
use roster_connector::{DirectoryAttribute, SourceRecord, TargetRecord};
use roster_sync::{ActionKind, Reconciler, SyncError};

#[tokio::test]
async fn test_jane_doe_links_by_name_and_updates_title() {
    let source = SourceRecord {
        legal_name: "Jane Doe".into(),
        job_title: "Engineer".into(),
        ..SourceRecord::new("E100")
    };
    let target = TargetRecord {
        display_name: "Jane Doe".into(),
        title: "Manager".into(),
        ..TargetRecord::new(dn("Jane Doe"))
    };
    let directory = InMemoryDirectory::new(vec![target]);
    let targets = directory.users();

    let outcome = Reconciler::new(&directory)
        .reconcile(&[source], &targets)
        .await
        .unwrap();

    let actions = outcome.report.actions();
    assert_eq!(actions.len(), 2);
    assert_eq!(actions[0].attribute, DirectoryAttribute::EmployeeId);
    assert_eq!(actions[0].old_value, "");
    assert_eq!(actions[0].new_value, "E100");
    assert_eq!(actions[1].attribute, DirectoryAttribute::Title);
    assert_eq!(actions[1].old_value, "Manager");
    assert_eq!(actions[1].new_value, "Engineer");
    assert!(actions.iter().all(|a| a.action == ActionKind::Update));

    let writes = directory.writes();
    assert_eq!(writes.len(), 1);
    assert_eq!(writes[0].1.affected_attributes(), vec!["employeeID", "title"]);

    let updated = &directory.users()[0];
    assert_eq!(updated.identifier, "E100");
    assert_eq!(updated.title, "Engineer");
}

#[tokio::test]
async fn test_unmatched_accounting() {
    let mut sources = Vec::new();
    let mut targets = Vec::new();
    for i in 0..10 {
        let id = format!("E{i:03}");
        let name = format!("Worker {i}");
        sources.push(worker(&id, &name));
        if i % 3 != 0 || i == 0 {
            targets.push(linked_user(&id, &name));
        }
    }
    // Workers 3, 6 and 9 have no directory user.
    assert_eq!(targets.len(), 7);

    let directory = InMemoryDirectory::new(targets.clone());
    let outcome = Reconciler::new(&directory)
        .reconcile(&sources, &targets)
        .await
        .unwrap();

    assert_eq!(outcome.matched, 7);
    let unmatched: Vec<&str> = outcome
        .report
        .unmatched()
        .iter()
        .map(|u| u.worker_id.as_str())
        .collect();
    assert_eq!(unmatched, vec!["E003", "E006", "E009"]);
    assert!(outcome.report.actions().is_empty());
    assert!(directory.writes().is_empty());
}

async fn assert_second_pass_converges(targets: Vec<TargetRecord>) {
    let sources = vec![
        SourceRecord {
            supervisor_id: Some("E001".into()),
            phone_number: "555-0199".into(),
            job_title: "Lead".into(),
            ..worker("E002", "Ann Lee")
        },
        worker("E001", "Sam Boss"),
    ];
    let directory = InMemoryDirectory::new(targets);

    let first = Reconciler::new(&directory)
        .reconcile(&sources, &directory.users())
        .await
        .unwrap();
    assert!(first.report.count(ActionKind::Update) > 0);

    let second = Reconciler::new(&directory)
        .reconcile(&sources, &directory.users())
        .await
        .unwrap();
    assert_eq!(second.report.count(ActionKind::Update), 0, "{:?}", second.report.actions());

    let users = directory.users();
    let ann = users.iter().find(|u| u.identifier == "E002").unwrap();
    assert_eq!(ann.manager.as_deref(), Some(dn("Sam Boss").as_str()));
    assert_eq!(ann.phone_numbers, vec!["555-0100", "555-0199"]);
    assert!(users.iter().any(|u| u.identifier == "E001"));
}

#[tokio::test]
async fn test_second_pass_is_idempotent() {
    // Supervisor already linked, subordinate found by name.
    assert_second_pass_converges(vec![
        linked_user("E001", "Sam Boss"),
        TargetRecord {
            identifier: String::new(),
            ..linked_user("E002", "Ann Lee")
        },
    ])
    .await;

    // Supervisor only found by name in the same pass.
    assert_second_pass_converges(vec![
        TargetRecord {
            identifier: String::new(),
            ..linked_user("E001", "Sam Boss")
        },
        linked_user("E002", "Ann Lee"),
    ])
    .await;
}

#[tokio::test]
async fn test_manager_linked_when_supervisor_matched_by_name() {
    let sources = vec![
        SourceRecord {
            supervisor_id: Some("E001".into()),
            ..worker("E002", "Ann Lee")
        },
        worker("E001", "Sam Boss"),
    ];
    let targets = vec![
        TargetRecord {
            identifier: String::new(),
            ..linked_user("E001", "Sam Boss")
        },
        linked_user("E002", "Ann Lee"),
    ];
    let directory = InMemoryDirectory::new(targets.clone());

    let outcome = Reconciler::new(&directory)
        .reconcile(&sources, &targets)
        .await
        .unwrap();

    let summary: Vec<_> = outcome
        .report
        .actions()
        .iter()
        .map(|a| (a.worker_id.as_str(), a.attribute, a.new_value.clone()))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("E002", DirectoryAttribute::Manager, dn("Sam Boss")),
            ("E001", DirectoryAttribute::EmployeeId, "E001".to_string()),
        ]
    );
}

#[tokio::test]
async fn test_dry_run_report_matches_live() {
    let sources = vec![
        SourceRecord {
            job_title: "Director".into(),
            ..worker("E001", "Sam Boss")
        },
        worker("E404", "Nobody Here"),
    ];
    let targets = vec![linked_user("E001", "Sam Boss")];

    let dry = InMemoryDirectory::new(targets.clone());
    let dry_outcome = Reconciler::new(&dry)
        .dry_run(true)
        .reconcile(&sources, &targets)
        .await
        .unwrap();

    let live = InMemoryDirectory::new(targets.clone());
    let live_outcome = Reconciler::new(&live)
        .reconcile(&sources, &targets)
        .await
        .unwrap();

    assert_eq!(dry_outcome.report, live_outcome.report);
    assert!(dry.writes().is_empty());
    assert_eq!(dry.users(), targets);
    assert_eq!(live.writes().len(), 1);
}

#[tokio::test]
async fn test_write_failure_does_not_stop_pass() {
    let sources = vec![
        SourceRecord {
            job_title: "Director".into(),
            ..worker("E001", "Sam Boss")
        },
        SourceRecord {
            job_title: "Lead".into(),
            ..worker("E002", "Ann Lee")
        },
    ];
    let targets = vec![linked_user("E001", "Sam Boss"), linked_user("E002", "Ann Lee")];
    let directory = InMemoryDirectory::new(targets.clone()).failing_on(&dn("Sam Boss"));

    let outcome = Reconciler::new(&directory)
        .reconcile(&sources, &targets)
        .await
        .unwrap();

    assert_eq!(outcome.write_failures.len(), 1);
    assert_eq!(outcome.write_failures[0].worker_id, "E001");
    assert_eq!(outcome.report.actions().len(), 2);
    assert_eq!(directory.writes().len(), 1);
    assert_eq!(directory.writes()[0].0, dn("Ann Lee"));
}

#[tokio::test]
async fn test_empty_inputs_rejected() {
    let directory = InMemoryDirectory::default();
    let targets = vec![linked_user("E001", "Sam Boss")];

    let err = Reconciler::new(&directory)
        .reconcile(&[], &targets)
        .await
        .unwrap_err();
    assert!(matches!(err, SyncError::Validation(_)));

    let err = Reconciler::new(&directory)
        .reconcile(&[worker("E001", "Sam Boss")], &[])
        .await
        .unwrap_err();
    assert!(matches!(err, SyncError::Validation(_)));
}
