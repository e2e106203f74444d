//! CSV report files.
//!
//! Column order is fixed by the header constants; a header row is written
//! even when a report has no rows.

use roster_connector::SourceRecord;
use roster_sync::{ActionRecord, SyncReport, UnmatchedRecord};
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use tracing::info;

use crate::config::ReportPaths;
use crate::error::{CliError, CliResult};

pub const ACTION_COLUMNS: [&str; 6] = [
    "workerID",
    "fullName",
    "attribute",
    "action",
    "oldValue",
    "newValue",
];

pub const UNMATCHED_COLUMNS: [&str; 8] = [
    "workerID",
    "fullName",
    "jobTitle",
    "division",
    "department",
    "location",
    "managerID",
    "managerName",
];

fn write_csv<W: Write, T: Serialize>(writer: W, columns: &[&str], rows: &[T]) -> CliResult<()> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);

    wtr.write_record(columns)
        .map_err(|e| CliError::Report(format!("Failed to write CSV header: {e}")))?;

    for row in rows {
        wtr.serialize(row)
            .map_err(|e| CliError::Report(format!("Failed to write CSV row: {e}")))?;
    }

    wtr.flush()
        .map_err(|e| CliError::Report(format!("Failed to flush CSV: {e}")))?;
    Ok(())
}

/// Writes the action report rows.
pub fn write_actions_csv<W: Write>(actions: &[ActionRecord], writer: W) -> CliResult<()> {
    write_csv(writer, &ACTION_COLUMNS, actions)
}

/// Writes the unmatched-worker report rows.
pub fn write_unmatched_csv<W: Write>(unmatched: &[UnmatchedRecord], writer: W) -> CliResult<()> {
    write_csv(writer, &UNMATCHED_COLUMNS, unmatched)
}

fn create(path: &Path) -> CliResult<File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| {
            CliError::Report(format!("Failed to create {}: {e}", parent.display()))
        })?;
    }
    File::create(path)
        .map_err(|e| CliError::Report(format!("Failed to create {}: {e}", path.display())))
}

/// Writes both report files.
pub fn write_reports(report: &SyncReport, paths: &ReportPaths) -> CliResult<()> {
    write_actions_csv(report.actions(), create(&paths.actions)?)?;
    write_unmatched_csv(report.unmatched(), create(&paths.unmatched)?)?;

    info!(
        actions = %paths.actions.display(),
        unmatched = %paths.unmatched.display(),
        "Wrote reports"
    );
    Ok(())
}

/// Writes workers as pretty-printed JSON.
pub fn write_workers_json<W: Write>(workers: &[SourceRecord], mut writer: W) -> CliResult<()> {
    serde_json::to_writer_pretty(&mut writer, workers)
        .map_err(|e| CliError::Report(format!("Failed to serialize workers: {e}")))?;
    writeln!(writer).map_err(|e| CliError::Report(format!("Failed to write workers: {e}")))?;
    Ok(())
}

/// Writes workers to `path`, or stdout when `path` is `None`.
pub fn export_workers(workers: &[SourceRecord], path: Option<&Path>) -> CliResult<()> {
    match path {
        Some(path) => write_workers_json(workers, create(path)?),
        None => write_workers_json(workers, std::io::stdout().lock()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roster_connector::DirectoryAttribute;
    use roster_sync::{ActionKind, ReportBuilder};

    fn sample_report() -> SyncReport {
        let mut builder = ReportBuilder::new();
        builder.push_action(ActionRecord {
            worker_id: "E100".into(),
            full_name: "Jane Doe".into(),
            attribute: DirectoryAttribute::EmployeeId,
            action: ActionKind::Update,
            old_value: String::new(),
            new_value: "E100".into(),
        });
        builder.push_action(ActionRecord {
            worker_id: "E100".into(),
            full_name: "Jane Doe".into(),
            attribute: DirectoryAttribute::OtherTelephone,
            action: ActionKind::Update,
            old_value: "555-0100, 555-0101".into(),
            new_value: "555-0199".into(),
        });

        let mut unmatched = SourceRecord::new("E200");
        unmatched.legal_name = "New Hire".into();
        unmatched.supervisor_id = Some("E001".into());
        builder.push_unmatched(UnmatchedRecord::from(&unmatched));
        builder.build()
    }

    #[test]
    fn test_actions_csv_layout() {
        let mut out = Vec::new();
        write_actions_csv(sample_report().actions(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "workerID,fullName,attribute,action,oldValue,newValue");
        assert_eq!(lines[1], "E100,Jane Doe,employeeID,UPDATE,,E100");
        assert_eq!(
            lines[2],
            "E100,Jane Doe,otherTelephone,UPDATE,\"555-0100, 555-0101\",555-0199"
        );
    }

    #[test]
    fn test_empty_report_still_has_header() {
        let mut out = Vec::new();
        write_unmatched_csv(&[], &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "workerID,fullName,jobTitle,division,department,location,managerID,managerName\n"
        );
    }

    #[test]
    fn test_write_reports_to_files() {
        crate::logging::init_test_logging();
        let dir = tempfile::tempdir().unwrap();
        let paths = ReportPaths {
            actions: dir.path().join("out").join("actions.csv"),
            unmatched: dir.path().join("unmatched.csv"),
        };

        write_reports(&sample_report(), &paths).unwrap();

        let unmatched = std::fs::read_to_string(&paths.unmatched).unwrap();
        assert!(unmatched.contains("E200,New Hire,,,,,E001,"));
        let actions = std::fs::read_to_string(&paths.actions).unwrap();
        assert_eq!(actions.lines().count(), 3);
    }

    #[test]
    fn test_unwritable_path_is_report_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        std::fs::write(&blocker, "x").unwrap();
        let paths = ReportPaths {
            actions: blocker.join("actions.csv"),
            unmatched: dir.path().join("unmatched.csv"),
        };

        let err = write_reports(&sample_report(), &paths).unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn test_export_workers_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("workers.json");
        let mut worker = SourceRecord::new("E100");
        worker.job_title = "Engineer".into();

        export_workers(&[worker], Some(&path)).unwrap();

        let parsed: Vec<SourceRecord> =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(parsed[0].id, "E100");
        assert_eq!(parsed[0].job_title, "Engineer");
    }
}
