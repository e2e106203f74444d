//! Worker record extraction from raw HR API payloads.
//!
//! Every nested path may be absent. A missing optional field leaves the
//! corresponding record field at its zero value and is logged at debug
//! level; only the worker identifier is mandatory.

use chrono::NaiveDate;
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use roster_connector::SourceRecord;

use crate::session::Session;
use crate::{HrClient, HrResult};

const ACTIVE_STATUS: &str = "Active";
const DEPARTMENT_UNIT: &str = "Department";
const DIVISION_UNIT: &str = "Business Unit";

fn text_at<'a>(value: &'a Value, pointer: &str) -> Option<&'a str> {
    value.pointer(pointer).and_then(Value::as_str)
}

/// Reads a string field, logging when the path is missing.
fn field(value: &Value, pointer: &str, worker_id: &str) -> String {
    match text_at(value, pointer) {
        Some(s) => s.to_string(),
        None => {
            debug!(worker_id, path = pointer, "Worker field not present");
            String::new()
        }
    }
}

fn date_at(value: &Value, pointer: &str, worker_id: &str) -> Option<NaiveDate> {
    let raw = text_at(value, pointer)?;
    match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        Ok(date) => Some(date),
        Err(e) => {
            debug!(worker_id, path = pointer, value = raw, error = %e, "Unparseable worker date");
            None
        }
    }
}

/// Finds the short name of the first organizational unit of the given type.
fn organizational_unit(assignment: &Value, unit_type: &str) -> Option<String> {
    assignment
        .get("homeOrganizationalUnits")?
        .as_array()?
        .iter()
        .find(|unit| text_at(unit, "/typeCode/codeValue") == Some(unit_type))
        .and_then(|unit| {
            text_at(unit, "/nameCode/shortName")
                .or_else(|| text_at(unit, "/nameCode/longName"))
                .or_else(|| text_at(unit, "/nameCode/codeValue"))
        })
        .map(String::from)
}

/// Extracts a single worker.
///
/// Returns `None` for inactive workers, workers without any work
/// assignment, and workers without an identifier.
pub fn extract_worker(worker: &Value) -> Option<SourceRecord> {
    let Some(id) = text_at(worker, "/workerID/idValue").filter(|id| !id.trim().is_empty())
    else {
        warn!("Skipping worker without an identifier");
        return None;
    };

    if let Some(status) = text_at(worker, "/workerStatus/statusCode/codeValue") {
        if status != ACTIVE_STATUS {
            debug!(worker_id = id, status, "Skipping inactive worker");
            return None;
        }
    }

    let Some(assignment) = worker
        .get("workAssignments")
        .and_then(Value::as_array)
        .and_then(|assignments| assignments.first())
    else {
        warn!(worker_id = id, "Worker has no assignments");
        return None;
    };

    let mut record = SourceRecord::new(id);

    record.legal_name = field(worker, "/person/legalName/formattedName", id);
    record.given_name = field(worker, "/person/legalName/givenName", id);
    record.middle_name = field(worker, "/person/legalName/middleName", id);
    record.family_name = field(worker, "/person/legalName/familyName1", id);
    record.phone_number = field(
        worker,
        "/businessCommunication/landlines/0/formattedNumber",
        id,
    );

    record.hire_date = date_at(worker, "/workerDates/originalHireDate", id)
        .or_else(|| date_at(assignment, "/actualStartDate", id));
    record.termination_date = date_at(worker, "/workerDates/terminationDate", id)
        .or_else(|| date_at(assignment, "/terminationDate", id));
    record.status_effective_date = date_at(assignment, "/assignmentStatus/effectiveDate", id);

    record.job_title = field(assignment, "/jobTitle", id);
    record.location = field(assignment, "/homeWorkLocation/address/cityName", id);
    record.supervisor_id = text_at(assignment, "/reportsTo/0/workerID/idValue").map(String::from);
    record.supervisor_name = text_at(assignment, "/reportsTo/0/reportsToWorkerName/formattedName")
        .unwrap_or_default()
        .to_string();

    record.department = organizational_unit(assignment, DEPARTMENT_UNIT).unwrap_or_else(|| {
        debug!(worker_id = id, "Worker has no department unit");
        String::new()
    });
    record.division = organizational_unit(assignment, DIVISION_UNIT).unwrap_or_else(|| {
        debug!(worker_id = id, "Worker has no division unit");
        String::new()
    });

    debug!(worker_id = id, name = %record.legal_name, "Retrieved worker record");

    Some(record)
}

/// Extracts every usable worker, preserving input order.
pub fn extract_workers(workers: &[Value]) -> Vec<SourceRecord> {
    workers.iter().filter_map(extract_worker).collect()
}

impl HrClient {
    /// Fetches all workers and normalizes them into source records.
    #[instrument(skip(self, session))]
    pub async fn build_workers(
        &self,
        session: &Session,
        page_size: u32,
    ) -> HrResult<Vec<SourceRecord>> {
        let raw = self.fetch_all(session, page_size).await?;
        let records = extract_workers(&raw);

        info!(
            fetched = raw.len(),
            kept = records.len(),
            "Built HR worker records"
        );

        Ok(records)
    }
}
