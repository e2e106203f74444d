//! Common test utilities for roster-connector-hr integration tests.

#![allow(dead_code)]

use roster_connector_hr::{HrClient, HrConfig};
use serde_json::{json, Value};
use wiremock::MockServer;

pub const CLIENT_ID: &str = "client";
pub const CLIENT_SECRET: &str = "secret";
pub const USER_AGENT: &str = "roster-test/1.0";

/// Creates a client pointed at the mock server.
pub fn create_client(server: &MockServer) -> HrClient {
    let uri = server.uri();
    let config = HrConfig::builder()
        .api_url(&uri)
        .token_url(format!("{uri}/auth/oauth/v2/token"))
        .disconnect_url(format!("{uri}/auth/oauth/v2/logout"))
        .client_id(CLIENT_ID)
        .client_secret(CLIENT_SECRET)
        .user_agent(USER_AGENT)
        .request_timeout_secs(5)
        .build()
        .expect("valid test config");

    HrClient::new(config).expect("client builds")
}

/// Test data factory for an active worker with one assignment.
pub fn create_worker(id: &str) -> Value {
    json!({
        "workerID": {"idValue": id},
        "workerStatus": {"statusCode": {"codeValue": "Active"}},
        "person": {
            "legalName": {
                "formattedName": format!("Worker {id}"),
                "givenName": "Worker",
                "familyName1": id
            }
        },
        "workAssignments": [{
            "jobTitle": "Analyst",
            "homeOrganizationalUnits": [
                {"nameCode": {"shortName": "Finance"}, "typeCode": {"codeValue": "Department"}}
            ]
        }]
    })
}

/// Builds a workers envelope holding `count` workers numbered from `start`.
pub fn create_workers_page(start: usize, count: usize) -> Value {
    let workers: Vec<Value> = (start..start + count)
        .map(|i| create_worker(&format!("E{i:05}")))
        .collect();
    json!({ "workers": workers })
}

pub fn token_response(token: &str) -> Value {
    json!({
        "access_token": token,
        "token_type": "Bearer",
        "expires_in": 3600,
        "scope": "api"
    })
}
