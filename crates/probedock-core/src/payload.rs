//! `application/vnd.probedock.payload.v1+json` serialization.
//!
//! Field presence is part of the format: `c`, `g` and `t` are always present
//! (`null`/`[]` when empty), `k` and `m` only when set, and `reports` only when
//! the run has a UID.

use serde::{Deserialize, Serialize};

use crate::test_run::{TestResult, TestRun};

/// Media type of the v1 payload.
pub const MEDIA_TYPE_V1: &str = "application/vnd.probedock.payload.v1+json";

/// A serialized test run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayloadV1 {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u64>,

    pub results: Vec<ResultV1>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reports: Option<Vec<ReportRef>>,
}

/// Compact form of one result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultV1 {
    /// Name.
    pub n: String,
    /// Fingerprint.
    pub f: String,
    /// Passed.
    pub p: bool,
    /// Duration (ms).
    pub d: u64,
    /// Category.
    pub c: Option<String>,
    /// Tags.
    pub g: Vec<String>,
    /// Tickets.
    pub t: Vec<String>,
    /// Key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub k: Option<String>,
    /// Message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub m: Option<String>,
}

/// Report the run belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportRef {
    pub uid: String,
}

impl From<&TestResult> for ResultV1 {
    fn from(result: &TestResult) -> Self {
        Self {
            n: result.name.clone(),
            f: result.fingerprint.clone(),
            p: result.passed,
            d: result.duration,
            c: result.category.clone().filter(|c| !c.is_empty()),
            g: result.tags.clone(),
            t: result.tickets.clone(),
            k: result.key.clone().filter(|k| !k.is_empty()),
            m: result.message.clone().filter(|m| !m.is_empty()),
        }
    }
}

/// Serialize a test run in the v1 format.
pub fn serialize_v1(run: &TestRun) -> PayloadV1 {
    PayloadV1 {
        project_id: run.project_api_id.clone(),
        version: run.project_version.clone(),
        duration: run.duration,
        results: run.results.iter().map(ResultV1::from).collect(),
        reports: run
            .uid
            .as_ref()
            .filter(|uid| !uid.is_empty())
            .map(|uid| vec![ReportRef { uid: uid.clone() }]),
    }
}
