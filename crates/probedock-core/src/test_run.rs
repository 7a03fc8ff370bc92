//! Collection of test results for one execution.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::annotation::{self, Annotation};
use crate::config::Config;
use crate::fingerprint;

/// One reported test outcome.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestResult {
    /// Stable identifier given by the caller or by a `@probedock(...)` marker.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,

    /// Display name without markers.
    pub name: String,

    /// Name as reported by the test framework.
    pub original_name: String,

    pub passed: bool,

    /// Duration in milliseconds.
    pub duration: u64,

    pub fingerprint: String,

    #[serde(default)]
    pub category: Option<String>,

    #[serde(default)]
    pub tags: Vec<String>,

    #[serde(default)]
    pub tickets: Vec<String>,

    /// Failure message or explicit note.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Optional inputs of [`TestRun::add`].
#[derive(Debug, Clone, Default)]
pub struct AddOptions {
    /// Hashed instead of the display name when computing the fingerprint.
    pub name_parts: Option<Vec<String>>,
    pub category: Option<String>,
    pub tags: Vec<String>,
    pub tickets: Vec<String>,
    pub message: Option<String>,
}

impl AddOptions {
    pub fn with_name_parts<I, S>(mut self, parts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.name_parts = Some(parts.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    pub fn with_ticket(mut self, ticket: impl Into<String>) -> Self {
        self.tickets.push(ticket.into());
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

/// Results of one test suite execution.
///
/// `start()` when the suite starts, `add()` for every finished test, `end()`
/// when the suite is done, then `validate()` before publishing. A run is
/// mutated from a single execution context; callers serialize `add()` calls.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestRun {
    #[serde(default)]
    pub project_api_id: Option<String>,

    #[serde(default)]
    pub project_version: Option<String>,

    /// Default category of results.
    #[serde(default)]
    pub category: Option<String>,

    /// Tags added to every result.
    #[serde(default)]
    pub tags: Vec<String>,

    /// Tickets added to every result.
    #[serde(default)]
    pub tickets: Vec<String>,

    /// Report UID grouping this run with others.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,

    #[serde(default)]
    pub start_time: Option<DateTime<Utc>>,

    #[serde(default)]
    pub end_time: Option<DateTime<Utc>>,

    /// Milliseconds between start and end.
    #[serde(default)]
    pub duration: Option<u64>,

    #[serde(default)]
    pub results: Vec<TestResult>,
}

impl TestRun {
    /// Create an empty run for the project described by `config`.
    pub fn new(config: &Config) -> Self {
        let project = config.project_options();

        Self {
            project_api_id: project.api_id,
            project_version: project.version,
            category: project.category,
            tags: project.tags,
            tickets: project.tickets,
            uid: config.test_run_uid.clone(),
            ..Default::default()
        }
    }

    /// Record the start time. Calling it again overwrites the previous value.
    pub fn start(&mut self) {
        self.start_at(Utc::now());
    }

    pub fn start_at(&mut self, time: DateTime<Utc>) {
        self.start_time = Some(time);
    }

    /// Record the end time and, if the run was started, its duration.
    pub fn end(&mut self) {
        self.end_at(Utc::now());
    }

    pub fn end_at(&mut self, time: DateTime<Utc>) {
        self.end_time = Some(time);
        if let Some(start) = self.start_time {
            let elapsed = (time - start).num_milliseconds().max(0);
            self.duration = Some(u64::try_from(elapsed).unwrap_or_default());
        }
    }

    /// Add a test result.
    ///
    /// Markers in `name` are parsed and stripped. An explicit `key` wins over
    /// a marker key; the category comes from `options`, then the markers, then
    /// the run; tags and tickets are the union of all three.
    pub fn add(
        &mut self,
        key: Option<&str>,
        name: &str,
        passed: bool,
        duration: u64,
        options: AddOptions,
    ) -> &TestResult {
        let annotation = Annotation::parse(name);
        let display_name = annotation::strip(name);
        let fingerprint = fingerprint::compute(&display_name, options.name_parts.as_deref());

        let key = key
            .filter(|k| !k.is_empty())
            .map(String::from)
            .or(annotation.key)
            .filter(|k| !k.is_empty());

        let category = options
            .category
            .or(annotation.category)
            .or_else(|| self.category.clone());

        let result = TestResult {
            key,
            name: display_name,
            original_name: name.to_string(),
            passed,
            duration,
            fingerprint,
            category,
            tags: union(&[&options.tags, &annotation.tags, &self.tags]),
            tickets: union(&[&options.tickets, &annotation.tickets, &self.tickets]),
            message: options.message.filter(|m| !m.is_empty()),
        };

        let index = self.results.len();
        self.results.push(result);
        &self.results[index]
    }

    /// Append a message for every problem preventing publication to `errors`.
    pub fn validate(&self, errors: &mut Vec<String>) {
        if self.project_api_id.as_deref().map_or(true, str::is_empty) {
            errors.push("Project API ID is not set".to_string());
        }

        if self.project_version.as_deref().map_or(true, str::is_empty) {
            errors.push("Project version is not set".to_string());
        }

        if self.results.is_empty() {
            errors.push("No test result to send".to_string());
        }

        if self.start_time.is_none() {
            errors.push(
                "Start time is not set; maybe you forgot to call start() when the test suite started"
                    .to_string(),
            );
        }

        if self.end_time.is_none() {
            errors.push(
                "End time is not set; maybe you forgot to call end() when the test suite finished running"
                    .to_string(),
            );
        }

        for (key, names) in self.duplicate_keys() {
            let count = names.len();
            let names = names
                .iter()
                .map(|name| format!("\"{name}\""))
                .collect::<Vec<_>>()
                .join(", ");
            errors.push(format!(
                "Test key \"{key}\" is used by {count} results: {names}"
            ));
        }
    }

    /// Keys shared by more than one result, in order of first use, with the
    /// names of every result using them.
    fn duplicate_keys(&self) -> Vec<(&str, Vec<&str>)> {
        let mut groups: Vec<(&str, Vec<&str>)> = Vec::new();
        let mut index: HashMap<&str, usize> = HashMap::new();

        for result in &self.results {
            let Some(key) = result.key.as_deref().filter(|k| !k.is_empty()) else {
                continue;
            };
            match index.get(key) {
                Some(&i) => groups[i].1.push(&result.name),
                None => {
                    index.insert(key, groups.len());
                    groups.push((key, vec![&result.name]));
                }
            }
        }

        groups.retain(|(_, names)| names.len() > 1);
        groups
    }
}

/// Deduplicated union keeping the order of first occurrence; empty values are
/// dropped.
fn union(lists: &[&Vec<String>]) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for value in lists.iter().flat_map(|list| list.iter()) {
        if !value.is_empty() && !out.contains(value) {
            out.push(value.clone());
        }
    }
    out
}
