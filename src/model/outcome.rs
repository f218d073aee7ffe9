use crate::model::DatasetKind;
use serde::{Deserialize, Serialize};

/// Result of reconciling one record against the store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "outcome", content = "reason")]
pub enum ReconcileOutcome {
    Created,
    Updated,
    /// Persisted record already matched; nothing was written
    Unchanged,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordReport {
    pub key: String,
    pub outcome: ReconcileOutcome,
}

/// Per-dataset tally reported after reconciliation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetReport {
    pub kind: DatasetKind,
    pub records: Vec<RecordReport>,
}

impl DatasetReport {
    pub fn new(kind: DatasetKind) -> Self {
        Self {
            kind,
            records: Vec::new(),
        }
    }

    pub fn push(&mut self, key: String, outcome: ReconcileOutcome) {
        self.records.push(RecordReport { key, outcome });
    }

    fn count(&self, pred: impl Fn(&ReconcileOutcome) -> bool) -> usize {
        self.records.iter().filter(|r| pred(&r.outcome)).count()
    }

    pub fn created(&self) -> usize {
        self.count(|o| *o == ReconcileOutcome::Created)
    }

    pub fn updated(&self) -> usize {
        self.count(|o| *o == ReconcileOutcome::Updated)
    }

    pub fn unchanged(&self) -> usize {
        self.count(|o| *o == ReconcileOutcome::Unchanged)
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, ReconcileOutcome::Failed(_)))
    }

    pub fn outcome_for(&self, key: &str) -> Option<&ReconcileOutcome> {
        self.records
            .iter()
            .find(|r| r.key == key)
            .map(|r| &r.outcome)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "outcome", content = "reason")]
pub enum ViewOutcome {
    Created,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewReport {
    pub name: String,
    pub outcome: ViewOutcome,
}

impl ViewReport {
    pub fn is_created(&self) -> bool {
        self.outcome == ViewOutcome::Created
    }
}

/// Row counts written by the theming reset
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeReport {
    pub removed: u64,
    pub languages: usize,
    pub settings: usize,
    pub links: usize,
    pub templates: usize,
}

/// Everything a run did, in phase order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub datasets: Vec<DatasetReport>,
    pub views: Vec<ViewReport>,
    pub theme: Option<ThemeReport>,
}

impl RunSummary {
    pub fn dataset(&self, kind: DatasetKind) -> Option<&DatasetReport> {
        self.datasets.iter().find(|d| d.kind == kind)
    }

    pub fn failed_views(&self) -> impl Iterator<Item = &ViewReport> {
        self.views.iter().filter(|v| !v.is_created())
    }
}

/// How a phase reacts to a failing unit of work
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorPolicy {
    /// Abort the phase on the first failure
    FailFast,
    /// Record the failure and move on to the next unit
    BestEffort,
}
