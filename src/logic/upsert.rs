use crate::error::SeedError;
use crate::model::{DatasetKind, DatasetReport, ErrorPolicy, ReconcileOutcome, Record, Reference};
use crate::seed::Dataset;
use crate::store::RecordStore;
use anyhow::Result;
use std::collections::HashSet;

/// Natural keys that failed to reconcile earlier in a run
#[derive(Debug, Clone, Default)]
pub struct FailedRecords {
    keys: HashSet<Reference>,
}

impl FailedRecords {
    pub fn insert(&mut self, kind: DatasetKind, key: impl Into<String>) {
        self.keys.insert(Reference::new(kind, key));
    }

    pub fn contains(&self, kind: DatasetKind, key: &str) -> bool {
        self.keys.contains(&Reference::new(kind, key))
    }

    fn blocking<'r>(&self, references: &'r [Reference]) -> Option<&'r Reference> {
        references.iter().find(|r| self.keys.contains(*r))
    }
}

/// Brings persisted records in line with a declared dataset, one record at a time
#[derive(Debug, Clone, Copy)]
pub struct UpsertEngine {
    policy: ErrorPolicy,
}

impl UpsertEngine {
    pub fn new(policy: ErrorPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> ErrorPolicy {
        self.policy
    }

    pub async fn reconcile<R, S>(
        &self,
        dataset: &Dataset<R>,
        store: &S,
    ) -> Result<DatasetReport, SeedError>
    where
        R: Record,
        S: RecordStore<R> + ?Sized,
    {
        self.reconcile_after(dataset, store, &mut FailedRecords::default())
            .await
    }

    /// Reconcile `dataset`, leaving unwritten every record that references a
    /// key in `failed`. Keys that fail here are added to `failed`.
    pub async fn reconcile_after<R, S>(
        &self,
        dataset: &Dataset<R>,
        store: &S,
        failed: &mut FailedRecords,
    ) -> Result<DatasetReport, SeedError>
    where
        R: Record,
        S: RecordStore<R> + ?Sized,
    {
        let mut report = DatasetReport::new(R::KIND);

        for record in dataset {
            let key = record.natural_key();
            let references = record.references();
            if let Some(dependency) = failed.blocking(&references) {
                let reason = format!("depends on failed {} '{}'", dependency.kind, dependency.key);
                log::warn!("{} '{}' skipped: {}", R::KIND, key, reason);
                report.push(key.to_string(), ReconcileOutcome::Failed(reason));
                failed.insert(R::KIND, key.to_string());
                continue;
            }

            match Self::apply(record, &key, store).await {
                Ok(outcome) => {
                    log::debug!("{} '{}': {:?}", R::KIND, key, outcome);
                    report.push(key.to_string(), outcome);
                }
                Err(source) => match self.policy {
                    ErrorPolicy::FailFast => {
                        return Err(SeedError::Reconcile {
                            kind: R::KIND,
                            key: key.to_string(),
                            source,
                        });
                    }
                    ErrorPolicy::BestEffort => {
                        log::warn!("{} '{}' failed: {:#}", R::KIND, key, source);
                        failed.insert(R::KIND, key.to_string());
                        report.push(
                            key.to_string(),
                            ReconcileOutcome::Failed(format!("{:#}", source)),
                        );
                    }
                },
            }
        }

        log::info!(
            "{}: {} created, {} updated, {} unchanged, {} failed",
            R::KIND,
            report.created(),
            report.updated(),
            report.unchanged(),
            report.failed()
        );

        Ok(report)
    }

    async fn apply<R, S>(record: &R, key: &R::Key, store: &S) -> Result<ReconcileOutcome>
    where
        R: Record,
        S: RecordStore<R> + ?Sized,
    {
        match store.find_by_key(key).await? {
            None => {
                store.create(record).await?;
                Ok(ReconcileOutcome::Created)
            }
            Some(existing) if existing == *record => Ok(ReconcileOutcome::Unchanged),
            Some(_) => {
                store.update(record).await?;
                Ok(ReconcileOutcome::Updated)
            }
        }
    }
}

impl Default for UpsertEngine {
    fn default() -> Self {
        Self::new(ErrorPolicy::FailFast)
    }
}
