use crate::config::SeedConfig;
use crate::logic::{FailedRecords, UpsertEngine, ViewProvisioner};
use crate::model::{
    DatasetKind, DatasetReport, ErrorPolicy, RunSummary, ThemeData, ViewDefinition,
};
use crate::seed::{
    default_views, embedded_theme, prepare_user_accounts, reset_theme, theme_from_file,
    DatasetRegistry, PasswordHasher, ReferenceData,
};
use crate::store::Store;
use anyhow::Result;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    Start,
    ReconcileDatasets,
    ProvisionViews,
    ResetTheme,
    ReportSummary,
    Success,
    Fatal,
}

impl fmt::Display for RunPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RunPhase::Start => "start",
            RunPhase::ReconcileDatasets => "reconcile-datasets",
            RunPhase::ProvisionViews => "provision-views",
            RunPhase::ResetTheme => "reset-theme",
            RunPhase::ReportSummary => "report-summary",
            RunPhase::Success => "success",
            RunPhase::Fatal => "fatal",
        };
        f.write_str(name)
    }
}

/// What a run should write. Phases with no data are skipped.
#[derive(Debug, Clone)]
pub struct SeedPlan {
    pub registry: DatasetRegistry,
    pub reference: Option<ReferenceData>,
    pub views: Vec<ViewDefinition>,
    pub theme: Option<ThemeData>,
    pub dataset_policy: ErrorPolicy,
    pub view_policy: ErrorPolicy,
}

impl SeedPlan {
    /// Build the plan from configuration, loading overrides from disk and
    /// falling back to the data compiled into the binary
    pub fn from_config(config: &SeedConfig) -> Result<Self> {
        let reference = if config.reference {
            Some(match &config.reference_file {
                Some(path) => ReferenceData::from_file(path)?,
                None => ReferenceData::embedded()?,
            })
        } else {
            None
        };

        let theme = if config.theme {
            Some(match &config.theme_file {
                Some(path) => theme_from_file(path)?,
                None => embedded_theme()?,
            })
        } else {
            None
        };

        Ok(Self {
            registry: DatasetRegistry::default(),
            reference,
            views: if config.views { default_views() } else { Vec::new() },
            theme,
            dataset_policy: config.dataset_policy,
            view_policy: config.view_policy,
        })
    }
}

/// Runs the seeding phases in order against one store
pub struct Runner<'a, S: ?Sized, H: ?Sized> {
    store: &'a S,
    hasher: &'a H,
    plan: SeedPlan,
}

impl<'a, S, H> Runner<'a, S, H>
where
    S: Store + ?Sized,
    H: PasswordHasher + ?Sized,
{
    pub fn new(store: &'a S, hasher: &'a H, plan: SeedPlan) -> Self {
        Self {
            store,
            hasher,
            plan,
        }
    }

    pub async fn run(&self) -> Result<RunSummary> {
        enter(RunPhase::Start);
        match self.execute().await {
            Ok(summary) => {
                enter(RunPhase::Success);
                Ok(summary)
            }
            Err(e) => {
                log::error!("phase {}: {:#}", RunPhase::Fatal, e);
                Err(e)
            }
        }
    }

    async fn execute(&self) -> Result<RunSummary> {
        let mut summary = RunSummary::default();

        if let Some(data) = &self.plan.reference {
            enter(RunPhase::ReconcileDatasets);
            let engine = UpsertEngine::new(self.plan.dataset_policy);
            let mut failed = FailedRecords::default();
            for kind in self.plan.registry.order() {
                let report = self.reconcile(&engine, data, *kind, &mut failed).await?;
                summary.datasets.push(report);
            }
        }

        if !self.plan.views.is_empty() {
            enter(RunPhase::ProvisionViews);
            summary.views = ViewProvisioner::new(self.plan.view_policy)
                .provision(&self.plan.views, self.store)
                .await?;
        }

        if let Some(theme) = &self.plan.theme {
            enter(RunPhase::ResetTheme);
            summary.theme = Some(reset_theme(self.store, theme).await?);
        }

        enter(RunPhase::ReportSummary);
        log_summary(&summary);

        Ok(summary)
    }

    async fn reconcile(
        &self,
        engine: &UpsertEngine,
        data: &ReferenceData,
        kind: DatasetKind,
        failed: &mut FailedRecords,
    ) -> Result<DatasetReport> {
        let store = self.store;
        let report = match kind {
            DatasetKind::Accounts => engine.reconcile_after(&data.accounts, store, failed).await?,
            DatasetKind::Persons => engine.reconcile_after(&data.persons, store, failed).await?,
            DatasetKind::UserAccounts => {
                let policy = engine.policy();
                let prepared =
                    prepare_user_accounts(store, self.hasher, &data.user_accounts, policy).await?;
                let mut report = engine
                    .reconcile_after(&prepared.accounts, store, failed)
                    .await?;
                for failure in prepared.failures {
                    failed.insert(kind, failure.key.clone());
                    report.records.push(failure);
                }
                report
            }
            DatasetKind::Wallets => engine.reconcile_after(&data.wallets, store, failed).await?,
            DatasetKind::Projects => engine.reconcile_after(&data.projects, store, failed).await?,
            DatasetKind::Units => engine.reconcile_after(&data.units, store, failed).await?,
            DatasetKind::Shareholdings => {
                engine
                    .reconcile_after(&data.shareholdings, store, failed)
                    .await?
            }
        };
        Ok(report)
    }
}

fn enter(phase: RunPhase) {
    log::info!("phase {}", phase);
}

fn log_summary(summary: &RunSummary) {
    let (created, updated, unchanged, failed) =
        summary
            .datasets
            .iter()
            .fold((0, 0, 0, 0), |(c, u, n, f), d| {
                (
                    c + d.created(),
                    u + d.updated(),
                    n + d.unchanged(),
                    f + d.failed(),
                )
            });
    log::info!(
        "{} datasets: {} created, {} updated, {} unchanged, {} failed",
        summary.datasets.len(),
        created,
        updated,
        unchanged,
        failed
    );

    let failed_views: Vec<&str> = summary.failed_views().map(|v| v.name.as_str()).collect();
    log::info!(
        "{} of {} views created",
        summary.views.len() - failed_views.len(),
        summary.views.len()
    );
    if !failed_views.is_empty() {
        log::warn!("views not created: {}", failed_views.join(", "));
    }

    if let Some(theme) = &summary.theme {
        log::info!(
            "theme reset: {} languages, {} settings, {} links, {} templates",
            theme.languages,
            theme.settings,
            theme.links,
            theme.templates
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::BcryptHasher;
    use crate::store::InMemoryStore;

    fn plan() -> SeedPlan {
        let mut config = SeedConfig::default();
        config.theme = false;
        SeedPlan::from_config(&config).unwrap()
    }

    #[tokio::test]
    async fn runs_phases_in_order_and_reports_each_dataset() {
        let store = InMemoryStore::new();
        let hasher = BcryptHasher::new(4);
        let summary = Runner::new(&store, &hasher, plan()).run().await.unwrap();

        let kinds: Vec<DatasetKind> = summary.datasets.iter().map(|d| d.kind).collect();
        assert_eq!(kinds, DatasetKind::ALL.to_vec());
        assert_eq!(summary.views.len(), default_views().len());
        assert!(summary.theme.is_none());
    }

    #[tokio::test]
    async fn dataset_failure_is_fatal_and_skips_later_phases() {
        let store = InMemoryStore::new();
        store.fail_writes_for("P001");
        let hasher = BcryptHasher::new(4);

        let err = Runner::new(&store, &hasher, plan()).run().await.unwrap_err();
        assert!(format!("{:#}", err).contains("P001"));
        assert!(store.view_names().is_empty());
        assert!(store.wallets().is_empty());
    }

    #[test]
    fn disabled_phases_load_nothing() {
        let config = SeedConfig {
            reference: false,
            views: false,
            theme: false,
            ..SeedConfig::default()
        };
        let plan = SeedPlan::from_config(&config).unwrap();
        assert!(plan.reference.is_none());
        assert!(plan.views.is_empty());
        assert!(plan.theme.is_none());
    }
}
