use crate::error::SeedError;
use crate::model::{ErrorPolicy, ViewDefinition, ViewOutcome, ViewReport};
use crate::store::ViewStore;

/// (Re)creates reporting views. Views are independent, so by default one
/// broken definition does not keep the others from being created.
#[derive(Debug, Clone, Copy)]
pub struct ViewProvisioner {
    policy: ErrorPolicy,
}

impl ViewProvisioner {
    pub fn new(policy: ErrorPolicy) -> Self {
        Self { policy }
    }

    pub async fn provision<S>(
        &self,
        views: &[ViewDefinition],
        store: &S,
    ) -> Result<Vec<ViewReport>, SeedError>
    where
        S: ViewStore + ?Sized,
    {
        let mut reports = Vec::with_capacity(views.len());

        for view in views {
            let outcome = match store.execute_batch(&view.replace_statements()).await {
                Ok(_) => {
                    log::info!("view {} created", view.name);
                    ViewOutcome::Created
                }
                Err(source) if self.policy == ErrorPolicy::FailFast => {
                    return Err(SeedError::View {
                        name: view.name.clone(),
                        source,
                    });
                }
                Err(source) => {
                    log::warn!("view {} could not be created: {:#}", view.name, source);
                    ViewOutcome::Failed(format!("{:#}", source))
                }
            };
            reports.push(ViewReport {
                name: view.name.clone(),
                outcome,
            });
        }

        Ok(reports)
    }
}

impl Default for ViewProvisioner {
    fn default() -> Self {
        Self::new(ErrorPolicy::BestEffort)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryStore;

    fn views() -> Vec<ViewDefinition> {
        vec![
            ViewDefinition::new("v_one", "first", "SELECT 1"),
            ViewDefinition::new("v_two", "second", "SELEKT broken"),
            ViewDefinition::new("v_three", "third", "SELECT 3"),
        ]
    }

    #[tokio::test]
    async fn broken_view_does_not_block_the_rest() {
        let store = InMemoryStore::new();
        store.fail_statements_containing("SELEKT");

        let reports = ViewProvisioner::default()
            .provision(&views(), &store)
            .await
            .unwrap();

        let created: Vec<_> = reports
            .iter()
            .filter(|r| r.is_created())
            .map(|r| r.name.as_str())
            .collect();
        assert_eq!(created, vec!["v_one", "v_three"]);
        assert!(matches!(reports[1].outcome, ViewOutcome::Failed(_)));
        assert_eq!(store.view_names(), vec!["v_one", "v_three"]);
    }

    #[tokio::test]
    async fn fail_fast_reports_the_broken_view() {
        let store = InMemoryStore::new();
        store.fail_statements_containing("SELEKT");

        let err = ViewProvisioner::new(ErrorPolicy::FailFast)
            .provision(&views(), &store)
            .await
            .unwrap_err();
        assert!(matches!(err, SeedError::View { ref name, .. } if name == "v_two"));
        assert_eq!(store.view_names(), vec!["v_one"]);
    }

    #[tokio::test]
    async fn reprovisioning_replaces_existing_views() {
        let store = InMemoryStore::new();
        let provisioner = ViewProvisioner::default();
        provisioner.provision(&views()[..1], &store).await.unwrap();
        provisioner.provision(&views()[..1], &store).await.unwrap();
        assert_eq!(store.view_names(), vec!["v_one"]);
    }

    #[tokio::test]
    async fn stale_view_of_the_same_name_is_replaced() {
        let store = InMemoryStore::new();
        store
            .execute_raw("CREATE VIEW v_one AS SELECT 0 AS stale")
            .await
            .unwrap();

        let reports = ViewProvisioner::new(ErrorPolicy::FailFast)
            .provision(&views()[..1], &store)
            .await
            .unwrap();

        assert!(reports[0].is_created());
        assert_eq!(store.view_names(), vec!["v_one"]);
        assert_eq!(
            store.view_statement("v_one").as_deref(),
            Some("CREATE VIEW v_one AS\nSELECT 1")
        );
    }

    #[tokio::test]
    async fn failed_replacement_keeps_the_previous_view() {
        let store = InMemoryStore::new();
        store
            .execute_raw("CREATE VIEW v_two AS SELECT 2")
            .await
            .unwrap();
        store.fail_statements_containing("SELEKT");

        let reports = ViewProvisioner::default()
            .provision(&views()[1..2], &store)
            .await
            .unwrap();

        assert!(matches!(reports[0].outcome, ViewOutcome::Failed(_)));
        assert_eq!(
            store.view_statement("v_two").as_deref(),
            Some("CREATE VIEW v_two AS SELECT 2")
        );
    }
}
