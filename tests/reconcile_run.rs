use booking_seed::config::SeedConfig;
use booking_seed::model::{
    DatasetKind, ErrorPolicy, Journal, JournalLine, ReconcileOutcome, ThemeData,
};
use booking_seed::seed::{
    embedded_theme, BcryptHasher, DatasetRegistry, PasswordHasher, ReferenceData,
};
use booking_seed::store::{InMemoryStore, RecordStore, ReportStore, UserLookup};
use booking_seed::{Account, Runner, SeedError, SeedPlan};
use chrono::NaiveDate;

fn hasher() -> BcryptHasher {
    BcryptHasher::new(4)
}

fn reference_plan(data: ReferenceData) -> SeedPlan {
    SeedPlan {
        registry: DatasetRegistry::default(),
        reference: Some(data),
        views: Vec::new(),
        theme: None,
        dataset_policy: ErrorPolicy::FailFast,
        view_policy: ErrorPolicy::BestEffort,
    }
}

fn embedded_plan(theme: bool) -> SeedPlan {
    let config = SeedConfig {
        theme,
        ..SeedConfig::default()
    };
    SeedPlan::from_config(&config).unwrap()
}

fn date(value: &str) -> NaiveDate {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").unwrap()
}

fn journal(code: &str, posted: Option<bool>) -> Journal {
    Journal {
        jrn_code: code.to_string(),
        jrn_date: date("2024-03-01"),
        jrn_desc: None,
        jrn_is_posted: posted,
        jrn_module: Some("booking".to_string()),
        jrn_ref_code: None,
    }
}

fn line(journal: &str, line_no: i32, account: &str, debit: i64, credit: i64) -> JournalLine {
    JournalLine {
        jrd_jrn_code: journal.to_string(),
        jrd_line_no: line_no,
        jrd_acc_code: account.to_string(),
        jrd_debit: debit,
        jrd_credit: credit,
        jrd_desc: None,
    }
}

#[tokio::test]
async fn test_second_run_writes_nothing() {
    let store = InMemoryStore::new();
    let hasher = hasher();

    let first = Runner::new(&store, &hasher, embedded_plan(false))
        .run()
        .await
        .unwrap();
    let accounts = first.dataset(DatasetKind::Accounts).unwrap();
    assert_eq!(accounts.created(), store.accounts().len());
    let writes_after_first = store.write_count();

    let second = Runner::new(&store, &hasher, embedded_plan(false))
        .run()
        .await
        .unwrap();
    for report in &second.datasets {
        assert_eq!(report.created(), 0, "{} created records on rerun", report.kind);
        assert_eq!(report.updated(), 0, "{} updated records on rerun", report.kind);
        assert_eq!(report.unchanged(), report.records.len());
    }
    assert_eq!(store.write_count(), writes_after_first);
}

#[tokio::test]
async fn test_renamed_root_account_is_updated_in_place() {
    let store = InMemoryStore::new();
    let hasher = hasher();
    let data = |name: &str| {
        ReferenceData::from_json_str(&format!(
            r#"{{"accounts": [
                {{"acc_code": "02", "acc_name": "{}", "acc_type": "debit", "acc_category": "asset"}},
                {{"acc_code": "02/001", "acc_name": "Current assets", "acc_parent_code": "02",
                  "acc_type": "debit", "acc_category": "asset", "acc_sublevel_format": 1}}
            ]}}"#,
            name
        ))
        .unwrap()
    };

    let first = Runner::new(&store, &hasher, reference_plan(data("Assets")))
        .run()
        .await
        .unwrap();
    assert_eq!(first.dataset(DatasetKind::Accounts).unwrap().created(), 2);

    let second = Runner::new(&store, &hasher, reference_plan(data("Total assets")))
        .run()
        .await
        .unwrap();
    let accounts = second.dataset(DatasetKind::Accounts).unwrap();
    assert_eq!(accounts.outcome_for("02"), Some(&ReconcileOutcome::Updated));
    assert_eq!(accounts.outcome_for("02/001"), Some(&ReconcileOutcome::Unchanged));

    let child = RecordStore::<Account>::find_by_key(&store, &"02/001".to_string())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(child.acc_parent_code.as_deref(), Some("02"));
    assert_eq!(store.accounts().len(), 2);
}

#[tokio::test]
async fn test_datasets_are_written_after_their_dependencies() {
    let store = InMemoryStore::new();
    let summary = Runner::new(&store, &hasher(), embedded_plan(false))
        .run()
        .await
        .unwrap();

    let order: Vec<DatasetKind> = summary.datasets.iter().map(|d| d.kind).collect();
    for (position, kind) in order.iter().enumerate() {
        for dependency in kind.depends_on() {
            let dependency_position = order.iter().position(|k| k == dependency).unwrap();
            assert!(dependency_position < position, "{} ran before {}", kind, dependency);
        }
    }
}

#[test]
fn test_dependents_first_order_is_rejected() {
    let err = DatasetRegistry::new(vec![DatasetKind::Persons, DatasetKind::Accounts]).unwrap_err();
    assert!(matches!(err, SeedError::DependencyOrder { .. }));
}

#[test]
fn test_duplicate_natural_key_is_rejected_before_any_write() {
    let err = ReferenceData::from_json_str(
        r#"{"accounts": [
            {"acc_code": "02", "acc_name": "Assets", "acc_type": "debit", "acc_category": "asset"},
            {"acc_code": "02", "acc_name": "Assets again", "acc_type": "debit", "acc_category": "asset"}
        ]}"#,
    )
    .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<SeedError>(),
        Some(SeedError::DuplicateKey { key, .. }) if key == "02"
    ));
}

#[test]
fn test_person_pointing_at_missing_account_is_rejected() {
    let err = ReferenceData::from_json_str(
        r#"{
            "accounts": [
                {"acc_code": "02", "acc_name": "Assets", "acc_type": "debit", "acc_category": "asset"}
            ],
            "persons": [
                {"per_code": "P001", "per_name": "Sample", "per_acc_code": "02/099"}
            ]
        }"#,
    )
    .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<SeedError>(),
        Some(SeedError::DanglingReference { target_key, .. }) if target_key == "02/099"
    ));
}

#[tokio::test]
async fn test_trial_balance_without_entries_lists_every_active_account_at_zero() {
    let store = InMemoryStore::new();
    Runner::new(&store, &hasher(), embedded_plan(false))
        .run()
        .await
        .unwrap();

    let rows = store.trial_balance().await.unwrap();
    let active = store.accounts().iter().filter(|a| a.acc_is_active).count();
    assert_eq!(rows.len(), active);
    assert!(rows
        .iter()
        .all(|r| r.total_debit == 0 && r.total_credit == 0 && r.balance == 0));
    assert!(rows.windows(2).all(|w| w[0].acc_code < w[1].acc_code));
}

#[tokio::test]
async fn test_trial_balance_skips_only_explicitly_unposted_journals() {
    let store = InMemoryStore::new();
    Runner::new(&store, &hasher(), embedded_plan(false))
        .run()
        .await
        .unwrap();

    store.insert_journal(
        journal("J1", Some(true)),
        vec![
            line("J1", 1, "02/001/003/001", 700, 0),
            line("J1", 2, "04/001/001", 0, 700),
        ],
    );
    store.insert_journal(
        journal("J2", None),
        vec![
            line("J2", 1, "02/001/003/001", 0, 200),
            line("J2", 2, "04/001/001", 200, 0),
        ],
    );
    store.insert_journal(
        journal("J3", Some(false)),
        vec![
            line("J3", 1, "02/001/003/001", 9_000, 0),
            line("J3", 2, "04/001/001", 0, 9_000),
        ],
    );

    let rows = store.trial_balance().await.unwrap();
    let cash = rows.iter().find(|r| r.acc_code == "02/001/003/001").unwrap();
    assert_eq!((cash.total_debit, cash.total_credit, cash.balance), (700, 200, 500));
    let sales = rows.iter().find(|r| r.acc_code == "04/001/001").unwrap();
    assert_eq!((sales.total_debit, sales.total_credit, sales.balance), (200, 700, 500));

    let ledger = store.general_ledger().await.unwrap();
    assert_eq!(ledger.len(), 2);
    assert!(ledger.iter().all(|l| l.jrn_code == "J1"));
}

#[tokio::test]
async fn test_broken_view_does_not_stop_the_others() {
    let store = InMemoryStore::new();
    store.fail_statements_containing("v_general_ledger");

    let summary = Runner::new(&store, &hasher(), embedded_plan(false))
        .run()
        .await
        .unwrap();

    let failed: Vec<&str> = summary.failed_views().map(|v| v.name.as_str()).collect();
    assert_eq!(failed, vec!["v_general_ledger"]);
    assert_eq!(store.view_names().len(), summary.views.len() - 1);
    assert!(store.trial_balance().await.is_ok());
    assert!(store.wallet_balances().await.is_ok());
    assert!(store.general_ledger().await.is_err());
}

#[tokio::test]
async fn test_theme_reset_replaces_theme_and_nothing_else() {
    let store = InMemoryStore::new();
    let hasher = hasher();
    Runner::new(&store, &hasher, embedded_plan(false))
        .run()
        .await
        .unwrap();
    let accounts_before = store.accounts();
    let users_before = store.users();

    let stale: ThemeData = ThemeData::from_json_str(
        r#"{"languages": [{"code": "de", "name": "German", "native_name": "Deutsch",
            "direction": "ltr", "calendar": "gregorian", "font_primary": "Inter",
            "font_fallback": "sans-serif", "translation_file": "de.json",
            "date_format": "DD.MM.YYYY", "time_format": "HH:mm", "number_format": "de-DE",
            "currency": "EUR", "currency_symbol": "€", "is_default": true}]}"#,
    )
    .unwrap();
    booking_seed::seed::reset_theme(&store, &stale).await.unwrap();

    let summary = Runner::new(&store, &hasher, embedded_plan(true))
        .run()
        .await
        .unwrap();

    let expected = embedded_theme().unwrap();
    let report = summary.theme.unwrap();
    assert_eq!(report.removed, 1);
    assert_eq!(report.settings, expected.settings.len());
    assert_eq!(store.theme(), expected);
    assert!(store.theme().languages.iter().all(|l| l.code != "de"));

    assert_eq!(store.accounts(), accounts_before);
    assert_eq!(store.users(), users_before);
}

#[tokio::test]
async fn test_seeded_users_can_be_found_by_username() {
    let store = InMemoryStore::new();
    let hasher = hasher();
    Runner::new(&store, &hasher, embedded_plan(false))
        .run()
        .await
        .unwrap();

    let admin = store.find_user_by_username("admin").await.unwrap().unwrap();
    assert_eq!(admin.usr_per_code, "P001");
    assert_ne!(admin.usr_password_hash, "change-me");
    assert!(hasher.verify("change-me", &admin.usr_password_hash).unwrap());

    let rendered = serde_json::to_string(&admin).unwrap();
    assert!(!rendered.contains(&admin.usr_password_hash));

    assert!(store.find_user_by_username("nobody").await.unwrap().is_none());
}

#[tokio::test]
async fn test_best_effort_datasets_record_failures_and_continue() {
    let store = InMemoryStore::new();
    store.fail_writes_for("PRJ002");
    let mut plan = embedded_plan(false);
    plan.dataset_policy = ErrorPolicy::BestEffort;

    let summary = Runner::new(&store, &hasher(), plan).run().await.unwrap();

    let projects = summary.dataset(DatasetKind::Projects).unwrap();
    assert_eq!(projects.failed(), 1);
    assert!(matches!(
        projects.outcome_for("PRJ002"),
        Some(ReconcileOutcome::Failed(_))
    ));
    assert!(!summary.views.is_empty());
    assert_eq!(store.shareholdings().len(), 2);
}

#[tokio::test]
async fn test_best_effort_does_not_write_records_of_a_failed_parent() {
    let store = InMemoryStore::new();
    store.fail_writes_for("PRJ002");
    store.fail_writes_for("P002");
    let mut plan = embedded_plan(false);
    plan.dataset_policy = ErrorPolicy::BestEffort;

    let summary = Runner::new(&store, &hasher(), plan).run().await.unwrap();

    let units = summary.dataset(DatasetKind::Units).unwrap();
    assert_eq!(
        units.outcome_for("PRJ002/A001"),
        Some(&ReconcileOutcome::Failed(
            "depends on failed projects 'PRJ002'".to_string()
        ))
    );
    assert_eq!(units.created(), 2);
    assert!(store.units().iter().all(|u| u.unt_prj_code != "PRJ002"));

    let wallets = summary.dataset(DatasetKind::Wallets).unwrap();
    assert!(matches!(wallets.outcome_for("P002"), Some(ReconcileOutcome::Failed(_))));
    assert!(store.wallets().iter().all(|w| w.wlt_per_code != "P002"));
    let users = summary.dataset(DatasetKind::UserAccounts).unwrap();
    assert!(matches!(users.outcome_for("P002"), Some(ReconcileOutcome::Failed(_))));
    assert!(store.find_user_by_username("user").await.unwrap().is_none());
    assert!(store.find_user_by_username("admin").await.unwrap().is_some());
}

/// Cannot hash the sample root password
struct BrokenRootHasher(BcryptHasher);

impl PasswordHasher for BrokenRootHasher {
    fn hash(&self, plaintext: &str) -> anyhow::Result<String> {
        if plaintext == "change-me-root" {
            anyhow::bail!("hashing backend unavailable");
        }
        self.0.hash(plaintext)
    }

    fn verify(&self, plaintext: &str, hash: &str) -> anyhow::Result<bool> {
        self.0.verify(plaintext, hash)
    }
}

#[tokio::test]
async fn test_password_failure_follows_the_dataset_policy() {
    let hasher = BrokenRootHasher(hasher());

    let store = InMemoryStore::new();
    let err = Runner::new(&store, &hasher, embedded_plan(false))
        .run()
        .await
        .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<SeedError>(),
        Some(SeedError::Reconcile { kind: DatasetKind::UserAccounts, key, .. }) if key == "ROOT"
    ));

    let store = InMemoryStore::new();
    let mut plan = embedded_plan(false);
    plan.dataset_policy = ErrorPolicy::BestEffort;
    let summary = Runner::new(&store, &hasher, plan).run().await.unwrap();

    let users = summary.dataset(DatasetKind::UserAccounts).unwrap();
    assert_eq!(users.failed(), 1);
    assert!(matches!(users.outcome_for("ROOT"), Some(ReconcileOutcome::Failed(_))));
    assert!(store.find_user_by_username("root").await.unwrap().is_none());
    assert!(store.find_user_by_username("admin").await.unwrap().is_some());
    assert_eq!(store.wallets().len(), 2);
}
