//! Runs against a real PostgreSQL database when `TEST_DATABASE_URL` is set.
//! The database's theme tables are wiped by this test.

use booking_seed::config::SeedConfig;
use booking_seed::model::DatasetKind;
use booking_seed::seed::{BcryptHasher, ReferenceData};
use booking_seed::store::{PostgresStore, ReportStore, UserLookup, ViewStore};
use booking_seed::{Runner, SeedPlan};

async fn connect() -> Option<PostgresStore> {
    let Ok(url) = std::env::var("TEST_DATABASE_URL") else {
        println!("TEST_DATABASE_URL not set, skipping PostgreSQL test");
        return None;
    };
    let store = PostgresStore::new(&url, 2).await.unwrap();
    store.migrate().await.unwrap();
    Some(store)
}

#[tokio::test]
async fn test_seed_and_views_against_postgres() {
    let Some(store) = connect().await else {
        return;
    };
    let hasher = BcryptHasher::new(4);
    let plan = || SeedPlan::from_config(&SeedConfig::default()).unwrap();

    // an older wallet view with a differently named column
    store
        .execute_raw("DROP VIEW IF EXISTS v_wallet_balance")
        .await
        .unwrap();
    store
        .execute_raw(
            "CREATE VIEW v_wallet_balance AS \
             SELECT wlt_per_code, wlt_per_code AS per_name, wlt_balance FROM t_wallet",
        )
        .await
        .unwrap();

    let first = Runner::new(&store, &hasher, plan()).run().await.unwrap();
    assert_eq!(first.failed_views().count(), 0);
    let columns: Vec<String> = sqlx::query_scalar(
        "SELECT column_name::TEXT FROM information_schema.columns \
         WHERE table_name = 'v_wallet_balance'",
    )
    .fetch_all(store.pool())
    .await
    .unwrap();
    assert!(columns.iter().any(|c| c == "person_name"));
    assert!(columns.iter().all(|c| c != "per_name"));
    assert!(first.theme.is_some());

    let second = Runner::new(&store, &hasher, plan()).run().await.unwrap();
    for report in &second.datasets {
        assert_eq!(report.created(), 0, "{} created records on rerun", report.kind);
        assert_eq!(report.updated(), 0, "{} updated records on rerun", report.kind);
    }

    let data = ReferenceData::embedded().unwrap();
    let trial_balance = store.trial_balance().await.unwrap();
    assert!(trial_balance.len() >= data.len_of(DatasetKind::Accounts));

    sqlx::query(
        "INSERT INTO t_journal (jrn_code, jrn_date, jrn_is_posted) \
         VALUES ('TEST-J1', DATE '2024-03-01', FALSE) ON CONFLICT DO NOTHING",
    )
    .execute(store.pool())
    .await
    .unwrap();
    sqlx::query(
        "INSERT INTO t_journal_detail (jrd_jrn_code, jrd_line_no, jrd_acc_code, jrd_debit, jrd_credit) \
         VALUES ('TEST-J1', 1, '02/001/004', 1000, 0) ON CONFLICT DO NOTHING",
    )
    .execute(store.pool())
    .await
    .unwrap();
    let petty_cash = store
        .trial_balance()
        .await
        .unwrap()
        .into_iter()
        .find(|r| r.acc_code == "02/001/004")
        .unwrap();
    let before = trial_balance
        .iter()
        .find(|r| r.acc_code == "02/001/004")
        .unwrap();
    assert_eq!(petty_cash.total_debit, before.total_debit);

    assert!(store.general_ledger().await.unwrap().iter().all(|l| l.jrn_code != "TEST-J1"));
    assert!(store.wallet_balances().await.unwrap().len() >= data.wallets.len());
    store.shareholding_summary().await.unwrap();
    store.reservation_summary().await.unwrap();
    store.user_log_audit().await.unwrap();

    let admin = store.find_user_by_username("admin").await.unwrap().unwrap();
    assert_eq!(admin.usr_per_code, "P001");

    store.close().await.unwrap();
    assert!(store.close().await.is_err());
}
