use crate::model::{
    Account, GeneralLedgerRow, Person, Project, Record, ReservationSummaryRow, Shareholding,
    ShareholdingSummaryRow, ThemeData, ThemeReport, TrialBalanceRow, Unit, UserAccount,
    UserLogAuditRow, Wallet, WalletBalanceRow,
};
use anyhow::Result;

/// Natural-key persistence for one entity kind
#[async_trait::async_trait]
pub trait RecordStore<R: Record>: Send + Sync {
    async fn find_by_key(&self, key: &R::Key) -> Result<Option<R>>;
    async fn create(&self, record: &R) -> Result<()>;
    async fn update(&self, record: &R) -> Result<()>;
}

/// Raw statement execution, used for view definitions
#[async_trait::async_trait]
pub trait ViewStore: Send + Sync {
    /// Execute a single statement and return the number of affected rows
    async fn execute_raw(&self, statement: &str) -> Result<u64>;

    /// Execute statements in order inside one transaction; nothing is kept
    /// unless every statement succeeds
    async fn execute_batch(&self, statements: &[String]) -> Result<u64>;
}

#[async_trait::async_trait]
pub trait ThemeStore: Send + Sync {
    /// Delete every row of the four theming tables, then insert `theme`.
    ///
    /// Not idempotent-safe for concurrent readers: theme data is briefly empty.
    async fn replace_theme(&self, theme: &ThemeData) -> Result<ThemeReport>;
}

#[async_trait::async_trait]
pub trait UserLookup: Send + Sync {
    async fn find_user_by_username(&self, username: &str) -> Result<Option<UserAccount>>;
}

/// Readers over the provisioned reporting views
#[async_trait::async_trait]
pub trait ReportStore: Send + Sync {
    async fn trial_balance(&self) -> Result<Vec<TrialBalanceRow>>;
    async fn general_ledger(&self) -> Result<Vec<GeneralLedgerRow>>;
    async fn wallet_balances(&self) -> Result<Vec<WalletBalanceRow>>;
    async fn reservation_summary(&self) -> Result<Vec<ReservationSummaryRow>>;
    async fn shareholding_summary(&self) -> Result<Vec<ShareholdingSummaryRow>>;
    async fn user_log_audit(&self) -> Result<Vec<UserLogAuditRow>>;
}

pub trait Store:
    RecordStore<Account>
    + RecordStore<Person>
    + RecordStore<UserAccount>
    + RecordStore<Wallet>
    + RecordStore<Project>
    + RecordStore<Unit>
    + RecordStore<Shareholding>
    + ViewStore
    + ThemeStore
    + UserLookup
    + ReportStore
    + Send
    + Sync
{
}

impl<T> Store for T where
    T: RecordStore<Account>
        + RecordStore<Person>
        + RecordStore<UserAccount>
        + RecordStore<Wallet>
        + RecordStore<Project>
        + RecordStore<Unit>
        + RecordStore<Shareholding>
        + ViewStore
        + ThemeStore
        + UserLookup
        + ReportStore
        + Send
        + Sync
{
}
