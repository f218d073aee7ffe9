use crate::logic::reports;
use crate::model::{
    Account, GeneralLedgerRow, Journal, JournalLine, Person, Project, Record, Reservation,
    ReservationSummaryRow, Shareholding, ShareholdingSummaryRow, ThemeData, ThemeReport,
    TrialBalanceRow, Unit, UserAccount, UserLogAuditRow, UserLogEntry, Wallet, WalletBalanceRow,
    WalletTransaction,
};
use crate::seed::views;
use crate::store::traits::{RecordStore, ReportStore, ThemeStore, UserLookup, ViewStore};
use anyhow::{anyhow, bail, Result};
use chrono::NaiveDateTime;
use parking_lot::{Mutex, RwLock};
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

mod tables {
    use crate::model::{
        Account, Journal, JournalLine, Person, Project, Record, Reservation, Shareholding,
        ThemeData, Unit, UserAccount, UserLogEntry, Wallet, WalletTransaction,
    };
    use chrono::NaiveDateTime;
    use std::collections::HashMap;

    #[derive(Debug, Default)]
    pub struct Tables {
        pub(in crate::store) accounts: Vec<Account>,
        pub(in crate::store) persons: Vec<Person>,
        pub(in crate::store) users: Vec<UserAccount>,
        pub(in crate::store) wallets: Vec<Wallet>,
        pub(in crate::store) wallet_last_update: HashMap<String, NaiveDateTime>,
        pub(in crate::store) projects: Vec<Project>,
        pub(in crate::store) units: Vec<Unit>,
        pub(in crate::store) shareholdings: Vec<Shareholding>,
        pub(in crate::store) journals: Vec<Journal>,
        pub(in crate::store) journal_lines: Vec<JournalLine>,
        pub(in crate::store) wallet_transactions: Vec<WalletTransaction>,
        pub(in crate::store) reservations: Vec<Reservation>,
        pub(in crate::store) user_logs: Vec<UserLogEntry>,
        /// (name, statement) in creation order
        pub(in crate::store) views: Vec<(String, String)>,
        pub(in crate::store) theme: ThemeData,
    }

    /// Row access for the record kinds the in-memory store persists
    pub trait MemoryTable: Record {
        fn rows(tables: &Tables) -> &Vec<Self>;
        fn rows_mut(tables: &mut Tables) -> &mut Vec<Self>;
        fn after_write(_tables: &mut Tables, _record: &Self) {}
    }

    macro_rules! memory_table {
        ($record:ty, $field:ident) => {
            impl MemoryTable for $record {
                fn rows(tables: &Tables) -> &Vec<Self> {
                    &tables.$field
                }
                fn rows_mut(tables: &mut Tables) -> &mut Vec<Self> {
                    &mut tables.$field
                }
            }
        };
    }

    memory_table!(Account, accounts);
    memory_table!(Person, persons);
    memory_table!(UserAccount, users);
    memory_table!(Project, projects);
    memory_table!(Unit, units);
    memory_table!(Shareholding, shareholdings);

    impl MemoryTable for Wallet {
        fn rows(tables: &Tables) -> &Vec<Self> {
            &tables.wallets
        }
        fn rows_mut(tables: &mut Tables) -> &mut Vec<Self> {
            &mut tables.wallets
        }
        fn after_write(tables: &mut Tables, record: &Self) {
            tables
                .wallet_last_update
                .insert(record.wlt_per_code.clone(), chrono::Utc::now().naive_utc());
        }
    }
}

use tables::{MemoryTable, Tables};

#[derive(Debug, Default)]
struct Faults {
    write_keys: HashSet<String>,
    statement_patterns: Vec<String>,
}

/// Store backed by process memory, used by tests and dry runs.
///
/// Enforces natural-key uniqueness the way the database's unique
/// constraints do, and can be told to fail specific writes or statements.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<RwLock<Tables>>,
    faults: Arc<Mutex<Faults>>,
    writes: Arc<AtomicUsize>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every create/update of a record with this rendered key fail
    pub fn fail_writes_for(&self, key: impl Into<String>) {
        self.faults.lock().write_keys.insert(key.into());
    }

    /// Make every raw statement containing `pattern` fail
    pub fn fail_statements_containing(&self, pattern: impl Into<String>) {
        self.faults.lock().statement_patterns.push(pattern.into());
    }

    /// Number of creates and updates performed so far
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn view_names(&self) -> Vec<String> {
        self.tables
            .read()
            .views
            .iter()
            .map(|(name, _)| name.clone())
            .collect()
    }

    pub fn view_statement(&self, name: &str) -> Option<String> {
        self.tables
            .read()
            .views
            .iter()
            .find(|(view, _)| view == name)
            .map(|(_, statement)| statement.clone())
    }

    pub fn accounts(&self) -> Vec<Account> {
        self.tables.read().accounts.clone()
    }

    pub fn persons(&self) -> Vec<Person> {
        self.tables.read().persons.clone()
    }

    pub fn users(&self) -> Vec<UserAccount> {
        self.tables.read().users.clone()
    }

    pub fn wallets(&self) -> Vec<Wallet> {
        self.tables.read().wallets.clone()
    }

    pub fn projects(&self) -> Vec<Project> {
        self.tables.read().projects.clone()
    }

    pub fn units(&self) -> Vec<Unit> {
        self.tables.read().units.clone()
    }

    pub fn shareholdings(&self) -> Vec<Shareholding> {
        self.tables.read().shareholdings.clone()
    }

    pub fn theme(&self) -> ThemeData {
        self.tables.read().theme.clone()
    }

    pub fn insert_journal(&self, journal: Journal, lines: Vec<JournalLine>) {
        let mut tables = self.tables.write();
        tables.journals.push(journal);
        tables.journal_lines.extend(lines);
    }

    pub fn insert_wallet_transaction(&self, transaction: WalletTransaction) {
        self.tables.write().wallet_transactions.push(transaction);
    }

    pub fn insert_reservation(&self, reservation: Reservation) {
        self.tables.write().reservations.push(reservation);
    }

    pub fn insert_user_log(&self, entry: UserLogEntry) {
        self.tables.write().user_logs.push(entry);
    }

    fn check_write<R: Record>(&self, record: &R) -> Result<()> {
        let key = record.natural_key().to_string();
        if self.faults.lock().write_keys.contains(&key) {
            bail!("injected write failure for {} '{}'", R::KIND, key);
        }
        Ok(())
    }

    fn check_statement(&self, statement: &str) -> Result<()> {
        if let Some(pattern) = self
            .faults
            .lock()
            .statement_patterns
            .iter()
            .find(|p| statement.contains(p.as_str()))
        {
            bail!("syntax error at or near \"{}\"", pattern);
        }
        Ok(())
    }

    fn require_view(tables: &Tables, name: &str) -> Result<()> {
        if tables.views.iter().any(|(view, _)| view == name) {
            Ok(())
        } else {
            Err(anyhow!("relation \"{}\" does not exist", name))
        }
    }
}

#[async_trait::async_trait]
impl<R: MemoryTable> RecordStore<R> for InMemoryStore {
    async fn find_by_key(&self, key: &R::Key) -> Result<Option<R>> {
        let tables = self.tables.read();
        Ok(R::rows(&tables)
            .iter()
            .find(|r| r.natural_key() == *key)
            .cloned())
    }

    async fn create(&self, record: &R) -> Result<()> {
        self.check_write(record)?;
        let mut tables = self.tables.write();
        let key = record.natural_key();
        if R::rows(&tables).iter().any(|r| r.natural_key() == key) {
            bail!("duplicate key value violates unique constraint on {} '{}'", R::KIND, key);
        }
        R::rows_mut(&mut tables).push(record.clone());
        R::after_write(&mut tables, record);
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn update(&self, record: &R) -> Result<()> {
        self.check_write(record)?;
        let mut tables = self.tables.write();
        let key = record.natural_key();
        let slot = R::rows_mut(&mut tables)
            .iter_mut()
            .find(|r| r.natural_key() == key)
            .ok_or_else(|| anyhow!("no {} row with key '{}'", R::KIND, key))?;
        *slot = record.clone();
        R::after_write(&mut tables, record);
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[async_trait::async_trait]
impl ViewStore for InMemoryStore {
    async fn execute_raw(&self, statement: &str) -> Result<u64> {
        self.check_statement(statement)?;
        let mut tables = self.tables.write();
        apply_view_statement(&mut tables.views, statement)?;
        Ok(0)
    }

    async fn execute_batch(&self, statements: &[String]) -> Result<u64> {
        for statement in statements {
            self.check_statement(statement)?;
        }
        let mut tables = self.tables.write();
        let mut views = tables.views.clone();
        for statement in statements {
            apply_view_statement(&mut views, statement)?;
        }
        tables.views = views;
        Ok(0)
    }
}

/// Understands the two view statements the provisioner emits
fn apply_view_statement(views: &mut Vec<(String, String)>, statement: &str) -> Result<()> {
    if let Some(name) = statement.strip_prefix("DROP VIEW IF EXISTS ") {
        let name = name.trim();
        views.retain(|(view, _)| view != name);
        return Ok(());
    }

    let name = statement
        .strip_prefix("CREATE VIEW ")
        .and_then(|rest| rest.split_whitespace().next())
        .ok_or_else(|| anyhow!("unsupported statement: {}", statement))?;
    if views.iter().any(|(view, _)| view == name) {
        bail!("relation \"{}\" already exists", name);
    }
    views.push((name.to_string(), statement.to_string()));
    Ok(())
}

#[async_trait::async_trait]
impl ThemeStore for InMemoryStore {
    async fn replace_theme(&self, theme: &ThemeData) -> Result<ThemeReport> {
        let mut tables = self.tables.write();
        let old = &tables.theme;
        let removed =
            (old.languages.len() + old.settings.len() + old.links.len() + old.templates.len())
                as u64;
        tables.theme = theme.clone();
        Ok(ThemeReport {
            removed,
            languages: theme.languages.len(),
            settings: theme.settings.len(),
            links: theme.links.len(),
            templates: theme.templates.len(),
        })
    }
}

#[async_trait::async_trait]
impl UserLookup for InMemoryStore {
    async fn find_user_by_username(&self, username: &str) -> Result<Option<UserAccount>> {
        Ok(self
            .tables
            .read()
            .users
            .iter()
            .find(|u| u.usr_username == username)
            .cloned())
    }
}

#[async_trait::async_trait]
impl ReportStore for InMemoryStore {
    async fn trial_balance(&self) -> Result<Vec<TrialBalanceRow>> {
        let tables = self.tables.read();
        Self::require_view(&tables, views::TRIAL_BALANCE)?;
        reports::trial_balance(
            &tables.accounts,
            &tables.journals,
            &tables.journal_lines,
        )
    }

    async fn general_ledger(&self) -> Result<Vec<GeneralLedgerRow>> {
        let tables = self.tables.read();
        Self::require_view(&tables, views::GENERAL_LEDGER)?;
        Ok(reports::general_ledger(
            &tables.accounts,
            &tables.journals,
            &tables.journal_lines,
        ))
    }

    async fn wallet_balances(&self) -> Result<Vec<WalletBalanceRow>> {
        let tables = self.tables.read();
        Self::require_view(&tables, views::WALLET_BALANCE)?;
        let wallets: Vec<(Wallet, Option<NaiveDateTime>)> = tables
            .wallets
            .iter()
            .map(|w| {
                (
                    w.clone(),
                    tables.wallet_last_update.get(&w.wlt_per_code).copied(),
                )
            })
            .collect();
        reports::wallet_balances(
            &wallets,
            &tables.persons,
            &tables.wallet_transactions,
        )
    }

    async fn reservation_summary(&self) -> Result<Vec<ReservationSummaryRow>> {
        let tables = self.tables.read();
        Self::require_view(&tables, views::RESERVATION_SUMMARY)?;
        Ok(reports::reservation_summary(
            &tables.reservations,
            &tables.projects,
            &tables.units,
            &tables.persons,
        ))
    }

    async fn shareholding_summary(&self) -> Result<Vec<ShareholdingSummaryRow>> {
        let tables = self.tables.read();
        Self::require_view(&tables, views::SHAREHOLDING_SUMMARY)?;
        Ok(reports::shareholding_summary(
            &tables.shareholdings,
            &tables.persons,
            &tables.projects,
        ))
    }

    async fn user_log_audit(&self) -> Result<Vec<UserLogAuditRow>> {
        let tables = self.tables.read();
        Self::require_view(&tables, views::USER_LOG_AUDIT)?;
        Ok(reports::user_log_audit(&tables.user_logs, &tables.persons))
    }
}
