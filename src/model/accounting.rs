use crate::model::{system_user, DatasetKind, Record, Reference};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Debit/credit nature of an account; decides how its balance is signed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    Debit,
    Credit,
    Neutral,
}

impl AccountType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountType::Debit => "debit",
            AccountType::Credit => "credit",
            AccountType::Neutral => "neutral",
        }
    }

    /// Signed balance for the given debit and credit totals, `None` on overflow
    pub fn balance(&self, total_debit: i64, total_credit: i64) -> Option<i64> {
        match self {
            AccountType::Debit => total_debit.checked_sub(total_credit),
            AccountType::Credit => total_credit.checked_sub(total_debit),
            AccountType::Neutral => Some(0),
        }
    }
}

impl FromStr for AccountType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "debit" => Ok(AccountType::Debit),
            "credit" => Ok(AccountType::Credit),
            "neutral" => Ok(AccountType::Neutral),
            other => Err(anyhow::anyhow!("Unknown account type: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountCategory {
    Asset,
    Liability,
    Equity,
    Income,
    Expense,
}

impl AccountCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountCategory::Asset => "asset",
            AccountCategory::Liability => "liability",
            AccountCategory::Equity => "equity",
            AccountCategory::Income => "income",
            AccountCategory::Expense => "expense",
        }
    }
}

impl FromStr for AccountCategory {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asset" => Ok(AccountCategory::Asset),
            "liability" => Ok(AccountCategory::Liability),
            "equity" => Ok(AccountCategory::Equity),
            "income" => Ok(AccountCategory::Income),
            "expense" => Ok(AccountCategory::Expense),
            other => Err(anyhow::anyhow!("Unknown account category: {}", other)),
        }
    }
}

fn default_true() -> bool {
    true
}

/// Chart-of-accounts entry. Codes are hierarchical (`02`, `02/001`, ...)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub acc_code: String,
    pub acc_name: String,
    #[serde(default)]
    pub acc_parent_code: Option<String>,
    pub acc_type: AccountType,
    pub acc_category: AccountCategory,
    /// Digits used when numbering child accounts; 0 for leaf accounts
    #[serde(default)]
    pub acc_sublevel_format: i32,
    #[serde(default = "default_true")]
    pub acc_is_active: bool,
}

impl Record for Account {
    type Key = String;
    const KIND: DatasetKind = DatasetKind::Accounts;

    fn natural_key(&self) -> String {
        self.acc_code.clone()
    }

    fn references(&self) -> Vec<Reference> {
        self.acc_parent_code
            .iter()
            .map(|parent| Reference::new(DatasetKind::Accounts, parent.clone()))
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PersonRole {
    Customer,
    Shareholder,
    Vendor,
    Lessor,
}

impl PersonRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            PersonRole::Customer => "customer",
            PersonRole::Shareholder => "shareholder",
            PersonRole::Vendor => "vendor",
            PersonRole::Lessor => "lessor",
        }
    }
}

impl FromStr for PersonRole {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "customer" => Ok(PersonRole::Customer),
            "shareholder" => Ok(PersonRole::Shareholder),
            "vendor" => Ok(PersonRole::Vendor),
            "lessor" => Ok(PersonRole::Lessor),
            other => Err(anyhow::anyhow!("Unknown person role: {}", other)),
        }
    }
}

/// Stored as a comma separated set in `per_type_set`
pub fn format_role_set(roles: &[PersonRole]) -> String {
    roles
        .iter()
        .map(PersonRole::as_str)
        .collect::<Vec<_>>()
        .join(",")
}

pub fn parse_role_set(value: &str) -> anyhow::Result<Vec<PersonRole>> {
    value
        .split(',')
        .filter(|part| !part.trim().is_empty())
        .map(PersonRole::from_str)
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
    pub per_code: String,
    pub per_name: String,
    #[serde(default)]
    pub per_last_name: String,
    #[serde(default)]
    pub per_national_id: Option<String>,
    #[serde(default)]
    pub per_mobile: Option<String>,
    #[serde(default)]
    pub per_email: Option<String>,
    #[serde(default)]
    pub per_type_set: Vec<PersonRole>,
    /// Ledger account carrying this person's running balance
    #[serde(default)]
    pub per_acc_code: Option<String>,
}

impl Person {
    pub fn display_name(&self) -> String {
        format!("{} {}", self.per_name, self.per_last_name)
            .trim()
            .to_string()
    }
}

impl Record for Person {
    type Key = String;
    const KIND: DatasetKind = DatasetKind::Persons;

    fn natural_key(&self) -> String {
        self.per_code.clone()
    }

    fn references(&self) -> Vec<Reference> {
        self.per_acc_code
            .iter()
            .map(|code| Reference::new(DatasetKind::Accounts, code.clone()))
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    Editor,
    Viewer,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "admin",
            UserRole::Editor => "editor",
            UserRole::Viewer => "viewer",
        }
    }
}

impl FromStr for UserRole {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(UserRole::Admin),
            "editor" => Ok(UserRole::Editor),
            "viewer" => Ok(UserRole::Viewer),
            other => Err(anyhow::anyhow!("Unknown user role: {}", other)),
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Declared user account as it appears in seed configuration (plaintext password)
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct UserAccountSeed {
    pub usr_per_code: String,
    pub usr_username: String,
    pub usr_password: String,
    pub usr_role: UserRole,
    #[serde(default)]
    pub usr_avatar: Option<String>,
}

impl fmt::Debug for UserAccountSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserAccountSeed")
            .field("usr_per_code", &self.usr_per_code)
            .field("usr_username", &self.usr_username)
            .field("usr_password", &"<redacted>")
            .field("usr_role", &self.usr_role)
            .field("usr_avatar", &self.usr_avatar)
            .finish()
    }
}

impl UserAccountSeed {
    /// Build the persisted form with an already computed password hash
    pub fn into_account(self, usr_password_hash: String) -> UserAccount {
        UserAccount {
            usr_per_code: self.usr_per_code,
            usr_username: self.usr_username,
            usr_password_hash,
            usr_role: self.usr_role,
            usr_avatar: self.usr_avatar,
        }
    }
}

/// Login account; one per person
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserAccount {
    pub usr_per_code: String,
    pub usr_username: String,
    #[serde(skip_serializing)]
    pub usr_password_hash: String,
    pub usr_role: UserRole,
    pub usr_avatar: Option<String>,
}

impl Record for UserAccount {
    type Key = String;
    const KIND: DatasetKind = DatasetKind::UserAccounts;

    fn natural_key(&self) -> String {
        self.usr_per_code.clone()
    }

    fn references(&self) -> Vec<Reference> {
        vec![Reference::new(DatasetKind::Persons, self.usr_per_code.clone())]
    }
}

impl Record for UserAccountSeed {
    type Key = String;
    const KIND: DatasetKind = DatasetKind::UserAccounts;

    fn natural_key(&self) -> String {
        self.usr_per_code.clone()
    }

    fn references(&self) -> Vec<Reference> {
        vec![Reference::new(DatasetKind::Persons, self.usr_per_code.clone())]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wallet {
    pub wlt_per_code: String,
    pub wlt_balance: i64,
    #[serde(default = "system_user")]
    pub wlt_created_by: String,
}

impl Record for Wallet {
    type Key = String;
    const KIND: DatasetKind = DatasetKind::Wallets;

    fn natural_key(&self) -> String {
        self.wlt_per_code.clone()
    }

    fn references(&self) -> Vec<Reference> {
        vec![Reference::new(DatasetKind::Persons, self.wlt_per_code.clone())]
    }
}
