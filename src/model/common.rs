use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::Hash;

/// Audit user written into `*_created_by` columns for seeded rows
pub const SYSTEM_USER: &str = "system";

pub fn system_user() -> String {
    SYSTEM_USER.to_string()
}

/// Entity kinds that take part in reconciliation.
///
/// The name doubles as the dataset name in logs and as the target of
/// foreign-key references between datasets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DatasetKind {
    Accounts,
    Persons,
    UserAccounts,
    Wallets,
    Projects,
    Units,
    Shareholdings,
}

impl DatasetKind {
    pub const ALL: [DatasetKind; 7] = [
        DatasetKind::Accounts,
        DatasetKind::Persons,
        DatasetKind::UserAccounts,
        DatasetKind::Wallets,
        DatasetKind::Projects,
        DatasetKind::Units,
        DatasetKind::Shareholdings,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DatasetKind::Accounts => "accounts",
            DatasetKind::Persons => "persons",
            DatasetKind::UserAccounts => "user-accounts",
            DatasetKind::Wallets => "wallets",
            DatasetKind::Projects => "projects",
            DatasetKind::Units => "units",
            DatasetKind::Shareholdings => "shareholdings",
        }
    }

    /// Kinds whose records must already be persisted before this kind is written
    pub fn depends_on(&self) -> &'static [DatasetKind] {
        match self {
            DatasetKind::Accounts => &[],
            DatasetKind::Persons => &[DatasetKind::Accounts],
            DatasetKind::UserAccounts => &[DatasetKind::Persons],
            DatasetKind::Wallets => &[DatasetKind::Persons],
            DatasetKind::Projects => &[],
            DatasetKind::Units => &[DatasetKind::Projects],
            DatasetKind::Shareholdings => &[DatasetKind::Persons, DatasetKind::Projects],
        }
    }
}

impl fmt::Display for DatasetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A foreign natural key held by a record
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Reference {
    pub kind: DatasetKind,
    pub key: String,
}

impl Reference {
    pub fn new(kind: DatasetKind, key: impl Into<String>) -> Self {
        Self {
            kind,
            key: key.into(),
        }
    }
}

/// A persisted entity identified by a business key rather than a surrogate id.
pub trait Record: Clone + PartialEq + fmt::Debug + Send + Sync + 'static {
    type Key: Clone + Eq + Hash + fmt::Debug + fmt::Display + Send + Sync;

    const KIND: DatasetKind;

    fn natural_key(&self) -> Self::Key;

    /// Natural keys of other records this one points at
    fn references(&self) -> Vec<Reference> {
        Vec::new()
    }
}

/// Composite key rendered as `a/b/...` for logs and reference matching
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CompositeKey(pub Vec<String>);

impl CompositeKey {
    pub fn new<I, S>(parts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(parts.into_iter().map(Into::into).collect())
    }
}

impl fmt::Display for CompositeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join("/"))
    }
}
