use crate::error::SeedError;
use crate::model::{
    Account, DatasetKind, Person, Project, Record, Shareholding, Unit, UserAccountSeed, Wallet,
};
use crate::seed::Dataset;
use anyhow::{Context, Result};
use itertools::Itertools;
use serde::Deserialize;
use std::path::Path;

const EMBEDDED_REFERENCE_DATA: &str = include_str!("../../data/reference.json");

#[derive(Debug, Deserialize)]
struct RawReferenceData {
    #[serde(default)]
    accounts: Vec<Account>,
    #[serde(default)]
    persons: Vec<Person>,
    #[serde(default)]
    user_accounts: Vec<UserAccountSeed>,
    #[serde(default)]
    wallets: Vec<Wallet>,
    #[serde(default)]
    projects: Vec<Project>,
    #[serde(default)]
    units: Vec<Unit>,
    #[serde(default)]
    shareholdings: Vec<Shareholding>,
}

/// The desired state of every accounting/business dataset
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceData {
    pub accounts: Dataset<Account>,
    pub persons: Dataset<Person>,
    pub user_accounts: Dataset<UserAccountSeed>,
    pub wallets: Dataset<Wallet>,
    pub projects: Dataset<Project>,
    pub units: Dataset<Unit>,
    pub shareholdings: Dataset<Shareholding>,
}

impl ReferenceData {
    /// Reference data compiled into the binary
    pub fn embedded() -> Result<Self> {
        Self::from_json_str(EMBEDDED_REFERENCE_DATA).context("Embedded reference data is invalid")
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read reference data from {}", path.display()))?;
        Self::from_json_str(&raw)
            .with_context(|| format!("Invalid reference data in {}", path.display()))
    }

    pub fn from_json_str(raw: &str) -> Result<Self> {
        let raw: RawReferenceData =
            serde_json::from_str(raw).context("Failed to parse reference data JSON")?;

        let data = Self {
            accounts: Dataset::new(raw.accounts)?,
            persons: Dataset::new(raw.persons)?,
            user_accounts: Dataset::new(raw.user_accounts)?,
            wallets: Dataset::new(raw.wallets)?,
            projects: Dataset::new(raw.projects)?,
            units: Dataset::new(raw.units)?,
            shareholdings: Dataset::new(raw.shareholdings)?,
        };
        data.validate_records()?;
        data.validate_references()?;
        Ok(data)
    }

    /// Record-level rules that natural-key uniqueness alone does not cover
    pub fn validate_records(&self) -> Result<(), SeedError> {
        if let Some(username) = self
            .user_accounts
            .iter()
            .map(|u| u.usr_username.as_str())
            .duplicates()
            .next()
        {
            return Err(SeedError::invalid_record(
                DatasetKind::UserAccounts,
                username,
                "username is used by more than one account",
            ));
        }

        if let Some(holding) = self
            .shareholdings
            .iter()
            .find(|s| !s.has_consistent_total())
        {
            return Err(SeedError::invalid_record(
                DatasetKind::Shareholdings,
                holding.natural_key().to_string(),
                format!(
                    "total value {} != {} shares x {}",
                    holding.shr_total_value, holding.shr_shares, holding.shr_unit_price
                ),
            ));
        }

        if let Some(project) = self
            .projects
            .iter()
            .find(|p| p.prj_end_date.is_some_and(|end| end < p.prj_start_date))
        {
            return Err(SeedError::invalid_record(
                DatasetKind::Projects,
                project.prj_code.clone(),
                "end date precedes start date",
            ));
        }

        Ok(())
    }

    /// Every foreign natural key must resolve to a declared record.
    ///
    /// References within one dataset (account parents) must point at an
    /// earlier record so the parent is written first.
    pub fn validate_references(&self) -> Result<(), SeedError> {
        self.check_references(&self.accounts)?;
        self.check_references(&self.persons)?;
        self.check_references(&self.user_accounts)?;
        self.check_references(&self.wallets)?;
        self.check_references(&self.projects)?;
        self.check_references(&self.units)?;
        self.check_references(&self.shareholdings)?;
        Ok(())
    }

    fn check_references<R: Record>(&self, dataset: &Dataset<R>) -> Result<(), SeedError> {
        for (idx, record) in dataset.iter().enumerate() {
            for reference in record.references() {
                let resolved = if reference.kind == R::KIND {
                    dataset
                        .position_of(&reference.key)
                        .is_some_and(|pos| pos < idx)
                } else {
                    self.contains_key(reference.kind, &reference.key)
                };
                if !resolved {
                    return Err(SeedError::DanglingReference {
                        kind: R::KIND,
                        key: record.natural_key().to_string(),
                        target: reference.kind,
                        target_key: reference.key,
                    });
                }
            }
        }
        Ok(())
    }

    fn contains_key(&self, kind: DatasetKind, key: &str) -> bool {
        match kind {
            DatasetKind::Accounts => self.accounts.position_of(key).is_some(),
            DatasetKind::Persons => self.persons.position_of(key).is_some(),
            DatasetKind::UserAccounts => self.user_accounts.position_of(key).is_some(),
            DatasetKind::Wallets => self.wallets.position_of(key).is_some(),
            DatasetKind::Projects => self.projects.position_of(key).is_some(),
            DatasetKind::Units => self.units.position_of(key).is_some(),
            DatasetKind::Shareholdings => self.shareholdings.position_of(key).is_some(),
        }
    }

    pub fn len_of(&self, kind: DatasetKind) -> usize {
        match kind {
            DatasetKind::Accounts => self.accounts.len(),
            DatasetKind::Persons => self.persons.len(),
            DatasetKind::UserAccounts => self.user_accounts.len(),
            DatasetKind::Wallets => self.wallets.len(),
            DatasetKind::Projects => self.projects.len(),
            DatasetKind::Units => self.units.len(),
            DatasetKind::Shareholdings => self.shareholdings.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_data_is_consistent() {
        let data = ReferenceData::embedded().unwrap();
        for kind in DatasetKind::ALL {
            assert!(data.len_of(kind) > 0, "{} should not be empty", kind);
        }
        assert_eq!(data.shareholdings.len(), 2);
    }

    #[test]
    fn parent_account_must_precede_child() {
        let raw = r#"{"accounts": [
            {"acc_code": "02/001", "acc_name": "Current", "acc_parent_code": "02", "acc_type": "debit", "acc_category": "asset"},
            {"acc_code": "02", "acc_name": "Assets", "acc_type": "debit", "acc_category": "asset"}
        ]}"#;
        let err = ReferenceData::from_json_str(raw).unwrap_err();
        let seed_err = err.downcast_ref::<SeedError>().unwrap();
        assert!(matches!(
            seed_err,
            SeedError::DanglingReference { target: DatasetKind::Accounts, .. }
        ));
    }

    #[test]
    fn wallet_owner_must_be_declared() {
        let raw = r#"{
            "persons": [{"per_code": "P001", "per_name": "Admin"}],
            "wallets": [{"wlt_per_code": "P404", "wlt_balance": 10}]
        }"#;
        let err = ReferenceData::from_json_str(raw).unwrap_err();
        assert!(err.to_string().contains("references missing persons 'P404'"));
    }

    #[test]
    fn duplicate_keys_are_rejected_at_load() {
        let raw = r#"{"projects": [
            {"prj_code": "PRJ001", "prj_title": "A", "prj_type": "custom", "prj_model": "rental", "prj_start_date": "2024-01-01", "prj_nav": 0},
            {"prj_code": "PRJ001", "prj_title": "B", "prj_type": "custom", "prj_model": "rental", "prj_start_date": "2024-01-01", "prj_nav": 0}
        ]}"#;
        let err = ReferenceData::from_json_str(raw).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SeedError>(),
            Some(SeedError::DuplicateKey { .. })
        ));
    }

    #[test]
    fn inconsistent_shareholding_total_is_rejected() {
        let raw = r#"{
            "persons": [{"per_code": "P001", "per_name": "Admin"}],
            "projects": [{"prj_code": "PRJ001", "prj_title": "A", "prj_type": "custom", "prj_model": "shareholding", "prj_start_date": "2024-01-01", "prj_nav": 0}],
            "shareholdings": [{"shr_per_code": "P001", "shr_prj_code": "PRJ001", "shr_shares": 10, "shr_unit_price": 5, "shr_total_value": 49, "shr_from_date": "2024-01-01"}]
        }"#;
        let err = ReferenceData::from_json_str(raw).unwrap_err();
        assert!(err.to_string().contains("invalid shareholdings record"));
    }
}
