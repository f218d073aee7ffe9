use crate::error::SeedError;
use crate::model::{DatasetKind, Record};
use itertools::Itertools;

/// Ordered records of one kind with unique natural keys.
///
/// Built once from configuration; reconciliation only reads it.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset<R: Record> {
    records: Vec<R>,
}

impl<R: Record> Dataset<R> {
    pub fn new(records: Vec<R>) -> Result<Self, SeedError> {
        if let Some(dup) = records.iter().map(Record::natural_key).duplicates().next() {
            return Err(SeedError::DuplicateKey {
                kind: R::KIND,
                key: dup.to_string(),
            });
        }
        Ok(Self { records })
    }

    pub fn kind(&self) -> DatasetKind {
        R::KIND
    }

    pub fn records(&self) -> &[R] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, R> {
        self.records.iter()
    }

    /// Position of the record carrying `key`, compared in rendered form
    pub fn position_of(&self, key: &str) -> Option<usize> {
        self.records
            .iter()
            .position(|r| r.natural_key().to_string() == key)
    }
}

impl<'a, R: Record> IntoIterator for &'a Dataset<R> {
    type Item = &'a R;
    type IntoIter = std::slice::Iter<'a, R>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Account, AccountCategory, AccountType};

    fn account(code: &str) -> Account {
        Account {
            acc_code: code.to_string(),
            acc_name: code.to_string(),
            acc_parent_code: None,
            acc_type: AccountType::Debit,
            acc_category: AccountCategory::Asset,
            acc_sublevel_format: 0,
            acc_is_active: true,
        }
    }

    #[test]
    fn rejects_duplicate_natural_keys() {
        let err = Dataset::new(vec![account("02"), account("03"), account("02")]).unwrap_err();
        match err {
            SeedError::DuplicateKey { kind, key } => {
                assert_eq!(kind, DatasetKind::Accounts);
                assert_eq!(key, "02");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn keeps_declared_order() {
        let dataset = Dataset::new(vec![account("05"), account("01")]).unwrap();
        assert_eq!(dataset.position_of("01"), Some(1));
        assert_eq!(dataset.position_of("99"), None);
        assert_eq!(dataset.kind(), DatasetKind::Accounts);
    }
}
