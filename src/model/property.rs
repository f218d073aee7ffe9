use crate::model::{system_user, CompositeKey, DatasetKind, Record, Reference};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// How a project is offered to investors and guests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectModel {
    Shareholding,
    Rental,
    Sale,
}

impl ProjectModel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectModel::Shareholding => "shareholding",
            ProjectModel::Rental => "rental",
            ProjectModel::Sale => "sale",
        }
    }
}

impl FromStr for ProjectModel {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "shareholding" => Ok(ProjectModel::Shareholding),
            "rental" => Ok(ProjectModel::Rental),
            "sale" => Ok(ProjectModel::Sale),
            other => Err(anyhow::anyhow!("Unknown project model: {}", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub prj_code: String,
    pub prj_title: String,
    #[serde(default)]
    pub prj_location: Option<String>,
    pub prj_type: String,
    pub prj_model: ProjectModel,
    pub prj_start_date: NaiveDate,
    #[serde(default)]
    pub prj_end_date: Option<NaiveDate>,
    /// Net asset value in minor currency units
    pub prj_nav: i64,
    #[serde(default = "system_user")]
    pub prj_created_by: String,
}

impl Record for Project {
    type Key = String;
    const KIND: DatasetKind = DatasetKind::Projects;

    fn natural_key(&self) -> String {
        self.prj_code.clone()
    }
}

/// Bookable unit; unit codes are only unique within their project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Unit {
    pub unt_prj_code: String,
    pub unt_code: String,
    pub unt_title: String,
    pub unt_type: String,
    pub unt_area: i32,
    pub unt_capacity: i32,
    #[serde(default)]
    pub unt_floor: Option<String>,
    #[serde(default)]
    pub unt_block: Option<String>,
    #[serde(default = "system_user")]
    pub unt_created_by: String,
}

impl Record for Unit {
    type Key = CompositeKey;
    const KIND: DatasetKind = DatasetKind::Units;

    fn natural_key(&self) -> CompositeKey {
        CompositeKey::new([self.unt_prj_code.as_str(), self.unt_code.as_str()])
    }

    fn references(&self) -> Vec<Reference> {
        vec![Reference::new(DatasetKind::Projects, self.unt_prj_code.clone())]
    }
}

/// A person's stake in a project, effective from `shr_from_date`.
///
/// Keyed on (person, project, from-date); there is no surrogate id in seed data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shareholding {
    pub shr_per_code: String,
    pub shr_prj_code: String,
    pub shr_shares: i64,
    pub shr_unit_price: i64,
    pub shr_total_value: i64,
    pub shr_from_date: NaiveDate,
    #[serde(default)]
    pub shr_to_date: Option<NaiveDate>,
    #[serde(default = "default_active")]
    pub shr_is_active: bool,
    #[serde(default = "system_user")]
    pub shr_created_by: String,
}

fn default_active() -> bool {
    true
}

impl Shareholding {
    pub fn has_consistent_total(&self) -> bool {
        self.shr_shares
            .checked_mul(self.shr_unit_price)
            .is_some_and(|total| total == self.shr_total_value)
    }
}

impl Record for Shareholding {
    type Key = CompositeKey;
    const KIND: DatasetKind = DatasetKind::Shareholdings;

    fn natural_key(&self) -> CompositeKey {
        CompositeKey::new([
            self.shr_per_code.clone(),
            self.shr_prj_code.clone(),
            self.shr_from_date.format("%Y-%m-%d").to_string(),
        ])
    }

    fn references(&self) -> Vec<Reference> {
        vec![
            Reference::new(DatasetKind::Persons, self.shr_per_code.clone()),
            Reference::new(DatasetKind::Projects, self.shr_prj_code.clone()),
        ]
    }
}
