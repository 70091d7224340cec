use serde::{Deserialize, Serialize};

use crate::{Id, PipenetError, PipenetResult};

pub const NO_FACILITY: &str = "no-facility";
pub const NO_SATELLITE: &str = "no-satellite";

/// Quantifier of a criterion over its related table.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Having {
    #[serde(rename = "none")]
    Direct,
    #[serde(rename = "_any")]
    Any,
    #[serde(rename = "_count")]
    Count,
    #[serde(rename = "_min")]
    Min,
    #[serde(rename = "_max")]
    Max,
}

impl Having {
    pub fn as_str(self) -> &'static str {
        match self {
            Having::Direct => "none",
            Having::Any => "_any",
            Having::Count => "_count",
            Having::Min => "_min",
            Having::Max => "_max",
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Operation {
    Equals,
    Not,
    Lt,
    Lte,
    Gt,
    Gte,
    Contains,
    StartsWith,
    EndsWith,
}

impl Operation {
    pub fn is_text_only(self) -> bool {
        matches!(
            self,
            Operation::Contains | Operation::StartsWith | Operation::EndsWith
        )
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchCriterion {
    pub table: String,
    pub field: String,
    pub operation: Operation,
    pub having: Having,
    pub value: String,
    #[serde(rename = "type")]
    pub declared_type: String,
}

impl SearchCriterion {
    pub fn new(
        table: impl Into<String>,
        field: impl Into<String>,
        having: Having,
        operation: Operation,
        value: impl Into<String>,
        declared_type: impl Into<String>,
    ) -> Self {
        Self {
            table: table.into(),
            field: field.into(),
            operation,
            having,
            value: value.into(),
            declared_type: declared_type.into(),
        }
    }

    /// Bare record count over `table`, e.g. "segments with fewer than 3 wells".
    pub fn count(table: impl Into<String>, operation: Operation, threshold: i64) -> Self {
        Self::new(
            table,
            "id",
            Having::Count,
            operation,
            threshold.to_string(),
            "Int",
        )
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HierarchyInput {
    pub table: String,
    pub id: String,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum HierarchySelector {
    Satellite(Id),
    /// Segments not attached to any satellite.
    NoSatellite,
    Facility(Id),
    /// Segments attached to a satellite that has no facility.
    NoFacility,
    All,
}

impl HierarchySelector {
    pub fn from_input(input: &HierarchyInput) -> PipenetResult<Self> {
        let id = input.id.trim();
        if id.is_empty() {
            return Ok(HierarchySelector::All);
        }
        match input.table.as_str() {
            "satellite" if id == NO_SATELLITE => Ok(HierarchySelector::NoSatellite),
            "satellite" => Ok(HierarchySelector::Satellite(Id::from_uuid_str(id)?)),
            "facility" if id == NO_FACILITY => Ok(HierarchySelector::NoFacility),
            "facility" => Ok(HierarchySelector::Facility(Id::from_uuid_str(id)?)),
            _ => Ok(HierarchySelector::All),
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub skip: u64,
    pub take: u64,
}

impl Page {
    pub fn new(skip: u64, take: u64) -> Self {
        Self { skip, take }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NavigationRequest {
    pub hierarchy: Option<HierarchyInput>,
    pub search: Option<Vec<SearchCriterion>>,
    pub page: Page,
}

impl NavigationRequest {
    pub fn hierarchy(table: impl Into<String>, id: impl Into<String>, page: Page) -> Self {
        Self {
            hierarchy: Some(HierarchyInput {
                table: table.into(),
                id: id.into(),
            }),
            search: None,
            page,
        }
    }

    pub fn search(criteria: Vec<SearchCriterion>, page: Page) -> Self {
        Self {
            hierarchy: None,
            search: Some(criteria),
            page,
        }
    }

    pub fn validate(&self) -> PipenetResult<()> {
        if self.page.take == 0 {
            return Err(PipenetError::validation("take must be greater than zero"));
        }
        Ok(())
    }
}
