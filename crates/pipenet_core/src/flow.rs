use serde::{Deserialize, Serialize};

use crate::{Id, Timestamp};

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum FlowDirection {
    Upstream,
    Downstream,
}

impl FlowDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            FlowDirection::Upstream => "Upstream",
            FlowDirection::Downstream => "Downstream",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Upstream" => Some(FlowDirection::Upstream),
            "Downstream" => Some(FlowDirection::Downstream),
            _ => None,
        }
    }
}

/// Production and injection totals of one segment or of a set of segments.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowTotals {
    pub oil: f64,
    pub water: f64,
    pub gas: f64,
    pub first_production: Option<Timestamp>,
    pub last_production: Option<Timestamp>,
    pub first_injection: Option<Timestamp>,
    pub last_injection: Option<Timestamp>,
}

impl FlowTotals {
    /// Associative and commutative merge of two records.
    pub fn combine(self, other: Self) -> Self {
        Self {
            oil: self.oil + other.oil,
            water: self.water + other.water,
            gas: self.gas + other.gas,
            first_production: earlier(self.first_production, other.first_production),
            last_production: later(self.last_production, other.last_production),
            first_injection: earlier(self.first_injection, other.first_injection),
            last_injection: later(self.last_injection, other.last_injection),
        }
    }

    /// `None` for an empty input; callers must not confuse that with zero flow.
    pub fn reduce<I>(records: I) -> Option<Self>
    where
        I: IntoIterator<Item = Self>,
    {
        records.into_iter().reduce(Self::combine)
    }
}

/// The later of two optional dates; a present date beats an absent one.
pub fn later(a: Option<Timestamp>, b: Option<Timestamp>) -> Option<Timestamp> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.max(b)),
        (Some(a), None) => Some(a),
        (None, b) => b,
    }
}

/// The earlier of two optional dates; a present date beats an absent one.
pub fn earlier(a: Option<Timestamp>, b: Option<Timestamp>) -> Option<Timestamp> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (Some(a), None) => Some(a),
        (None, b) => b,
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NeighborFlow {
    pub id: Id,
    pub name: String,
    #[serde(flatten)]
    pub totals: FlowTotals,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowResolution {
    pub neighbors: Vec<NeighborFlow>,
    pub summary: Option<FlowTotals>,
}

impl FlowResolution {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.neighbors.is_empty()
    }
}
