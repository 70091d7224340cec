use serde::{Deserialize, Serialize};

use crate::{FlowDirection, Id, Timestamp};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CreateSatelliteInput {
    pub name: String,
    pub facility_id: Option<Id>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CreateSegmentInput {
    pub satellite_id: Option<Id>,
    pub license: String,
    pub segment: String,
    pub flow_calculation_direction: FlowDirection,
    pub from: String,
    pub from_feature_id: Option<String>,
    pub to: String,
    pub to_feature_id: Option<String>,
    pub length: f64,
    pub material: Option<String>,
    pub internal_protection: Option<String>,
    pub outside_diameter: Option<f64>,
    pub wall_thickness: Option<f64>,
    pub yield_strength: Option<i64>,
    pub mop: Option<i64>,
    pub piggable: Option<bool>,
    pub pigging_frequency: Option<i64>,
}

impl CreateSegmentInput {
    /// A segment with only the non-nullable attributes filled in.
    pub fn minimal(license: impl Into<String>, segment: impl Into<String>) -> Self {
        Self {
            satellite_id: None,
            license: license.into(),
            segment: segment.into(),
            flow_calculation_direction: FlowDirection::Upstream,
            from: String::new(),
            from_feature_id: None,
            to: String::new(),
            to_feature_id: None,
            length: 0.0,
            material: None,
            internal_protection: None,
            outside_diameter: None,
            wall_thickness: None,
            yield_strength: None,
            mop: None,
            piggable: None,
            pigging_frequency: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LicenseChangeInput {
    pub segment_id: Id,
    pub status: String,
    pub substance: String,
    pub date: Timestamp,
    pub comment: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PressureTestInput {
    pub segment_id: Id,
    pub pressure_test_date: Timestamp,
    pub required_wall_thickness: Option<f64>,
    pub mop_test_pressure: Option<f64>,
    pub comment: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PigRunInput {
    pub segment_id: Id,
    pub pig_type: Option<String>,
    pub date_in: Timestamp,
    pub date_out: Option<Timestamp>,
    pub comment: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PipelineBatchInput {
    pub segment_id: Id,
    pub date: Timestamp,
    pub product: String,
    pub cost: Option<f64>,
    pub chemical_volume: Option<f64>,
    pub diluent_volume: Option<f64>,
    pub comment: Option<String>,
}

/// A well or sales point feeding a segment.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FlowSourceInput {
    pub segment_id: Option<Id>,
    pub name: String,
    pub oil: f64,
    pub water: f64,
    pub gas: f64,
    pub first_production: Option<Timestamp>,
    pub last_production: Option<Timestamp>,
    pub first_injection: Option<Timestamp>,
    pub last_injection: Option<Timestamp>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RiskInput {
    pub segment_id: Id,
    pub consequence_enviro: Option<i64>,
    pub consequence_asset: Option<i64>,
    pub consequence_people: Option<i64>,
    pub probability_interior: Option<i64>,
    pub probability_exterior: Option<i64>,
    pub oil_release_cost: Option<f64>,
    pub safeguard_pigging: Option<bool>,
    pub comment: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ChemicalInput {
    pub segment_id: Id,
    pub baseline_fluid_analysis_date: Option<Timestamp>,
    pub scaling: Option<bool>,
    pub bacteria: Option<bool>,
    pub co2: Option<bool>,
    pub o2: Option<bool>,
    pub h2s: Option<bool>,
    pub continuous_injection: Option<bool>,
    pub injection_rate: Option<f64>,
    pub batch_frequency: Option<i64>,
    pub comment: Option<String>,
}
