use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{
    Actor, ChemicalInput, CreateSatelliteInput, CreateSegmentInput, FlowDirection, FlowResolution,
    FlowSourceInput, Id, LicenseChangeInput, NavigationRequest, PigRunInput, PipelineBatchInput,
    PipenetResult, PressureTestInput, QueryContext, RiskInput, Timestamp,
};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Segment {
    pub id: Id,
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
    pub created_by_id: Id,
    pub updated_by_id: Id,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Segment {
    /// `license-segment`, the label operators use.
    pub fn display_name(&self) -> String {
        format!("{}-{}", self.license, self.segment)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationPage {
    pub items: Vec<Segment>,
    pub total_count: u64,
}

impl NavigationPage {
    pub fn empty() -> Self {
        Self::default()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LicenseSummary {
    pub current_status: Option<String>,
    pub current_substance: Option<String>,
    pub first_license_date: Option<Timestamp>,
}

#[async_trait]
pub trait NavigationApi {
    async fn resolve_navigation(
        &self,
        ctx: &QueryContext,
        request: NavigationRequest,
    ) -> PipenetResult<NavigationPage>;
}

#[async_trait]
pub trait FlowApi {
    async fn resolve_flow(
        &self,
        ctx: &QueryContext,
        segment_id: Id,
        direction: FlowDirection,
    ) -> PipenetResult<FlowResolution>;
}

#[async_trait]
pub trait NetworkReadApi {
    async fn get_segment(&self, segment_id: Id) -> PipenetResult<Option<Segment>>;
    /// Segments feeding into `segment_id`.
    async fn upstream_neighbors(&self, segment_id: Id) -> PipenetResult<Vec<Segment>>;
    /// Segments `segment_id` feeds into.
    async fn downstream_neighbors(&self, segment_id: Id) -> PipenetResult<Vec<Segment>>;
    async fn license_summary(&self, segment_id: Id) -> PipenetResult<LicenseSummary>;
}

#[async_trait]
pub trait NetworkWriteApi {
    async fn create_facility(&self, actor: &Actor, name: &str) -> PipenetResult<Id>;
    async fn create_satellite(
        &self,
        actor: &Actor,
        input: CreateSatelliteInput,
    ) -> PipenetResult<Id>;
    async fn create_segment(&self, actor: &Actor, input: CreateSegmentInput)
    -> PipenetResult<Id>;
    async fn link_segments(&self, actor: &Actor, upstream: Id, downstream: Id)
    -> PipenetResult<()>;
    async fn add_license_change(
        &self,
        actor: &Actor,
        input: LicenseChangeInput,
    ) -> PipenetResult<Id>;
    async fn add_pressure_test(&self, actor: &Actor, input: PressureTestInput)
    -> PipenetResult<Id>;
    async fn add_pig_run(&self, actor: &Actor, input: PigRunInput) -> PipenetResult<Id>;
    async fn add_pipeline_batch(
        &self,
        actor: &Actor,
        input: PipelineBatchInput,
    ) -> PipenetResult<Id>;
    async fn add_well(&self, actor: &Actor, input: FlowSourceInput) -> PipenetResult<Id>;
    async fn add_sales_point(&self, actor: &Actor, input: FlowSourceInput) -> PipenetResult<Id>;
    async fn set_risk(&self, actor: &Actor, input: RiskInput) -> PipenetResult<()>;
    async fn set_chemical(&self, actor: &Actor, input: ChemicalInput) -> PipenetResult<()>;
}
