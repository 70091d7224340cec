use sea_orm::sea_query;
use sea_orm_migration::prelude::Iden;

#[derive(Iden, Clone, Copy)]
pub enum Facilities {
    Table,
    Id,
    Name,
    CreatedById,
    CreatedAt,
}

#[derive(Iden, Clone, Copy)]
pub enum Satellites {
    Table,
    Id,
    Name,
    FacilityId,
    CreatedById,
    CreatedAt,
}

#[derive(Iden, Clone, Copy)]
pub enum Pipelines {
    Table,
    Id,
    SatelliteId,
    License,
    Segment,
    FlowCalculationDirection,
    FromLocation,
    FromFeatureId,
    ToLocation,
    ToFeatureId,
    Length,
    Material,
    InternalProtection,
    OutsideDiameter,
    WallThickness,
    YieldStrength,
    Mop,
    Piggable,
    PiggingFrequency,
    CreatedById,
    UpdatedById,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden, Clone, Copy)]
pub enum PipelinesOnPipelines {
    Table,
    UpstreamId,
    DownstreamId,
    CreatedById,
    CreatedAt,
}

#[derive(Iden, Clone, Copy)]
pub enum LicenseChanges {
    Table,
    Id,
    PipelineId,
    Status,
    Substance,
    Date,
    Comment,
    CreatedById,
    CreatedAt,
}

#[derive(Iden, Clone, Copy)]
pub enum PressureTests {
    Table,
    Id,
    PipelineId,
    PressureTestDate,
    RequiredWallThickness,
    MopTestPressure,
    Comment,
    CreatedById,
    CreatedAt,
}

#[derive(Iden, Clone, Copy)]
pub enum PigRuns {
    Table,
    Id,
    PipelineId,
    PigType,
    DateIn,
    DateOut,
    Comment,
    CreatedById,
    CreatedAt,
}

#[derive(Iden, Clone, Copy)]
pub enum PipelineBatches {
    Table,
    Id,
    PipelineId,
    Date,
    Product,
    Cost,
    ChemicalVolume,
    DiluentVolume,
    Comment,
    CreatedById,
    CreatedAt,
}

/// Shared column set of `wells` and `sales_points`.
#[derive(Iden, Clone, Copy)]
pub enum FlowSource {
    Id,
    PipelineId,
    Name,
    Oil,
    Water,
    Gas,
    FirstProduction,
    LastProduction,
    FirstInjection,
    LastInjection,
    CreatedById,
    CreatedAt,
}

#[derive(Iden, Clone, Copy)]
pub enum Wells {
    Table,
}

#[derive(Iden, Clone, Copy)]
pub enum SalesPoints {
    Table,
}

#[derive(Iden, Clone, Copy)]
pub enum Risks {
    Table,
    Id,
    ConsequenceEnviro,
    ConsequenceAsset,
    ConsequencePeople,
    ProbabilityInterior,
    ProbabilityExterior,
    OilReleaseCost,
    SafeguardPigging,
    Comment,
    CreatedById,
    CreatedAt,
}

#[derive(Iden, Clone, Copy)]
pub enum Chemicals {
    Table,
    Id,
    BaselineFluidAnalysisDate,
    Scaling,
    Bacteria,
    Co2,
    O2,
    H2s,
    ContinuousInjection,
    InjectionRate,
    BatchFrequency,
    Comment,
    CreatedById,
    CreatedAt,
}
