use pipenet_core::{PipenetError, PipenetResult, ScalarKind};

/// Shape of the relation between a segment and the table a criterion names.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RelationKind {
    SelfRelation,
    OneToOne,
    OneToMany,
    /// Segment-to-segment edge; `opposite` names the edge direction that
    /// holds this segment's rows.
    ManyToMany { opposite: &'static str },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Field {
    pub name: &'static str,
    pub column: &'static str,
    pub kind: ScalarKind,
}

#[derive(Debug, PartialEq, Eq)]
pub struct Relation {
    pub name: &'static str,
    pub kind: RelationKind,
    /// Table holding the related rows (the edge table for many-to-many).
    pub table: &'static str,
    /// Column of `table` holding the id of the segment being filtered.
    pub self_column: &'static str,
    /// Many-to-many only: edge column holding the neighbor segment id.
    pub target_column: Option<&'static str>,
    /// Searchable fields; for many-to-many they live on the neighbor segment.
    pub fields: &'static [Field],
}

impl Relation {
    pub fn field(&'static self, name: &str) -> PipenetResult<&'static Field> {
        self.fields
            .iter()
            .find(|field| field.name == name)
            .ok_or_else(|| PipenetError::unknown_field(self.name, name))
    }

    pub fn is_nullable_link(&self) -> bool {
        matches!(self.kind, RelationKind::OneToMany)
    }
}

pub const PIPELINES_TABLE: &str = "pipelines";
pub const EDGE_TABLE: &str = "pipelines_on_pipelines";
/// Aliases used when an edge row is joined to the neighbor segment.
pub const LINK_ALIAS: &str = "link";
pub const NEIGHBOR_ALIAS: &str = "neighbor";

const fn field(name: &'static str, column: &'static str, kind: ScalarKind) -> Field {
    Field { name, column, kind }
}

const PIPELINE_FIELDS: &[Field] = &[
    field("license", "license", ScalarKind::String),
    field("segment", "segment", ScalarKind::String),
    field(
        "flowCalculationDirection",
        "flow_calculation_direction",
        ScalarKind::String,
    ),
    field("from", "from_location", ScalarKind::String),
    field("fromFeatureId", "from_feature_id", ScalarKind::String),
    field("to", "to_location", ScalarKind::String),
    field("toFeatureId", "to_feature_id", ScalarKind::String),
    field("length", "length", ScalarKind::Float),
    field("material", "material", ScalarKind::String),
    field("internalProtection", "internal_protection", ScalarKind::String),
    field("outsideDiameter", "outside_diameter", ScalarKind::Float),
    field("wallThickness", "wall_thickness", ScalarKind::Float),
    field("yieldStrength", "yield_strength", ScalarKind::Int),
    field("mop", "mop", ScalarKind::Int),
    field("piggable", "piggable", ScalarKind::Boolean),
    field("piggingFrequency", "pigging_frequency", ScalarKind::Int),
    field("createdAt", "created_at", ScalarKind::DateTime),
    field("updatedAt", "updated_at", ScalarKind::DateTime),
];

const RISK_FIELDS: &[Field] = &[
    field("consequenceEnviro", "consequence_enviro", ScalarKind::Int),
    field("consequenceAsset", "consequence_asset", ScalarKind::Int),
    field("consequencePeople", "consequence_people", ScalarKind::Int),
    field("probabilityInterior", "probability_interior", ScalarKind::Int),
    field("probabilityExterior", "probability_exterior", ScalarKind::Int),
    field("oilReleaseCost", "oil_release_cost", ScalarKind::Float),
    field("safeguardPigging", "safeguard_pigging", ScalarKind::Boolean),
    field("comment", "comment", ScalarKind::String),
];

const CHEMICAL_FIELDS: &[Field] = &[
    field(
        "baselineFluidAnalysisDate",
        "baseline_fluid_analysis_date",
        ScalarKind::DateTime,
    ),
    field("scaling", "scaling", ScalarKind::Boolean),
    field("bacteria", "bacteria", ScalarKind::Boolean),
    field("co2", "co2", ScalarKind::Boolean),
    field("o2", "o2", ScalarKind::Boolean),
    field("h2s", "h2s", ScalarKind::Boolean),
    field("continuousInjection", "continuous_injection", ScalarKind::Boolean),
    field("injectionRate", "injection_rate", ScalarKind::Float),
    field("batchFrequency", "batch_frequency", ScalarKind::Int),
    field("comment", "comment", ScalarKind::String),
];

const LICENSE_CHANGE_FIELDS: &[Field] = &[
    field("status", "status", ScalarKind::String),
    field("substance", "substance", ScalarKind::String),
    field("date", "date", ScalarKind::DateTime),
    field("comment", "comment", ScalarKind::String),
];

const PRESSURE_TEST_FIELDS: &[Field] = &[
    field("pressureTestDate", "pressure_test_date", ScalarKind::DateTime),
    field(
        "requiredWallThickness",
        "required_wall_thickness",
        ScalarKind::Float,
    ),
    field("mopTestPressure", "mop_test_pressure", ScalarKind::Float),
    field("comment", "comment", ScalarKind::String),
];

const PIG_RUN_FIELDS: &[Field] = &[
    field("pigType", "pig_type", ScalarKind::String),
    field("dateIn", "date_in", ScalarKind::DateTime),
    field("dateOut", "date_out", ScalarKind::DateTime),
    field("comment", "comment", ScalarKind::String),
];

const PIPELINE_BATCH_FIELDS: &[Field] = &[
    field("date", "date", ScalarKind::DateTime),
    field("product", "product", ScalarKind::String),
    field("cost", "cost", ScalarKind::Float),
    field("chemicalVolume", "chemical_volume", ScalarKind::Float),
    field("diluentVolume", "diluent_volume", ScalarKind::Float),
    field("comment", "comment", ScalarKind::String),
];

const FLOW_SOURCE_FIELDS: &[Field] = &[
    field("name", "name", ScalarKind::String),
    field("oil", "oil", ScalarKind::Float),
    field("water", "water", ScalarKind::Float),
    field("gas", "gas", ScalarKind::Float),
    field("firstProduction", "first_production", ScalarKind::DateTime),
    field("lastProduction", "last_production", ScalarKind::DateTime),
    field("firstInjection", "first_injection", ScalarKind::DateTime),
    field("lastInjection", "last_injection", ScalarKind::DateTime),
];

const fn one_to_many(name: &'static str, table: &'static str, fields: &'static [Field]) -> Relation {
    Relation {
        name,
        kind: RelationKind::OneToMany,
        table,
        self_column: "pipeline_id",
        target_column: None,
        fields,
    }
}

static CATALOG: &[Relation] = &[
    Relation {
        name: "pipeline",
        kind: RelationKind::SelfRelation,
        table: PIPELINES_TABLE,
        self_column: "id",
        target_column: None,
        fields: PIPELINE_FIELDS,
    },
    Relation {
        name: "risk",
        kind: RelationKind::OneToOne,
        table: "risks",
        self_column: "id",
        target_column: None,
        fields: RISK_FIELDS,
    },
    Relation {
        name: "chemical",
        kind: RelationKind::OneToOne,
        table: "chemicals",
        self_column: "id",
        target_column: None,
        fields: CHEMICAL_FIELDS,
    },
    // Segments this one feeds: edge rows where it is the upstream endpoint.
    Relation {
        name: "downstream",
        kind: RelationKind::ManyToMany {
            opposite: "upstream",
        },
        table: EDGE_TABLE,
        self_column: "upstream_id",
        target_column: Some("downstream_id"),
        fields: PIPELINE_FIELDS,
    },
    Relation {
        name: "upstream",
        kind: RelationKind::ManyToMany {
            opposite: "downstream",
        },
        table: EDGE_TABLE,
        self_column: "downstream_id",
        target_column: Some("upstream_id"),
        fields: PIPELINE_FIELDS,
    },
    one_to_many("licenseChanges", "license_changes", LICENSE_CHANGE_FIELDS),
    one_to_many("wells", "wells", FLOW_SOURCE_FIELDS),
    one_to_many("salesPoints", "sales_points", FLOW_SOURCE_FIELDS),
    one_to_many("pigRuns", "pig_runs", PIG_RUN_FIELDS),
    one_to_many("pressureTests", "pressure_tests", PRESSURE_TEST_FIELDS),
    one_to_many("pipelineBatches", "pipeline_batches", PIPELINE_BATCH_FIELDS),
];

pub fn classify(name: &str) -> PipenetResult<&'static Relation> {
    CATALOG
        .iter()
        .find(|relation| relation.name == name)
        .ok_or_else(|| PipenetError::unknown_relation(name))
}
