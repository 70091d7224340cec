use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use sea_orm::sea_query;
use sea_orm::sea_query::{
    Expr, ExprTrait, Func, MysqlQueryBuilder, OnConflict, Order, PostgresQueryBuilder, Query,
    QueryStatementWriter, SelectStatement, SqliteQueryBuilder, Value as SeaValue,
};
use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseBackend, DatabaseConnection, QueryResult,
    Statement, TransactionTrait,
};
use sea_orm_migration::MigratorTrait;
use sea_orm_migration::prelude::Iden;
use uuid::Uuid;

use crate::db::*;
use crate::migration::Migrator;
use crate::{PipenetConfig, QueryConfig};
use pipenet_core::{
    Actor, ChemicalInput, CreateSatelliteInput, CreateSegmentInput, FlowDirection,
    FlowSourceInput, Id, LicenseChangeInput, LicenseSummary, NetworkReadApi, NetworkWriteApi,
    PigRunInput, PipelineBatchInput, PipenetError, PipenetResult, PressureTestInput, RiskInput,
    Segment, Timestamp,
};

#[derive(Clone)]
pub struct PipelineStore {
    pub(crate) conn: DatabaseConnection,
    pub(crate) backend: DatabaseBackend,
    pub(crate) limits: QueryConfig,
}

impl PipelineStore {
    pub async fn connect(config: &PipenetConfig, base_dir: &Path) -> PipenetResult<Self> {
        let url = build_connection_url(config, base_dir)?;
        let mut options = ConnectOptions::new(url);
        if let Some(pool) = &config.pool {
            if let Some(max) = pool.max_connections {
                options.max_connections(max);
            }
            if let Some(min) = pool.min_connections {
                options.min_connections(min);
            }
            if let Some(timeout_ms) = pool.connect_timeout_ms {
                options.connect_timeout(Duration::from_millis(timeout_ms));
            }
            if let Some(timeout_ms) = pool.acquire_timeout_ms {
                options.acquire_timeout(Duration::from_millis(timeout_ms));
            }
            if let Some(timeout_ms) = pool.idle_timeout_ms {
                options.idle_timeout(Duration::from_millis(timeout_ms));
            }
        }
        options.sqlx_logging(false);
        let conn = Database::connect(options).await?;
        let backend = conn.get_database_backend();
        log::info!("connected to {} store", config.backend_name());
        let store = Self {
            conn,
            backend,
            limits: config.query_limits(),
        };
        Migrator::up(&store.conn, None).await?;
        log::info!("schema migrations applied");
        Ok(store)
    }

    pub fn backend_name(&self) -> &'static str {
        match self.backend {
            DatabaseBackend::Postgres => "postgres",
            DatabaseBackend::MySql => "mysql",
            _ => "sqlite",
        }
    }

    pub fn limits(&self) -> &QueryConfig {
        &self.limits
    }

    pub fn connection(&self) -> &DatabaseConnection {
        &self.conn
    }

    async fn segment_exists<C: ConnectionTrait>(&self, conn: &C, id: Id) -> PipenetResult<bool> {
        let select = Query::select()
            .from(Pipelines::Table)
            .column(Pipelines::Id)
            .and_where(Expr::col(Pipelines::Id).eq(id_value(self.backend, id)))
            .limit(1)
            .to_owned();
        Ok(query_one(conn, &select).await?.is_some())
    }

    async fn require_segment<C: ConnectionTrait>(&self, conn: &C, id: Id) -> PipenetResult<()> {
        if self.segment_exists(conn, id).await? {
            Ok(())
        } else {
            Err(PipenetError::not_found(format!("pipeline {id}")))
        }
    }

    async fn require_row<C, T, K>(&self, conn: &C, table: T, key: K, id: Id) -> PipenetResult<()>
    where
        C: ConnectionTrait,
        T: Iden + Copy + 'static,
        K: Iden + Copy + 'static,
    {
        let select = Query::select()
            .from(table)
            .column(key)
            .and_where(Expr::col(key).eq(id_value(self.backend, id)))
            .limit(1)
            .to_owned();
        match query_one(conn, &select).await? {
            Some(_) => Ok(()),
            None => Err(PipenetError::not_found(format!(
                "{} {id}",
                col_name(table)
            ))),
        }
    }

    async fn insert_flow_source<T>(
        &self,
        actor: &Actor,
        table: T,
        input: FlowSourceInput,
    ) -> PipenetResult<Id>
    where
        T: Iden + Copy + 'static,
    {
        if let Some(segment_id) = input.segment_id {
            self.require_segment(&self.conn, segment_id).await?;
        }
        let id = Id::new();
        let insert = Query::insert()
            .into_table(table)
            .columns([
                FlowSource::Id,
                FlowSource::PipelineId,
                FlowSource::Name,
                FlowSource::Oil,
                FlowSource::Water,
                FlowSource::Gas,
                FlowSource::FirstProduction,
                FlowSource::LastProduction,
                FlowSource::FirstInjection,
                FlowSource::LastInjection,
                FlowSource::CreatedById,
                FlowSource::CreatedAt,
            ])
            .values_panic([
                id_value(self.backend, id).into(),
                opt_id_value(self.backend, input.segment_id).into(),
                input.name.into(),
                input.oil.into(),
                input.water.into(),
                input.gas.into(),
                opt_ts(input.first_production).into(),
                opt_ts(input.last_production).into(),
                opt_ts(input.first_injection).into(),
                opt_ts(input.last_injection).into(),
                id_value(self.backend, actor.id).into(),
                Timestamp::now().as_i64().into(),
            ])
            .to_owned();
        exec(&self.conn, &insert).await?;
        Ok(id)
    }

    async fn neighbors(&self, segment_id: Id, direction: FlowDirection) -> PipenetResult<Vec<Segment>> {
        let mut select = segment_select();
        select
            .and_where(
                Expr::col((Pipelines::Table, Pipelines::Id))
                    .in_subquery(self.neighbor_ids_select(segment_id, direction)),
            )
            .order_by((Pipelines::Table, Pipelines::License), Order::Asc)
            .order_by((Pipelines::Table, Pipelines::Segment), Order::Asc);
        let rows = query_all(&self.conn, &select).await?;
        rows.iter().map(read_segment).collect()
    }

    /// Ids one hop away: upstream neighbors feed `segment_id`, downstream
    /// neighbors are fed by it.
    pub(crate) fn neighbor_ids_select(
        &self,
        segment_id: Id,
        direction: FlowDirection,
    ) -> SelectStatement {
        let (far, near) = match direction {
            FlowDirection::Upstream => (
                PipelinesOnPipelines::UpstreamId,
                PipelinesOnPipelines::DownstreamId,
            ),
            FlowDirection::Downstream => (
                PipelinesOnPipelines::DownstreamId,
                PipelinesOnPipelines::UpstreamId,
            ),
        };
        Query::select()
            .from(PipelinesOnPipelines::Table)
            .column(far)
            .and_where(Expr::col(near).eq(id_value(self.backend, segment_id)))
            .to_owned()
    }
}

#[async_trait]
impl NetworkWriteApi for PipelineStore {
    async fn create_facility(&self, actor: &Actor, name: &str) -> PipenetResult<Id> {
        actor.require_network_editor("create facilities")?;
        let id = Id::new();
        let insert = Query::insert()
            .into_table(Facilities::Table)
            .columns([
                Facilities::Id,
                Facilities::Name,
                Facilities::CreatedById,
                Facilities::CreatedAt,
            ])
            .values_panic([
                id_value(self.backend, id).into(),
                name.to_string().into(),
                id_value(self.backend, actor.id).into(),
                Timestamp::now().as_i64().into(),
            ])
            .to_owned();
        exec(&self.conn, &insert).await?;
        Ok(id)
    }

    async fn create_satellite(
        &self,
        actor: &Actor,
        input: CreateSatelliteInput,
    ) -> PipenetResult<Id> {
        actor.require_network_editor("create satellites")?;
        if let Some(facility_id) = input.facility_id {
            self.require_row(&self.conn, Facilities::Table, Facilities::Id, facility_id)
                .await?;
        }
        let id = Id::new();
        let insert = Query::insert()
            .into_table(Satellites::Table)
            .columns([
                Satellites::Id,
                Satellites::Name,
                Satellites::FacilityId,
                Satellites::CreatedById,
                Satellites::CreatedAt,
            ])
            .values_panic([
                id_value(self.backend, id).into(),
                input.name.into(),
                opt_id_value(self.backend, input.facility_id).into(),
                id_value(self.backend, actor.id).into(),
                Timestamp::now().as_i64().into(),
            ])
            .to_owned();
        exec(&self.conn, &insert).await?;
        Ok(id)
    }

    async fn create_segment(&self, actor: &Actor, input: CreateSegmentInput) -> PipenetResult<Id> {
        actor.require_network_editor("create pipelines")?;
        if input.license.trim().is_empty() || input.segment.trim().is_empty() {
            return Err(PipenetError::validation("license and segment are required"));
        }
        let tx = self.conn.begin().await?;
        if let Some(satellite_id) = input.satellite_id {
            self.require_row(&tx, Satellites::Table, Satellites::Id, satellite_id)
                .await?;
        }
        let duplicate = Query::select()
            .from(Pipelines::Table)
            .column(Pipelines::Id)
            .and_where(Expr::col(Pipelines::License).eq(input.license.clone()))
            .and_where(Expr::col(Pipelines::Segment).eq(input.segment.clone()))
            .limit(1)
            .to_owned();
        if query_one(&tx, &duplicate).await?.is_some() {
            return Err(PipenetError::conflict(format!(
                "pipeline {}-{} already exists",
                input.license, input.segment
            )));
        }
        let id = Id::new();
        let now = Timestamp::now().as_i64();
        let insert = Query::insert()
            .into_table(Pipelines::Table)
            .columns([
                Pipelines::Id,
                Pipelines::SatelliteId,
                Pipelines::License,
                Pipelines::Segment,
                Pipelines::FlowCalculationDirection,
                Pipelines::FromLocation,
                Pipelines::FromFeatureId,
                Pipelines::ToLocation,
                Pipelines::ToFeatureId,
                Pipelines::Length,
                Pipelines::Material,
                Pipelines::InternalProtection,
                Pipelines::OutsideDiameter,
                Pipelines::WallThickness,
                Pipelines::YieldStrength,
                Pipelines::Mop,
                Pipelines::Piggable,
                Pipelines::PiggingFrequency,
                Pipelines::CreatedById,
                Pipelines::UpdatedById,
                Pipelines::CreatedAt,
                Pipelines::UpdatedAt,
            ])
            .values_panic([
                id_value(self.backend, id).into(),
                opt_id_value(self.backend, input.satellite_id).into(),
                input.license.into(),
                input.segment.into(),
                input.flow_calculation_direction.as_str().into(),
                input.from.into(),
                input.from_feature_id.into(),
                input.to.into(),
                input.to_feature_id.into(),
                input.length.into(),
                input.material.into(),
                input.internal_protection.into(),
                input.outside_diameter.into(),
                input.wall_thickness.into(),
                input.yield_strength.into(),
                input.mop.into(),
                input.piggable.into(),
                input.pigging_frequency.into(),
                id_value(self.backend, actor.id).into(),
                id_value(self.backend, actor.id).into(),
                now.into(),
                now.into(),
            ])
            .to_owned();
        exec(&tx, &insert).await?;
        tx.commit().await?;
        log::debug!("created pipeline {id}");
        Ok(id)
    }

    async fn link_segments(&self, actor: &Actor, upstream: Id, downstream: Id) -> PipenetResult<()> {
        actor.require_network_editor("connect pipelines")?;
        if upstream == downstream {
            return Err(PipenetError::validation(format!(
                "pipeline {upstream} cannot be connected to itself"
            )));
        }
        let tx = self.conn.begin().await?;
        self.require_segment(&tx, upstream).await?;
        self.require_segment(&tx, downstream).await?;
        let existing = Query::select()
            .from(PipelinesOnPipelines::Table)
            .column(PipelinesOnPipelines::UpstreamId)
            .and_where(
                Expr::col(PipelinesOnPipelines::UpstreamId).eq(id_value(self.backend, upstream)),
            )
            .and_where(
                Expr::col(PipelinesOnPipelines::DownstreamId)
                    .eq(id_value(self.backend, downstream)),
            )
            .limit(1)
            .to_owned();
        if query_one(&tx, &existing).await?.is_some() {
            return Err(PipenetError::conflict(format!(
                "pipeline {upstream} already feeds {downstream}"
            )));
        }
        let insert = Query::insert()
            .into_table(PipelinesOnPipelines::Table)
            .columns([
                PipelinesOnPipelines::UpstreamId,
                PipelinesOnPipelines::DownstreamId,
                PipelinesOnPipelines::CreatedById,
                PipelinesOnPipelines::CreatedAt,
            ])
            .values_panic([
                id_value(self.backend, upstream).into(),
                id_value(self.backend, downstream).into(),
                id_value(self.backend, actor.id).into(),
                Timestamp::now().as_i64().into(),
            ])
            .to_owned();
        exec(&tx, &insert).await?;
        tx.commit().await?;
        Ok(())
    }

    async fn add_license_change(
        &self,
        actor: &Actor,
        input: LicenseChangeInput,
    ) -> PipenetResult<Id> {
        actor.require_network_editor("record license changes")?;
        self.require_segment(&self.conn, input.segment_id).await?;
        let id = Id::new();
        let insert = Query::insert()
            .into_table(LicenseChanges::Table)
            .columns([
                LicenseChanges::Id,
                LicenseChanges::PipelineId,
                LicenseChanges::Status,
                LicenseChanges::Substance,
                LicenseChanges::Date,
                LicenseChanges::Comment,
                LicenseChanges::CreatedById,
                LicenseChanges::CreatedAt,
            ])
            .values_panic([
                id_value(self.backend, id).into(),
                id_value(self.backend, input.segment_id).into(),
                input.status.into(),
                input.substance.into(),
                input.date.as_i64().into(),
                input.comment.into(),
                id_value(self.backend, actor.id).into(),
                Timestamp::now().as_i64().into(),
            ])
            .to_owned();
        exec(&self.conn, &insert).await?;
        Ok(id)
    }

    async fn add_pressure_test(&self, actor: &Actor, input: PressureTestInput) -> PipenetResult<Id> {
        actor.require_network_editor("record pressure tests")?;
        self.require_segment(&self.conn, input.segment_id).await?;
        let id = Id::new();
        let insert = Query::insert()
            .into_table(PressureTests::Table)
            .columns([
                PressureTests::Id,
                PressureTests::PipelineId,
                PressureTests::PressureTestDate,
                PressureTests::RequiredWallThickness,
                PressureTests::MopTestPressure,
                PressureTests::Comment,
                PressureTests::CreatedById,
                PressureTests::CreatedAt,
            ])
            .values_panic([
                id_value(self.backend, id).into(),
                id_value(self.backend, input.segment_id).into(),
                input.pressure_test_date.as_i64().into(),
                input.required_wall_thickness.into(),
                input.mop_test_pressure.into(),
                input.comment.into(),
                id_value(self.backend, actor.id).into(),
                Timestamp::now().as_i64().into(),
            ])
            .to_owned();
        exec(&self.conn, &insert).await?;
        Ok(id)
    }

    async fn add_pig_run(&self, actor: &Actor, input: PigRunInput) -> PipenetResult<Id> {
        actor.require_network_editor("record pig runs")?;
        self.require_segment(&self.conn, input.segment_id).await?;
        let id = Id::new();
        let insert = Query::insert()
            .into_table(PigRuns::Table)
            .columns([
                PigRuns::Id,
                PigRuns::PipelineId,
                PigRuns::PigType,
                PigRuns::DateIn,
                PigRuns::DateOut,
                PigRuns::Comment,
                PigRuns::CreatedById,
                PigRuns::CreatedAt,
            ])
            .values_panic([
                id_value(self.backend, id).into(),
                id_value(self.backend, input.segment_id).into(),
                input.pig_type.into(),
                input.date_in.as_i64().into(),
                opt_ts(input.date_out).into(),
                input.comment.into(),
                id_value(self.backend, actor.id).into(),
                Timestamp::now().as_i64().into(),
            ])
            .to_owned();
        exec(&self.conn, &insert).await?;
        Ok(id)
    }

    async fn add_pipeline_batch(
        &self,
        actor: &Actor,
        input: PipelineBatchInput,
    ) -> PipenetResult<Id> {
        actor.require_network_editor("record pipeline batches")?;
        self.require_segment(&self.conn, input.segment_id).await?;
        let id = Id::new();
        let insert = Query::insert()
            .into_table(PipelineBatches::Table)
            .columns([
                PipelineBatches::Id,
                PipelineBatches::PipelineId,
                PipelineBatches::Date,
                PipelineBatches::Product,
                PipelineBatches::Cost,
                PipelineBatches::ChemicalVolume,
                PipelineBatches::DiluentVolume,
                PipelineBatches::Comment,
                PipelineBatches::CreatedById,
                PipelineBatches::CreatedAt,
            ])
            .values_panic([
                id_value(self.backend, id).into(),
                id_value(self.backend, input.segment_id).into(),
                input.date.as_i64().into(),
                input.product.into(),
                input.cost.into(),
                input.chemical_volume.into(),
                input.diluent_volume.into(),
                input.comment.into(),
                id_value(self.backend, actor.id).into(),
                Timestamp::now().as_i64().into(),
            ])
            .to_owned();
        exec(&self.conn, &insert).await?;
        Ok(id)
    }

    async fn add_well(&self, actor: &Actor, input: FlowSourceInput) -> PipenetResult<Id> {
        actor.require_network_editor("record wells")?;
        self.insert_flow_source(actor, Wells::Table, input).await
    }

    async fn add_sales_point(&self, actor: &Actor, input: FlowSourceInput) -> PipenetResult<Id> {
        actor.require_network_editor("record sales points")?;
        self.insert_flow_source(actor, SalesPoints::Table, input)
            .await
    }

    async fn set_risk(&self, actor: &Actor, input: RiskInput) -> PipenetResult<()> {
        actor.require_network_editor("assess risk")?;
        self.require_segment(&self.conn, input.segment_id).await?;
        let upsert = Query::insert()
            .into_table(Risks::Table)
            .columns([
                Risks::Id,
                Risks::ConsequenceEnviro,
                Risks::ConsequenceAsset,
                Risks::ConsequencePeople,
                Risks::ProbabilityInterior,
                Risks::ProbabilityExterior,
                Risks::OilReleaseCost,
                Risks::SafeguardPigging,
                Risks::Comment,
                Risks::CreatedById,
                Risks::CreatedAt,
            ])
            .values_panic([
                id_value(self.backend, input.segment_id).into(),
                input.consequence_enviro.into(),
                input.consequence_asset.into(),
                input.consequence_people.into(),
                input.probability_interior.into(),
                input.probability_exterior.into(),
                input.oil_release_cost.into(),
                input.safeguard_pigging.into(),
                input.comment.into(),
                id_value(self.backend, actor.id).into(),
                Timestamp::now().as_i64().into(),
            ])
            .on_conflict(
                OnConflict::column(Risks::Id)
                    .update_columns([
                        Risks::ConsequenceEnviro,
                        Risks::ConsequenceAsset,
                        Risks::ConsequencePeople,
                        Risks::ProbabilityInterior,
                        Risks::ProbabilityExterior,
                        Risks::OilReleaseCost,
                        Risks::SafeguardPigging,
                        Risks::Comment,
                    ])
                    .to_owned(),
            )
            .to_owned();
        exec(&self.conn, &upsert).await?;
        Ok(())
    }

    async fn set_chemical(&self, actor: &Actor, input: ChemicalInput) -> PipenetResult<()> {
        actor.require_network_editor("record chemical treatment")?;
        self.require_segment(&self.conn, input.segment_id).await?;
        let upsert = Query::insert()
            .into_table(Chemicals::Table)
            .columns([
                Chemicals::Id,
                Chemicals::BaselineFluidAnalysisDate,
                Chemicals::Scaling,
                Chemicals::Bacteria,
                Chemicals::Co2,
                Chemicals::O2,
                Chemicals::H2s,
                Chemicals::ContinuousInjection,
                Chemicals::InjectionRate,
                Chemicals::BatchFrequency,
                Chemicals::Comment,
                Chemicals::CreatedById,
                Chemicals::CreatedAt,
            ])
            .values_panic([
                id_value(self.backend, input.segment_id).into(),
                opt_ts(input.baseline_fluid_analysis_date).into(),
                input.scaling.into(),
                input.bacteria.into(),
                input.co2.into(),
                input.o2.into(),
                input.h2s.into(),
                input.continuous_injection.into(),
                input.injection_rate.into(),
                input.batch_frequency.into(),
                input.comment.into(),
                id_value(self.backend, actor.id).into(),
                Timestamp::now().as_i64().into(),
            ])
            .on_conflict(
                OnConflict::column(Chemicals::Id)
                    .update_columns([
                        Chemicals::BaselineFluidAnalysisDate,
                        Chemicals::Scaling,
                        Chemicals::Bacteria,
                        Chemicals::Co2,
                        Chemicals::O2,
                        Chemicals::H2s,
                        Chemicals::ContinuousInjection,
                        Chemicals::InjectionRate,
                        Chemicals::BatchFrequency,
                        Chemicals::Comment,
                    ])
                    .to_owned(),
            )
            .to_owned();
        exec(&self.conn, &upsert).await?;
        Ok(())
    }
}

#[async_trait]
impl NetworkReadApi for PipelineStore {
    async fn get_segment(&self, segment_id: Id) -> PipenetResult<Option<Segment>> {
        let mut select = segment_select();
        select
            .and_where(
                Expr::col((Pipelines::Table, Pipelines::Id)).eq(id_value(self.backend, segment_id)),
            )
            .limit(1);
        query_one(&self.conn, &select)
            .await?
            .as_ref()
            .map(read_segment)
            .transpose()
    }

    async fn upstream_neighbors(&self, segment_id: Id) -> PipenetResult<Vec<Segment>> {
        self.neighbors(segment_id, FlowDirection::Upstream).await
    }

    async fn downstream_neighbors(&self, segment_id: Id) -> PipenetResult<Vec<Segment>> {
        self.neighbors(segment_id, FlowDirection::Downstream).await
    }

    async fn license_summary(&self, segment_id: Id) -> PipenetResult<LicenseSummary> {
        let latest = Query::select()
            .from(LicenseChanges::Table)
            .columns([LicenseChanges::Status, LicenseChanges::Substance])
            .and_where(
                Expr::col(LicenseChanges::PipelineId).eq(id_value(self.backend, segment_id)),
            )
            .order_by(LicenseChanges::Date, Order::Desc)
            .order_by(LicenseChanges::CreatedAt, Order::Desc)
            .limit(1)
            .to_owned();
        let first = Query::select()
            .from(LicenseChanges::Table)
            .expr_as(Func::min(Expr::col(LicenseChanges::Date)), sea_query::Alias::new("first_date"))
            .and_where(
                Expr::col(LicenseChanges::PipelineId).eq(id_value(self.backend, segment_id)),
            )
            .to_owned();
        let (latest, first) =
            futures::try_join!(query_one(&self.conn, &latest), query_one(&self.conn, &first))?;
        let (current_status, current_substance) = match latest {
            Some(row) => (
                Some(row.try_get::<String>("", &col_name(LicenseChanges::Status))?),
                Some(row.try_get::<String>("", &col_name(LicenseChanges::Substance))?),
            ),
            None => (None, None),
        };
        let first_license_date = match first {
            Some(row) => row
                .try_get::<Option<i64>>("", "first_date")?
                .map(Timestamp::from_i64),
            None => None,
        };
        Ok(LicenseSummary {
            current_status,
            current_substance,
            first_license_date,
        })
    }
}

const SEGMENT_COLUMNS: [Pipelines; 22] = [
    Pipelines::Id,
    Pipelines::SatelliteId,
    Pipelines::License,
    Pipelines::Segment,
    Pipelines::FlowCalculationDirection,
    Pipelines::FromLocation,
    Pipelines::FromFeatureId,
    Pipelines::ToLocation,
    Pipelines::ToFeatureId,
    Pipelines::Length,
    Pipelines::Material,
    Pipelines::InternalProtection,
    Pipelines::OutsideDiameter,
    Pipelines::WallThickness,
    Pipelines::YieldStrength,
    Pipelines::Mop,
    Pipelines::Piggable,
    Pipelines::PiggingFrequency,
    Pipelines::CreatedById,
    Pipelines::UpdatedById,
    Pipelines::CreatedAt,
    Pipelines::UpdatedAt,
];

pub(crate) fn segment_select() -> SelectStatement {
    Query::select()
        .from(Pipelines::Table)
        .columns(
            SEGMENT_COLUMNS
                .iter()
                .map(|column| (Pipelines::Table, *column)),
        )
        .to_owned()
}

pub(crate) fn read_segment(row: &QueryResult) -> PipenetResult<Segment> {
    let direction: String = row.try_get("", &col_name(Pipelines::FlowCalculationDirection))?;
    let flow_calculation_direction = FlowDirection::parse(&direction).ok_or_else(|| {
        PipenetError::storage(format!("unknown flow calculation direction '{direction}'"))
    })?;
    Ok(Segment {
        id: read_id(row, Pipelines::Id)?,
        satellite_id: read_opt_id(row, Pipelines::SatelliteId)?,
        license: row.try_get("", &col_name(Pipelines::License))?,
        segment: row.try_get("", &col_name(Pipelines::Segment))?,
        flow_calculation_direction,
        from: row.try_get("", &col_name(Pipelines::FromLocation))?,
        from_feature_id: row.try_get("", &col_name(Pipelines::FromFeatureId))?,
        to: row.try_get("", &col_name(Pipelines::ToLocation))?,
        to_feature_id: row.try_get("", &col_name(Pipelines::ToFeatureId))?,
        length: row.try_get("", &col_name(Pipelines::Length))?,
        material: row.try_get("", &col_name(Pipelines::Material))?,
        internal_protection: row.try_get("", &col_name(Pipelines::InternalProtection))?,
        outside_diameter: row.try_get("", &col_name(Pipelines::OutsideDiameter))?,
        wall_thickness: row.try_get("", &col_name(Pipelines::WallThickness))?,
        yield_strength: row.try_get("", &col_name(Pipelines::YieldStrength))?,
        mop: row.try_get("", &col_name(Pipelines::Mop))?,
        piggable: row.try_get("", &col_name(Pipelines::Piggable))?,
        pigging_frequency: row.try_get("", &col_name(Pipelines::PiggingFrequency))?,
        created_by_id: read_id(row, Pipelines::CreatedById)?,
        updated_by_id: read_id(row, Pipelines::UpdatedById)?,
        created_at: read_ts(row, Pipelines::CreatedAt)?,
        updated_at: read_ts(row, Pipelines::UpdatedAt)?,
    })
}

fn opt_ts(value: Option<Timestamp>) -> Option<i64> {
    value.map(Timestamp::as_i64)
}

pub(crate) fn read_ts(row: &QueryResult, column: impl sea_query::Iden) -> PipenetResult<Timestamp> {
    let value: i64 = row.try_get("", &col_name(column))?;
    Ok(Timestamp::from_i64(value))
}

pub(crate) fn read_opt_ts(
    row: &QueryResult,
    column: impl sea_query::Iden,
) -> PipenetResult<Option<Timestamp>> {
    let value: Option<i64> = row.try_get("", &col_name(column))?;
    Ok(value.map(Timestamp::from_i64))
}

pub(crate) fn id_value(backend: DatabaseBackend, id: Id) -> SeaValue {
    match backend {
        DatabaseBackend::Postgres => {
            let uuid = Uuid::from_bytes(id.as_bytes());
            SeaValue::Uuid(Some(uuid))
        }
        DatabaseBackend::MySql => SeaValue::Bytes(Some(id.as_vec())),
        DatabaseBackend::Sqlite => SeaValue::String(Some(id.to_uuid_string())),
        _ => SeaValue::String(Some(id.to_uuid_string())),
    }
}

fn none_id_value(backend: DatabaseBackend) -> SeaValue {
    match backend {
        DatabaseBackend::Postgres => SeaValue::Uuid(None),
        DatabaseBackend::MySql => SeaValue::Bytes(None),
        DatabaseBackend::Sqlite => SeaValue::String(None),
        _ => SeaValue::String(None),
    }
}

fn opt_id_value(backend: DatabaseBackend, id: Option<Id>) -> SeaValue {
    match id {
        Some(id) => id_value(backend, id),
        None => none_id_value(backend),
    }
}

fn bytes_to_id(bytes: Vec<u8>) -> Option<Id> {
    if bytes.len() == 16 {
        let mut buf = [0u8; 16];
        buf.copy_from_slice(&bytes);
        Some(Id::from_bytes(buf))
    } else {
        None
    }
}

pub(crate) fn read_id(row: &QueryResult, column: impl sea_query::Iden) -> PipenetResult<Id> {
    let name = col_name(column);
    if let Ok(value) = row.try_get::<String>("", &name) {
        return Id::from_uuid_str(&value);
    }
    if let Ok(value) = row.try_get::<Uuid>("", &name) {
        return Ok(Id::from_bytes(*value.as_bytes()));
    }
    if let Ok(value) = row.try_get::<Vec<u8>>("", &name) {
        return bytes_to_id(value).ok_or_else(|| PipenetError::storage("invalid id length"));
    }
    Err(PipenetError::storage(format!("unsupported id format in '{name}'")))
}

pub(crate) fn read_opt_id(
    row: &QueryResult,
    column: impl sea_query::Iden,
) -> PipenetResult<Option<Id>> {
    let name = col_name(column);
    if let Ok(value) = row.try_get::<Option<String>>("", &name) {
        return value.map(|value| Id::from_uuid_str(&value)).transpose();
    }
    if let Ok(value) = row.try_get::<Option<Uuid>>("", &name) {
        return Ok(value.map(|value| Id::from_bytes(*value.as_bytes())));
    }
    if let Ok(value) = row.try_get::<Option<Vec<u8>>>("", &name) {
        return Ok(value.and_then(bytes_to_id));
    }
    Ok(None)
}

pub(crate) fn col_name(column: impl sea_query::Iden) -> String {
    column.to_string()
}

fn build_stmt<S: QueryStatementWriter>(
    backend: DatabaseBackend,
    stmt: &S,
) -> (String, sea_orm::sea_query::Values) {
    match backend {
        DatabaseBackend::Sqlite => stmt.build(SqliteQueryBuilder),
        DatabaseBackend::Postgres => stmt.build(PostgresQueryBuilder),
        DatabaseBackend::MySql => stmt.build(MysqlQueryBuilder),
        _ => stmt.build(SqliteQueryBuilder),
    }
}

pub(crate) async fn exec<C, S>(conn: &C, stmt: &S) -> PipenetResult<()>
where
    C: ConnectionTrait,
    S: QueryStatementWriter,
{
    let backend = conn.get_database_backend();
    let (sql, values) = build_stmt(backend, stmt);
    conn.execute_raw(Statement::from_sql_and_values(backend, sql, values))
        .await?;
    Ok(())
}

pub(crate) async fn query_all<C, S>(conn: &C, stmt: &S) -> PipenetResult<Vec<QueryResult>>
where
    C: ConnectionTrait,
    S: QueryStatementWriter,
{
    let backend = conn.get_database_backend();
    let (sql, values) = build_stmt(backend, stmt);
    let rows = conn
        .query_all_raw(Statement::from_sql_and_values(backend, sql, values))
        .await?;
    Ok(rows)
}

pub(crate) async fn query_one<C, S>(conn: &C, stmt: &S) -> PipenetResult<Option<QueryResult>>
where
    C: ConnectionTrait,
    S: QueryStatementWriter,
{
    let backend = conn.get_database_backend();
    let (sql, values) = build_stmt(backend, stmt);
    let row = conn
        .query_one_raw(Statement::from_sql_and_values(backend, sql, values))
        .await?;
    Ok(row)
}

fn build_connection_url(config: &PipenetConfig, base_dir: &Path) -> PipenetResult<String> {
    match &config.database {
        crate::DatabaseConfig::Sqlite { .. } => {
            let path = config.sqlite_path(base_dir)?;
            Ok(format!("sqlite://{}?mode=rwc", path.display()))
        }
        crate::DatabaseConfig::Postgres { url } => Ok(url.clone()),
        crate::DatabaseConfig::Mysql { url } => Ok(url.clone()),
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::build_connection_url;
    use crate::PipenetConfig;

    #[test]
    fn sqlite_urls_resolve_against_base_dir() {
        let config = PipenetConfig::default_sqlite("net.sqlite");
        let url = build_connection_url(&config, Path::new("/tmp/pipenet")).expect("url");
        assert_eq!(url, "sqlite:///tmp/pipenet/net.sqlite?mode=rwc");
    }
}
