use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::DatabaseBackend;

use crate::db::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let backend = manager.get_database_backend();

        manager
            .create_table(
                Table::create()
                    .table(Facilities::Table)
                    .if_not_exists()
                    .col(id_col(backend, Facilities::Id, false))
                    .col(ColumnDef::new(Facilities::Name).string().not_null())
                    .col(id_col(backend, Facilities::CreatedById, false))
                    .col(
                        ColumnDef::new(Facilities::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .name("pk_facilities")
                            .col(Facilities::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Satellites::Table)
                    .if_not_exists()
                    .col(id_col(backend, Satellites::Id, false))
                    .col(ColumnDef::new(Satellites::Name).string().not_null())
                    .col(id_col(backend, Satellites::FacilityId, true))
                    .col(id_col(backend, Satellites::CreatedById, false))
                    .col(
                        ColumnDef::new(Satellites::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .name("pk_satellites")
                            .col(Satellites::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Pipelines::Table)
                    .if_not_exists()
                    .col(id_col(backend, Pipelines::Id, false))
                    .col(id_col(backend, Pipelines::SatelliteId, true))
                    .col(ColumnDef::new(Pipelines::License).string().not_null())
                    .col(ColumnDef::new(Pipelines::Segment).string().not_null())
                    .col(
                        ColumnDef::new(Pipelines::FlowCalculationDirection)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Pipelines::FromLocation).string().not_null())
                    .col(ColumnDef::new(Pipelines::FromFeatureId).string())
                    .col(ColumnDef::new(Pipelines::ToLocation).string().not_null())
                    .col(ColumnDef::new(Pipelines::ToFeatureId).string())
                    .col(ColumnDef::new(Pipelines::Length).double().not_null())
                    .col(ColumnDef::new(Pipelines::Material).string())
                    .col(ColumnDef::new(Pipelines::InternalProtection).string())
                    .col(ColumnDef::new(Pipelines::OutsideDiameter).double())
                    .col(ColumnDef::new(Pipelines::WallThickness).double())
                    .col(ColumnDef::new(Pipelines::YieldStrength).big_integer())
                    .col(ColumnDef::new(Pipelines::Mop).big_integer())
                    .col(ColumnDef::new(Pipelines::Piggable).boolean())
                    .col(ColumnDef::new(Pipelines::PiggingFrequency).big_integer())
                    .col(id_col(backend, Pipelines::CreatedById, false))
                    .col(id_col(backend, Pipelines::UpdatedById, false))
                    .col(
                        ColumnDef::new(Pipelines::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Pipelines::UpdatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .primary_key(Index::create().name("pk_pipelines").col(Pipelines::Id))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("pipelines_license_segment_key")
                    .table(Pipelines::Table)
                    .col(Pipelines::License)
                    .col(Pipelines::Segment)
                    .unique()
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("pipelines_satellite_idx")
                    .table(Pipelines::Table)
                    .col(Pipelines::SatelliteId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(PipelinesOnPipelines::Table)
                    .if_not_exists()
                    .col(id_col(backend, PipelinesOnPipelines::UpstreamId, false))
                    .col(id_col(backend, PipelinesOnPipelines::DownstreamId, false))
                    .col(id_col(backend, PipelinesOnPipelines::CreatedById, false))
                    .col(
                        ColumnDef::new(PipelinesOnPipelines::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .name("pk_pipelines_on_pipelines")
                            .col(PipelinesOnPipelines::UpstreamId)
                            .col(PipelinesOnPipelines::DownstreamId),
                    )
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("pipelines_on_pipelines_downstream_idx")
                    .table(PipelinesOnPipelines::Table)
                    .col(PipelinesOnPipelines::DownstreamId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(LicenseChanges::Table)
                    .if_not_exists()
                    .col(id_col(backend, LicenseChanges::Id, false))
                    .col(id_col(backend, LicenseChanges::PipelineId, false))
                    .col(ColumnDef::new(LicenseChanges::Status).string().not_null())
                    .col(
                        ColumnDef::new(LicenseChanges::Substance)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(LicenseChanges::Date)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(LicenseChanges::Comment).text())
                    .col(id_col(backend, LicenseChanges::CreatedById, false))
                    .col(
                        ColumnDef::new(LicenseChanges::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .name("pk_license_changes")
                            .col(LicenseChanges::Id),
                    )
                    .to_owned(),
            )
            .await?;
        create_pipeline_fk_index(
            manager,
            "license_changes_pipeline_idx",
            LicenseChanges::Table,
            LicenseChanges::PipelineId,
        )
        .await?;

        manager
            .create_table(
                Table::create()
                    .table(PressureTests::Table)
                    .if_not_exists()
                    .col(id_col(backend, PressureTests::Id, false))
                    .col(id_col(backend, PressureTests::PipelineId, false))
                    .col(
                        ColumnDef::new(PressureTests::PressureTestDate)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(PressureTests::RequiredWallThickness).double())
                    .col(ColumnDef::new(PressureTests::MopTestPressure).double())
                    .col(ColumnDef::new(PressureTests::Comment).text())
                    .col(id_col(backend, PressureTests::CreatedById, false))
                    .col(
                        ColumnDef::new(PressureTests::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .name("pk_pressure_tests")
                            .col(PressureTests::Id),
                    )
                    .to_owned(),
            )
            .await?;
        create_pipeline_fk_index(
            manager,
            "pressure_tests_pipeline_idx",
            PressureTests::Table,
            PressureTests::PipelineId,
        )
        .await?;

        manager
            .create_table(
                Table::create()
                    .table(PigRuns::Table)
                    .if_not_exists()
                    .col(id_col(backend, PigRuns::Id, false))
                    .col(id_col(backend, PigRuns::PipelineId, false))
                    .col(ColumnDef::new(PigRuns::PigType).string())
                    .col(ColumnDef::new(PigRuns::DateIn).big_integer().not_null())
                    .col(ColumnDef::new(PigRuns::DateOut).big_integer())
                    .col(ColumnDef::new(PigRuns::Comment).text())
                    .col(id_col(backend, PigRuns::CreatedById, false))
                    .col(ColumnDef::new(PigRuns::CreatedAt).big_integer().not_null())
                    .primary_key(Index::create().name("pk_pig_runs").col(PigRuns::Id))
                    .to_owned(),
            )
            .await?;
        create_pipeline_fk_index(
            manager,
            "pig_runs_pipeline_idx",
            PigRuns::Table,
            PigRuns::PipelineId,
        )
        .await?;

        manager
            .create_table(
                Table::create()
                    .table(PipelineBatches::Table)
                    .if_not_exists()
                    .col(id_col(backend, PipelineBatches::Id, false))
                    .col(id_col(backend, PipelineBatches::PipelineId, false))
                    .col(
                        ColumnDef::new(PipelineBatches::Date)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(PipelineBatches::Product).string().not_null())
                    .col(ColumnDef::new(PipelineBatches::Cost).double())
                    .col(ColumnDef::new(PipelineBatches::ChemicalVolume).double())
                    .col(ColumnDef::new(PipelineBatches::DiluentVolume).double())
                    .col(ColumnDef::new(PipelineBatches::Comment).text())
                    .col(id_col(backend, PipelineBatches::CreatedById, false))
                    .col(
                        ColumnDef::new(PipelineBatches::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .name("pk_pipeline_batches")
                            .col(PipelineBatches::Id),
                    )
                    .to_owned(),
            )
            .await?;
        create_pipeline_fk_index(
            manager,
            "pipeline_batches_pipeline_idx",
            PipelineBatches::Table,
            PipelineBatches::PipelineId,
        )
        .await?;

        create_flow_source_table(manager, backend, Wells::Table, "wells").await?;
        create_flow_source_table(manager, backend, SalesPoints::Table, "sales_points").await?;

        manager
            .create_table(
                Table::create()
                    .table(Risks::Table)
                    .if_not_exists()
                    .col(id_col(backend, Risks::Id, false))
                    .col(ColumnDef::new(Risks::ConsequenceEnviro).big_integer())
                    .col(ColumnDef::new(Risks::ConsequenceAsset).big_integer())
                    .col(ColumnDef::new(Risks::ConsequencePeople).big_integer())
                    .col(ColumnDef::new(Risks::ProbabilityInterior).big_integer())
                    .col(ColumnDef::new(Risks::ProbabilityExterior).big_integer())
                    .col(ColumnDef::new(Risks::OilReleaseCost).double())
                    .col(ColumnDef::new(Risks::SafeguardPigging).boolean())
                    .col(ColumnDef::new(Risks::Comment).text())
                    .col(id_col(backend, Risks::CreatedById, false))
                    .col(ColumnDef::new(Risks::CreatedAt).big_integer().not_null())
                    .primary_key(Index::create().name("pk_risks").col(Risks::Id))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Chemicals::Table)
                    .if_not_exists()
                    .col(id_col(backend, Chemicals::Id, false))
                    .col(ColumnDef::new(Chemicals::BaselineFluidAnalysisDate).big_integer())
                    .col(ColumnDef::new(Chemicals::Scaling).boolean())
                    .col(ColumnDef::new(Chemicals::Bacteria).boolean())
                    .col(ColumnDef::new(Chemicals::Co2).boolean())
                    .col(ColumnDef::new(Chemicals::O2).boolean())
                    .col(ColumnDef::new(Chemicals::H2s).boolean())
                    .col(ColumnDef::new(Chemicals::ContinuousInjection).boolean())
                    .col(ColumnDef::new(Chemicals::InjectionRate).double())
                    .col(ColumnDef::new(Chemicals::BatchFrequency).big_integer())
                    .col(ColumnDef::new(Chemicals::Comment).text())
                    .col(id_col(backend, Chemicals::CreatedById, false))
                    .col(
                        ColumnDef::new(Chemicals::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .primary_key(Index::create().name("pk_chemicals").col(Chemicals::Id))
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Chemicals::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Risks::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(SalesPoints::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Wells::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(
                Table::drop()
                    .table(PipelineBatches::Table)
                    .if_exists()
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(Table::drop().table(PigRuns::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(
                Table::drop()
                    .table(PressureTests::Table)
                    .if_exists()
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(
                Table::drop()
                    .table(LicenseChanges::Table)
                    .if_exists()
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(
                Table::drop()
                    .table(PipelinesOnPipelines::Table)
                    .if_exists()
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(Table::drop().table(Pipelines::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Satellites::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Facilities::Table).if_exists().to_owned())
            .await?;
        Ok(())
    }
}

async fn create_flow_source_table<T>(
    manager: &SchemaManager<'_>,
    backend: DatabaseBackend,
    table: T,
    name: &str,
) -> Result<(), DbErr>
where
    T: Iden + Copy + 'static,
{
    manager
        .create_table(
            Table::create()
                .table(table)
                .if_not_exists()
                .col(id_col(backend, FlowSource::Id, false))
                .col(id_col(backend, FlowSource::PipelineId, true))
                .col(ColumnDef::new(FlowSource::Name).string().not_null())
                .col(ColumnDef::new(FlowSource::Oil).double().not_null())
                .col(ColumnDef::new(FlowSource::Water).double().not_null())
                .col(ColumnDef::new(FlowSource::Gas).double().not_null())
                .col(ColumnDef::new(FlowSource::FirstProduction).big_integer())
                .col(ColumnDef::new(FlowSource::LastProduction).big_integer())
                .col(ColumnDef::new(FlowSource::FirstInjection).big_integer())
                .col(ColumnDef::new(FlowSource::LastInjection).big_integer())
                .col(id_col(backend, FlowSource::CreatedById, false))
                .col(ColumnDef::new(FlowSource::CreatedAt).big_integer().not_null())
                .primary_key(
                    Index::create()
                        .name(format!("pk_{name}"))
                        .col(FlowSource::Id),
                )
                .to_owned(),
        )
        .await?;
    create_pipeline_fk_index(
        manager,
        &format!("{name}_pipeline_idx"),
        table,
        FlowSource::PipelineId,
    )
    .await
}

async fn create_pipeline_fk_index<T, C>(
    manager: &SchemaManager<'_>,
    name: &str,
    table: T,
    column: C,
) -> Result<(), DbErr>
where
    T: Iden + 'static,
    C: Iden + 'static,
{
    manager
        .create_index(
            Index::create()
                .name(name)
                .table(table)
                .col(column)
                .to_owned(),
        )
        .await
}

fn id_col(backend: DatabaseBackend, col: impl Iden, nullable: bool) -> ColumnDef {
    let mut col_def = ColumnDef::new(col);
    match backend {
        DatabaseBackend::Postgres => {
            col_def.uuid();
        }
        DatabaseBackend::MySql => {
            col_def.binary_len(16);
        }
        DatabaseBackend::Sqlite => {
            col_def.string_len(36);
        }
        _ => {
            col_def.string_len(36);
        }
    }
    if nullable {
        col_def.null();
    } else {
        col_def.not_null();
    }
    col_def.to_owned()
}
