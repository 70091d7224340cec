use std::collections::HashMap;

use async_trait::async_trait;
use sea_orm::sea_query::{Expr, ExprTrait, Func, Order, Query};
use sea_orm_migration::prelude::Iden;

use pipenet_core::{
    FlowApi, FlowDirection, FlowResolution, FlowTotals, Id, NeighborFlow, PipenetResult,
    QueryContext,
};

use crate::db::*;
use crate::store::{PipelineStore, col_name, id_value, query_all, read_id, read_opt_ts};

#[async_trait]
impl FlowApi for PipelineStore {
    async fn resolve_flow(
        &self,
        ctx: &QueryContext,
        segment_id: Id,
        direction: FlowDirection,
    ) -> PipenetResult<FlowResolution> {
        let ctx = ctx
            .clone()
            .with_default_timeout(self.limits.request_timeout());
        ctx.scope(self.neighbor_flow(segment_id, direction)).await
    }
}

impl PipelineStore {
    async fn neighbor_flow(
        &self,
        segment_id: Id,
        direction: FlowDirection,
    ) -> PipenetResult<FlowResolution> {
        let rows = query_all(&self.conn, &self.neighbor_ids_select(segment_id, direction)).await?;
        let far = match direction {
            FlowDirection::Upstream => PipelinesOnPipelines::UpstreamId,
            FlowDirection::Downstream => PipelinesOnPipelines::DownstreamId,
        };
        let ids = rows
            .iter()
            .map(|row| read_id(row, far))
            .collect::<PipenetResult<Vec<_>>>()?;
        if ids.is_empty() {
            log::debug!("{} has no {} neighbors", segment_id, direction.as_str());
            return Ok(FlowResolution::empty());
        }

        let (names, wells, sales_points) = futures::try_join!(
            self.segment_names(&ids),
            self.source_totals(Wells::Table, &ids),
            self.source_totals(SalesPoints::Table, &ids),
        )?;
        let neighbors = names
            .into_iter()
            .map(|(id, name)| {
                let totals = [wells.get(&id), sales_points.get(&id)]
                    .into_iter()
                    .flatten()
                    .fold(FlowTotals::default(), |acc, totals| acc.combine(*totals));
                NeighborFlow { id, name, totals }
            })
            .collect::<Vec<_>>();
        let summary = FlowTotals::reduce(neighbors.iter().map(|neighbor| neighbor.totals));
        Ok(FlowResolution { neighbors, summary })
    }

    async fn segment_names(&self, ids: &[Id]) -> PipenetResult<Vec<(Id, String)>> {
        let select = Query::select()
            .from(Pipelines::Table)
            .columns([Pipelines::Id, Pipelines::License, Pipelines::Segment])
            .and_where(
                Expr::col(Pipelines::Id).is_in(ids.iter().map(|id| id_value(self.backend, *id))),
            )
            .order_by(Pipelines::License, Order::Asc)
            .order_by(Pipelines::Segment, Order::Asc)
            .to_owned();
        let rows = query_all(&self.conn, &select).await?;
        rows.iter()
            .map(|row| {
                let license: String = row.try_get("", &col_name(Pipelines::License))?;
                let segment: String = row.try_get("", &col_name(Pipelines::Segment))?;
                Ok((read_id(row, Pipelines::Id)?, format!("{license}-{segment}")))
            })
            .collect()
    }

    /// Production totals of the wells or sales points attached to each of `ids`.
    async fn source_totals<T>(&self, table: T, ids: &[Id]) -> PipenetResult<HashMap<Id, FlowTotals>>
    where
        T: Iden + Copy + 'static,
    {
        let select = Query::select()
            .from(table)
            .column(FlowSource::PipelineId)
            .expr_as(Func::sum(Expr::col(FlowSource::Oil)), FlowSource::Oil)
            .expr_as(Func::sum(Expr::col(FlowSource::Water)), FlowSource::Water)
            .expr_as(Func::sum(Expr::col(FlowSource::Gas)), FlowSource::Gas)
            .expr_as(
                Func::min(Expr::col(FlowSource::FirstProduction)),
                FlowSource::FirstProduction,
            )
            .expr_as(
                Func::max(Expr::col(FlowSource::LastProduction)),
                FlowSource::LastProduction,
            )
            .expr_as(
                Func::min(Expr::col(FlowSource::FirstInjection)),
                FlowSource::FirstInjection,
            )
            .expr_as(
                Func::max(Expr::col(FlowSource::LastInjection)),
                FlowSource::LastInjection,
            )
            .and_where(
                Expr::col(FlowSource::PipelineId)
                    .is_in(ids.iter().map(|id| id_value(self.backend, *id))),
            )
            .group_by_col(FlowSource::PipelineId)
            .to_owned();
        let rows = query_all(&self.conn, &select).await?;
        let mut totals = HashMap::with_capacity(rows.len());
        for row in &rows {
            let volume = |column: FlowSource| -> PipenetResult<f64> {
                let value: Option<f64> = row.try_get("", &col_name(column))?;
                Ok(value.unwrap_or(0.0))
            };
            let record = FlowTotals {
                oil: volume(FlowSource::Oil)?,
                water: volume(FlowSource::Water)?,
                gas: volume(FlowSource::Gas)?,
                first_production: read_opt_ts(row, FlowSource::FirstProduction)?,
                last_production: read_opt_ts(row, FlowSource::LastProduction)?,
                first_injection: read_opt_ts(row, FlowSource::FirstInjection)?,
                last_injection: read_opt_ts(row, FlowSource::LastInjection)?,
            };
            totals.insert(read_id(row, FlowSource::PipelineId)?, record);
        }
        log::debug!("{} source groups from {}", totals.len(), col_name(table));
        Ok(totals)
    }
}
