//! Navigation: hierarchy selectors and multi-criteria search compiled into a
//! single conjunctive filter over `pipelines`.

mod criterion;
mod having;
mod hierarchy;
pub mod predicate;
pub mod relation;
mod shortcut;

use async_trait::async_trait;
use futures::future::try_join_all;
use sea_orm::sea_query::{Alias, Expr, Func, Order, Query};

use pipenet_core::{
    HierarchySelector, NavigationApi, NavigationPage, NavigationRequest, PipenetResult,
    QueryContext, SearchCriterion,
};

pub use criterion::{Aggregate, CriterionPlan, GroupFilter, plan_criterion};
pub use hierarchy::hierarchy_predicate;
pub use predicate::{Comparison, Predicate};
pub use relation::{Relation, RelationKind, classify};
pub use shortcut::{CountShortcut, count_shortcut};

use crate::db::Pipelines;
use crate::store::{PipelineStore, query_all, query_one, read_segment, segment_select};

impl PipelineStore {
    /// Compiles `criteria` into one predicate. Every criterion is checked
    /// before the store is queried; grouping queries then run concurrently.
    pub async fn compile_search(&self, criteria: &[SearchCriterion]) -> PipenetResult<Predicate> {
        let plans = criteria
            .iter()
            .map(|criterion| {
                let plan = plan_criterion(criterion)?;
                log::debug!(
                    "criterion {}.{} {} {:?} '{}' -> {}",
                    criterion.table,
                    criterion.field,
                    criterion.having.as_str(),
                    criterion.operation,
                    criterion.value,
                    match &plan {
                        CriterionPlan::Ready(predicate) => predicate.shape(),
                        CriterionPlan::Grouped(group) => format!("group:{}", group.relation.name),
                    }
                );
                Ok(plan)
            })
            .collect::<PipenetResult<Vec<_>>>()?;
        let fragments = try_join_all(plans.into_iter().map(|plan| async move {
            match plan {
                CriterionPlan::Ready(predicate) => Ok(predicate),
                CriterionPlan::Grouped(group) => having::resolve_group(&self.conn, &group).await,
            }
        }))
        .await?;
        let predicate = Predicate::and(fragments);
        log::debug!("search predicate: {}", predicate.shape());
        Ok(predicate)
    }

    /// One count and one page of segments matching `predicate`.
    pub(crate) async fn fetch_page(
        &self,
        predicate: &Predicate,
        skip: u64,
        take: u64,
        ordered: bool,
    ) -> PipenetResult<NavigationPage> {
        if predicate.is_never() {
            return Ok(NavigationPage::empty());
        }
        let mut count = Query::select()
            .from(Pipelines::Table)
            .expr_as(
                Func::count(Expr::col((Pipelines::Table, Pipelines::Id))),
                Alias::new("cnt"),
            )
            .to_owned();
        let mut page = segment_select();
        if !predicate.is_always() {
            let condition = predicate.condition(self.backend);
            count.cond_where(condition.clone());
            page.cond_where(condition);
        }
        if ordered {
            page.order_by((Pipelines::Table, Pipelines::License), Order::Asc)
                .order_by((Pipelines::Table, Pipelines::Segment), Order::Asc);
        }
        page.limit(take).offset(skip);

        let (count_row, rows) =
            futures::try_join!(query_one(&self.conn, &count), query_all(&self.conn, &page))?;
        let total_count = match count_row {
            Some(row) => row.try_get::<i64>("", "cnt")?.max(0) as u64,
            None => 0,
        };
        let items = rows
            .iter()
            .map(read_segment)
            .collect::<PipenetResult<Vec<_>>>()?;
        Ok(NavigationPage { items, total_count })
    }
}

#[async_trait]
impl NavigationApi for PipelineStore {
    async fn resolve_navigation(
        &self,
        ctx: &QueryContext,
        request: NavigationRequest,
    ) -> PipenetResult<NavigationPage> {
        request.validate()?;
        let ctx = ctx
            .clone()
            .with_default_timeout(self.limits.request_timeout());
        let skip = request.page.skip;
        let take = self.limits.clamp_take(request.page.take);
        ctx.scope(async {
            if let Some(input) = &request.hierarchy {
                let selector = HierarchySelector::from_input(input)?;
                log::debug!("hierarchy selector {selector:?}");
                return self
                    .fetch_page(&hierarchy_predicate(selector), skip, take, true)
                    .await;
            }
            match &request.search {
                Some(criteria) => {
                    let predicate = self.compile_search(criteria).await?;
                    self.fetch_page(&predicate, skip, take, false).await
                }
                None => Ok(NavigationPage::empty()),
            }
        })
        .await
    }
}
