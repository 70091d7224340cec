use sea_orm::ConnectionTrait;
use sea_orm::sea_query::{Alias, Expr, ExprTrait, Func, JoinType, Query, SelectStatement};

use pipenet_core::{PipenetResult, ScalarValue};

use super::criterion::{Aggregate, GroupFilter};
use super::predicate::{Predicate, column, compare};
use super::relation::{LINK_ALIAS, NEIGHBOR_ALIAS, PIPELINES_TABLE, RelationKind};
use super::shortcut::zero_count_matches;
use crate::store::query_one;

const GROUP_KEY: &str = "segment_id";

/// Checks whether any group of `filter` passes and returns the matching
/// segments as a grouping subquery, so the id set is never bound row by row.
pub async fn resolve_group<C>(conn: &C, filter: &GroupFilter) -> PipenetResult<Predicate>
where
    C: ConnectionTrait,
{
    let mut first = group_select(filter);
    first.limit(1);
    let any_group = query_one(conn, &first).await?.is_some();
    log::debug!(
        "grouped {} by {:?}: {}",
        filter.relation.name,
        filter.aggregate,
        if any_group { "some groups" } else { "no groups" }
    );
    let matched = if any_group {
        Predicate::Grouped(filter.clone())
    } else {
        Predicate::Never
    };
    // Segments without related rows never form a group.
    let includes_empty = match (filter.aggregate, &filter.comparison.value) {
        (Aggregate::Count(_), ScalarValue::Int(threshold)) => {
            zero_count_matches(filter.comparison.operation, *threshold)
        }
        _ => false,
    };
    if includes_empty {
        Ok(Predicate::or(vec![
            matched,
            Predicate::unrelated(filter.relation),
        ]))
    } else {
        Ok(matched)
    }
}

pub fn group_select(filter: &GroupFilter) -> SelectStatement {
    let relation = filter.relation;
    let mut select = Query::select();
    let (owner, key_column) = match (relation.kind, relation.target_column) {
        (RelationKind::ManyToMany { .. }, Some(target)) => {
            select.from_as(Alias::new(relation.table), Alias::new(LINK_ALIAS));
            if let Aggregate::Count(Some(_)) = filter.aggregate {
                select.join_as(
                    JoinType::InnerJoin,
                    Alias::new(PIPELINES_TABLE),
                    Alias::new(NEIGHBOR_ALIAS),
                    column(NEIGHBOR_ALIAS, "id").equals((Alias::new(LINK_ALIAS), Alias::new(target))),
                );
            }
            (LINK_ALIAS, relation.self_column)
        }
        _ => {
            select.from(Alias::new(relation.table));
            if relation.is_nullable_link() {
                select.and_where(column(relation.table, relation.self_column).is_not_null());
            }
            (relation.table, relation.self_column)
        }
    };
    let aggregate = match filter.aggregate {
        Aggregate::Count(None) => match relation.target_column {
            Some(target) => Func::count(column(owner, target)),
            None => Func::count(column(owner, key_column)),
        },
        Aggregate::Count(Some(field)) => {
            let table = match relation.kind {
                RelationKind::ManyToMany { .. } => NEIGHBOR_ALIAS,
                _ => relation.table,
            };
            Func::count(column(table, field.column))
        }
        Aggregate::Min(field) => Func::min(column(owner, field.column)),
        Aggregate::Max(field) => Func::max(column(owner, field.column)),
    };
    select
        .expr_as(column(owner, key_column), Alias::new(GROUP_KEY))
        .group_by_col((Alias::new(owner), Alias::new(key_column)))
        .and_having(compare(
            Expr::expr(aggregate),
            filter.comparison.operation,
            &filter.comparison.value,
        ))
        .to_owned()
}
