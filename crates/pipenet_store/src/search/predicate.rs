use sea_orm::DatabaseBackend;
use sea_orm::sea_query::{
    Alias, Condition, Expr, ExprTrait, JoinType, LikeExpr, Query, SelectStatement,
    Value as SeaValue,
};

use pipenet_core::{Id, Operation, ScalarValue};

use super::criterion::GroupFilter;
use super::having::group_select;
use super::relation::{LINK_ALIAS, NEIGHBOR_ALIAS, PIPELINES_TABLE, Relation, RelationKind};
use crate::store::id_value;

/// `column op value` against one table of the query.
#[derive(Clone, Debug, PartialEq)]
pub struct Comparison {
    pub column: &'static str,
    pub operation: Operation,
    pub value: ScalarValue,
}

/// Backend-neutral filter over `pipelines`, lowered to a sea-query condition
/// once every criterion has been compiled.
#[derive(Clone, Debug, PartialEq)]
pub enum Predicate {
    Always,
    Never,
    Compare(Comparison),
    /// Segments with (`present`) or without at least one related row, optionally
    /// restricted to rows matching `filter`.
    Related {
        relation: &'static Relation,
        filter: Option<Comparison>,
        present: bool,
    },
    /// Segments whose related rows form a group passing `GroupFilter`; lowered
    /// to a grouping subquery rather than a bound id list.
    Grouped(GroupFilter),
    SatelliteIs(Id),
    SatelliteIsNull,
    FacilityIs(Id),
    SatelliteWithoutFacility,
    All(Vec<Predicate>),
    Any(Vec<Predicate>),
}

impl Predicate {
    pub fn related(relation: &'static Relation, filter: Option<Comparison>) -> Self {
        Predicate::Related {
            relation,
            filter,
            present: true,
        }
    }

    pub fn unrelated(relation: &'static Relation) -> Self {
        Predicate::Related {
            relation,
            filter: None,
            present: false,
        }
    }

    /// Conjunction with `Always` parts dropped and `Never` absorbing.
    pub fn and(parts: Vec<Predicate>) -> Self {
        let mut kept = Vec::with_capacity(parts.len());
        for part in parts {
            match part {
                Predicate::Always => {}
                Predicate::Never => return Predicate::Never,
                Predicate::All(inner) => kept.extend(inner),
                other => kept.push(other),
            }
        }
        match kept.len() {
            0 => Predicate::Always,
            1 => kept.remove(0),
            _ => Predicate::All(kept),
        }
    }

    /// Disjunction with `Never` parts dropped and `Always` absorbing.
    pub fn or(parts: Vec<Predicate>) -> Self {
        let mut kept = Vec::with_capacity(parts.len());
        for part in parts {
            match part {
                Predicate::Never => {}
                Predicate::Always => return Predicate::Always,
                Predicate::Any(inner) => kept.extend(inner),
                other => kept.push(other),
            }
        }
        match kept.len() {
            0 => Predicate::Never,
            1 => kept.remove(0),
            _ => Predicate::Any(kept),
        }
    }

    pub fn is_always(&self) -> bool {
        matches!(self, Predicate::Always)
    }

    pub fn is_never(&self) -> bool {
        matches!(self, Predicate::Never)
    }

    /// Short label for debug logging.
    pub fn shape(&self) -> String {
        match self {
            Predicate::Always => "always".to_string(),
            Predicate::Never => "never".to_string(),
            Predicate::Compare(cmp) => format!("{}:{:?}", cmp.column, cmp.operation),
            Predicate::Related {
                relation, present, ..
            } => {
                let quantifier = if *present { "some" } else { "none" };
                format!("{}:{quantifier}", relation.name)
            }
            Predicate::Grouped(group) => format!("group:{}", group.relation.name),
            Predicate::SatelliteIs(_) => "satellite".to_string(),
            Predicate::SatelliteIsNull => "no_satellite".to_string(),
            Predicate::FacilityIs(_) => "facility".to_string(),
            Predicate::SatelliteWithoutFacility => "no_facility".to_string(),
            Predicate::All(parts) => format!(
                "and({})",
                parts.iter().map(Predicate::shape).collect::<Vec<_>>().join(",")
            ),
            Predicate::Any(parts) => format!(
                "or({})",
                parts.iter().map(Predicate::shape).collect::<Vec<_>>().join(",")
            ),
        }
    }

    pub fn condition(&self, backend: DatabaseBackend) -> Condition {
        let segment_id = || column(PIPELINES_TABLE, "id");
        let satellite_id = || column(PIPELINES_TABLE, "satellite_id");
        let leaf = match self {
            Predicate::All(parts) => {
                return parts
                    .iter()
                    .fold(Condition::all(), |cond, part| cond.add(part.condition(backend)));
            }
            Predicate::Any(parts) => {
                return parts
                    .iter()
                    .fold(Condition::any(), |cond, part| cond.add(part.condition(backend)));
            }
            Predicate::Always => Expr::val(1).eq(1),
            Predicate::Never => Expr::val(1).eq(0),
            Predicate::Compare(cmp) => cmp.expr(PIPELINES_TABLE),
            Predicate::Related {
                relation,
                filter,
                present,
            } => {
                let related = related_ids(relation, filter.as_ref());
                if *present {
                    segment_id().in_subquery(related)
                } else {
                    segment_id().not_in_subquery(related)
                }
            }
            Predicate::Grouped(group) => segment_id().in_subquery(group_select(group)),
            Predicate::SatelliteIs(id) => satellite_id().eq(id_value(backend, *id)),
            Predicate::SatelliteIsNull => satellite_id().is_null(),
            Predicate::FacilityIs(id) => satellite_id().in_subquery(satellites_where(
                column("satellites", "facility_id").eq(id_value(backend, *id)),
            )),
            Predicate::SatelliteWithoutFacility => satellite_id()
                .in_subquery(satellites_where(column("satellites", "facility_id").is_null())),
        };
        Condition::all().add(leaf)
    }
}

impl Comparison {
    pub fn expr(&self, table: &str) -> Expr {
        compare(column(table, self.column), self.operation, &self.value)
    }
}

/// Applies `operation` between `target` (a column or an aggregate) and `value`.
pub(crate) fn compare(target: Expr, operation: Operation, value: &ScalarValue) -> Expr {
    let literal = sea_value(value);
    match operation {
        Operation::Equals => target.eq(literal),
        Operation::Not => target.ne(literal),
        Operation::Lt => target.lt(literal),
        Operation::Lte => target.lte(literal),
        Operation::Gt => target.gt(literal),
        Operation::Gte => target.gte(literal),
        Operation::Contains => target.like(like_pattern(value, "%", "%")),
        Operation::StartsWith => target.like(like_pattern(value, "", "%")),
        Operation::EndsWith => target.like(like_pattern(value, "%", "")),
    }
}

pub(crate) fn column(table: &str, name: &str) -> Expr {
    Expr::col((Alias::new(table), Alias::new(name)))
}

pub(crate) fn sea_value(value: &ScalarValue) -> SeaValue {
    match value {
        ScalarValue::Int(value) => SeaValue::from(*value),
        ScalarValue::Float(value) => SeaValue::from(*value),
        ScalarValue::DateTime(value) => SeaValue::from(value.as_i64()),
        ScalarValue::Boolean(value) => SeaValue::from(*value),
        ScalarValue::String(value) => SeaValue::from(value.clone()),
    }
}

fn like_pattern(value: &ScalarValue, prefix: &str, suffix: &str) -> LikeExpr {
    let raw = match value {
        ScalarValue::String(text) => text.clone(),
        other => format!("{other:?}"),
    };
    let escaped = raw
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    LikeExpr::new(format!("{prefix}{escaped}{suffix}")).escape('\\')
}

fn satellites_where(filter: Expr) -> SelectStatement {
    Query::select()
        .from(Alias::new("satellites"))
        .column((Alias::new("satellites"), Alias::new("id")))
        .and_where(filter)
        .to_owned()
}

/// Ids of segments having at least one row of `relation` (matching `filter`).
fn related_ids(relation: &Relation, filter: Option<&Comparison>) -> SelectStatement {
    match (relation.kind, relation.target_column) {
        (RelationKind::ManyToMany { .. }, Some(target)) => {
            let mut select = Query::select()
                .from_as(Alias::new(relation.table), Alias::new(LINK_ALIAS))
                .column((Alias::new(LINK_ALIAS), Alias::new(relation.self_column)))
                .to_owned();
            if let Some(filter) = filter {
                select
                    .join_as(
                        JoinType::InnerJoin,
                        Alias::new(PIPELINES_TABLE),
                        Alias::new(NEIGHBOR_ALIAS),
                        column(NEIGHBOR_ALIAS, "id").equals((
                            Alias::new(LINK_ALIAS),
                            Alias::new(target),
                        )),
                    )
                    .and_where(filter.expr(NEIGHBOR_ALIAS));
            }
            select
        }
        _ => {
            let mut select = Query::select()
                .from(Alias::new(relation.table))
                .column((Alias::new(relation.table), Alias::new(relation.self_column)))
                .to_owned();
            if relation.is_nullable_link() {
                select.and_where(column(relation.table, relation.self_column).is_not_null());
            }
            if let Some(filter) = filter {
                select.and_where(filter.expr(relation.table));
            }
            select
        }
    }
}
