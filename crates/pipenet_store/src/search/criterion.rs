use pipenet_core::{
    Having, PipenetError, PipenetResult, ScalarKind, ScalarValue, SearchCriterion,
};

use super::predicate::{Comparison, Predicate};
use super::relation::{Field, Relation, RelationKind, classify};
use super::shortcut::{CountShortcut, count_shortcut};

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Aggregate {
    /// `None` counts every related row; `Some` counts rows where the field is set.
    Count(Option<&'static Field>),
    Min(&'static Field),
    Max(&'static Field),
}

/// A criterion that needs the related table grouped per segment before it
/// can be expressed as a set of segment ids.
#[derive(Clone, Debug, PartialEq)]
pub struct GroupFilter {
    pub relation: &'static Relation,
    pub aggregate: Aggregate,
    pub comparison: Comparison,
}

#[derive(Clone, Debug, PartialEq)]
pub enum CriterionPlan {
    Ready(Predicate),
    Grouped(GroupFilter),
}

/// Classifies and type-checks one criterion without touching the store.
pub fn plan_criterion(criterion: &SearchCriterion) -> PipenetResult<CriterionPlan> {
    let relation = classify(&criterion.table)?;
    match relation.kind {
        RelationKind::SelfRelation => Ok(CriterionPlan::Ready(Predicate::Compare(
            field_comparison(relation, criterion)?,
        ))),
        RelationKind::OneToOne => Ok(CriterionPlan::Ready(Predicate::related(
            relation,
            Some(field_comparison(relation, criterion)?),
        ))),
        RelationKind::OneToMany | RelationKind::ManyToMany { .. } => match criterion.having {
            Having::Any => Ok(CriterionPlan::Ready(Predicate::related(
                relation,
                Some(field_comparison(relation, criterion)?),
            ))),
            Having::Count => plan_count(relation, criterion),
            Having::Min | Having::Max => plan_extreme(relation, criterion),
            Having::Direct => Err(PipenetError::unsupported_quantifier(format!(
                "'{}' holds many records; use _any, _count, _min or _max",
                relation.name
            ))),
        },
    }
}

fn plan_count(
    relation: &'static Relation,
    criterion: &SearchCriterion,
) -> PipenetResult<CriterionPlan> {
    if criterion.operation.is_text_only() {
        return Err(PipenetError::invalid_value(format!(
            "{:?} cannot compare a record count",
            criterion.operation
        )));
    }
    let threshold = criterion.value.trim().parse::<i64>().map_err(|err| {
        PipenetError::invalid_value(format!("count '{}' is not an Int: {err}", criterion.value))
    })?;
    let counted = match criterion.field.as_str() {
        "" | "id" => None,
        name => Some(relation.field(name)?),
    };
    if counted.is_none() {
        if let Some(shortcut) = count_shortcut(criterion.operation, threshold) {
            let predicate = match shortcut {
                CountShortcut::NoneRelated => Predicate::unrelated(relation),
                CountShortcut::AnyRelated => Predicate::related(relation, None),
                CountShortcut::Always => Predicate::Always,
                CountShortcut::Never => Predicate::Never,
            };
            return Ok(CriterionPlan::Ready(predicate));
        }
    }
    Ok(CriterionPlan::Grouped(GroupFilter {
        relation,
        aggregate: Aggregate::Count(counted),
        comparison: Comparison {
            column: counted.map(|field| field.column).unwrap_or("id"),
            operation: criterion.operation,
            value: ScalarValue::Int(threshold),
        },
    }))
}

fn plan_extreme(
    relation: &'static Relation,
    criterion: &SearchCriterion,
) -> PipenetResult<CriterionPlan> {
    if let RelationKind::ManyToMany { .. } = relation.kind {
        return Err(PipenetError::unsupported_quantifier(format!(
            "{} is not supported on '{}'",
            criterion.having.as_str(),
            relation.name
        )));
    }
    let field = relation.field(&criterion.field)?;
    if field.kind == ScalarKind::Boolean {
        return Err(PipenetError::unsupported_quantifier(format!(
            "{} needs an ordered field, '{}' is Boolean",
            criterion.having.as_str(),
            field.name
        )));
    }
    let comparison = field_comparison(relation, criterion)?;
    let aggregate = match criterion.having {
        Having::Min => Aggregate::Min(field),
        _ => Aggregate::Max(field),
    };
    Ok(CriterionPlan::Grouped(GroupFilter {
        relation,
        aggregate,
        comparison,
    }))
}

fn field_comparison(
    relation: &'static Relation,
    criterion: &SearchCriterion,
) -> PipenetResult<Comparison> {
    let field = relation.field(&criterion.field)?;
    let declared = ScalarKind::from_declared(&criterion.declared_type);
    let compatible =
        declared == field.kind || (declared == ScalarKind::Int && field.kind == ScalarKind::Float);
    if !compatible {
        return Err(PipenetError::invalid_value(format!(
            "'{}.{}' is {:?}, not {}",
            relation.name, field.name, field.kind, criterion.declared_type
        )));
    }
    if criterion.operation.is_text_only() && field.kind != ScalarKind::String {
        return Err(PipenetError::invalid_value(format!(
            "{:?} only applies to text fields, '{}' is {:?}",
            criterion.operation, field.name, field.kind
        )));
    }
    let value = ScalarValue::cast(&criterion.value, declared)?.coerce_to(field.kind)?;
    Ok(Comparison {
        column: field.column,
        operation: criterion.operation,
        value,
    })
}

#[cfg(test)]
mod tests {
    use pipenet_core::Operation;

    use super::*;

    fn ready(plan: CriterionPlan) -> Predicate {
        match plan {
            CriterionPlan::Ready(predicate) => predicate,
            CriterionPlan::Grouped(group) => panic!("expected ready predicate, got {group:?}"),
        }
    }

    #[test]
    fn self_relation_compares_directly() {
        let criterion = SearchCriterion::new(
            "pipeline",
            "length",
            Having::Direct,
            Operation::Gt,
            "12",
            "Int",
        );
        let predicate = ready(plan_criterion(&criterion).expect("plan"));
        assert_eq!(
            predicate,
            Predicate::Compare(Comparison {
                column: "length",
                operation: Operation::Gt,
                value: ScalarValue::Float(12.0),
            })
        );
    }

    #[test]
    fn one_to_one_ignores_quantifier() {
        let criterion = SearchCriterion::new(
            "risk",
            "safeguardPigging",
            Having::Count,
            Operation::Equals,
            "true",
            "Boolean",
        );
        let predicate = ready(plan_criterion(&criterion).expect("plan"));
        assert!(matches!(predicate, Predicate::Related { present: true, .. }));
    }

    #[test]
    fn count_boundaries_use_shortcuts() {
        let none = ready(
            plan_criterion(&SearchCriterion::count("wells", Operation::Lte, 0)).expect("lte"),
        );
        assert!(matches!(none, Predicate::Related { present: false, .. }));
        let any = ready(
            plan_criterion(&SearchCriterion::count("upstream", Operation::Gte, 1)).expect("gte"),
        );
        assert!(matches!(any, Predicate::Related { present: true, filter: None, .. }));
        let never =
            ready(plan_criterion(&SearchCriterion::count("wells", Operation::Lt, 0)).expect("lt"));
        assert_eq!(never, Predicate::Never);
        let always =
            ready(plan_criterion(&SearchCriterion::count("wells", Operation::Gte, 0)).expect("gte"));
        assert_eq!(always, Predicate::Always);
    }

    #[test]
    fn other_counts_group() {
        let plan = plan_criterion(&SearchCriterion::count("pigRuns", Operation::Lt, 3)).expect("plan");
        match plan {
            CriterionPlan::Grouped(group) => {
                assert_eq!(group.aggregate, Aggregate::Count(None));
                assert_eq!(group.comparison.value, ScalarValue::Int(3));
            }
            other => panic!("expected grouping, got {other:?}"),
        }
    }

    #[test]
    fn conditioned_counts_never_shortcut() {
        let criterion = SearchCriterion::new(
            "wells",
            "firstInjection",
            Having::Count,
            Operation::Gt,
            "0",
            "Int",
        );
        assert!(matches!(
            plan_criterion(&criterion).expect("plan"),
            CriterionPlan::Grouped(_)
        ));
    }

    #[test]
    fn extremes_on_edges_are_unsupported() {
        let criterion = SearchCriterion::new(
            "downstream",
            "length",
            Having::Max,
            Operation::Gt,
            "5",
            "Float",
        );
        assert!(matches!(
            plan_criterion(&criterion),
            Err(PipenetError::UnsupportedQuantifier { .. })
        ));
    }

    #[test]
    fn many_records_need_a_quantifier() {
        let criterion = SearchCriterion::new(
            "wells",
            "oil",
            Having::Direct,
            Operation::Gt,
            "5",
            "Float",
        );
        assert!(matches!(
            plan_criterion(&criterion),
            Err(PipenetError::UnsupportedQuantifier { .. })
        ));
    }

    #[test]
    fn declared_type_must_fit_column() {
        let criterion = SearchCriterion::new(
            "wells",
            "oil",
            Having::Any,
            Operation::Gt,
            "2023-01-01",
            "DateTime",
        );
        assert!(matches!(
            plan_criterion(&criterion),
            Err(PipenetError::InvalidValue { .. })
        ));
        let criterion = SearchCriterion::new(
            "wells",
            "oil",
            Having::Any,
            Operation::Contains,
            "5",
            "Float",
        );
        assert!(matches!(
            plan_criterion(&criterion),
            Err(PipenetError::InvalidValue { .. })
        ));
    }

    #[test]
    fn enum_names_search_as_text() {
        let criterion = SearchCriterion::new(
            "licenseChanges",
            "status",
            Having::Any,
            Operation::Equals,
            "Operating",
            "StatusEnum",
        );
        let predicate = ready(plan_criterion(&criterion).expect("plan"));
        assert!(matches!(predicate, Predicate::Related { present: true, filter: Some(_), .. }));
    }
}
