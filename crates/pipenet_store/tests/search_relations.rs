use std::collections::BTreeSet;

use pipenet_store::{
    Actor, CreateSegmentInput, Having, Id, LicenseChangeInput, NavigationApi, NavigationRequest,
    NetworkWriteApi, Operation, Page, PipelineStore, PipenetConfig, PipenetError, PipenetResult,
    PressureTestInput, QueryContext, RiskInput, Role, SearchCriterion, Timestamp,
};
use tempfile::{TempDir, tempdir};

struct Network {
    _dir: TempDir,
    store: PipelineStore,
    a: Id,
    b: Id,
    c: Id,
    d: Id,
}

// a feeds b and c; d stands alone.
async fn network() -> PipenetResult<Network> {
    let dir = tempdir().expect("tempdir");
    let base = dir.path();
    let config = PipenetConfig::default_sqlite(base.join("pipenet.sqlite").to_string_lossy());
    let store = PipelineStore::connect(&config, base).await?;
    let actor = Actor::new("engineer", Role::Engineer);

    let a = store
        .create_segment(
            &actor,
            CreateSegmentInput {
                material: Some("50% steel".to_string()),
                length: 12.5,
                ..CreateSegmentInput::minimal("L-A", "1")
            },
        )
        .await?;
    let b = store
        .create_segment(
            &actor,
            CreateSegmentInput {
                material: Some("500 steel".to_string()),
                length: 4.0,
                ..CreateSegmentInput::minimal("L-B", "1")
            },
        )
        .await?;
    let c = store
        .create_segment(&actor, CreateSegmentInput::minimal("L-C", "1"))
        .await?;
    let d = store
        .create_segment(&actor, CreateSegmentInput::minimal("L-D", "1"))
        .await?;
    store.link_segments(&actor, a, b).await?;
    store.link_segments(&actor, a, c).await?;

    store
        .set_risk(
            &actor,
            RiskInput {
                segment_id: b,
                safeguard_pigging: Some(true),
                ..RiskInput::default()
            },
        )
        .await?;
    store
        .set_risk(
            &actor,
            RiskInput {
                segment_id: c,
                safeguard_pigging: Some(false),
                ..RiskInput::default()
            },
        )
        .await?;
    for (pressure, date) in [(80.0, "2021-05-01"), (120.0, "2022-05-01")] {
        store
            .add_pressure_test(
                &actor,
                PressureTestInput {
                    segment_id: a,
                    pressure_test_date: Timestamp::parse(date)?,
                    required_wall_thickness: None,
                    mop_test_pressure: Some(pressure),
                    comment: None,
                },
            )
            .await?;
    }
    store
        .add_pressure_test(
            &actor,
            PressureTestInput {
                segment_id: d,
                pressure_test_date: Timestamp::parse("2022-06-01")?,
                required_wall_thickness: None,
                mop_test_pressure: Some(90.0),
                comment: None,
            },
        )
        .await?;
    store
        .add_license_change(
            &actor,
            LicenseChangeInput {
                segment_id: c,
                status: "Operating".to_string(),
                substance: "Oil Well Effluent".to_string(),
                date: Timestamp::parse("2023-03-01")?,
                comment: None,
            },
        )
        .await?;

    Ok(Network {
        _dir: dir,
        store,
        a,
        b,
        c,
        d,
    })
}

async fn search_ids(
    store: &PipelineStore,
    criteria: Vec<SearchCriterion>,
) -> PipenetResult<BTreeSet<Id>> {
    let page = store
        .resolve_navigation(
            &QueryContext::new(),
            NavigationRequest::search(criteria, Page::new(0, 100)),
        )
        .await?;
    Ok(page.items.into_iter().map(|segment| segment.id).collect())
}

fn set(ids: &[Id]) -> BTreeSet<Id> {
    ids.iter().copied().collect()
}

fn criterion(
    table: &str,
    field: &str,
    having: Having,
    operation: Operation,
    value: &str,
    declared_type: &str,
) -> Vec<SearchCriterion> {
    vec![SearchCriterion::new(
        table,
        field,
        having,
        operation,
        value,
        declared_type,
    )]
}

#[tokio::test]
async fn downstream_any_matches_segments_feeding_the_target() -> PipenetResult<()> {
    let net = network().await?;
    let found = search_ids(
        &net.store,
        criterion("downstream", "license", Having::Any, Operation::Equals, "L-B", "String"),
    )
    .await?;
    assert_eq!(found, set(&[net.a]));
    let found = search_ids(
        &net.store,
        criterion("upstream", "license", Having::Any, Operation::Equals, "L-A", "String"),
    )
    .await?;
    assert_eq!(found, set(&[net.b, net.c]));
    Ok(())
}

#[tokio::test]
async fn many_to_many_counts_include_unlinked_segments() -> PipenetResult<()> {
    let net = network().await?;
    assert_eq!(
        search_ids(
            &net.store,
            vec![SearchCriterion::count("downstream", Operation::Equals, 2)]
        )
        .await?,
        set(&[net.a])
    );
    assert_eq!(
        search_ids(
            &net.store,
            vec![SearchCriterion::count("downstream", Operation::Lte, 0)]
        )
        .await?,
        set(&[net.b, net.c, net.d])
    );
    assert_eq!(
        search_ids(
            &net.store,
            vec![SearchCriterion::count("upstream", Operation::Gte, 1)]
        )
        .await?,
        set(&[net.b, net.c])
    );
    Ok(())
}

#[tokio::test]
async fn many_to_many_field_counts_only_neighbors_with_the_field() -> PipenetResult<()> {
    let net = network().await?;
    // a feeds b (material set) and c (no material).
    assert_eq!(
        search_ids(
            &net.store,
            criterion("downstream", "material", Having::Count, Operation::Equals, "1", "Int"),
        )
        .await?,
        set(&[net.a])
    );
    assert_eq!(
        search_ids(
            &net.store,
            criterion("downstream", "material", Having::Count, Operation::Lt, "1", "Int"),
        )
        .await?,
        set(&[net.b, net.c, net.d])
    );
    Ok(())
}

#[tokio::test]
async fn many_to_many_any_record_shortcut_matches_grouped_count() -> PipenetResult<()> {
    let net = network().await?;
    let shortcut = search_ids(
        &net.store,
        vec![SearchCriterion::count("upstream", Operation::Gt, 0)],
    )
    .await?;
    // Every segment has a length, so this counts every upstream neighbor.
    let grouped = search_ids(
        &net.store,
        criterion("upstream", "length", Having::Count, Operation::Gt, "0", "Int"),
    )
    .await?;
    assert_eq!(shortcut, set(&[net.b, net.c]));
    assert_eq!(shortcut, grouped);
    Ok(())
}

#[tokio::test]
async fn extremes_over_many_to_many_are_rejected() -> PipenetResult<()> {
    let net = network().await?;
    let err = search_ids(
        &net.store,
        criterion("downstream", "length", Having::Max, Operation::Gt, "1", "Float"),
    )
    .await
    .expect_err("max over downstream");
    assert!(matches!(err, PipenetError::UnsupportedQuantifier { .. }));
    Ok(())
}

#[tokio::test]
async fn one_to_one_fields_filter_directly() -> PipenetResult<()> {
    let net = network().await?;
    let found = search_ids(
        &net.store,
        criterion("risk", "safeguardPigging", Having::Any, Operation::Equals, "true", "Boolean"),
    )
    .await?;
    assert_eq!(found, set(&[net.b]));
    Ok(())
}

#[tokio::test]
async fn max_compares_the_largest_related_value() -> PipenetResult<()> {
    let net = network().await?;
    let found = search_ids(
        &net.store,
        criterion("pressureTests", "mopTestPressure", Having::Max, Operation::Gte, "100", "Float"),
    )
    .await?;
    assert_eq!(found, set(&[net.a]));
    let found = search_ids(
        &net.store,
        criterion("pressureTests", "mopTestPressure", Having::Min, Operation::Lt, "85", "Float"),
    )
    .await?;
    assert_eq!(found, set(&[net.a]));
    Ok(())
}

#[tokio::test]
async fn text_patterns_treat_wildcards_literally() -> PipenetResult<()> {
    let net = network().await?;
    let found = search_ids(
        &net.store,
        criterion("pipeline", "material", Having::Direct, Operation::Contains, "50%", "String"),
    )
    .await?;
    assert_eq!(found, set(&[net.a]));
    let found = search_ids(
        &net.store,
        criterion("pipeline", "material", Having::Direct, Operation::EndsWith, "steel", "String"),
    )
    .await?;
    assert_eq!(found, set(&[net.a, net.b]));
    Ok(())
}

#[tokio::test]
async fn ints_compare_against_float_columns() -> PipenetResult<()> {
    let net = network().await?;
    let found = search_ids(
        &net.store,
        criterion("pipeline", "length", Having::Direct, Operation::Gt, "10", "Int"),
    )
    .await?;
    assert_eq!(found, set(&[net.a]));
    Ok(())
}

#[tokio::test]
async fn dates_compare_chronologically() -> PipenetResult<()> {
    let net = network().await?;
    let found = search_ids(
        &net.store,
        criterion("licenseChanges", "date", Having::Any, Operation::Gte, "2023-01-01", "DateTime"),
    )
    .await?;
    assert_eq!(found, set(&[net.c]));
    let found = search_ids(
        &net.store,
        criterion("licenseChanges", "date", Having::Any, Operation::Lt, "2023-01-01", "DateTime"),
    )
    .await?;
    assert!(found.is_empty());
    Ok(())
}

#[tokio::test]
async fn unknown_names_fail_the_whole_search() -> PipenetResult<()> {
    let net = network().await?;
    let err = search_ids(
        &net.store,
        criterion("compressors", "id", Having::Count, Operation::Gt, "0", "Int"),
    )
    .await
    .expect_err("unknown relation");
    assert!(matches!(err, PipenetError::UnknownRelation { .. }));

    let mut criteria = criterion("pipeline", "license", Having::Direct, Operation::Equals, "L-A", "String");
    criteria.push(SearchCriterion::new(
        "wells",
        "password",
        Having::Any,
        Operation::Equals,
        "x",
        "String",
    ));
    let err = search_ids(&net.store, criteria)
        .await
        .expect_err("unknown field");
    assert!(matches!(err, PipenetError::UnknownField { .. }));
    Ok(())
}

#[tokio::test]
async fn malformed_values_are_rejected() -> PipenetResult<()> {
    let net = network().await?;
    let err = search_ids(
        &net.store,
        criterion("pipeline", "length", Having::Direct, Operation::Gt, "long", "Float"),
    )
    .await
    .expect_err("bad float");
    assert!(matches!(err, PipenetError::InvalidValue { .. }));
    Ok(())
}

#[tokio::test]
async fn empty_criteria_match_every_segment() -> PipenetResult<()> {
    let net = network().await?;
    assert_eq!(
        search_ids(&net.store, Vec::new()).await?,
        set(&[net.a, net.b, net.c, net.d])
    );
    Ok(())
}
