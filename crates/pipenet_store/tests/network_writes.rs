use pipenet_store::{
    Actor, ChemicalInput, CreateSatelliteInput, CreateSegmentInput, FlowSourceInput, Having, Id,
    LicenseChangeInput, NavigationApi, NavigationRequest, NetworkReadApi, NetworkWriteApi,
    Operation, Page, PipelineBatchInput, PipelineStore, PipenetConfig, PipenetError,
    PipenetResult, QueryContext, RiskInput, Role, SearchCriterion, Timestamp,
};
use tempfile::{TempDir, tempdir};

async fn open() -> PipenetResult<(TempDir, PipelineStore)> {
    let dir = tempdir().expect("tempdir");
    let base = dir.path();
    let config = PipenetConfig::default_sqlite(base.join("pipenet.sqlite").to_string_lossy());
    let store = PipelineStore::connect(&config, base).await?;
    Ok((dir, store))
}

fn engineer() -> Actor {
    Actor::new("engineer", Role::Engineer)
}

fn license_change(segment_id: Id, status: &str, date: &str) -> PipenetResult<LicenseChangeInput> {
    Ok(LicenseChangeInput {
        segment_id,
        status: status.to_string(),
        substance: "Natural Gas".to_string(),
        date: Timestamp::parse(date)?,
        comment: None,
    })
}

#[tokio::test]
async fn operators_and_guests_cannot_edit() -> PipenetResult<()> {
    let (_dir, store) = open().await?;
    for role in [Role::Operator, Role::Guest] {
        let actor = Actor::new("viewer", role);
        let err = store
            .create_segment(&actor, CreateSegmentInput::minimal("AB-1", "1"))
            .await
            .expect_err("not an editor");
        assert!(matches!(err, PipenetError::Unauthorized { .. }));
        let err = store
            .create_facility(&actor, "Plant")
            .await
            .expect_err("not an editor");
        assert!(matches!(err, PipenetError::Unauthorized { .. }));
    }
    Ok(())
}

#[tokio::test]
async fn created_segment_reads_back() -> PipenetResult<()> {
    let (_dir, store) = open().await?;
    let actor = engineer();
    let facility = store.create_facility(&actor, "Plant").await?;
    let satellite = store
        .create_satellite(
            &actor,
            CreateSatelliteInput {
                name: "East".to_string(),
                facility_id: Some(facility),
            },
        )
        .await?;
    let id = store
        .create_segment(
            &actor,
            CreateSegmentInput {
                satellite_id: Some(satellite),
                from: "04-11-055-06W5".to_string(),
                to: "12-14-055-06W5".to_string(),
                length: 1.25,
                material: Some("Steel".to_string()),
                mop: Some(9_930),
                piggable: Some(true),
                ..CreateSegmentInput::minimal("AB-12345", "7")
            },
        )
        .await?;
    let segment = store.get_segment(id).await?.expect("segment");
    assert_eq!(segment.satellite_id, Some(satellite));
    assert_eq!(segment.display_name(), "AB-12345-7");
    assert_eq!(segment.from, "04-11-055-06W5");
    assert_eq!(segment.length, 1.25);
    assert_eq!(segment.mop, Some(9_930));
    assert_eq!(segment.piggable, Some(true));
    assert_eq!(segment.created_by_id, actor.id);
    assert!(store.get_segment(Id::new()).await?.is_none());
    Ok(())
}

#[tokio::test]
async fn duplicate_license_segment_conflicts() -> PipenetResult<()> {
    let (_dir, store) = open().await?;
    let actor = engineer();
    store
        .create_segment(&actor, CreateSegmentInput::minimal("AB-1", "1"))
        .await?;
    let err = store
        .create_segment(&actor, CreateSegmentInput::minimal("AB-1", "1"))
        .await
        .expect_err("duplicate");
    assert!(matches!(err, PipenetError::Conflict { .. }));
    store
        .create_segment(&actor, CreateSegmentInput::minimal("AB-1", "2"))
        .await?;
    Ok(())
}

#[tokio::test]
async fn blank_names_and_missing_satellites_are_rejected() -> PipenetResult<()> {
    let (_dir, store) = open().await?;
    let actor = engineer();
    let err = store
        .create_segment(&actor, CreateSegmentInput::minimal(" ", "1"))
        .await
        .expect_err("blank license");
    assert!(matches!(err, PipenetError::Validation { .. }));
    let err = store
        .create_segment(
            &actor,
            CreateSegmentInput {
                satellite_id: Some(Id::new()),
                ..CreateSegmentInput::minimal("AB-1", "1")
            },
        )
        .await
        .expect_err("missing satellite");
    assert!(matches!(err, PipenetError::NotFound { .. }));
    Ok(())
}

#[tokio::test]
async fn links_reject_self_duplicates_and_missing_ends() -> PipenetResult<()> {
    let (_dir, store) = open().await?;
    let actor = engineer();
    let a = store
        .create_segment(&actor, CreateSegmentInput::minimal("AB-1", "1"))
        .await?;
    let b = store
        .create_segment(&actor, CreateSegmentInput::minimal("AB-1", "2"))
        .await?;

    let err = store.link_segments(&actor, a, a).await.expect_err("self");
    assert!(matches!(err, PipenetError::Validation { .. }));

    store.link_segments(&actor, a, b).await?;
    let err = store.link_segments(&actor, a, b).await.expect_err("twice");
    assert!(matches!(err, PipenetError::Conflict { .. }));
    // The reverse direction is a different edge.
    store.link_segments(&actor, b, a).await?;

    let err = store
        .link_segments(&actor, a, Id::new())
        .await
        .expect_err("missing");
    assert!(matches!(err, PipenetError::NotFound { .. }));
    Ok(())
}

#[tokio::test]
async fn neighbors_follow_link_direction() -> PipenetResult<()> {
    let (_dir, store) = open().await?;
    let actor = engineer();
    let well_tie = store
        .create_segment(&actor, CreateSegmentInput::minimal("AB-1", "1"))
        .await?;
    let lateral = store
        .create_segment(&actor, CreateSegmentInput::minimal("AB-1", "2"))
        .await?;
    let trunk = store
        .create_segment(&actor, CreateSegmentInput::minimal("AB-9", "1"))
        .await?;
    store.link_segments(&actor, lateral, trunk).await?;
    store.link_segments(&actor, well_tie, trunk).await?;

    let upstream: Vec<Id> = store
        .upstream_neighbors(trunk)
        .await?
        .into_iter()
        .map(|segment| segment.id)
        .collect();
    assert_eq!(upstream, vec![well_tie, lateral]);
    let downstream: Vec<Id> = store
        .downstream_neighbors(lateral)
        .await?
        .into_iter()
        .map(|segment| segment.id)
        .collect();
    assert_eq!(downstream, vec![trunk]);
    assert!(store.downstream_neighbors(trunk).await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn license_summary_reports_latest_and_first() -> PipenetResult<()> {
    let (_dir, store) = open().await?;
    let actor = engineer();
    let id = store
        .create_segment(&actor, CreateSegmentInput::minimal("AB-1", "1"))
        .await?;
    assert_eq!(
        store.license_summary(id).await?,
        pipenet_store::LicenseSummary::default()
    );

    store
        .add_license_change(&actor, license_change(id, "Discontinued", "2022-08-01")?)
        .await?;
    store
        .add_license_change(&actor, license_change(id, "Operating", "2019-03-15")?)
        .await?;
    let summary = store.license_summary(id).await?;
    assert_eq!(summary.current_status.as_deref(), Some("Discontinued"));
    assert_eq!(summary.current_substance.as_deref(), Some("Natural Gas"));
    assert_eq!(
        summary.first_license_date,
        Some(Timestamp::parse("2019-03-15")?)
    );
    Ok(())
}

#[tokio::test]
async fn child_records_need_an_existing_segment() -> PipenetResult<()> {
    let (_dir, store) = open().await?;
    let actor = engineer();
    let err = store
        .add_license_change(&actor, license_change(Id::new(), "Operating", "2020-01-01")?)
        .await
        .expect_err("missing segment");
    assert!(matches!(err, PipenetError::NotFound { .. }));
    let err = store
        .add_pipeline_batch(
            &actor,
            PipelineBatchInput {
                segment_id: Id::new(),
                date: Timestamp::parse("2020-01-01")?,
                product: "Corrosion inhibitor".to_string(),
                cost: Some(120.0),
                chemical_volume: None,
                diluent_volume: None,
                comment: None,
            },
        )
        .await
        .expect_err("missing segment");
    assert!(matches!(err, PipenetError::NotFound { .. }));
    let err = store
        .add_well(
            &actor,
            FlowSourceInput {
                segment_id: Some(Id::new()),
                name: "W".to_string(),
                ..FlowSourceInput::default()
            },
        )
        .await
        .expect_err("missing segment");
    assert!(matches!(err, PipenetError::NotFound { .. }));
    Ok(())
}

#[tokio::test]
async fn risk_and_chemical_are_replaced_not_duplicated() -> PipenetResult<()> {
    let (_dir, store) = open().await?;
    let actor = engineer();
    let id = store
        .create_segment(&actor, CreateSegmentInput::minimal("AB-1", "1"))
        .await?;
    for cost in [10.0, 250.0] {
        store
            .set_risk(
                &actor,
                RiskInput {
                    segment_id: id,
                    oil_release_cost: Some(cost),
                    ..RiskInput::default()
                },
            )
            .await?;
    }
    for h2s in [Some(true), Some(false)] {
        store
            .set_chemical(
                &actor,
                ChemicalInput {
                    segment_id: id,
                    h2s,
                    ..ChemicalInput::default()
                },
            )
            .await?;
    }

    let search = |field: &str, value: &str, declared: &str, table: &str| {
        NavigationRequest::search(
            vec![SearchCriterion::new(
                table,
                field,
                Having::Any,
                Operation::Equals,
                value,
                declared,
            )],
            Page::new(0, 10),
        )
    };
    let ctx = QueryContext::new();
    let page = store
        .resolve_navigation(&ctx, search("oilReleaseCost", "250", "Float", "risk"))
        .await?;
    assert_eq!(page.total_count, 1);
    let page = store
        .resolve_navigation(&ctx, search("oilReleaseCost", "10", "Float", "risk"))
        .await?;
    assert_eq!(page.total_count, 0);
    let page = store
        .resolve_navigation(&ctx, search("h2s", "false", "Boolean", "chemical"))
        .await?;
    assert_eq!(page.total_count, 1);
    Ok(())
}

#[tokio::test]
async fn risk_for_missing_segment_is_not_found() -> PipenetResult<()> {
    let (_dir, store) = open().await?;
    let err = store
        .set_risk(
            &engineer(),
            RiskInput {
                segment_id: Id::new(),
                ..RiskInput::default()
            },
        )
        .await
        .expect_err("missing segment");
    assert!(matches!(err, PipenetError::NotFound { .. }));
    Ok(())
}
