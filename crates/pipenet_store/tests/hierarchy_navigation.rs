use pipenet_store::{
    Actor, CreateSatelliteInput, CreateSegmentInput, Having, Id, NO_FACILITY, NO_SATELLITE,
    NavigationApi, NavigationPage, NavigationRequest, NetworkWriteApi, Operation, Page,
    PipelineStore, PipenetConfig, PipenetError, PipenetResult, QueryConfig, QueryContext, Role,
    SearchCriterion,
};
use tempfile::{TempDir, tempdir};

struct Hierarchy {
    _dir: TempDir,
    store: PipelineStore,
    facility: Id,
    satellite: Id,
    orphan_satellite: Id,
    /// Sorted by license then segment.
    segments: Vec<Id>,
}

// facility <- satellite <- {AA-1/1, AA-1/2}; orphan_satellite (no facility) <- {BB-2/1};
// ZZ-9/1 has no satellite.
async fn hierarchy(query: Option<QueryConfig>) -> PipenetResult<Hierarchy> {
    let dir = tempdir().expect("tempdir");
    let base = dir.path();
    let mut config = PipenetConfig::default_sqlite(base.join("pipenet.sqlite").to_string_lossy());
    if query.is_some() {
        config.query = query;
    }
    let store = PipelineStore::connect(&config, base).await?;
    let actor = Actor::new("admin", Role::Admin);

    let facility = store.create_facility(&actor, "Central Battery").await?;
    let satellite = store
        .create_satellite(
            &actor,
            CreateSatelliteInput {
                name: "North".to_string(),
                facility_id: Some(facility),
            },
        )
        .await?;
    let orphan_satellite = store
        .create_satellite(
            &actor,
            CreateSatelliteInput {
                name: "Stray".to_string(),
                facility_id: None,
            },
        )
        .await?;

    // Inserted out of order so the listing order is observable.
    let zz = store
        .create_segment(&actor, CreateSegmentInput::minimal("ZZ-9", "1"))
        .await?;
    let aa2 = store
        .create_segment(
            &actor,
            CreateSegmentInput {
                satellite_id: Some(satellite),
                ..CreateSegmentInput::minimal("AA-1", "2")
            },
        )
        .await?;
    let bb = store
        .create_segment(
            &actor,
            CreateSegmentInput {
                satellite_id: Some(orphan_satellite),
                ..CreateSegmentInput::minimal("BB-2", "1")
            },
        )
        .await?;
    let aa1 = store
        .create_segment(
            &actor,
            CreateSegmentInput {
                satellite_id: Some(satellite),
                ..CreateSegmentInput::minimal("AA-1", "1")
            },
        )
        .await?;

    Ok(Hierarchy {
        _dir: dir,
        store,
        facility,
        satellite,
        orphan_satellite,
        segments: vec![aa1, aa2, bb, zz],
    })
}

async fn navigate(store: &PipelineStore, request: NavigationRequest) -> PipenetResult<NavigationPage> {
    store.resolve_navigation(&QueryContext::new(), request).await
}

fn ids(page: &NavigationPage) -> Vec<Id> {
    page.items.iter().map(|segment| segment.id).collect()
}

fn page() -> Page {
    Page::new(0, 50)
}

#[tokio::test]
async fn facility_lists_segments_of_its_satellites() -> PipenetResult<()> {
    let h = hierarchy(None).await?;
    let result = navigate(
        &h.store,
        NavigationRequest::hierarchy("facility", h.facility.to_uuid_string(), page()),
    )
    .await?;
    assert_eq!(ids(&result), h.segments[..2].to_vec());
    assert_eq!(result.total_count, 2);
    Ok(())
}

#[tokio::test]
async fn no_facility_needs_a_satellite_without_facility() -> PipenetResult<()> {
    let h = hierarchy(None).await?;
    let result = navigate(
        &h.store,
        NavigationRequest::hierarchy("facility", NO_FACILITY, page()),
    )
    .await?;
    // ZZ-9 has no satellite at all and is not listed here.
    assert_eq!(ids(&result), vec![h.segments[2]]);
    Ok(())
}

#[tokio::test]
async fn satellite_selectors() -> PipenetResult<()> {
    let h = hierarchy(None).await?;
    let result = navigate(
        &h.store,
        NavigationRequest::hierarchy("satellite", h.satellite.to_uuid_string(), page()),
    )
    .await?;
    assert_eq!(ids(&result), h.segments[..2].to_vec());

    let result = navigate(
        &h.store,
        NavigationRequest::hierarchy("satellite", h.orphan_satellite.to_uuid_string(), page()),
    )
    .await?;
    assert_eq!(ids(&result), vec![h.segments[2]]);

    let result = navigate(
        &h.store,
        NavigationRequest::hierarchy("satellite", NO_SATELLITE, page()),
    )
    .await?;
    assert_eq!(ids(&result), vec![h.segments[3]]);
    Ok(())
}

#[tokio::test]
async fn unknown_hierarchy_table_lists_everything_in_order() -> PipenetResult<()> {
    let h = hierarchy(None).await?;
    let result = navigate(
        &h.store,
        NavigationRequest::hierarchy("area", Id::new().to_uuid_string(), page()),
    )
    .await?;
    assert_eq!(ids(&result), h.segments);
    assert_eq!(result.total_count, 4);
    Ok(())
}

#[tokio::test]
async fn hierarchy_takes_precedence_over_search() -> PipenetResult<()> {
    let h = hierarchy(None).await?;
    let mut request = NavigationRequest::hierarchy("satellite", NO_SATELLITE, page());
    request.search = Some(vec![SearchCriterion::new(
        "pipeline",
        "license",
        Having::Direct,
        Operation::Equals,
        "AA-1",
        "String",
    )]);
    let result = navigate(&h.store, request).await?;
    assert_eq!(ids(&result), vec![h.segments[3]]);
    Ok(())
}

#[tokio::test]
async fn empty_search_lists_everything() -> PipenetResult<()> {
    let h = hierarchy(None).await?;
    let result = navigate(&h.store, NavigationRequest::search(Vec::new(), page())).await?;
    assert_eq!(result.total_count, 4);
    let mut listed = ids(&result);
    listed.sort();
    let mut expected = h.segments.clone();
    expected.sort();
    assert_eq!(listed, expected);

    let unselected = navigate(
        &h.store,
        NavigationRequest::hierarchy("facility", "", page()),
    )
    .await?;
    assert_eq!(unselected.total_count, result.total_count);
    let mut unselected = ids(&unselected);
    unselected.sort();
    assert_eq!(unselected, listed);
    Ok(())
}

#[tokio::test]
async fn neither_hierarchy_nor_search_is_empty() -> PipenetResult<()> {
    let h = hierarchy(None).await?;
    let request = NavigationRequest {
        hierarchy: None,
        search: None,
        page: page(),
    };
    assert_eq!(navigate(&h.store, request).await?, NavigationPage::empty());
    Ok(())
}

#[tokio::test]
async fn pages_skip_and_take_with_full_total() -> PipenetResult<()> {
    let h = hierarchy(None).await?;
    let result = navigate(
        &h.store,
        NavigationRequest::hierarchy("satellite", "", Page::new(1, 2)),
    )
    .await?;
    assert_eq!(ids(&result), h.segments[1..3].to_vec());
    assert_eq!(result.total_count, 4);

    let result = navigate(
        &h.store,
        NavigationRequest::hierarchy("satellite", "", Page::new(10, 2)),
    )
    .await?;
    assert!(result.items.is_empty());
    assert_eq!(result.total_count, 4);
    Ok(())
}

#[tokio::test]
async fn take_is_clamped_to_configured_maximum() -> PipenetResult<()> {
    let h = hierarchy(Some(QueryConfig {
        max_take: Some(3),
        request_timeout_ms: None,
    }))
    .await?;
    let result = navigate(
        &h.store,
        NavigationRequest::hierarchy("satellite", "", Page::new(0, 1_000)),
    )
    .await?;
    assert_eq!(result.items.len(), 3);
    assert_eq!(result.total_count, 4);
    Ok(())
}

#[tokio::test]
async fn zero_take_is_a_validation_error() -> PipenetResult<()> {
    let h = hierarchy(None).await?;
    let err = navigate(&h.store, NavigationRequest::search(Vec::new(), Page::new(0, 0)))
        .await
        .expect_err("zero take");
    assert!(matches!(err, PipenetError::Validation { .. }));
    Ok(())
}

#[tokio::test]
async fn malformed_hierarchy_id_is_rejected() -> PipenetResult<()> {
    let h = hierarchy(None).await?;
    let err = navigate(
        &h.store,
        NavigationRequest::hierarchy("facility", "not-a-uuid", page()),
    )
    .await
    .expect_err("bad id");
    assert!(matches!(err, PipenetError::InvalidValue { .. }));
    Ok(())
}
