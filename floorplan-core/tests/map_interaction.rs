use floorplan_core::constants::{HIGHLIGHT_FILL, SCALE_MAX, SCALE_MIN};
use floorplan_core::{
    Artwork, DeltaMode, Enhancer, FetchError, FloorPlan, GalleryDetail, HighlightController,
    HighlightSet, RoomId, RoomPaint, SearchQuery, SearchState, Session, ViewportController,
    sync_paints,
};
use pretty_assertions::assert_eq;

const MET_MAP: &str = r##"<?xml version="1.0" encoding="UTF-8"?>
<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 600 400">
  <g id="Layer_1">
    <path d="M0 0h600v400H0z" fill="#eee"/>
  </g>
  <g id="Floor_1_Galleries">
    <rect id="101" x="20" y="20" width="120" height="60"/>
    <rect id="102_A" x="160" y="20" width="45" height="90"/>
    <rect id="8_22" x="300" y="200" width="30" height="30"/>
  </g>
</svg>"##;

fn artworks(ids: std::ops::Range<u64>) -> Vec<Artwork> {
    ids.map(|id| Artwork {
        object_id: id,
        title: format!("Water Lilies #{id}"),
        artist_display_name: "Claude Monet".into(),
        ..Default::default()
    })
    .collect()
}

#[test]
fn every_room_gets_exactly_one_normalized_label() {
    let floor = FloorPlan::parse(MET_MAP).unwrap();
    let mut enhancer = Enhancer::new();
    let plan = enhancer.enhance(&floor).unwrap();
    assert_eq!(plan.len(), floor.rooms.len());
    for room in &floor.rooms {
        let labels: Vec<_> = plan.groups.iter().filter(|g| g.room == room.id).collect();
        assert_eq!(labels.len(), 1);
        assert_eq!(labels[0].label.text, room.raw_id.replace('_', ""));
    }
    assert!(enhancer.enhance(&floor).is_err());
}

#[test]
fn highlight_scenario_101_and_102a() {
    let floor = FloorPlan::parse(MET_MAP).unwrap();
    let set: HighlightSet = ["101"].into_iter().collect();
    let paints = sync_paints(&set, &floor);
    let paint_of = |id: &str| {
        paints
            .iter()
            .find(|(room, _)| room.as_str() == id)
            .map(|(_, p)| *p)
            .unwrap()
    };
    assert_eq!(paint_of("101").fill, Some(HIGHLIGHT_FILL));
    assert_eq!(paint_of("102A"), RoomPaint::default());
    assert_eq!(paint_of("822"), RoomPaint::default());
}

#[test]
fn recenter_restores_identity_and_keeps_selection() {
    let mut detail = GalleryDetail::default();
    let mut viewport = ViewportController::new();

    assert!(viewport.accept_click());
    detail.select(RoomId::normalize("102_A"));

    viewport.pointer_down(1, 100.0, 100.0);
    viewport.pointer_move(1, 180.0, 40.0);
    viewport.pointer_up(1);
    viewport.wheel(200.0, 150.0, -900.0, DeltaMode::Pixel);
    let k = viewport.transform().k;
    assert!((SCALE_MIN..=SCALE_MAX).contains(&k));

    viewport.recenter(10_000.0);
    let mut now = 10_000.0;
    while viewport.tick(now).is_some() {
        now += 16.0;
    }
    assert!(viewport.transform().is_identity());
    assert_eq!(detail.selected().map(RoomId::as_str), Some("102A"));
}

#[test]
fn collection_round_trip_restores_all_highlights() {
    let session = Session {
        user_id: Some(2),
        ..Default::default()
    };
    let mut hc = HighlightController::new(&session);
    let t = hc.begin_fetch().unwrap();
    hc.finish_fetch(t, Ok(vec!["101".into(), "8_22".into()]));
    let all = hc.current().clone();
    assert_eq!(all.len(), 2);

    hc.select(Some(5));
    let t = hc.begin_fetch().unwrap();
    hc.finish_fetch(t, Ok(vec!["102A".into()]));
    hc.select(None);
    assert_eq!(hc.current(), &all);
}

#[test]
fn monet_search_then_see_more_appends() {
    let mut search = SearchState::new();
    search.set_term("Monet");
    let first = search.submit();
    assert_eq!(
        first.query,
        SearchQuery::Search {
            params: search.params().clone(),
            start: 0,
            limit: 10,
        }
    );
    search.finish(&first, Ok(artworks(0..10)));

    let more = search.see_more();
    let SearchQuery::Search { limit, start, .. } = &more.query else {
        panic!("see more must search");
    };
    assert_eq!((*start, *limit), (10, 20));
    assert_eq!(search.fetch_limit(), 20);
    search.finish(&more, Ok(artworks(10..20)));

    let ids: Vec<u64> = search.results().iter().map(|a| a.object_id).collect();
    assert_eq!(ids, (0..20).collect::<Vec<_>>());
    assert!(!search.is_loading());
}

#[test]
fn failed_search_clears_results_and_loader() {
    let mut search = SearchState::new();
    let initial = search.load_initial();
    search.finish(&initial, Ok(artworks(0..4)));

    let req = search.submit();
    assert!(search.is_loading());
    let err = FetchError::Network {
        url: "https://collectionapi.metmuseum.org/public/collection/v1/search".into(),
        message: "TypeError: Failed to fetch".into(),
    };
    search.finish(&req, Err(err));
    assert!(search.results().is_empty());
    assert!(!search.is_loading());
    assert!(!search.show_see_more());
}
