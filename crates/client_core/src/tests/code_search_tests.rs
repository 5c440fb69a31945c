use super::*;
use shared::domain::CodeStatus;

use crate::{
    error::ErrorKind,
    source::SourceError,
    test_support::{code_match, ScriptedSource},
};

fn controller(source: Arc<ScriptedSource>) -> (CodeSearchController, SelectionSlot, ErrorBanner) {
    let selection = SelectionSlot::default();
    let banner = ErrorBanner::default();
    let controller = CodeSearchController::new(source, selection.clone(), banner.clone());
    (controller, selection, banner)
}

#[tokio::test]
async fn set_query_does_not_fetch() {
    let source = ScriptedSource::sample().into_arc();
    let (search, _selection, _banner) = controller(source.clone());

    search.set_query("세교").await;
    assert_eq!(search.query().await, "세교");
    assert!(source.calls().await.is_empty());
    assert_eq!(search.panel().await, SearchPanel::NeverSearched);
}

#[tokio::test]
async fn search_shows_matches_including_abolished() {
    let (search, _selection, _banner) = controller(ScriptedSource::sample().into_arc());
    search.set_query("세교").await;
    search.search().await;

    match search.panel().await {
        SearchPanel::Results(items) => {
            assert_eq!(items.len(), 2);
            assert_eq!(items[1].status, CodeStatus::Abolished);
        }
        other => panic!("unexpected panel: {other:?}"),
    }
}

#[tokio::test]
async fn zero_matches_show_empty_state_not_error() {
    let (search, _selection, banner) = controller(ScriptedSource::sample().into_arc());
    search.set_query("없는동").await;
    search.search().await;

    assert_eq!(search.panel().await, SearchPanel::Empty);
    assert_eq!(banner.current().await, None);
}

#[tokio::test]
async fn empty_query_is_sent_as_is() {
    let source = ScriptedSource::sample().into_arc();
    let (search, _selection, _banner) = controller(source.clone());
    search.search().await;

    assert_eq!(source.calls().await, ["search:"]);
    assert_eq!(search.panel().await, SearchPanel::Empty);
}

#[tokio::test]
async fn failure_clears_results_and_error_wins_over_empty() {
    let source = ScriptedSource::sample().into_arc();
    source
        .fail(
            "search:장안",
            SourceError::Rejected {
                status: 500,
                message: Some("directory unavailable".into()),
            },
        )
        .await;
    let (search, _selection, banner) = controller(source);

    search.set_query("세교").await;
    search.search().await;
    search.set_query("장안").await;
    search.search().await;

    assert!(search.results().await.is_empty());
    let err = match search.panel().await {
        SearchPanel::Failed(err) => err,
        other => panic!("expected failure panel, got {other:?}"),
    };
    assert_eq!(err.message, "directory unavailable");
    assert_eq!(err.kind, ErrorKind::Rejected);
    assert_eq!(banner.current().await, Some(err));
}

#[tokio::test]
async fn only_latest_overlapping_search_lands() {
    let source = ScriptedSource::sample().into_arc();
    let release_first = source.gate("search:세교").await;
    let (search, _selection, _banner) = controller(source);

    search.set_query("세교").await;
    tokio::join!(search.search(), async {
        search.set_query("없는동").await;
        search.search().await;
        let _ = release_first.send(());
    });

    assert!(search.results().await.is_empty());
    assert_eq!(search.panel().await, SearchPanel::Empty);
}

#[tokio::test]
async fn in_flight_search_shows_searching() {
    let source = ScriptedSource::sample().into_arc();
    let release = source.gate("search:세교").await;
    let (search, _selection, _banner) = controller(source);
    search.set_query("세교").await;

    tokio::join!(search.search(), async {
        assert_eq!(search.panel().await, SearchPanel::Searching);
        let _ = release.send(());
    });

    assert!(matches!(search.panel().await, SearchPanel::Results(_)));
}

#[tokio::test]
async fn apply_match_sets_selection_even_when_abolished() {
    let (search, selection, _banner) = controller(ScriptedSource::sample().into_arc());
    let abolished = code_match("4122010699", "경기도 평택시 옛세교동", CodeStatus::Abolished);

    search.apply_match(&abolished).await;

    let current = selection.current().await;
    assert_eq!(current.code(), "4122010699");
    assert_eq!(current.name(), "경기도 평택시 옛세교동");
}

#[tokio::test]
async fn apply_match_with_malformed_code_is_skipped() {
    let (search, selection, _banner) = controller(ScriptedSource::sample().into_arc());
    search
        .apply_match(&code_match("41220", "평택시", CodeStatus::Active))
        .await;
    assert!(selection.current().await.is_empty());
}
