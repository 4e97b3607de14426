//! PlaylistService tests against a mocked catalog.

use async_trait::async_trait;
use core_library::{LibraryError, TrackRecord, TrackRepository};
use core_playback::{PlaybackConfig, PlaybackEngine, PlaybackError, PlaybackState};
use core_runtime::config::CoreConfig;
use core_runtime::events::{CoreEvent, EventBus, LibraryEvent};
use core_service::{CoreError, CoreService, PlaylistService};
use mockall::mock;
use std::sync::Arc;

mock! {
    pub Repo {}

    #[async_trait]
    impl TrackRepository for Repo {
        async fn create(&self, title: &str, duration_secs: i64) -> core_library::Result<TrackRecord>;
        async fn find_by_id(&self, id: i64) -> core_library::Result<Option<TrackRecord>>;
        async fn find_by_title(&self, title: &str) -> core_library::Result<Option<TrackRecord>>;
        async fn update(
            &self,
            old_title: &str,
            new_title: &str,
            duration_secs: i64,
        ) -> core_library::Result<TrackRecord>;
        async fn delete(&self, title: &str) -> core_library::Result<bool>;
        async fn list(&self) -> core_library::Result<Vec<TrackRecord>>;
        async fn count(&self) -> core_library::Result<i64>;
    }
}

fn record(id: i64, title: &str, duration_secs: i64) -> TrackRecord {
    TrackRecord {
        id,
        title: title.to_string(),
        duration_secs,
        created_at: 1699200000,
        updated_at: 1699200000,
    }
}

fn service(repo: MockRepo) -> (PlaylistService, EventBus) {
    let events = EventBus::default();
    let engine = Arc::new(PlaybackEngine::with_event_bus(
        PlaybackConfig::default(),
        events.clone(),
    ));
    (
        PlaylistService::new(Arc::new(repo), engine, events.clone()),
        events,
    )
}

#[tokio::test]
async fn test_create_validates_before_touching_catalog() {
    // No expectations: any repository call fails the test.
    let (service, _) = service(MockRepo::new());

    assert!(matches!(
        service.create_track("", 10).await,
        Err(CoreError::Playback(PlaybackError::InvalidTitle))
    ));
    assert!(matches!(
        service.create_track("Song 1", 0).await,
        Err(CoreError::Playback(PlaybackError::InvalidDuration))
    ));
    assert!(matches!(
        service.create_track("Song 1", -5).await,
        Err(CoreError::Playback(PlaybackError::InvalidDuration))
    ));
    assert!(service.engine().is_empty());
}

#[tokio::test]
async fn test_create_rejects_duplicate_before_engine() {
    let mut repo = MockRepo::new();
    repo.expect_find_by_title()
        .withf(|title| title == "Song 1")
        .returning(|title| Ok(Some(record(1, title, 150))));
    repo.expect_create().never();

    let (service, _) = service(repo);

    let err = service.create_track("Song 1", 150).await.unwrap_err();
    assert!(matches!(err, CoreError::TrackAlreadyExists(ref title) if title == "Song 1"));
    assert!(err.is_client_error());
    assert!(service.engine().is_empty());
}

#[tokio::test]
async fn test_create_maps_store_conflict() {
    let mut repo = MockRepo::new();
    repo.expect_find_by_title().returning(|_| Ok(None));
    repo.expect_create().returning(|title, _| {
        Err(LibraryError::Conflict {
            entity_type: "Track".to_string(),
            key: title.to_string(),
        })
    });

    let (service, _) = service(repo);

    assert!(matches!(
        service.create_track("Song 1", 150).await,
        Err(CoreError::TrackAlreadyExists(_))
    ));
    assert!(service.engine().is_empty());
}

#[tokio::test]
async fn test_create_persists_then_mirrors_and_emits() {
    let mut repo = MockRepo::new();
    repo.expect_find_by_title().returning(|_| Ok(None));
    repo.expect_create()
        .times(1)
        .withf(|title, secs| title == "Song 1" && *secs == 150)
        .returning(|title, secs| Ok(record(7, title, secs)));

    let (service, events) = service(repo);
    let mut rx = events.subscribe();

    let created = service.create_track("Song 1", 150).await.unwrap();

    assert_eq!(created.id, 7);
    let tracks = service.engine().tracks();
    assert_eq!(tracks.len(), 1);
    assert_eq!(tracks[0].title(), "Song 1");
    assert_eq!(
        rx.try_recv().unwrap(),
        CoreEvent::Library(LibraryEvent::TrackAdded {
            track_id: 7,
            title: "Song 1".to_string(),
            duration_secs: 150,
        })
    );
}

#[tokio::test(start_paused = true)]
async fn test_delete_playing_track_leaves_catalog_intact() {
    let mut repo = MockRepo::new();
    let mut created = false;
    repo.expect_find_by_title().returning(move |title| {
        // The first lookup is create's duplicate check.
        if created {
            Ok(Some(record(1, title, 10)))
        } else {
            created = true;
            Ok(None)
        }
    });
    repo.expect_create()
        .returning(|title, secs| Ok(record(1, title, secs)));
    repo.expect_delete().never();

    let (service, _) = service(repo);
    service.create_track("Song 1", 10).await.unwrap();
    service.play().unwrap();

    let err = service.delete_track("Song 1").await.unwrap_err();

    assert!(matches!(
        err,
        CoreError::Playback(PlaybackError::TrackIsPlaying(ref title)) if title == "Song 1"
    ));
    assert_eq!(service.engine().len(), 1);
}

/// A service holding "A" and "B" whose catalog delete answers with `delete`.
async fn service_with_failing_delete(
    delete: fn() -> core_library::Result<bool>,
) -> PlaylistService {
    let mut repo = MockRepo::new();
    let mut lookups = 0;
    repo.expect_find_by_title().returning(move |title| {
        // The first two lookups are create's duplicate checks.
        lookups += 1;
        if lookups <= 2 {
            Ok(None)
        } else {
            Ok(Some(record(2, title, 10)))
        }
    });
    repo.expect_create()
        .returning(|title, secs| Ok(record(1, title, secs)));
    repo.expect_delete().times(1).returning(move |_| delete());

    let (service, _) = service(repo);
    service.create_track("A", 10).await.unwrap();
    service.create_track("B", 10).await.unwrap();
    service
}

fn engine_titles(service: &PlaylistService) -> Vec<String> {
    service
        .engine()
        .tracks()
        .iter()
        .map(|track| track.title().to_string())
        .collect()
}

#[tokio::test]
async fn test_delete_store_failure_restores_playlist() {
    let service =
        service_with_failing_delete(|| Err(LibraryError::Migration("disk full".to_string())))
            .await;

    let err = service.delete_track("A").await.unwrap_err();

    assert!(matches!(err, CoreError::Library(LibraryError::Migration(_))));
    assert_eq!(engine_titles(&service), vec!["A", "B"]);
}

#[tokio::test]
async fn test_delete_vanished_row_restores_playlist() {
    let service = service_with_failing_delete(|| Ok(false)).await;

    let err = service.delete_track("B").await.unwrap_err();

    assert!(matches!(err, CoreError::TrackNotInCatalog(ref title) if title == "B"));
    assert_eq!(engine_titles(&service), vec!["A", "B"]);
}

#[tokio::test(start_paused = true)]
async fn test_delete_failure_keeps_current_track() {
    let service =
        service_with_failing_delete(|| Err(LibraryError::Migration("disk full".to_string())))
            .await;
    service.play().unwrap();
    service.next().unwrap();

    assert!(service.delete_track("A").await.is_err());

    let status = service.status();
    assert_eq!(status.position, Some(1));
    assert_eq!(status.current.unwrap().title(), "B");
    assert_eq!(engine_titles(&service), vec!["A", "B"]);
}

#[tokio::test]
async fn test_delete_unknown_track() {
    let mut repo = MockRepo::new();
    repo.expect_find_by_title().returning(|_| Ok(None));
    repo.expect_delete().never();

    let (service, _) = service(repo);

    assert!(matches!(
        service.delete_track("Missing").await,
        Err(CoreError::TrackNotInCatalog(_))
    ));
}

#[tokio::test]
async fn test_delete_catalog_only_track() {
    let mut repo = MockRepo::new();
    repo.expect_find_by_title()
        .returning(|title| Ok(Some(record(3, title, 10))));
    repo.expect_delete()
        .times(1)
        .withf(|title| title == "Song 3")
        .returning(|_| Ok(true));

    let (service, events) = service(repo);
    let mut rx = events.subscribe();

    service.delete_track("Song 3").await.unwrap();

    assert_eq!(
        rx.try_recv().unwrap(),
        CoreEvent::Library(LibraryEvent::TrackDeleted {
            title: "Song 3".to_string()
        })
    );
}

#[tokio::test]
async fn test_update_errors() {
    let mut repo = MockRepo::new();
    repo.expect_find_by_title()
        .withf(|title| title == "Missing")
        .returning(|_| Ok(None));
    repo.expect_find_by_title()
        .returning(|title| Ok(Some(record(1, title, 10))));
    repo.expect_update().never();

    let (service, _) = service(repo);

    assert!(matches!(
        service.update_track("Missing", "Other", 10).await,
        Err(CoreError::TrackNotInCatalog(ref title)) if title == "Missing"
    ));
    assert!(matches!(
        service.update_track("Song 1", "Song 2", 10).await,
        Err(CoreError::TrackAlreadyExists(ref title)) if title == "Song 2"
    ));
    assert!(matches!(
        service.update_track("Song 1", "", 10).await,
        Err(CoreError::Playback(PlaybackError::InvalidTitle))
    ));
}

#[tokio::test]
async fn test_update_same_title_changes_duration() {
    let mut repo = MockRepo::new();
    repo.expect_find_by_title()
        .returning(|title| Ok(Some(record(1, title, 10))));
    repo.expect_update()
        .times(1)
        .returning(|_, new_title, secs| Ok(record(1, new_title, secs)));

    let (service, events) = service(repo);
    let mut rx = events.subscribe();

    let updated = service.update_track("Song 1", "Song 1", 30).await.unwrap();

    assert_eq!(updated.duration_secs, 30);
    assert_eq!(
        rx.try_recv().unwrap(),
        CoreEvent::Library(LibraryEvent::TrackUpdated {
            previous_title: "Song 1".to_string(),
            title: "Song 1".to_string(),
            duration_secs: 30,
        })
    );
}

#[tokio::test]
async fn test_get_track() {
    let mut repo = MockRepo::new();
    repo.expect_find_by_title()
        .withf(|title| title == "Song 1")
        .returning(|title| Ok(Some(record(1, title, 10))));
    repo.expect_find_by_title().returning(|_| Ok(None));

    let (service, _) = service(repo);

    assert_eq!(service.get_track("Song 1").await.unwrap().id, 1);
    assert!(matches!(
        service.get_track("Nope").await,
        Err(CoreError::TrackNotInCatalog(_))
    ));
}

#[tokio::test]
async fn test_controls_on_empty_playlist() {
    let (service, _) = service(MockRepo::new());

    for result in [service.play(), service.next(), service.prev()] {
        assert!(matches!(
            result,
            Err(CoreError::Playback(PlaybackError::EmptyPlaylist))
        ));
    }
    assert!(matches!(
        service.pause(),
        Err(CoreError::Playback(PlaybackError::NotPlaying))
    ));
    assert_eq!(service.status().state, PlaybackState::Stopped);
}

#[tokio::test]
async fn test_bootstrap_hydrates_in_catalog_order() {
    let mut repo = MockRepo::new();
    repo.expect_list().times(1).returning(|| {
        Ok(vec![
            record(1, "Song 1", 150),
            record(2, "Song 2", 90),
            record(3, "Song 3", 60),
        ])
    });

    let config = CoreConfig::builder().build().unwrap();
    let core = CoreService::with_repository(config, Arc::new(repo))
        .await
        .unwrap();

    let titles: Vec<_> = core
        .playlist()
        .engine()
        .tracks()
        .iter()
        .map(|track| track.title().to_string())
        .collect();
    assert_eq!(titles, vec!["Song 1", "Song 2", "Song 3"]);
}

#[tokio::test]
async fn test_hydration_can_be_disabled() {
    let mut repo = MockRepo::new();
    repo.expect_list().never();

    let config = CoreConfig::builder()
        .hydrate_on_startup(false)
        .build()
        .unwrap();
    let core = CoreService::with_repository(config, Arc::new(repo))
        .await
        .unwrap();

    assert!(core.playlist().engine().is_empty());
}

#[tokio::test]
async fn test_catalog_failure_surfaces_as_library_error() {
    let mut repo = MockRepo::new();
    repo.expect_list()
        .returning(|| Err(LibraryError::Migration("schema missing".to_string())));

    let config = CoreConfig::builder().build().unwrap();
    let err = CoreService::with_repository(config, Arc::new(repo))
        .await
        .err()
        .unwrap();

    assert!(matches!(err, CoreError::Library(_)));
    assert!(!err.is_client_error());
}
