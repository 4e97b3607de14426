//! # Playlist Service Example
//!
//! Bootstraps an in-memory catalog, adds tracks, and drives playback while
//! printing the events the core publishes.
//!
//! Run with: `cargo run --example playlist_demo --package core-service`

use core_runtime::config::CoreConfig;
use core_runtime::logging::{LogLevel, LoggingConfig};
use core_service::{CoreError, CoreService};
use std::time::Duration;

#[tokio::main]
async fn main() -> core_service::Result<()> {
    let config = CoreConfig::builder()
        .in_memory()
        .logging(LoggingConfig::default().with_level(LogLevel::Info))
        .build()?;
    let core = CoreService::bootstrap(config).await?;
    let playlist = core.playlist();

    let mut events = core.subscribe();
    tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            println!("  event: {} {:?}", event.description(), event);
        }
    });

    println!("=== Building the playlist ===");
    for (title, secs) in [("Intro", 1), ("Verse", 1), ("Outro", 2)] {
        let record = playlist.create_track(title, secs).await?;
        println!(
            "created #{} {} ({}s)",
            record.id, record.title, record.duration_secs
        );
    }

    match playlist.create_track("Intro", 3).await {
        Err(CoreError::TrackAlreadyExists(title)) => println!("duplicate rejected: {}", title),
        other => println!("unexpected: {:?}", other),
    }

    println!("\n=== Playing ===");
    playlist.play()?;
    println!("now playing: {:?}", playlist.status().current);

    match playlist.delete_track("Intro").await {
        Err(err) => println!("delete rejected: {}", err),
        Ok(()) => println!("unexpected delete"),
    }

    tokio::time::sleep(Duration::from_millis(1500)).await;
    println!("after 1.5s: {:?}", playlist.status().current);

    playlist.delete_track("Intro").await?;
    let remaining: Vec<_> = playlist
        .list_tracks()
        .await?
        .into_iter()
        .map(|track| track.title)
        .collect();
    println!("deleted Intro, catalog now {:?}", remaining);

    println!("\n=== Controls ===");
    playlist.pause()?;
    playlist.next()?;
    println!("skipped while paused to: {:?}", playlist.status().current);
    playlist.play()?;
    playlist.prev()?;
    println!("back to: {:?}", playlist.status().current);
    playlist.stop()?;
    println!("final state: {}", playlist.status().state);

    Ok(())
}
