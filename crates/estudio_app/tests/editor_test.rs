//! Gallery "open in editor" reaches mounted editors through the channel.

use estudio_app::{EstudioApp, FeatureContext, NotificationLevel};
use estudio_core::{
    Character, CharacterProfile, CommercialDuration, EntityId, Propaganda, ToneOfVoice,
};
use estudio_error::ErrorCategory;
use estudio_flows::FlowExecutor;
use estudio_gallery::{Gallery, GalleryCategory};
use estudio_testing::MockDriver;
use estudio_testing::fixtures::character_profile_json;
use std::sync::Arc;
use std::time::Duration;

fn app() -> EstudioApp<MockDriver> {
    let driver = Arc::new(MockDriver::text("unused"));
    EstudioApp::new(FeatureContext::new(
        FlowExecutor::new(driver),
        Gallery::in_memory(),
    ))
}

async fn eventually<F: Fn() -> bool>(check: F) -> bool {
    for _ in 0..100 {
        if check() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    false
}

#[tokio::test]
async fn test_open_in_editor_loads_character_builder() -> anyhow::Result<()> {
    let app = app();
    let profile: CharacterProfile = serde_json::from_value(character_profile_json())?;
    let luna = Character::new(profile, 42);
    app.context().gallery().characters().save(luna.clone())?;

    let listeners = app.mount_editors();
    let delivered = app
        .gallery()
        .open_in_editor(GalleryCategory::Characters, &luna.id)?;
    assert_eq!(delivered, listeners.len());

    let loaded = eventually(|| app.characters().form().character.as_ref() == Some(&luna)).await;
    assert!(loaded, "character builder never received Luna");
    assert_eq!(app.scenes().form().scene, None);

    for listener in listeners {
        listener.abort();
    }
    Ok(())
}

#[tokio::test]
async fn test_open_in_editor_loads_propaganda() -> anyhow::Result<()> {
    let app = app();
    let propaganda = Propaganda::new(
        "Café Aurora",
        "Café especial",
        ToneOfVoice::Luxurious,
        CommercialDuration::Short,
    );
    app.context().gallery().propagandas().save(propaganda.clone())?;

    let listeners = app.mount_editors();
    app.gallery()
        .open_in_editor(GalleryCategory::Propagandas, &propaganda.id)?;

    let loaded =
        eventually(|| app.propagandas().form().propaganda.as_ref() == Some(&propaganda)).await;
    assert!(loaded);

    for listener in listeners {
        listener.abort();
    }
    Ok(())
}

#[tokio::test]
async fn test_open_missing_entity_notifies() -> anyhow::Result<()> {
    let app = app();
    let mut notifications = app.context().notifications().subscribe();

    let err = app
        .gallery()
        .open_in_editor(GalleryCategory::Scenes, &EntityId::new())
        .expect_err("nothing saved");

    assert_eq!(err.category(), ErrorCategory::Storage);
    assert_eq!(*notifications.try_recv()?.level(), NotificationLevel::Destructive);
    Ok(())
}

#[tokio::test]
async fn test_gallery_browser_delete_and_export() -> anyhow::Result<()> {
    let app = app();
    let profile: CharacterProfile = serde_json::from_value(character_profile_json())?;
    let luna = Character::new(profile, 7);
    app.context().gallery().characters().save(luna.clone())?;

    let items = app.gallery().list(GalleryCategory::Characters)?;
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].title(), "Luna");

    let dir = tempfile::tempdir()?;
    let path = dir.path().join("personagens.csv");
    app.gallery().export(
        GalleryCategory::Characters,
        None,
        estudio_gallery::ExportFormat::Csv,
        &path,
    )?;
    let csv = std::fs::read_to_string(&path)?;
    assert!(csv.lines().next().unwrap_or_default().contains("name"));
    assert!(csv.contains("Luna"));

    let remaining = app.gallery().delete(GalleryCategory::Characters, &luna.id)?;
    assert!(remaining.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_deleting_unknown_id_publishes_nothing() -> anyhow::Result<()> {
    let app = app();
    let profile: CharacterProfile = serde_json::from_value(character_profile_json())?;
    let luna = Character::new(profile, 7);
    app.context().gallery().characters().save(luna.clone())?;
    let mut notifications = app.context().notifications().subscribe();

    let remaining = app
        .gallery()
        .delete(GalleryCategory::Characters, &EntityId::new())?;
    assert_eq!(remaining.len(), 1);
    assert!(notifications.try_recv().is_err());

    app.gallery().delete(GalleryCategory::Characters, &luna.id)?;
    let notification = notifications.try_recv()?;
    assert_eq!(*notification.level(), NotificationLevel::Destructive);
    assert_eq!(notification.title(), "Item excluído");
    Ok(())
}
