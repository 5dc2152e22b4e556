//! Tests for the gallery store: round trips, ordering, malformed buckets,
//! the app-state aggregate, notifications and export.

use estudio_core::{
    Character, CharacterProfile, CommercialDuration, Propaganda, Scene, SceneDraft, SceneDuration,
    Theme, ToneOfVoice, VideoFormat,
};
use estudio_error::{ErrorCategory, EstudioErrorKind, StorageErrorKind};
use estudio_gallery::{
    APP_STATE_KEY, CHARACTERS_KEY, ExportFormat, Gallery, GalleryCategory, GalleryChange,
    KeyValueStore, MemoryKeyValueStore, write_export,
};
use estudio_testing::fixtures::{character_profile_json, scene_draft_json};
use std::sync::Arc;

fn luna() -> anyhow::Result<Character> {
    let profile: CharacterProfile = serde_json::from_value(character_profile_json())?;
    Ok(Character::new(profile, 1234))
}

fn named(name: &str) -> anyhow::Result<Character> {
    let mut character = luna()?;
    character.profile.name = name.to_string();
    Ok(character)
}

#[test]
fn test_save_then_delete_luna() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let gallery = Gallery::open(dir.path())?;
    let luna = luna()?;

    let listed = gallery.characters().save(luna.clone())?;
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].profile.name, "Luna");
    assert_eq!(listed[0].profile.niche, "Moda");

    let reopened = Gallery::open(dir.path())?;
    assert_eq!(reopened.characters().list()?, vec![luna.clone()]);

    let remaining = gallery.characters().delete(&luna.id)?;
    assert!(remaining.is_empty());
    assert!(gallery.characters().list()?.is_empty());
    Ok(())
}

#[test]
fn test_new_entities_are_prepended_and_known_ones_replaced_in_place() -> anyhow::Result<()> {
    let gallery = Gallery::in_memory();
    let first = named("Ana")?;
    let second = named("Bia")?;
    let third = named("Caio")?;

    gallery.characters().save(first.clone())?;
    gallery.characters().save(second.clone())?;
    gallery.characters().save(third.clone())?;

    let mut renamed = second.clone();
    renamed.profile.name = "Beatriz".to_string();
    let listed = gallery.characters().save(renamed)?;

    let names: Vec<&str> = listed.iter().map(|c| c.profile.name.as_str()).collect();
    assert_eq!(names, vec!["Caio", "Beatriz", "Ana"]);
    assert_eq!(gallery.characters().get(&second.id)?.map(|c| c.profile.name), Some("Beatriz".to_string()));
    Ok(())
}

#[test]
fn test_deleting_unknown_id_changes_nothing() -> anyhow::Result<()> {
    let gallery = Gallery::in_memory();
    gallery.characters().save(luna()?)?;

    let listed = gallery.characters().delete(&"desconhecido".into())?;
    assert_eq!(listed.len(), 1);
    Ok(())
}

#[test]
fn test_malformed_bucket_is_a_storage_error_and_nothing_is_written() -> anyhow::Result<()> {
    let store = Arc::new(MemoryKeyValueStore::new());
    store.set(CHARACTERS_KEY, "{not json")?;
    let gallery = Gallery::new(store.clone());

    let err = gallery.characters().list().expect_err("malformed bucket must fail");
    assert_eq!(err.category(), ErrorCategory::Storage);
    match err.kind() {
        EstudioErrorKind::Storage(storage) => {
            assert!(matches!(storage.kind, StorageErrorKind::MalformedBucket { .. }))
        }
        other => panic!("Expected MalformedBucket, got {other:?}"),
    }

    assert!(gallery.characters().save(luna()?).is_err());
    assert_eq!(store.get(CHARACTERS_KEY)?.as_deref(), Some("{not json"));
    Ok(())
}

#[test]
fn test_propagandas_share_the_aggregate_with_the_theme() -> anyhow::Result<()> {
    let store = Arc::new(MemoryKeyValueStore::new());
    let gallery = Gallery::new(store.clone());
    let app_state = gallery.app_state();

    assert_eq!(app_state.theme()?, Theme::System);
    app_state.set_theme(Theme::Dark)?;

    let propaganda = Propaganda::new(
        "Café Serra Azul",
        "Café especial mineiro",
        ToneOfVoice::Friendly,
        CommercialDuration::Short,
    );
    app_state.propagandas().save(propaganda.clone())?;

    assert_eq!(app_state.theme()?, Theme::Dark);
    assert_eq!(gallery.propagandas().list()?, vec![propaganda]);

    let raw: serde_json::Value =
        serde_json::from_str(&store.get(APP_STATE_KEY)?.unwrap_or_default())?;
    assert_eq!(raw["theme"], "dark");
    assert_eq!(raw["propagandas"].as_array().map(Vec::len), Some(1));
    Ok(())
}

#[tokio::test]
async fn test_mutations_notify_their_category() -> anyhow::Result<()> {
    let gallery = Gallery::in_memory();
    let mut characters = gallery.subscribe(GalleryCategory::Characters);
    let luna = luna()?;

    gallery.characters().save(luna.clone())?;
    gallery.characters().delete(&luna.id)?;

    let saved = characters.recv().await.expect("saved event");
    assert_eq!(saved.change, GalleryChange::Saved);
    assert_eq!(saved.id, luna.id);
    let deleted = characters.recv().await.expect("deleted event");
    assert_eq!(deleted.change, GalleryChange::Deleted);
    Ok(())
}

#[test]
fn test_exports() -> anyhow::Result<()> {
    let gallery = Gallery::in_memory();
    let luna = luna()?;
    gallery.characters().save(luna.clone())?;
    let draft: SceneDraft = serde_json::from_value(scene_draft_json())?;
    let scene = Scene::new(draft, SceneDuration::Eight, VideoFormat::Vertical);
    gallery.scenes().save(scene.clone())?;

    let json = gallery.export_collection(GalleryCategory::Characters, ExportFormat::Json)?;
    let parsed: Vec<Character> = serde_json::from_str(&json)?;
    assert_eq!(parsed, vec![luna.clone()]);

    let csv = gallery.export_collection(GalleryCategory::Characters, ExportFormat::Csv)?;
    let mut lines = csv.lines();
    let header = lines.next().unwrap_or_default();
    assert!(header.split(',').any(|column| column == "name"));
    assert!(header.split(',').any(|column| column == "physicalAppearance"));
    let row = lines.next().unwrap_or_default();
    assert!(row.contains("Luna"));
    assert!(row.contains("\"Cabelos cacheados ruivos, olhos verdes, sardas\""));

    let one = gallery.export_entity(GalleryCategory::Scenes, &scene.id, ExportFormat::Json)?;
    assert!(one.contains("Cafeteria ensolarada"));

    assert!(
        gallery
            .export_collection(GalleryCategory::Scenes, ExportFormat::Csv)
            .is_err()
    );
    assert!(
        gallery
            .export_entity(GalleryCategory::Characters, &"faltando".into(), ExportFormat::Json)
            .is_err()
    );

    let dir = tempfile::tempdir()?;
    let path = dir.path().join("personagens.csv");
    write_export(&path, &csv)?;
    assert_eq!(std::fs::read_to_string(&path)?, csv);
    Ok(())
}
