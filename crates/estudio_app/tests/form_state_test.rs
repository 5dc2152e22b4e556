//! Form integrity while generations are in flight and when stored data is
//! unreadable.

use estudio_app::{
    CharacterBuilder, FeatureContext, NotificationLevel, PropagandaGenerator, SceneBuilder,
};
use estudio_core::{
    Character, CharacterField, CharacterProfile, CommercialDuration, EntityId, Scene, SceneDraft,
    SceneDuration, ToneOfVoice, VideoFormat,
};
use estudio_flows::FlowExecutor;
use estudio_gallery::{CHARACTERS_KEY, Gallery, KeyValueStore, MemoryKeyValueStore};
use estudio_testing::MockDriver;
use estudio_testing::fixtures::{character_profile_json, scene_draft_json};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

fn context_with(driver: MockDriver, gallery: Gallery) -> FeatureContext<MockDriver> {
    FeatureContext::new(FlowExecutor::new(Arc::new(driver)), gallery)
}

fn character(name: &str) -> anyhow::Result<Character> {
    let mut profile: CharacterProfile = serde_json::from_value(character_profile_json())?;
    profile.name = name.to_string();
    Ok(Character::new(profile, 42))
}

#[tokio::test]
async fn test_refine_result_does_not_land_on_newly_loaded_character() -> anyhow::Result<()> {
    let driver = MockDriver::json(json!({"value": "NOVA BIO DA LUNA"}))
        .with_delay(Duration::from_millis(300));
    let builder = CharacterBuilder::new(context_with(driver, Gallery::in_memory()));

    let luna = character("Luna")?;
    let kai = character("Kai")?;
    builder.load(luna.clone());

    let refining = {
        let builder = builder.clone();
        tokio::spawn(async move { builder.refine_field(CharacterField::Biography, None).await })
    };
    tokio::time::sleep(Duration::from_millis(50)).await;
    builder.load(kai.clone());

    let refined = refining.await??;
    assert_eq!(refined.id, luna.id);
    assert_eq!(refined.profile.biography, "NOVA BIO DA LUNA");

    let form = builder.form();
    let current = form.character.expect("Kai stays loaded");
    assert_eq!(current.profile.name, "Kai");
    assert_eq!(current.profile.biography, kai.profile.biography);
    Ok(())
}

#[tokio::test]
async fn test_refine_applies_when_character_unchanged() -> anyhow::Result<()> {
    let driver = MockDriver::json(json!({"value": "Bio reescrita"}));
    let builder = CharacterBuilder::new(context_with(driver, Gallery::in_memory()));
    builder.load(character("Luna")?);

    builder.refine_field(CharacterField::Biography, None).await?;

    let current = builder.form().character.expect("character loaded");
    assert_eq!(current.profile.biography, "Bio reescrita");
    Ok(())
}

#[tokio::test]
async fn test_narration_does_not_land_on_newer_commercial() -> anyhow::Result<()> {
    let driver = MockDriver::json(json!({"narration": "Locução do café"}))
        .with_delay(Duration::from_millis(300));
    let generator = PropagandaGenerator::new(context_with(driver, Gallery::in_memory()));

    generator.start(
        "Café Serra Azul",
        "Café especial de Minas",
        ToneOfVoice::Inspiring,
        CommercialDuration::Medium,
    );
    generator.edit(|p| {
        p.target_audience = "Amantes de café".to_string();
        p.main_message = "O sabor da manhã".to_string();
    })?;

    let narrating = {
        let generator = generator.clone();
        tokio::spawn(async move { generator.narration().await })
    };
    tokio::time::sleep(Duration::from_millis(50)).await;
    let tea = generator.start(
        "Chá da Serra",
        "Chá orgânico",
        ToneOfVoice::Inspiring,
        CommercialDuration::Short,
    );

    assert_eq!(narrating.await??, "Locução do café");
    let current = generator.form().propaganda.expect("tea commercial loaded");
    assert_eq!(current.id, tea.id);
    assert!(current.narration.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_scene_load_reports_unreadable_characters() -> anyhow::Result<()> {
    let store = Arc::new(MemoryKeyValueStore::new());
    store.set(CHARACTERS_KEY, "{not json")?;
    let context = context_with(MockDriver::json(json!({})), Gallery::new(store));
    let mut notifications = context.notifications().subscribe();
    let builder = SceneBuilder::new(context);

    let draft: SceneDraft = serde_json::from_value(scene_draft_json())?;
    let mut scene = Scene::new(draft, SceneDuration::default(), VideoFormat::default());
    scene.character_id = Some(EntityId::new());
    builder.load(scene.clone());

    let notification = notifications.try_recv()?;
    assert_eq!(*notification.level(), NotificationLevel::Destructive);

    let form = builder.form();
    assert_eq!(form.scene, Some(scene));
    assert_eq!(form.character, None);
    Ok(())
}

#[tokio::test]
async fn test_scene_load_with_missing_character_is_quiet() -> anyhow::Result<()> {
    let context = context_with(MockDriver::json(json!({})), Gallery::in_memory());
    let mut notifications = context.notifications().subscribe();
    let builder = SceneBuilder::new(context);

    let draft: SceneDraft = serde_json::from_value(scene_draft_json())?;
    let mut scene = Scene::new(draft, SceneDuration::default(), VideoFormat::default());
    scene.character_id = Some(EntityId::new());
    builder.load(scene);

    assert!(notifications.try_recv().is_err());
    assert_eq!(builder.form().character, None);
    Ok(())
}
