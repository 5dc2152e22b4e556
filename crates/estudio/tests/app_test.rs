//! End-to-end use of the facade with a scripted model.

use estudio::{
    ActivationGate, EstudioApp, FeatureContext, FlowExecutor, Gallery, GalleryCategory,
    LICENSE_KEYS, ThumbnailPackInput, ThumbnailStyle,
};
use estudio_testing::{MockDriver, MockResponse};
use estudio_testing::fixtures::character_profile_json;
use std::sync::Arc;

#[tokio::test]
async fn test_activate_create_and_list() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let gallery = Gallery::open(dir.path())?;
    let gate = ActivationGate::new(Arc::clone(gallery.store()));
    assert!(gate.check_key(&LICENSE_KEYS[2].to_lowercase())?);

    let driver = Arc::new(MockDriver::json(character_profile_json()));
    let app = EstudioApp::new(FeatureContext::new(FlowExecutor::new(driver), gallery));
    assert!(app.activation().is_activated()?);

    app.characters()
        .from_idea(estudio::CharacterFromIdeaInput {
            niche: "Moda".to_string(),
            idea: None,
            gender: None,
            age_range: None,
        })
        .await?;
    app.characters().save()?;

    let items = app.gallery().list(GalleryCategory::Characters)?;
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].title(), "Luna");
    Ok(())
}

#[tokio::test]
async fn test_thumbnail_pack_runs_three_generations() -> anyhow::Result<()> {
    let driver = Arc::new(MockDriver::sequence(vec![
        MockResponse::png(&[1, 2, 3]),
        MockResponse::png(&[4]),
        MockResponse::png(&[5]),
    ]));
    let app = EstudioApp::new(FeatureContext::new(
        FlowExecutor::new(Arc::clone(&driver)),
        Gallery::in_memory(),
    ));

    let pack = app
        .thumbnails()
        .pack(ThumbnailPackInput {
            video_title: "Meu primeiro vlog".to_string(),
            description: None,
            style: ThumbnailStyle::Minimal,
            character_photo_data_uri: None,
            overlay_text: Some("VLOG #1".to_string()),
        })
        .await?;

    assert_eq!(pack.reference.image_data_uri, "data:image/png;base64,AQID");
    assert_eq!(driver.call_count(), 3);
    assert_eq!(app.thumbnails().form().pack, Some(pack));
    Ok(())
}
