//! Property tests for prompt rendering: every flow renders any valid input
//! without leaving a placeholder behind.

use estudio_core::{
    CharacterField, CharacterProfile, CommercialDuration, Gender, Input, Platform, Product,
    SceneDraft, SceneDuration, ThumbnailStyle, ThumbnailVariant, ToneOfVoice, VideoFormat,
};
use estudio_flows::*;
use estudio_testing::fixtures::{AUDIO_DATA_URI, PHOTO_DATA_URI};
use proptest::prelude::*;
use strum::IntoEnumIterator;

fn rendered_parts<F: Flow>(flow: &F, input: &F::Input) -> Vec<Input> {
    let template = PromptTemplate::parse(flow.template()).expect("template parses");
    let context = flow.prompt_context(input).expect("context builds");
    template.render(&context).expect("valid input renders")
}

fn rendered_text<F: Flow>(flow: &F, input: &F::Input) -> String {
    rendered_parts(flow, input)
        .iter()
        .filter_map(|part| part.as_text())
        .collect::<Vec<_>>()
        .join("\n")
}

fn image_count(parts: &[Input]) -> usize {
    parts
        .iter()
        .filter(|part| matches!(part, Input::Image { .. }))
        .count()
}

fn no_placeholders(prompt: &str) -> bool {
    !prompt.contains("{{") && !prompt.contains("}}")
}

fn text() -> impl Strategy<Value = String> {
    "[A-Za-zÀ-ú0-9]([A-Za-zÀ-ú0-9 ,.!?-]{0,38}[A-Za-zÀ-ú0-9.!?])?"
}

fn optional_text() -> impl Strategy<Value = Option<String>> {
    prop::option::of(text())
}

fn maybe_blank() -> impl Strategy<Value = String> {
    prop_oneof![Just(String::new()), text()]
}

fn one_of<T: IntoEnumIterator + Clone + std::fmt::Debug + 'static>() -> impl Strategy<Value = T> {
    prop::sample::select(T::iter().collect::<Vec<_>>())
}

prop_compose! {
    fn profile()(
        name in text(),
        niche in text(),
        personality in text(),
        physical_appearance in text(),
        clothing_style in text(),
        biography in text(),
        unique_traits in text(),
        accent in text(),
        age in text(),
        gender in one_of::<Gender>(),
    ) -> CharacterProfile {
        CharacterProfile {
            name,
            niche,
            personality,
            physical_appearance,
            clothing_style,
            biography,
            unique_traits,
            accent,
            age,
            gender,
        }
    }
}

prop_compose! {
    fn scene_draft()(
        setting in text(),
        main_action in text(),
        dialogue in maybe_blank(),
        camera_angle in text(),
    ) -> SceneDraft {
        SceneDraft { setting, main_action, dialogue, camera_angle }
    }
}

prop_compose! {
    fn featured_product()(name in text(), brand in maybe_blank(), description in text()) -> Product {
        Product { name, brand, description }
    }
}

proptest! {
    #[test]
    fn character_from_image_prompt_is_complete(
        niche in optional_text(),
        name_hint in optional_text(),
    ) {
        let input = CharacterFromImageInput {
            photo_data_uri: PHOTO_DATA_URI.to_string(),
            niche,
            name_hint,
        };
        let parts = rendered_parts(&CharacterFromImageFlow, &input);
        prop_assert_eq!(image_count(&parts), 1);
        prop_assert!(no_placeholders(&rendered_text(&CharacterFromImageFlow, &input)));
    }

    #[test]
    fn character_from_idea_prompt_is_complete(
        niche in text(),
        idea in optional_text(),
        gender in prop::option::of(one_of::<Gender>()),
        age_range in optional_text(),
    ) {
        let input = CharacterFromIdeaInput { niche: niche.clone(), idea, gender, age_range };
        let prompt = rendered_text(&CharacterFromIdeaFlow, &input);
        prop_assert!(no_placeholders(&prompt));
        prop_assert!(prompt.contains(&niche));
    }

    #[test]
    fn refine_prompt_is_complete_for_every_field(
        character in profile(),
        field in one_of::<CharacterField>(),
        instruction in optional_text(),
    ) {
        let input = RefineCharacterFieldInput {
            character: character.clone(),
            field,
            instruction,
        };
        let prompt = rendered_text(&RefineCharacterFieldFlow, &input);
        prop_assert!(no_placeholders(&prompt));
        let quoted_label = format!("\"{}\"", field.label());
        prop_assert!(prompt.contains(&quoted_label));
        prop_assert!(prompt.contains(&character.name));
    }

    #[test]
    fn negative_prompt_prompt_is_complete(character in profile()) {
        let input = CharacterInput { character };
        prop_assert!(no_placeholders(&rendered_text(&CharacterNegativePromptFlow, &input)));
    }

    #[test]
    fn portrait_prompt_is_complete(character in profile(), style in optional_text()) {
        let input = CharacterPortraitInput { character, style };
        prop_assert!(no_placeholders(&rendered_text(&CharacterPortraitFlow, &input)));
    }

    #[test]
    fn scene_from_idea_prompt_is_complete(
        idea in text(),
        character in prop::option::of(profile()),
        video_format in one_of::<VideoFormat>(),
        duration in prop::option::of(one_of::<SceneDuration>()),
    ) {
        let input = SceneFromIdeaInput {
            idea: idea.clone(),
            character: character.clone(),
            video_format,
            duration,
        };
        let prompt = rendered_text(&SceneFromIdeaFlow, &input);
        prop_assert!(no_placeholders(&prompt));
        prop_assert!(prompt.contains(&idea));
        if let Some(character) = character {
            prop_assert!(prompt.contains(&character.name));
        }
    }

    #[test]
    fn scene_dialogue_prompt_is_complete(
        setting in text(),
        main_action in text(),
        character in profile(),
        tone in prop::option::of(one_of::<ToneOfVoice>()),
    ) {
        let input = SceneDialogueInput { setting, main_action, character, tone };
        prop_assert!(no_placeholders(&rendered_text(&SceneDialogueFlow, &input)));
    }

    #[test]
    fn video_prompt_is_complete(
        character in profile(),
        scene in scene_draft(),
        product in prop::option::of(featured_product()),
        seed in any::<u32>(),
        negative_prompt in optional_text(),
        video_format in one_of::<VideoFormat>(),
        duration in one_of::<SceneDuration>(),
        show_subtitles in any::<bool>(),
        show_on_screen_text in any::<bool>(),
    ) {
        let input = VideoPromptInput {
            character,
            scene: scene.clone(),
            product: product.clone(),
            seed,
            negative_prompt,
            video_format,
            duration,
            show_subtitles,
            show_on_screen_text,
        };
        let prompt = rendered_text(&VideoPromptFlow, &input);
        prop_assert!(no_placeholders(&prompt));
        prop_assert!(prompt.contains(&scene.main_action));
        prop_assert!(prompt.contains(&seed.to_string()));
        if let Some(product) = product {
            prop_assert!(prompt.contains(&product.name));
        }
    }

    #[test]
    fn product_from_image_prompt_is_complete(brand_hint in optional_text()) {
        let input = ProductFromImageInput {
            photo_data_uri: PHOTO_DATA_URI.to_string(),
            brand_hint,
        };
        prop_assert_eq!(image_count(&rendered_parts(&ProductFromImageFlow, &input)), 1);
        prop_assert!(no_placeholders(&rendered_text(&ProductFromImageFlow, &input)));
    }

    #[test]
    fn campaign_prompt_is_complete(
        product_name in text(),
        product_description in text(),
        target_audience in optional_text(),
    ) {
        let input = CampaignSuggestionInput {
            product_name: product_name.clone(),
            product_description,
            target_audience,
        };
        let prompt = rendered_text(&CampaignSuggestionFlow, &input);
        prop_assert!(no_placeholders(&prompt));
        prop_assert!(prompt.contains(&product_name));
    }

    #[test]
    fn narration_prompt_is_complete(
        product_name in text(),
        main_message in text(),
        target_audience in text(),
        tone in one_of::<ToneOfVoice>(),
        duration in one_of::<CommercialDuration>(),
    ) {
        let input = CommercialNarrationInput {
            product_name,
            main_message: main_message.clone(),
            target_audience,
            tone,
            duration,
        };
        let prompt = rendered_text(&CommercialNarrationFlow, &input);
        prop_assert!(no_placeholders(&prompt));
        prop_assert!(prompt.contains(&main_message));
    }

    #[test]
    fn script_prompt_is_complete(
        product_name in text(),
        product_description in text(),
        target_audience in text(),
        main_message in text(),
        tone in one_of::<ToneOfVoice>(),
        narration in optional_text(),
        with_image in any::<bool>(),
    ) {
        let input = CommercialScriptInput {
            product_name: product_name.clone(),
            product_description,
            target_audience,
            main_message,
            tone,
            duration: CommercialDuration::Medium,
            narration,
            reference_image_data_uri: with_image.then(|| PHOTO_DATA_URI.to_string()),
        };
        let prompt = rendered_text(&CommercialScriptFlow, &input);
        prop_assert!(no_placeholders(&prompt));
        prop_assert!(prompt.contains(&product_name));
        let images = image_count(&rendered_parts(&CommercialScriptFlow, &input));
        prop_assert_eq!(images, usize::from(with_image));
    }

    #[test]
    fn thumbnail_reference_prompt_is_complete(
        video_title in text(),
        description in optional_text(),
        style in one_of::<ThumbnailStyle>(),
        with_photo in any::<bool>(),
    ) {
        let input = ThumbnailReferenceInput {
            video_title: video_title.clone(),
            description,
            style,
            character_photo_data_uri: with_photo.then(|| PHOTO_DATA_URI.to_string()),
        };
        let prompt = rendered_text(&ThumbnailReferenceFlow, &input);
        prop_assert!(no_placeholders(&prompt));
        prop_assert!(prompt.contains(&video_title));
        let images = image_count(&rendered_parts(&ThumbnailReferenceFlow, &input));
        prop_assert_eq!(images, usize::from(with_photo));
    }

    #[test]
    fn thumbnail_variant_prompt_is_complete(
        video_title in text(),
        overlay_text in optional_text(),
        variant in one_of::<ThumbnailVariant>(),
    ) {
        let input = ThumbnailVariantInput {
            reference_image_data_uri: PHOTO_DATA_URI.to_string(),
            video_title,
            variant,
            overlay_text,
        };
        let prompt = rendered_text(&ThumbnailVariantFlow, &input);
        prop_assert!(no_placeholders(&prompt));
        prop_assert!(prompt.contains(variant.direction()));
    }

    #[test]
    fn headlines_prompt_is_complete(video_title in text(), niche in optional_text()) {
        let input = ThumbnailHeadlinesInput { video_title: video_title.clone(), niche };
        let prompt = rendered_text(&ThumbnailHeadlinesFlow, &input);
        prop_assert!(no_placeholders(&prompt));
        prop_assert!(prompt.contains(&video_title));
    }

    #[test]
    fn transcribe_prompt_is_complete(language in optional_text()) {
        let input = TranscribeMediaInput {
            media_data_uri: AUDIO_DATA_URI.to_string(),
            language,
        };
        prop_assert!(no_placeholders(&rendered_text(&TranscribeMediaFlow, &input)));
    }

    #[test]
    fn seo_prompt_is_complete(
        video_topic in text(),
        platform in one_of::<Platform>(),
        transcript in optional_text(),
        niche in optional_text(),
    ) {
        let input = SeoMetadataInput { video_topic: video_topic.clone(), platform, transcript, niche };
        let prompt = rendered_text(&SeoMetadataFlow, &input);
        prop_assert!(no_placeholders(&prompt));
        prop_assert!(prompt.contains(&video_topic));
    }
}

#[test]
fn test_every_template_parses() {
    let templates = [
        CharacterFromImageFlow.template(),
        CharacterFromIdeaFlow.template(),
        RefineCharacterFieldFlow.template(),
        CharacterNegativePromptFlow.template(),
        CharacterPortraitFlow.template(),
        SceneFromIdeaFlow.template(),
        SceneDialogueFlow.template(),
        VideoPromptFlow.template(),
        ProductFromImageFlow.template(),
        CampaignSuggestionFlow.template(),
        CommercialNarrationFlow.template(),
        CommercialScriptFlow.template(),
        ThumbnailReferenceFlow.template(),
        ThumbnailVariantFlow.template(),
        ThumbnailHeadlinesFlow.template(),
        TranscribeMediaFlow.template(),
        SeoMetadataFlow.template(),
    ];
    for template in templates {
        assert!(PromptTemplate::parse(template).is_ok(), "template failed: {template}");
    }
}
