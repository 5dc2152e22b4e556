//! Concrete flows.
//!
//! Each flow is a unit struct; its input and output types live next to it.

mod character;
mod image;
mod media;
mod product;
mod propaganda;
mod scene;
mod thumbnail;

pub use character::{
    CharacterFromIdeaFlow, CharacterFromIdeaInput, CharacterFromImageFlow,
    CharacterFromImageInput, CharacterInput, CharacterNegativePromptFlow, CharacterPortraitFlow,
    CharacterPortraitInput, NegativePrompt, RefineCharacterFieldFlow, RefineCharacterFieldInput,
    RefinedField,
};
pub use image::GeneratedImage;
pub use media::{
    SeoMetadata, SeoMetadataFlow, SeoMetadataInput, TranscribeMediaFlow, TranscribeMediaInput,
    Transcript,
};
pub use product::{ProductFromImageFlow, ProductFromImageInput};
pub use propaganda::{
    CampaignSuggestion, CampaignSuggestionFlow, CampaignSuggestionInput, CommercialNarrationFlow,
    CommercialNarrationInput, CommercialScriptFlow, CommercialScriptInput, Narration,
    SCRIPT_CHAR_BUDGET, TRUNCATION_MARKER, truncate_script,
};
pub use scene::{
    SceneDialogue, SceneDialogueFlow, SceneDialogueInput, SceneFromIdeaFlow, SceneFromIdeaInput,
    VideoPrompt, VideoPromptFlow, VideoPromptInput,
};
pub use thumbnail::{
    ThumbnailHeadlines, ThumbnailHeadlinesFlow, ThumbnailHeadlinesInput, ThumbnailReferenceFlow,
    ThumbnailReferenceInput, ThumbnailVariantFlow, ThumbnailVariantInput,
};
