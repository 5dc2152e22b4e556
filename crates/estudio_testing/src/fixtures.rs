//! Sample inputs shared across test suites.

use serde_json::{Value, json};

/// A tiny valid PNG-typed data URI.
pub const PHOTO_DATA_URI: &str = "data:image/png;base64,iVBORw0KGgo=";

/// A tiny valid audio data URI.
pub const AUDIO_DATA_URI: &str = "data:audio/mpeg;base64,SUQzBAAAAAAA";

/// A complete character profile as the model would return it.
pub fn character_profile_json() -> Value {
    json!({
        "name": "Luna",
        "niche": "Moda",
        "personality": "Extrovertida e acolhedora",
        "physicalAppearance": "Cabelos cacheados ruivos, olhos verdes, sardas",
        "clothingStyle": "Streetwear colorido",
        "biography": "Criadora de conteúdo de Salvador apaixonada por brechós",
        "uniqueTraits": "Sempre usa um lenço amarelo",
        "accent": "Baiano",
        "age": "26 anos",
        "gender": "Feminino"
    })
}

/// A complete commercial script as the model would return it.
pub fn commercial_script_json(script: &str) -> Value {
    json!({
        "title": "Café que acorda a cidade",
        "hook": "Você ainda toma café sem graça?",
        "script": script,
        "callToAction": "Peça já pelo app!"
    })
}

/// A complete scene draft as the model would return it.
pub fn scene_draft_json() -> Value {
    json!({
        "setting": "Cafeteria ensolarada no centro de São Paulo",
        "mainAction": "Luna prova um cappuccino e sorri para a câmera",
        "dialogue": "Gente, esse é o melhor café da cidade!",
        "cameraAngle": "Plano médio com leve travelling"
    })
}
