//! Closed enumerations used by flows and gallery entities.
//!
//! Every enum serializes with the Portuguese label shown to users. Parsing
//! also accepts an unaccented spelling so the CLI can be driven from any
//! keyboard.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Tone of voice for commercial copy.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    JsonSchema,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum ToneOfVoice {
    /// Amigável
    #[serde(rename = "Amigável")]
    #[strum(to_string = "Amigável", serialize = "amigavel")]
    Friendly,
    /// Profissional
    #[serde(rename = "Profissional")]
    #[strum(to_string = "Profissional")]
    Professional,
    /// Divertido
    #[serde(rename = "Divertido")]
    #[strum(to_string = "Divertido")]
    Playful,
    /// Inspirador
    #[serde(rename = "Inspirador")]
    #[strum(to_string = "Inspirador")]
    Inspiring,
    /// Urgente
    #[serde(rename = "Urgente")]
    #[strum(to_string = "Urgente")]
    Urgent,
    /// Luxuoso
    #[serde(rename = "Luxuoso")]
    #[strum(to_string = "Luxuoso")]
    Luxurious,
}

/// Length of a commercial.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    JsonSchema,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
pub enum CommercialDuration {
    /// 15 seconds
    #[serde(rename = "15s")]
    #[strum(to_string = "15s", serialize = "15")]
    Short,
    /// 30 seconds
    #[serde(rename = "30s")]
    #[strum(to_string = "30s", serialize = "30")]
    Medium,
    /// 60 seconds
    #[serde(rename = "60s")]
    #[strum(to_string = "60s", serialize = "60")]
    Long,
}

impl CommercialDuration {
    /// Duration in seconds.
    pub fn seconds(self) -> u32 {
        match self {
            CommercialDuration::Short => 15,
            CommercialDuration::Medium => 30,
            CommercialDuration::Long => 60,
        }
    }
}

/// Length of a generated video scene.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    JsonSchema,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
pub enum SceneDuration {
    /// 5 seconds
    #[serde(rename = "5s")]
    #[strum(to_string = "5s", serialize = "5")]
    Five,
    /// 8 seconds
    #[default]
    #[serde(rename = "8s")]
    #[strum(to_string = "8s", serialize = "8")]
    Eight,
    /// 15 seconds
    #[serde(rename = "15s")]
    #[strum(to_string = "15s", serialize = "15")]
    Fifteen,
}

/// Video aspect ratio.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    JsonSchema,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
pub enum VideoFormat {
    /// Vertical, for Reels / Shorts / TikTok
    #[default]
    #[serde(rename = "9:16")]
    #[strum(to_string = "9:16", serialize = "vertical")]
    Vertical,
    /// Horizontal, for YouTube
    #[serde(rename = "16:9")]
    #[strum(to_string = "16:9", serialize = "horizontal")]
    Horizontal,
    /// Square, for feeds
    #[serde(rename = "1:1")]
    #[strum(to_string = "1:1", serialize = "square")]
    Square,
}

/// Character gender.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    JsonSchema,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum Gender {
    /// Feminino
    #[serde(rename = "Feminino")]
    #[strum(to_string = "Feminino")]
    Female,
    /// Masculino
    #[serde(rename = "Masculino")]
    #[strum(to_string = "Masculino")]
    Male,
    /// Não-binário
    #[serde(rename = "Não-binário")]
    #[strum(to_string = "Não-binário", serialize = "nao-binario")]
    NonBinary,
}

/// Publishing platform for SEO metadata.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    JsonSchema,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum Platform {
    /// YouTube
    #[serde(rename = "YouTube")]
    #[strum(to_string = "YouTube")]
    YouTube,
    /// TikTok
    #[serde(rename = "TikTok")]
    #[strum(to_string = "TikTok")]
    TikTok,
    /// Instagram
    #[serde(rename = "Instagram")]
    #[strum(to_string = "Instagram")]
    Instagram,
}

/// Visual style of a thumbnail.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    JsonSchema,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum ThumbnailStyle {
    /// Chamativo
    #[default]
    #[serde(rename = "Chamativo")]
    #[strum(to_string = "Chamativo")]
    Bold,
    /// Minimalista
    #[serde(rename = "Minimalista")]
    #[strum(to_string = "Minimalista")]
    Minimal,
    /// Cinematográfico
    #[serde(rename = "Cinematográfico")]
    #[strum(to_string = "Cinematográfico", serialize = "cinematografico")]
    Cinematic,
}

/// Which of the two A/B thumbnail variants to produce.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    JsonSchema,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum ThumbnailVariant {
    /// Variant A: text-forward
    A,
    /// Variant B: face-forward
    B,
}

impl ThumbnailVariant {
    /// How this variant should differ from the reference.
    pub fn direction(self) -> &'static str {
        match self {
            ThumbnailVariant::A => {
                "destaque o texto: tipografia grande e legível, contraste máximo, rosto menor"
            }
            ThumbnailVariant::B => {
                "destaque o rosto: expressão intensa em close, pouco texto, fundo desfocado"
            }
        }
    }
}

/// Character profile fields that can be regenerated one at a time.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    JsonSchema,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum CharacterField {
    /// Name
    Name,
    /// Niche
    Niche,
    /// Personality
    Personality,
    /// Physical appearance
    PhysicalAppearance,
    /// Clothing style
    ClothingStyle,
    /// Biography
    Biography,
    /// Unique traits
    UniqueTraits,
    /// Accent
    Accent,
}

impl CharacterField {
    /// Portuguese label used in prompts.
    pub fn label(self) -> &'static str {
        match self {
            CharacterField::Name => "nome",
            CharacterField::Niche => "nicho",
            CharacterField::Personality => "personalidade",
            CharacterField::PhysicalAppearance => "aparência física",
            CharacterField::ClothingStyle => "estilo de roupa",
            CharacterField::Biography => "biografia",
            CharacterField::UniqueTraits => "traços únicos",
            CharacterField::Accent => "sotaque",
        }
    }
}

/// UI colour theme kept in the app state aggregate.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Theme {
    /// Light
    Light,
    /// Dark
    Dark,
    /// Follow the operating system
    #[default]
    System,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn labels_round_trip_through_serde() {
        for tone in ToneOfVoice::iter() {
            let json = serde_json::to_string(&tone).unwrap();
            assert_eq!(json, format!("\"{}\"", tone));
            assert_eq!(serde_json::from_str::<ToneOfVoice>(&json).unwrap(), tone);
        }
    }

    #[test]
    fn unaccented_spelling_parses() {
        assert_eq!(ToneOfVoice::from_str("amigavel").unwrap(), ToneOfVoice::Friendly);
        assert_eq!(Gender::from_str("nao-binario").unwrap(), Gender::NonBinary);
        assert_eq!(VideoFormat::from_str("16:9").unwrap(), VideoFormat::Horizontal);
        assert_eq!(CharacterField::from_str("physicalAppearance").unwrap(), CharacterField::PhysicalAppearance);
    }

    #[test]
    fn unknown_label_does_not_coerce() {
        assert!(serde_json::from_str::<ToneOfVoice>("\"Sarcástico\"").is_err());
        assert!(serde_json::from_str::<CommercialDuration>("\"45s\"").is_err());
    }
}
