//! CLI command definitions.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Estúdio - AI content studio for video creators
#[derive(Parser, Debug)]
#[command(name = "estudio")]
#[command(about = "Personagens, cenas, propagandas, thumbnails e SEO com IA", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Gallery directory (overrides configuration)
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Activate Estúdio with a license key
    Activate {
        /// License key
        key: String,
    },

    /// Remove the stored license key
    Deactivate,

    /// Create characters
    #[command(subcommand)]
    Character(CharacterCommands),

    /// Create scenes
    #[command(subcommand)]
    Scene(SceneCommands),

    /// Create commercials
    #[command(subcommand)]
    Propaganda(PropagandaCommands),

    /// Create thumbnails
    #[command(subcommand)]
    Thumbnail(ThumbnailCommands),

    /// Transcribe an audio or video file
    Transcribe {
        /// Media file
        file: PathBuf,

        /// Spoken language hint (e.g. pt-BR)
        #[arg(long)]
        language: Option<String>,
    },

    /// Write title, description, tags and hashtags for a video
    Seo {
        /// What the video is about
        #[arg(long)]
        topic: String,

        /// Target platform
        #[arg(long, default_value = "YouTube")]
        platform: String,

        /// Channel niche
        #[arg(long)]
        niche: Option<String>,

        /// Transcribe this media file first and use the transcript
        #[arg(long)]
        media: Option<PathBuf>,
    },

    /// Browse the local gallery
    #[command(subcommand)]
    Gallery(GalleryCommands),

    /// Read or change the colour theme
    #[command(subcommand)]
    Theme(ThemeCommands),
}

/// Character subcommands
#[derive(Subcommand, Debug)]
pub enum CharacterCommands {
    /// Create a character inspired by a photo
    FromImage {
        /// Photo file
        photo: PathBuf,

        /// Content niche
        #[arg(long)]
        niche: Option<String>,

        /// Suggested name
        #[arg(long)]
        name: Option<String>,

        /// Save to the gallery
        #[arg(long)]
        save: bool,
    },

    /// Create a character from a niche and an idea
    FromIdea {
        /// Content niche
        #[arg(long)]
        niche: String,

        /// Free-form idea
        #[arg(long)]
        idea: Option<String>,

        /// Gender (Feminino, Masculino, Não-binário)
        #[arg(long)]
        gender: Option<String>,

        /// Age range (e.g. "25 a 30 anos")
        #[arg(long)]
        age_range: Option<String>,

        /// Save to the gallery
        #[arg(long)]
        save: bool,
    },
}

/// Scene subcommands
#[derive(Subcommand, Debug)]
pub enum SceneCommands {
    /// Draft a scene from an idea
    FromIdea {
        /// One-line idea
        idea: String,

        /// Gallery id of the character in the scene
        #[arg(long)]
        character: Option<String>,

        /// Aspect ratio (9:16, 16:9, 1:1)
        #[arg(long, default_value = "9:16")]
        format: String,

        /// Clip length (5s, 8s, 15s)
        #[arg(long)]
        duration: Option<String>,

        /// Also build the final video prompt (requires --character)
        #[arg(long)]
        video_prompt: bool,

        /// Save to the gallery
        #[arg(long)]
        save: bool,
    },
}

/// Commercial subcommands
#[derive(Subcommand, Debug)]
pub enum PropagandaCommands {
    /// Write a voice-over narration
    Narration(PropagandaArgs),

    /// Write a full commercial script
    Script(PropagandaArgs),
}

/// Product and campaign details shared by the commercial commands
#[derive(clap::Args, Debug)]
pub struct PropagandaArgs {
    /// Product name
    #[arg(long)]
    pub product: String,

    /// Product description
    #[arg(long)]
    pub description: String,

    /// Target audience (suggested when omitted)
    #[arg(long)]
    pub audience: Option<String>,

    /// Main message (suggested when omitted)
    #[arg(long)]
    pub message: Option<String>,

    /// Tone of voice (suggested when omitted)
    #[arg(long)]
    pub tone: Option<String>,

    /// Commercial length (15s, 30s, 60s)
    #[arg(long, default_value = "30s")]
    pub duration: String,

    /// Reference image file
    #[arg(long)]
    pub image: Option<PathBuf>,

    /// Save to the gallery
    #[arg(long)]
    pub save: bool,
}

/// Thumbnail subcommands
#[derive(Subcommand, Debug)]
pub enum ThumbnailCommands {
    /// Generate a reference thumbnail plus variants A and B
    Pack {
        /// Video title
        #[arg(long)]
        title: String,

        /// Video description
        #[arg(long)]
        description: Option<String>,

        /// Visual style (Chamativo, Minimalista, Cinematográfico)
        #[arg(long, default_value = "Chamativo")]
        style: String,

        /// Photo of the presenter
        #[arg(long)]
        photo: Option<PathBuf>,

        /// Text to place on the variants
        #[arg(long)]
        text: Option<String>,

        /// Directory for the generated images
        #[arg(long, default_value = ".")]
        out: PathBuf,
    },
}

/// Gallery subcommands
#[derive(Subcommand, Debug)]
pub enum GalleryCommands {
    /// List saved entries
    List {
        /// Category (personagens, cenas, produtos, propagandas)
        category: String,

        /// Output format
        #[arg(long, default_value = "human")]
        format: OutputFormat,
    },

    /// Delete an entry
    Delete {
        /// Category
        category: String,

        /// Entry id
        id: String,
    },

    /// Export one entry or a whole category
    Export {
        /// Category
        category: String,

        /// Destination file
        #[arg(long)]
        out: PathBuf,

        /// Entry id; the whole category when omitted
        #[arg(long)]
        id: Option<String>,

        /// File format (json, csv)
        #[arg(long, default_value = "json")]
        format: String,
    },
}

/// Theme subcommands
#[derive(Subcommand, Debug)]
pub enum ThemeCommands {
    /// Print the current theme
    Get,

    /// Change the theme
    Set {
        /// light, dark or system
        theme: String,
    },
}

/// Output format options
#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum OutputFormat {
    /// Human-readable format
    Human,
    /// JSON format
    Json,
}

impl Commands {
    /// Whether the command may run before activation.
    pub fn allowed_before_activation(&self) -> bool {
        matches!(self, Commands::Activate { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_character_from_idea() {
        let cli = Cli::try_parse_from([
            "estudio",
            "--verbose",
            "character",
            "from-idea",
            "--niche",
            "Moda",
            "--save",
        ])
        .unwrap();
        assert!(cli.verbose);
        match cli.command {
            Commands::Character(CharacterCommands::FromIdea { niche, save, .. }) => {
                assert_eq!(niche, "Moda");
                assert!(save);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_only_activate_runs_before_activation() {
        let activate = Cli::try_parse_from(["estudio", "activate", "abc"]).unwrap();
        assert!(activate.command.allowed_before_activation());

        let list = Cli::try_parse_from(["estudio", "gallery", "list", "personagens"]).unwrap();
        assert!(!list.command.allowed_before_activation());
    }

    #[test]
    fn test_global_data_dir() {
        let cli = Cli::try_parse_from(["estudio", "theme", "get", "--data-dir", "/tmp/x"]).unwrap();
        assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/x")));
    }
}
