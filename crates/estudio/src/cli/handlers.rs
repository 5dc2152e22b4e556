//! Command handlers.

use super::commands::{
    CharacterCommands, Cli, Commands, GalleryCommands, OutputFormat, PropagandaArgs,
    PropagandaCommands, SceneCommands, ThemeCommands, ThumbnailCommands,
};
use super::media::{read_data_uri, write_image};
use estudio_app::{ActivationGate, EstudioApp, EstudioConfig, FeatureContext, NotificationCenter};
use estudio_core::{
    CommercialDuration, EntityId, Gender, Platform, SceneDuration, Theme, ThumbnailStyle,
    ToneOfVoice, VideoFormat,
};
use estudio_error::{
    ConfigError, EstudioResult, JsonError, SchemaErrorKind, SchemaValidationError,
};
use estudio_flows::{
    CharacterFromIdeaInput, CharacterFromImageInput, SeoFromMediaInput, SeoMetadataInput,
    ThumbnailPackInput, TranscribeMediaInput,
};
use estudio_gallery::{ExportFormat, Gallery, GalleryCategory};
use estudio_models::GeminiClient;
use serde::Serialize;
use std::fmt::Display;
use std::str::FromStr;
use std::sync::Arc;
use strum::IntoEnumIterator;
use tracing::{debug, info, instrument};

/// Parse a closed choice, naming the allowed values on failure.
fn parse_choice<T>(field: &str, value: &str) -> EstudioResult<T>
where
    T: FromStr + IntoEnumIterator + Display,
{
    T::from_str(value).map_err(|_| {
        let allowed = T::iter().map(|v| v.to_string()).collect::<Vec<_>>().join(", ");
        SchemaValidationError::new(
            field,
            SchemaErrorKind::UnknownVariant {
                value: value.to_string(),
                allowed,
            },
        )
        .into()
    })
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> EstudioResult<()> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| JsonError::new(format!("Failed to format output: {}", e)))?;
    println!("{}", json);
    Ok(())
}

fn drain(notifications: &mut tokio::sync::broadcast::Receiver<estudio_app::Notification>) {
    while let Ok(notification) = notifications.try_recv() {
        eprintln!("{}", notification);
    }
}

/// Execute a parsed command line.
#[instrument(skip_all)]
pub async fn run(cli: Cli) -> EstudioResult<()> {
    let mut config = EstudioConfig::load()?;
    if let Some(dir) = &cli.data_dir {
        config = config.with_data_dir(dir.to_string_lossy());
    }
    let gallery = Gallery::open(config.data_dir())?;
    let gate = ActivationGate::new(Arc::clone(gallery.store()));

    if !cli.command.allowed_before_activation() && !gate.is_activated()? {
        return Err(ConfigError::new(
            "Estúdio não está ativado. Use `estudio activate <chave>` primeiro.",
        )
        .into());
    }

    match cli.command {
        Commands::Activate { key } => {
            if gate.check_key(&key)? {
                println!("Estúdio ativado. Bom trabalho!");
            } else {
                println!("Chave inválida. Confira e tente novamente.");
            }
            Ok(())
        }
        Commands::Deactivate => {
            gate.deactivate()?;
            println!("Chave removida.");
            Ok(())
        }
        Commands::Gallery(cmd) => {
            let notifications = NotificationCenter::default();
            let mut receiver = notifications.subscribe();
            let browser = estudio_app::GalleryBrowser::new(
                gallery,
                estudio_app::EditorChannel::default(),
                notifications,
            );
            let result = handle_gallery(&browser, cmd);
            drain(&mut receiver);
            result
        }
        Commands::Theme(cmd) => handle_theme(&gallery, cmd),
        command => {
            let driver = Arc::new(config.gemini_client()?);
            let context = FeatureContext::new(config.executor(driver), gallery)
                .with_timeout(config.task_timeout());
            let mut receiver = context.notifications().subscribe();
            let app = EstudioApp::new(context);
            let result = handle_generation(&app, command).await;
            drain(&mut receiver);
            result
        }
    }
}

async fn handle_generation(app: &EstudioApp<GeminiClient>, command: Commands) -> EstudioResult<()> {
    match command {
        Commands::Character(cmd) => handle_character(app, cmd).await,
        Commands::Scene(cmd) => handle_scene(app, cmd).await,
        Commands::Propaganda(cmd) => handle_propaganda(app, cmd).await,
        Commands::Thumbnail(cmd) => handle_thumbnail(app, cmd).await,
        Commands::Transcribe { file, language } => {
            let input = TranscribeMediaInput {
                media_data_uri: read_data_uri(&file)?,
                language,
            };
            let transcript = app.transcriber().transcribe(input).await?;
            println!("{}", transcript.transcript);
            Ok(())
        }
        Commands::Seo {
            topic,
            platform,
            niche,
            media,
        } => {
            let platform: Platform = parse_choice("platform", &platform)?;
            match media {
                Some(file) => {
                    let input = SeoFromMediaInput {
                        media_data_uri: read_data_uri(&file)?,
                        language: None,
                        video_topic: topic,
                        platform,
                        niche,
                    };
                    print_json(&app.transcriber().transcribe_and_seo(input).await?)
                }
                None => {
                    let input = SeoMetadataInput {
                        video_topic: topic,
                        platform,
                        transcript: None,
                        niche,
                    };
                    print_json(&app.transcriber().seo(input).await?)
                }
            }
        }
        other => {
            debug!(command = ?other, "Not a generation command");
            Ok(())
        }
    }
}

async fn handle_character(
    app: &EstudioApp<GeminiClient>,
    cmd: CharacterCommands,
) -> EstudioResult<()> {
    let builder = app.characters();
    let save = match cmd {
        CharacterCommands::FromImage {
            photo,
            niche,
            name,
            save,
        } => {
            let input = CharacterFromImageInput {
                photo_data_uri: read_data_uri(&photo)?,
                niche,
                name_hint: name,
            };
            print_json(&builder.from_image(input).await?)?;
            save
        }
        CharacterCommands::FromIdea {
            niche,
            idea,
            gender,
            age_range,
            save,
        } => {
            let gender = gender
                .map(|g| parse_choice::<Gender>("gender", &g))
                .transpose()?;
            let input = CharacterFromIdeaInput {
                niche,
                idea,
                gender,
                age_range,
            };
            print_json(&builder.from_idea(input).await?)?;
            save
        }
    };
    if save {
        builder.save()?;
    }
    Ok(())
}

async fn handle_scene(app: &EstudioApp<GeminiClient>, cmd: SceneCommands) -> EstudioResult<()> {
    let SceneCommands::FromIdea {
        idea,
        character,
        format,
        duration,
        video_prompt,
        save,
    } = cmd;

    let builder = app.scenes();
    let format: VideoFormat = parse_choice("videoFormat", &format)?;
    let duration = duration
        .map(|d| parse_choice::<SceneDuration>("duration", &d))
        .transpose()?;
    if let Some(id) = character {
        builder.select_character(&EntityId::from(id))?;
    }

    let scene = builder.from_idea(idea, format, duration).await?;
    print_json(&scene)?;
    if video_prompt {
        println!("{}", builder.video_prompt().await?);
    }
    if save {
        builder.save()?;
    }
    Ok(())
}

async fn handle_propaganda(
    app: &EstudioApp<GeminiClient>,
    cmd: PropagandaCommands,
) -> EstudioResult<()> {
    let (args, with_script) = match cmd {
        PropagandaCommands::Narration(args) => (args, false),
        PropagandaCommands::Script(args) => (args, true),
    };
    let PropagandaArgs {
        product,
        description,
        audience,
        message,
        tone,
        duration,
        image,
        save,
    } = args;

    let generator = app.propagandas();
    let tone = tone
        .map(|t| parse_choice::<ToneOfVoice>("tone", &t))
        .transpose()?;
    let duration: CommercialDuration = parse_choice("duration", &duration)?;
    let reference_image = image.map(|path| read_data_uri(&path)).transpose()?;

    generator.start(product, description, tone.unwrap_or(ToneOfVoice::Friendly), duration);
    generator.edit(|p| {
        p.reference_image = reference_image;
        if let Some(audience) = &audience {
            p.target_audience = audience.clone();
        }
    })?;

    if message.is_none() || audience.is_none() || tone.is_none() {
        let suggestion = generator.suggest_campaign().await?;
        info!(tone = %suggestion.tone, "Campaign suggested");
    }
    generator.edit(|p| {
        if let Some(audience) = audience {
            p.target_audience = audience;
        }
        if let Some(message) = message {
            p.main_message = message;
        }
        if let Some(tone) = tone {
            p.tone = tone;
        }
    })?;

    let narration = generator.narration().await?;
    println!("{}", narration);
    if with_script {
        print_json(&generator.script().await?)?;
    }
    if save {
        generator.save()?;
    }
    Ok(())
}

async fn handle_thumbnail(
    app: &EstudioApp<GeminiClient>,
    cmd: ThumbnailCommands,
) -> EstudioResult<()> {
    let ThumbnailCommands::Pack {
        title,
        description,
        style,
        photo,
        text,
        out,
    } = cmd;

    let style: ThumbnailStyle = parse_choice("style", &style)?;
    let input = ThumbnailPackInput {
        video_title: title,
        description,
        style,
        character_photo_data_uri: photo.map(|p| read_data_uri(&p)).transpose()?,
        overlay_text: text,
    };
    let pack = app.thumbnails().pack(input).await?;
    for (stem, image) in [
        ("thumbnail-referencia", &pack.reference),
        ("thumbnail-a", &pack.variant_a),
        ("thumbnail-b", &pack.variant_b),
    ] {
        let path = write_image(&out, stem, &image.image_data_uri)?;
        println!("{}", path.display());
    }
    Ok(())
}

fn handle_gallery(browser: &estudio_app::GalleryBrowser, cmd: GalleryCommands) -> EstudioResult<()> {
    match cmd {
        GalleryCommands::List { category, format } => {
            let category: GalleryCategory = parse_choice("category", &category)?;
            let items = browser.list(category)?;
            match format {
                OutputFormat::Json => {
                    let rows: Vec<_> = items
                        .iter()
                        .map(|item| serde_json::json!({ "id": item.id(), "title": item.title() }))
                        .collect();
                    print_json(&rows)
                }
                OutputFormat::Human => {
                    println!("{}:", category);
                    println!("{:-<80}", "");
                    for item in &items {
                        println!("{}  {}", item.id(), item.title());
                    }
                    println!("Total: {} itens", items.len());
                    Ok(())
                }
            }
        }
        GalleryCommands::Delete { category, id } => {
            let category: GalleryCategory = parse_choice("category", &category)?;
            let remaining = browser.delete(category, &EntityId::from(id))?;
            println!("Restam {} itens em {}.", remaining.len(), category);
            Ok(())
        }
        GalleryCommands::Export {
            category,
            out,
            id,
            format,
        } => {
            let category: GalleryCategory = parse_choice("category", &category)?;
            let format = ExportFormat::from_str(&format).map_err(|_| {
                SchemaValidationError::new(
                    "format",
                    SchemaErrorKind::UnknownVariant {
                        value: format.clone(),
                        allowed: "json, csv".to_string(),
                    },
                )
            })?;
            let id = id.map(EntityId::from);
            browser.export(category, id.as_ref(), format, &out)
        }
    }
}

fn handle_theme(gallery: &Gallery, cmd: ThemeCommands) -> EstudioResult<()> {
    let state = gallery.app_state();
    match cmd {
        ThemeCommands::Get => {
            println!("{}", state.theme()?);
            Ok(())
        }
        ThemeCommands::Set { theme } => {
            let theme: Theme = parse_choice("theme", &theme)?;
            state.set_theme(theme)?;
            println!("Tema: {}", theme);
            Ok(())
        }
    }
}
