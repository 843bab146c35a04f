//! Command-line entry point.
//!
//! # Commands
//!
//! - `generate <file>` — convert a text or SRT file into WAV output.
//! - `preview` — synthesize a short sample with the configured voice.
//! - `voices` / `models` — ElevenLabs catalog listings.
//! - `keys add|list|remove|use` — manage stored API keys per provider.
//!
//! Configuration lives in `settings.toml`, credentials in `keys.json`
//! (see `config::AppPaths` for the platform locations).  After a
//! successful run the API key promoted by rotation is persisted as the
//! active one, so later runs skip keys that are already known bad.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};

use text_to_speech::audio::encode_wav;
use text_to_speech::config::{AppConfig, KeyStore, TtsProvider};
use text_to_speech::pipeline::{
    detect_input_kind, export_zip, run, write_outputs, AssemblyOptions, GenerationOutput,
};
use text_to_speech::tts::{create_engine, ElevenLabsEngine, KeyRing, RotatingEngine, SpeechSource};

/// Sample sentence spoken by the `preview` command.
const PREVIEW_TEXT: &str = "Xin chào, đây là bản xem trước giọng nói của tôi.";

// ---------------------------------------------------------------------------
// CLI definition
// ---------------------------------------------------------------------------

#[derive(Parser)]
#[command(
    name = "text-to-speech",
    about = "Convert text or SRT subtitle files into synthesized speech"
)]
struct Cli {
    /// Override the provider configured in settings.toml.
    #[arg(long, value_enum, global = true)]
    provider: Option<ProviderArg>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ProviderArg {
    Gemini,
    Elevenlabs,
}

impl From<ProviderArg> for TtsProvider {
    fn from(p: ProviderArg) -> Self {
        match p {
            ProviderArg::Gemini => TtsProvider::Gemini,
            ProviderArg::Elevenlabs => TtsProvider::ElevenLabs,
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// Generate speech from a text or SRT file.
    ///
    /// SRT input (detected by extension or content) produces one combined,
    /// timing-aligned WAV; plain text produces one WAV per non-blank line.
    Generate {
        /// Input file.
        input: PathBuf,
        /// Directory for the output WAV file(s).
        #[arg(short, long, default_value = ".")]
        output_dir: PathBuf,
        /// Also bundle the paragraph clips into audio_clips.zip.
        #[arg(long)]
        zip: bool,
    },
    /// Synthesize a short sample with the configured voice.
    Preview {
        /// Text to speak instead of the default sample sentence.
        #[arg(long)]
        text: Option<String>,
        /// Where to write the preview WAV.
        #[arg(short, long, default_value = "preview.wav")]
        output: PathBuf,
    },
    /// List ElevenLabs voices available to the active API key.
    Voices,
    /// List ElevenLabs models that support text-to-speech.
    Models,
    /// Manage stored API keys for the selected provider.
    Keys {
        #[command(subcommand)]
        action: KeysAction,
    },
}

#[derive(Subcommand)]
enum KeysAction {
    /// Store a new API key (the first stored key becomes active).
    Add { key: String },
    /// List stored keys with their ids (secrets are masked).
    List,
    /// Remove a key by id.
    Remove { id: u64 },
    /// Mark a key as the active one.
    Use { id: u64 },
}

// ---------------------------------------------------------------------------
// main
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let mut config = AppConfig::load().unwrap_or_else(|e| {
        log::warn!("Failed to load config ({e}); using defaults");
        AppConfig::default()
    });
    if let Some(provider) = cli.provider {
        config.provider = provider.into();
    }

    match cli.command {
        Command::Generate {
            input,
            output_dir,
            zip,
        } => generate(&config, &input, &output_dir, zip).await,
        Command::Preview { text, output } => preview(&config, text, &output).await,
        Command::Voices => voices(&config).await,
        Command::Models => models(&config).await,
        Command::Keys { action } => keys_command(config.provider, action),
    }
}

// ---------------------------------------------------------------------------
// generate
// ---------------------------------------------------------------------------

async fn generate(
    config: &AppConfig,
    input: &std::path::Path,
    output_dir: &std::path::Path,
    zip: bool,
) -> Result<()> {
    let content = std::fs::read_to_string(input)
        .with_context(|| format!("failed to read input file {}", input.display()))?;
    let kind = detect_input_kind(input, &content);

    let speech = build_speech(config)?;
    let options = AssemblyOptions::from_config(config);

    let output = run(&content, kind, &speech, &options).await?;
    let paths = write_outputs(&output, output_dir)?;

    match &output {
        GenerationOutput::Combined(report) => {
            println!(
                "wrote {} — {} cues, {} padded, {:.1}s",
                paths[0].display(),
                report.cue_count,
                report.skipped,
                report.final_clock_secs
            );
        }
        GenerationOutput::Clips(clips) => {
            let failed = clips.iter().filter(|c| c.wav.is_none()).count();
            println!(
                "wrote {} clip(s) to {}{}",
                paths.len(),
                output_dir.display(),
                if failed > 0 {
                    format!(" ({failed} failed to render)")
                } else {
                    String::new()
                }
            );
            if zip {
                let zip_path = output_dir.join("audio_clips.zip");
                export_zip(clips, &zip_path)?;
                println!("packaged clips into {}", zip_path.display());
            }
        }
    }

    if zip && matches!(output, GenerationOutput::Combined(_)) {
        log::warn!("--zip only applies to plain-text input; ignoring");
    }

    persist_active_key(config.provider, &speech);
    Ok(())
}

// ---------------------------------------------------------------------------
// preview
// ---------------------------------------------------------------------------

async fn preview(config: &AppConfig, text: Option<String>, output: &std::path::Path) -> Result<()> {
    let speech = build_speech(config)?;
    let options = AssemblyOptions::from_config(config);

    let sample = text.unwrap_or_else(|| PREVIEW_TEXT.to_string());
    let request = format!("{}{}", options.instruction_prefix, sample);

    let pcm = speech.speak(&request).await?;
    if pcm.is_empty() {
        bail!("the provider returned no audio for the preview text");
    }

    std::fs::write(output, encode_wav(&pcm)?)
        .with_context(|| format!("failed to write {}", output.display()))?;
    println!("wrote voice preview to {}", output.display());

    persist_active_key(config.provider, &speech);
    Ok(())
}

// ---------------------------------------------------------------------------
// voices / models  (ElevenLabs catalog)
// ---------------------------------------------------------------------------

async fn voices(config: &AppConfig) -> Result<()> {
    let (engine, api_key) = elevenlabs_with_key(config)?;
    let voices = engine.list_voices(&api_key).await?;

    if voices.is_empty() {
        println!("no voices available to this API key");
        return Ok(());
    }
    for voice in voices {
        println!("{}  {}", voice.voice_id, voice.name);
    }
    Ok(())
}

async fn models(config: &AppConfig) -> Result<()> {
    let (engine, api_key) = elevenlabs_with_key(config)?;
    let models = engine.list_models(&api_key).await?;

    if models.is_empty() {
        println!("no text-to-speech models available to this API key");
        return Ok(());
    }
    for model in models {
        println!(
            "{}  {}{}",
            model.model_id,
            model.name,
            model
                .description
                .map(|d| format!(" — {d}"))
                .unwrap_or_default()
        );
    }
    Ok(())
}

fn elevenlabs_with_key(config: &AppConfig) -> Result<(ElevenLabsEngine, String)> {
    let store = KeyStore::load()?;
    let keys = store.for_provider(TtsProvider::ElevenLabs);
    let Some(active) = keys.keys.get(keys.active_index()) else {
        bail!("no ElevenLabs API keys configured — add one with `text-to-speech keys add`");
    };
    Ok((
        ElevenLabsEngine::from_config(&config.elevenlabs),
        active.key.clone(),
    ))
}

// ---------------------------------------------------------------------------
// keys
// ---------------------------------------------------------------------------

fn keys_command(provider: TtsProvider, action: KeysAction) -> Result<()> {
    let mut store = KeyStore::load()?;
    let list = store.for_provider_mut(provider);

    match action {
        KeysAction::Add { key } => {
            let id = list.add(key);
            store.save()?;
            println!("stored key #{id}");
        }
        KeysAction::List => {
            if list.keys.is_empty() {
                println!("no keys stored for {provider:?}");
                return Ok(());
            }
            let active = list.active_id;
            for key in &list.keys {
                let marker = if active == Some(key.id) { "*" } else { " " };
                println!("{marker} #{:<3} {}", key.id, mask_key(&key.key));
            }
        }
        KeysAction::Remove { id } => {
            if !list.remove(id) {
                bail!("no key with id {id}");
            }
            store.save()?;
            println!("removed key #{id}");
        }
        KeysAction::Use { id } => {
            if !list.set_active(id) {
                bail!("no key with id {id}");
            }
            store.save()?;
            println!("key #{id} is now active");
        }
    }
    Ok(())
}

/// Show only the edges of a secret: `sk-a…wxyz`.
fn mask_key(key: &str) -> String {
    if key.len() <= 8 {
        return "…".to_string();
    }
    format!("{}…{}", &key[..4], &key[key.len() - 4..])
}

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

/// Build the rotating speech source for the configured provider, or fail
/// with a hint when no keys are stored.
fn build_speech(config: &AppConfig) -> Result<RotatingEngine> {
    let store = KeyStore::load()?;
    let keys = store.for_provider(config.provider);
    if keys.is_empty() {
        bail!(
            "no API keys configured for {:?} — add one with `text-to-speech keys add`",
            config.provider
        );
    }

    let ring = KeyRing::new(keys.secrets(), keys.active_index())?;
    Ok(RotatingEngine::new(create_engine(config), ring))
}

/// Persist the key promoted by rotation as the active one (best effort).
fn persist_active_key(provider: TtsProvider, speech: &RotatingEngine) {
    let mut store = match KeyStore::load() {
        Ok(store) => store,
        Err(e) => {
            log::warn!("could not reload key store to persist active key: {e}");
            return;
        }
    };

    let list = store.for_provider_mut(provider);
    let index = speech.ring().active_index();
    let Some(id) = list.keys.get(index).map(|k| k.id) else {
        return;
    };

    if list.active_id != Some(id) {
        list.set_active(id);
        match store.save() {
            Ok(()) => log::info!("active API key is now #{id}"),
            Err(e) => log::warn!("failed to persist active API key: {e}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
