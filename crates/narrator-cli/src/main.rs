mod settings;

use anyhow::{Context, Result};
use clap::Parser;
use narrator_batch::{BatchRunner, ExecutionMode, LanguageTable, OutputFormat, RunSummary};
use settings::{Overrides, Settings};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "narrator")]
#[command(about = "Narrator - Compile folders of text files into speech tracks", long_about = None)]
struct Cli {
    /// TOML settings file (run options plus an [engine] table)
    #[arg(short, long)]
    settings: Option<PathBuf>,

    /// Root folder holding the text files
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Folder receiving tracks and the manifest
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// JSON language table
    #[arg(short, long)]
    languages: Option<PathBuf>,

    /// "by_folder" for one batch per language subfolder, or a language key
    /// to treat the input folder as a single batch
    #[arg(short, long)]
    mode: Option<ExecutionMode>,

    /// Output container (wav or mp3)
    #[arg(short, long)]
    format: Option<OutputFormat>,
}

/// Load the language table and engine named by `settings`, then run every batch
fn narrate(settings: Settings) -> Result<RunSummary> {
    let Settings {
        run: config,
        engine,
    } = settings;
    config.validate().context("Invalid run configuration")?;

    let languages = LanguageTable::load(&config.languages_file, &config.fallback_language)
        .context("Failed to load language configuration")?;
    log::info!(
        "Loaded {} language profiles from {:?}",
        languages.len(),
        config.languages_file
    );

    let engine = engine.build()?;
    let model = engine.model_info();
    log::info!(
        "Engine '{}' ready: {} ({} Hz)",
        engine.provider_name(),
        model.name,
        engine.default_sample_rate()
    );
    if let Some(description) = &model.description {
        log::debug!("Engine details: {description}");
    }
    log::info!("Execution mode: {}", config.mode);

    BatchRunner::new(&config, &languages, &*engine)
        .run()
        .context("Narration run failed")
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let mut settings = match &cli.settings {
        Some(path) => {
            log::info!("Loading settings from {:?}", path);
            Settings::load(path)?
        }
        None => Settings::default(),
    };
    settings.apply(Overrides {
        input: cli.input,
        output: cli.output,
        languages: cli.languages,
        mode: cli.mode,
        format: cli.format,
    });

    let summary = narrate(settings)?;

    println!(
        "Narrated {} file(s) from {} batch(es); manifest written to {}",
        summary.manifest.len(),
        summary.batches,
        summary.manifest_path.display()
    );
    if summary.skipped_files > 0 {
        println!("{} file(s) produced no audio", summary.skipped_files);
    }

    Ok(())
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::fs;

    /// Prints a 0.1 s silent 24 kHz WAV regardless of input
    const WAV_SCRIPT: &str = r"cat >/dev/null; printf 'RIFF\344\022\000\000WAVEfmt \020\000\000\000\001\000\001\000\300\135\000\000\200\273\000\000\002\000\020\000data\300\022\000\000'; head -c 4800 /dev/zero";

    fn write_settings(root: &std::path::Path) -> PathBuf {
        let dir = root.display();
        let settings = format!(
            r#"input_dir = '{dir}/input'
output_dir = '{dir}/output'
languages_file = '{dir}/languages.json'
output_format = "mp3"

[engine]
kind = "command"
program = "sh"
args = ["-c", '''{WAV_SCRIPT}''']
"#
        );
        let path = root.join("narrator.toml");
        fs::write(&path, settings).unwrap();
        path
    }

    #[test]
    fn test_settings_file_drives_full_run() {
        let root = tempfile::tempdir().unwrap();
        fs::create_dir_all(root.path().join("input/en")).unwrap();
        fs::write(root.path().join("input/en/hello.txt"), "Hello.").unwrap();
        fs::write(
            root.path().join("languages.json"),
            r#"{"en": {"lang_code": "en", "voice": "en-us"}}"#,
        )
        .unwrap();

        let mut settings = Settings::load(&write_settings(root.path())).unwrap();
        settings.apply(Overrides {
            format: Some(OutputFormat::Wav),
            ..Default::default()
        });
        let summary = narrate(settings).unwrap();

        assert_eq!(summary.batches, 1);
        assert_eq!(summary.skipped_files, 0);
        assert_eq!(
            fs::read_to_string(&summary.manifest_path).unwrap(),
            "en/hello.wav - 0.40"
        );
        let track = hound::WavReader::open(root.path().join("output/en/hello.wav")).unwrap();
        assert_eq!(track.spec().sample_rate, 24_000);
        assert_eq!(track.len(), 9_600);
        assert!(!root.path().join("output/en/hello_0.wav").exists());
    }

    #[test]
    fn test_missing_language_table_is_reported() {
        let root = tempfile::tempdir().unwrap();
        let mut settings = Settings::default();
        settings.apply(Overrides {
            input: Some(root.path().join("input")),
            output: Some(root.path().join("output")),
            languages: Some(root.path().join("missing.json")),
            ..Default::default()
        });

        let err = narrate(settings).unwrap_err();
        assert!(err.to_string().contains("language configuration"));
    }
}
