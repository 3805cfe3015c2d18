//! CLI entrypoint for Philosopher Forum
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, anyhow, bail};
use clap::Parser;
use forum_application::{
    AlwaysContinue, ConversationLogger, HumanInput, HumanInputPort, NoConversationLogger,
    NoProgress, ProgressNotifier, ResponseGenerator, RunForumUseCase, SessionStore,
    TurnScheduler,
};
use forum_domain::ForumSession;
use forum_infrastructure::{
    ConfigLoader, FileConfig, FileLoggingConfig, GeneratorProvider, JsonFileSessionStore,
    JsonlConversationLogger, TemplateResponseGenerator,
};
use forum_presentation::{
    Cli, ConsoleFormatter, LineReader, OutputFormat, OutputFormatter, ProgressReporter,
    ReplConfig, ReplInput, SimpleProgress, SpeakerNames,
};
use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

const DEFAULT_TITLE: &str = "Open forum";

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_ref());
        return Ok(());
    }

    // Load configuration, then let flags override it
    let mut config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())
            .map_err(|e| anyhow!("Failed to load configuration: {}", e))?
    };
    apply_cli_overrides(&mut config, &cli);
    config.validate().context("Invalid configuration")?;

    let _log_guard = init_logging(&cli, &config.logging);
    info!("Starting Philosopher Forum");

    let store = Arc::new(JsonFileSessionStore::new(config.session.sessions_dir()));

    if run_session_command(&cli, &config, store.as_ref()).await? {
        return Ok(());
    }

    // === Dependency Injection ===
    match config.generator.provider {
        GeneratorProvider::Template => {
            run_forum(Arc::new(TemplateResponseGenerator::new()), &cli, &config, store).await
        }
        GeneratorProvider::Openai => run_openai(&cli, &config, store).await,
    }
}

fn apply_cli_overrides(config: &mut FileConfig, cli: &Cli) {
    if let Some(mode) = cli.mode {
        config.forum.mode = mode;
    }
    if let Some(max) = cli.max_speakers {
        config.forum.max_speakers_per_round = max;
    }
    if let Some(ceiling) = cli.ceiling {
        config.forum.hard_round_ceiling = ceiling;
    }
    if let Some(threshold) = cli.threshold {
        config.forum.activation_threshold = threshold;
    }
    if cli.autonomous {
        config.forum.autonomous = true;
    }
    if !cli.personas.is_empty() {
        config.participants.restrict_to(&cli.personas);
    }
    if cli.show_thinking {
        config.repl.show_thinking = true;
    }
    if cli.quiet {
        config.repl.show_progress = false;
    }
}

/// Initialize logging based on verbosity level, plus an optional daily log file
fn init_logging(cli: &Cli, logging: &FileLoggingConfig) -> Option<WorkerGuard> {
    let level = if cli.quiet {
        "error"
    } else {
        match cli.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace", // -vvv or more
        }
    };

    let (file_layer, guard) = if logging.file {
        match RollingFileAppender::builder()
            .rotation(Rotation::DAILY)
            .filename_prefix("philosopher-forum")
            .filename_suffix("log")
            .build(logging.log_dir())
        {
            Ok(appender) => {
                let (writer, guard) = tracing_appender::non_blocking(appender);
                let layer = fmt::layer().with_writer(writer).with_ansi(false);
                (Some(layer), Some(guard))
            }
            Err(e) => {
                eprintln!("Warning: file logging disabled: {}", e);
                (None, None)
            }
        }
    } else {
        (None, None)
    };

    tracing_subscriber::registry()
        .with(EnvFilter::new(level))
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(file_layer)
        .init();

    guard
}

/// Handle the session management flags. Returns `true` when one ran.
async fn run_session_command(
    cli: &Cli,
    config: &FileConfig,
    store: &JsonFileSessionStore,
) -> Result<bool> {
    if cli.list_sessions {
        let sessions = store.list().await?;
        let output = match cli.output {
            OutputFormat::Text => ConsoleFormatter::format_session_list(&sessions),
            OutputFormat::Json => ConsoleFormatter::format_session_list_json(&sessions),
        };
        println!("{}", output);
        return Ok(true);
    }

    if let Some(id) = &cli.delete_session {
        store.delete(id).await?;
        println!("Deleted session {}", id);
        return Ok(true);
    }

    if let Some(id) = &cli.transcript {
        let snapshot = store.load(id).await?;
        let formatter: &dyn OutputFormatter = &ConsoleFormatter;
        let output = match cli.output {
            OutputFormat::Text => formatter.format_transcript(&snapshot, config.repl.show_thinking),
            OutputFormat::Json => formatter.format_json(&snapshot),
        };
        println!("{}", output);
        return Ok(true);
    }

    Ok(false)
}

#[cfg(feature = "openai")]
async fn run_openai(cli: &Cli, config: &FileConfig, store: Arc<JsonFileSessionStore>) -> Result<()> {
    use forum_infrastructure::{OpenAiGeneratorConfig, OpenAiResponseGenerator};

    let settings = &config.generator;
    if settings.api_key().is_none() {
        warn!("{} is not set; sending requests without an API key", settings.api_key_env);
    }
    let generator = OpenAiResponseGenerator::new(OpenAiGeneratorConfig {
        base_url: settings.base_url.clone(),
        model: settings.model.clone(),
        api_key: settings.api_key(),
        temperature: settings.temperature,
        max_tokens: settings.max_tokens,
        timeout: settings.timeout(),
    })?;
    run_forum(Arc::new(generator), cli, config, store).await
}

#[cfg(not(feature = "openai"))]
async fn run_openai(
    _cli: &Cli,
    _config: &FileConfig,
    _store: Arc<JsonFileSessionStore>,
) -> Result<()> {
    bail!("generator.provider = \"openai\" requires a build with `--features openai`")
}

async fn run_forum<G: ResponseGenerator + 'static>(
    generator: Arc<G>,
    cli: &Cli,
    config: &FileConfig,
    store: Arc<JsonFileSessionStore>,
) -> Result<()> {
    // Start a new session or pick up a stored one
    let scheduler = match &cli.resume {
        Some(id) => {
            let snapshot = store
                .load(id)
                .await
                .with_context(|| format!("Cannot resume session {}", id))?;
            if let Some(reason) = snapshot.termination {
                bail!("Session {} has already ended ({})", id, reason.description());
            }
            TurnScheduler::restore(generator, snapshot)?
        }
        None => {
            let title = cli.topic.clone().unwrap_or_else(|| DEFAULT_TITLE.to_string());
            let session = ForumSession::new(
                title,
                config.forum.to_forum_config(),
                config.participant_profiles()?,
            )?;
            TurnScheduler::new(generator, session)
        }
    };

    let handle = scheduler.handle();
    let summary = handle.summary().await;
    let names = SpeakerNames::from_records(&handle.participants().await);
    let show_thinking = Arc::new(AtomicBool::new(config.repl.show_thinking));

    let progress: Arc<dyn ProgressNotifier> = if cli.output == OutputFormat::Json {
        Arc::new(NoProgress)
    } else if cli.quiet {
        Arc::new(SimpleProgress::quiet(names).with_thinking(Arc::clone(&show_thinking)))
    } else if config.repl.show_progress {
        Arc::new(ProgressReporter::new(names).with_thinking(Arc::clone(&show_thinking)))
    } else {
        Arc::new(SimpleProgress::new(names).with_thinking(Arc::clone(&show_thinking)))
    };

    let logger: Arc<dyn ConversationLogger> = if config.logging.conversation_log {
        match JsonlConversationLogger::for_session(config.logging.log_dir(), &summary.id) {
            Some(logger) => {
                info!("Conversation log: {}", logger.path().display());
                Arc::new(logger)
            }
            None => Arc::new(NoConversationLogger),
        }
    } else {
        Arc::new(NoConversationLogger)
    };

    let params = config
        .session
        .to_execution_params(config.generator.timeout());
    let scheduler = Arc::new(
        scheduler
            .with_memory(Arc::new(config.persona_memory()))
            .with_progress(progress)
            .with_logger(Arc::clone(&logger))
            .with_params(params),
    );
    info!(
        "Session {} using generator {}",
        summary.id,
        scheduler.generator_name()
    );

    // Ctrl-C closes the forum at the next safe point
    let interrupt = {
        let scheduler = Arc::clone(&scheduler);
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("Interrupted; closing the forum");
                scheduler.cancel().await;
            }
        })
    };

    if let Some(topic) = cli.topic.as_deref() {
        scheduler.submit_human_turn(topic).await?;
    }

    let input: Arc<dyn HumanInputPort> = if scheduler.is_autonomous().await {
        if cli.output == OutputFormat::Text && !cli.quiet {
            print!("{}", ConsoleFormatter::format_status(&summary));
        }
        Arc::new(AlwaysContinue)
    } else {
        let repl_config = ReplConfig {
            show_progress: config.repl.show_progress,
            show_thinking: config.repl.show_thinking,
            history_file: config.repl.history_file.clone(),
        };
        let reader = LineReader::spawn(repl_config.history_path())
            .context("Failed to start the line editor")?;
        let mut repl = ReplInput::new(reader, handle).with_thinking_flag(show_thinking);
        if cli.topic.is_some() {
            repl = repl.with_initial(HumanInput::Continue);
        }
        if cli.output == OutputFormat::Text {
            repl.print_welcome(&summary.title, &summary.participants);
        }
        Arc::new(repl)
    };

    let use_case = RunForumUseCase::new(Arc::clone(&scheduler), input)
        .with_store(store)
        .with_logger(logger);
    let result = use_case.execute().await;
    interrupt.abort();
    let outcome = result?;

    let output = match cli.output {
        OutputFormat::Text => ConsoleFormatter::format_outcome(&outcome),
        OutputFormat::Json => ConsoleFormatter::format_json(&scheduler.export().await),
    };
    println!("{}", output);

    Ok(())
}
