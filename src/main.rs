//! pokequery - Main CLI Entry Point

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use pokequery::{
    app::{Credentials, QaApp, Strategy},
    cli::{Args, Commands, Config, Verbosity},
    logging,
    repl::{DisplayManager, ReplSession},
};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    if let Err(e) = args.validate() {
        eprintln!("{} {}", "Error:".red().bold(), e);
        std::process::exit(2);
    }

    let config = load_config(&args)?;
    let verbosity = args.verbosity();
    logging::init(verbosity.log_level().unwrap_or(config.logging.level.as_str()));

    let strategy = match &args.strategy {
        Some(name) => name.parse::<Strategy>()?,
        None => config.default_strategy()?,
    };
    tracing::debug!(%strategy, verbosity = verbosity.as_str(), "Starting");

    let credentials = Credentials::new(args.openai_api_key.clone(), args.hf_token.clone());
    let mut app = QaApp::new(config, credentials);

    match &args.command {
        Some(Commands::Start) => {
            let mut session = ReplSession::new(app, strategy, verbosity)?;
            session.run().await?;
        }
        Some(Commands::Ask { question }) => {
            ask(&mut app, strategy, question, verbosity).await?;
        }
        Some(Commands::Lookup { name }) => {
            let display = DisplayManager::new(false);
            let retriever = app.retriever()?;
            display.show_entries(name, &retriever.find_by_name(name));
        }
        Some(Commands::Top { limit }) => {
            let display = DisplayManager::new(false);
            let ranked = app.retriever()?.rank_by_dps(*limit)?;
            display.show_ranking(&ranked);
        }
        Some(Commands::Context { question }) => {
            println!("{}", app.context_for(question)?);
        }
        Some(Commands::Config) => {
            show_config(app.config(), strategy, &args);
        }
        None => {
            if let Some(question) = &args.question {
                ask(&mut app, strategy, question, verbosity).await?;
            } else {
                show_usage();
            }
        }
    }

    Ok(())
}

/// Load the config file and apply command-line overrides
fn load_config(args: &Args) -> Result<Config> {
    let mut config = Config::load(args.config.clone())?;

    if let Some(dataset) = &args.dataset {
        config.dataset.path = dataset.to_string_lossy().into_owned();
        // A new path means a new extension to detect from
        config.dataset.format = None;
    }
    if let Some(format) = &args.format {
        config.dataset.format = Some(format.clone());
    }

    config.validate()?;
    Ok(config)
}

/// Answer one question and print it
async fn ask(app: &mut QaApp, strategy: Strategy, question: &str, verbosity: Verbosity) -> Result<()> {
    let mut display = DisplayManager::new(verbosity.show_progress());

    if verbosity.show_context() && strategy == Strategy::Rag {
        match app.context_for(question) {
            Ok(context) => display.show_context(&context),
            Err(e) => display.show_warning(&e.to_string()),
        }
    }

    display.start_thinking(strategy);
    let answer = app.answer(strategy, question).await;
    display.finish_current();

    println!("{}", answer?);
    Ok(())
}

fn show_config(config: &Config, strategy: Strategy, args: &Args) {
    println!("\n{}", "pokequery Configuration".bold().cyan());
    println!("{}", "=".repeat(56).cyan());

    let source = args
        .config
        .clone()
        .or_else(Config::default_path)
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "built-in defaults".to_string());
    println!("Config file: {}\n", source);

    println!("Dataset:");
    println!("  Path:   {}", config.dataset.path);
    match config.dataset_format() {
        Ok(format) => println!("  Format: {}", format),
        Err(e) => println!("  Format: {}", e.to_string().red()),
    }
    println!();

    println!("OpenAI:");
    println!("  Endpoint:        {}", config.openai.base_url);
    println!("  Model:           {}", config.openai.model);
    println!("  Max tokens:      {}", config.openai.max_tokens);
    println!("  RAG temperature: {}", config.openai.rag_temperature);
    println!(
        "  API key:         {}",
        if args.openai_api_key.is_some() { "set" } else { "not set" }
    );
    println!();

    println!("Local model:");
    println!("  Model:      {} ({})", config.local.model_id, config.local.revision);
    println!("  Max length: {}", config.local.max_length);
    println!(
        "  HF token:   {}",
        if args.hf_token.is_some() { "set" } else { "not set" }
    );
    println!();

    println!("Session:");
    println!("  Strategy:  {} ({})", strategy, strategy.label());
    println!("  History:   {}", config.history_path().display());
    println!("  Log level: {}", config.logging.level);
    println!("  Verbosity: {}", args.verbosity().as_str());
    println!();
}

fn show_usage() {
    println!("pokequery {} - Pokémon Go Q&A", env!("CARGO_PKG_VERSION"));
    println!("\nUsage:");
    println!("  pokequery <question>            Answer with the default strategy");
    println!("  pokequery ask <question>        Same, as a subcommand");
    println!("  pokequery start                 Interactive REPL mode");
    println!("  pokequery lookup <name>         Show entries matching a name");
    println!("  pokequery top [--limit n]       Show the highest-DPS entries");
    println!("  pokequery context <question>    Show retrieved context only");
    println!("  pokequery config                Show configuration");
    println!("\nExample:");
    println!("  pokequery -s rag \"What is the highest DPS Pokémon?\"");
    println!();
}
