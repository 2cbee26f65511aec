use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use llm_inside::{
    AppConfig, ExplanationService, GeminiClient, STAGES, StageId, Visualizer, render,
};

#[derive(Parser, Debug)]
#[command(name = "llm-inside")]
#[command(version)]
#[command(about = "Step through the stages of LLM inference with AI-written explanations")]
struct Args {
    /// JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Quiet period after a stage change before an explanation is requested
    #[arg(long)]
    debounce_ms: Option<u64>,

    /// Explanation model
    #[arg(long)]
    model: Option<String>,

    /// Language explanations are written in
    #[arg(long)]
    language: Option<String>,

    /// Disable ANSI clear-screen and styling
    #[arg(long)]
    no_color: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the interactive visualization (default)
    Run,
    /// List the pipeline stages
    Stages,
    /// Print the scene for one stage
    Scene {
        /// Stage name, e.g. TOKENIZATION
        stage: StageId,
    },
    /// Fetch a single explanation for a concept
    Explain {
        /// Concept to explain
        concept: String,
    },
    /// Ask for the most likely next word of a sentence
    Predict {
        /// Sentence to continue
        context: String,
    },
}

impl Args {
    fn app_config(&self) -> Result<AppConfig> {
        let mut config = match &self.config {
            Some(path) => AppConfig::load(path)?,
            None => AppConfig::default(),
        };
        if let Some(ms) = self.debounce_ms {
            config = config.with_debounce_ms(ms);
        }
        if let Some(model) = &self.model {
            config = config.with_model(model.clone());
        }
        if let Some(language) = &self.language {
            config = config.with_language(language.clone());
        }
        if self.no_color {
            config = config.with_color(false);
        }
        config.validate()?;
        Ok(config)
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("llm_inside=warn".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = args.app_config()?;

    match args.command.unwrap_or(Command::Run) {
        Command::Run => {
            let client = Arc::new(GeminiClient::from_env(config.service.clone())?);
            let mut app = Visualizer::new(client, &config);
            let input = tokio::io::BufReader::new(tokio::io::stdin());
            app.run(input, std::io::stdout()).await?;
        }
        Command::Stages => {
            println!("\n📚 Pipeline stages:");
            for (i, stage) in STAGES.iter().enumerate() {
                println!(
                    "  {}. {:<13} {}  ({})",
                    i,
                    stage.id.name(),
                    stage.title,
                    stage.subtitle
                );
            }
            println!();
        }
        Command::Scene { stage } => {
            println!("{}", render::scene(stage));
        }
        Command::Explain { concept } => {
            let client = GeminiClient::from_env(config.service.clone())?;
            match client.explain(&concept).await {
                Ok(text) => println!("{text}"),
                Err(e) => {
                    tracing::warn!(error = %e, "explanation failed");
                    println!("{}", config.insight.fallback_text);
                }
            }
        }
        Command::Predict { context } => {
            let client = GeminiClient::from_env(config.service.clone())?;
            match client.predict_next_word(&context).await {
                Ok(text) => println!("{text}"),
                Err(e) => {
                    tracing::warn!(error = %e, "prediction failed");
                    println!("Error");
                }
            }
        }
    }

    Ok(())
}
