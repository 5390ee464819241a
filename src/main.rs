//! Resume tailor: keyword-aware resume tailoring against a job description

mod cli;
mod config;
mod error;
mod input;
mod processing;
mod llm;
mod output;

use clap::Parser;
use cli::{Cli, Commands, ConfigAction};
use colored::Colorize;
use config::Config;
use error::{PipelineError, Result};
use indicatif::ProgressBar;
use input::file_detector::FileType;
use input::manager::InputManager;
use llm::generator::HttpTextGenerator;
use log::{error, info};
use output::renderer::{suggest_filename, RenderManager};
use processing::extractor::KeywordExtractor;
use processing::keywords::KeywordMap;
use processing::pipeline::TailoringPipeline;
use processing::sections::ResumeSections;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process;
use std::time::Duration;

#[tokio::main]
async fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    // Load configuration
    let config = match load_config(cli.config) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    if !config.output.color_output {
        colored::control::set_override(false);
    }

    // Execute command
    if let Err(e) = run_command(cli.command, config).await {
        error!("Command failed: {}", e);
        process::exit(1);
    }
}

fn load_config(path: Option<PathBuf>) -> Result<Config> {
    match path {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
}

/// Job text comes from a file through the input manager, or from stdin
/// when the path is `-`.
async fn read_job_text(input_manager: &mut InputManager, job: &Path) -> Result<String> {
    if cli::is_stdin_marker(job) {
        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text)?;
        Ok(text)
    } else {
        input_manager.extract_text(job).await
    }
}

async fn run_command(command: Commands, config: Config) -> Result<()> {
    match command {
        Commands::Tailor {
            resume,
            job,
            format,
            output,
            show_keywords,
        } => {
            info!("Starting resume tailoring run");

            // Validate input files
            cli::validate_file_extension(&resume, &["pdf", "txt", "md", "json"])
                .map_err(|e| PipelineError::InvalidInput(format!("Resume file: {}", e)))?;
            if !cli::is_stdin_marker(&job) {
                cli::validate_file_extension(&job, &["txt", "md"]).map_err(|e| {
                    PipelineError::InvalidInput(format!("Job description file: {}", e))
                })?;
            }

            let output_format = match format {
                Some(format) => {
                    cli::parse_output_format(&format).map_err(PipelineError::InvalidInput)?
                }
                None => config.output.format,
            };

            println!("🚀 Resume tailoring");
            println!("📄 Resume: {}", resume.display());
            println!("💼 Job description: {}", job.display());
            println!("🔧 Output format: {:?}", output_format);

            println!("\n📂 Extracting text from files...");
            let mut input_manager = InputManager::new();

            println!("📄 Processing resume...");
            let resume_text = input_manager.extract_text(&resume).await?;

            println!("💼 Processing job description...");
            let job_text = read_job_text(&mut input_manager, &job).await?;

            if job_text.trim().is_empty() {
                return Err(PipelineError::EmptyJobDescription(format!(
                    "no text in {}",
                    job.display()
                )));
            }

            println!("Resume text length: {} characters", resume_text.chars().count());
            println!(
                "Job description length: {} characters",
                job_text.chars().count()
            );

            // A JSON resume is already in the sections shape and skips the
            // text parser.
            let prepared: Option<ResumeSections> = match input_manager.detect_file_type(&resume)? {
                FileType::Json => Some(serde_json::from_str(&resume_text).map_err(|e| {
                    PipelineError::UnparseableResume(format!("invalid resume JSON: {}", e))
                })?),
                _ => None,
            };

            let generator = HttpTextGenerator::new(&config.generator, config.api_key())?;
            let pipeline = TailoringPipeline::new(generator, &config);

            println!("\n🔄 Tailoring resume to the job description...");
            let spinner = ProgressBar::new_spinner();
            spinner.set_message("Extracting keywords and rewriting sections...");
            spinner.enable_steady_tick(Duration::from_millis(120));

            let run = match prepared {
                Some(sections) => pipeline.tailor_sections(sections, &job_text).await,
                None => pipeline.run_with_result(&resume_text, &job_text).await,
            };
            spinner.finish_and_clear();
            let result = run?;

            if show_keywords {
                println!("\n🔑 Extracted keywords:");
                print_keyword_map(&result.keywords);
            }

            println!("\n📊 Tailoring summary:");
            println!("  • Keywords extracted: {}", result.keywords.total_len());
            println!("  • Skills added: {}", result.infused_skills.len());
            if !result.infused_skills.is_empty() {
                println!("    {}", result.infused_skills.join(", "));
            }
            println!("  • Change ratio: {:.0}%", result.change_ratio * 100.0);
            if result.escalated {
                println!("  • A stronger second rewrite pass was needed");
            }

            let output_path = output.unwrap_or_else(|| {
                PathBuf::from(suggest_filename(
                    output_format,
                    &resume.to_string_lossy(),
                    false,
                ))
            });

            let renderer = RenderManager::new();
            let written = renderer.write(&result.sections, &output_path, output_format)?;

            println!("\n💾 Tailored resume written to {}", written.display());
            println!("✅ Done!");
        }

        Commands::Keywords { job } => {
            if !cli::is_stdin_marker(&job) {
                cli::validate_file_extension(&job, &["txt", "md"]).map_err(|e| {
                    PipelineError::InvalidInput(format!("Job description file: {}", e))
                })?;
            }

            println!("💼 Job description: {}", job.display());

            let mut input_manager = InputManager::new();
            let job_text = read_job_text(&mut input_manager, &job).await?;

            if job_text.trim().is_empty() {
                return Err(PipelineError::EmptyJobDescription(format!(
                    "no text in {}",
                    job.display()
                )));
            }

            let generator = HttpTextGenerator::new(&config.generator, config.api_key())?;
            let extractor = KeywordExtractor::new(&config.tailoring);

            let spinner = ProgressBar::new_spinner();
            spinner.set_message("Extracting keywords...");
            spinner.enable_steady_tick(Duration::from_millis(120));
            let keywords = extractor.extract(&generator, &job_text).await;
            spinner.finish_and_clear();

            println!("\n🔑 Extracted keywords ({} total):", keywords.total_len());
            print_keyword_map(&keywords);
        }

        Commands::Config { action } => match action {
            Some(ConfigAction::Show) | None => {
                println!("⚙️  Current configuration\n");
                println!("Generator:");
                println!("  Endpoint: {}", config.generator.endpoint);
                println!("  Model: {}", config.generator.model);
                println!("  API key env: {}", config.generator.api_key_env);
                println!(
                    "  Timeout: {}s | Retries: {}",
                    config.generator.timeout_secs, config.generator.max_retries
                );
                println!("\nTailoring:");
                println!("  Min change ratio: {}", config.tailoring.min_change_ratio);
                println!(
                    "  Max keywords per category: {}",
                    config.tailoring.max_keywords_per_category
                );
                println!(
                    "  Min generated length: {}",
                    config.tailoring.min_generated_len
                );
                println!(
                    "  Skill similarity threshold: {}",
                    config.tailoring.skill_similarity_threshold
                );
                println!("\nOutput:");
                println!("  Format: {:?}", config.output.format);
                println!("  Color output: {}", config.output.color_output);
            }

            Some(ConfigAction::Init) => {
                let path = Config::config_path();
                Config::default().save()?;
                println!("✅ Wrote default configuration to {}", path.display());
            }

            Some(ConfigAction::Set { key, value }) => {
                let mut config = config;
                config.set_value(&key, &value)?;
                config.save()?;
                println!("✅ Set {} = {}", key, value);
            }

            Some(ConfigAction::Path) => {
                println!("{}", Config::config_path().display());
            }
        },
    }

    Ok(())
}

fn print_keyword_map(keywords: &KeywordMap) {
    for (category, terms) in keywords.iter() {
        if terms.is_empty() {
            continue;
        }
        println!("  {} ({})", category.header().cyan().bold(), terms.len());
        for term in terms {
            println!("    • {}", term);
        }
    }
}
