use message_orchestration_agent::cli::{
    Args, ConfigDiscovery, ExecutionMode, InteractiveConfig, MessageInput, RunConfig,
};
use message_orchestration_agent::{Message, OrchestratorConfig, OrchestratorSystem};
use std::io::{self, Write};
use std::path::Path;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let mode = match args.mode() {
        Ok(mode) => mode,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(match &mode {
        ExecutionMode::Run(config) => config.verbose,
        ExecutionMode::Interactive(config) => config.verbose,
        ExecutionMode::ShowConfig => false,
    });

    info!("Starting message orchestration agent");

    match mode {
        ExecutionMode::Run(config) => run_message_mode(config).await,
        ExecutionMode::Interactive(config) => run_interactive_mode(config).await,
        ExecutionMode::ShowConfig => {
            ConfigDiscovery::show_discovery_info();
            Ok(())
        }
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        "message_orchestration_agent=debug"
    } else {
        "message_orchestration_agent=info"
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn load_config(
    config_override: Option<&Path>,
) -> Result<OrchestratorConfig, Box<dyn std::error::Error>> {
    match config_override {
        Some(path) => {
            info!("Loading configuration override from: {:?}", path);
            Ok(OrchestratorConfig::from_toml_file(path)?)
        }
        None => Ok(ConfigDiscovery::discover_config()?),
    }
}

async fn run_message_mode(config: RunConfig) -> Result<(), Box<dyn std::error::Error>> {
    info!("Processing message input: {:?}", config.input);

    let orchestrator_config = load_config(config.config_override.as_deref())?;
    let system = OrchestratorSystem::new(orchestrator_config)?;
    let message = load_message(&config.input)?;

    if config.plan_only {
        let planning = system.plan_only(&message).await;
        if !planning.success {
            eprintln!(
                "❌ Planning failed: {}",
                planning.error.as_deref().unwrap_or("unknown error")
            );
            std::process::exit(1);
        }
        println!(
            "📋 Planned {} tasks for message {}",
            planning.plan.len(),
            planning.plan.source_message_id
        );
        for task in &planning.plan.tasks {
            println!(
                "  [{}] {} ({}, {})",
                task.task_id, task.description, task.domain, task.priority
            );
            if !task.depends_on.is_empty() {
                println!("      └─ depends on {}", task.depends_on.join(", "));
            }
        }
        return Ok(());
    }

    let outcome = system.process_message(message).await;

    if config.json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else if outcome.success {
        println!("{}", outcome.orchestration_map);
    }

    if let Some(output) = &config.output {
        std::fs::write(output, &outcome.orchestration_map)?;
        if config.verbose {
            println!("📝 Wrote orchestration map to {:?}", output);
        }
    }

    if !outcome.success {
        let reason = outcome.error.as_deref().unwrap_or("unknown error");
        error!("message processing failed: {}", reason);
        if !config.json {
            eprintln!("❌ Processing failed: {}", reason);
        }
        std::process::exit(1);
    }

    if config.verbose {
        println!("✅ Processed {} tasks", outcome.task_count);
    }
    Ok(())
}

fn load_message(input: &MessageInput) -> Result<Message, Box<dyn std::error::Error>> {
    let contents = std::fs::read_to_string(input.path())?;
    match input {
        MessageInput::Json(_) => {
            let message: Message = serde_json::from_str(&contents)?;
            Ok(message)
        }
        MessageInput::Text(_) => Ok(Message::from_content(contents.trim())),
    }
}

async fn run_interactive_mode(config: InteractiveConfig) -> Result<(), Box<dyn std::error::Error>> {
    info!("Running in interactive mode");

    let orchestrator_config = load_config(config.config_override.as_deref())?;
    let system = OrchestratorSystem::new(orchestrator_config)?;

    println!("🤖 Interactive mode started. Type 'help' for commands.");

    loop {
        print!("\n> Enter a message (or 'quit' to exit): ");
        io::stdout().flush()?;

        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            break;
        }
        let input = input.trim();

        if input == "quit" || input == "exit" {
            break;
        }
        if input == "help" {
            show_interactive_help();
            continue;
        }
        if input.is_empty() {
            continue;
        }

        let outcome = system.process_message(Message::from_content(input)).await;
        if outcome.success {
            println!("{}", outcome.orchestration_map);
            println!(
                "✅ Message {} processed ({} tasks)",
                outcome.message_id, outcome.task_count
            );
        } else {
            let reason = outcome.error.as_deref().unwrap_or("unknown error");
            error!("message processing failed: {}", reason);
            println!("❌ Processing failed: {}", reason);
        }
    }

    println!("Goodbye!");
    Ok(())
}

fn show_interactive_help() {
    println!("📖 Interactive Mode Commands:");
    println!("  help    - Show this help message");
    println!("  quit    - Exit the application");
    println!("  exit    - Exit the application");
    println!("\n💡 Enter any other text to process it as a message.");
}
