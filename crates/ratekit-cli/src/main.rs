use clap::{Parser, Subcommand};

mod commands;
mod presenter;

#[derive(Parser)]
#[command(name = "ratekit-cli", version, about = "Ratekit CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Record an application launch
    Launch {
        /// Count the launch without considering a prompt
        #[arg(long)]
        no_prompt: bool,
    },
    /// Record a significant event
    Event {
        /// Count the event without considering a prompt
        #[arg(long)]
        no_prompt: bool,
    },
    /// Print tracking state and eligibility as JSON
    Status,
    /// Prompt control
    Prompt {
        #[command(subcommand)]
        action: commands::prompt::PromptAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Clear all tracking state
    Reset,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Launch { no_prompt } => commands::launch::run(no_prompt),
        Commands::Event { no_prompt } => commands::event::run(no_prompt),
        Commands::Status => commands::status::run(),
        Commands::Prompt { action } => commands::prompt::run(action),
        Commands::Config { action } => commands::config::run(action),
        Commands::Reset => commands::reset::run(),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
