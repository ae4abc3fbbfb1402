use std::process::ExitCode;

use anyhow::{Context, Result};
use appeal_client::{
    client::spawn_health_probe, prompt::FormFields, view, AppealClient, FormHandler, SubmitOutcome,
};
use appeal_shared::options::{ActionType, RulesUnderstood};
use clap::{Args, Parser, Subcommand};
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about = "Submit and review moderation appeals", long_about = None)]
struct Cli {
    /// Appeal server base URL (e.g. http://localhost:3001/api)
    #[arg(short, long, env = "APPEAL_SERVER_URL", default_value = "http://localhost:3001/api", global = true)]
    server_url: String,

    /// Pre-shared API key
    #[arg(short = 'k', long, env = "APPEAL_API_KEY", global = true, hide_env_values = true)]
    api_key: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fill in and submit an appeal
    Submit(SubmitArgs),
    /// Check that the server is reachable
    Health,
    /// List stored appeal ids
    List,
    /// Print one stored appeal
    Show {
        /// Appeal id, e.g. 3 or appeal3
        id: String,
    },
}

#[derive(Args, Debug)]
struct SubmitArgs {
    #[arg(long)]
    username: Option<String>,
    #[arg(long)]
    user_id: Option<String>,
    #[arg(long)]
    server_name: Option<String>,
    /// ban, kick, timeout, mute or warn
    #[arg(long)]
    action_type: Option<ActionType>,
    #[arg(long)]
    reason: Option<String>,
    /// yes, partially or no
    #[arg(long)]
    rules_understood: Option<RulesUnderstood>,
    #[arg(long)]
    future: Option<String>,
    /// Never prompt; missing fields fail validation
    #[arg(long)]
    no_prompt: bool,
}

impl SubmitArgs {
    fn into_fields(self) -> (FormFields, bool) {
        let fields = FormFields {
            username: self.username,
            user_id: self.user_id,
            server_name: self.server_name,
            action_type: self.action_type,
            reason: self.reason,
            rules_understood: self.rules_understood,
            future: self.future,
        };
        (fields, self.no_prompt)
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn,appeal_client=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let api_key = cli.api_key.unwrap_or_default();
    let client = AppealClient::new(&cli.server_url, &api_key);
    info!("Server URL: {}", client.base_url());

    let needs_key = !matches!(cli.command, Command::Health);
    if needs_key && api_key.trim().is_empty() {
        anyhow::bail!("No API key: pass --api-key or set APPEAL_API_KEY");
    }

    match cli.command {
        Command::Submit(args) => submit(client, args).await,
        Command::Health => {
            let health = client.health().await.context("Health check failed")?;
            println!("{}: {}", health.status, health.message);
            Ok(ExitCode::SUCCESS)
        }
        Command::List => {
            let list = client.list().await.context("Failed to list appeals")?;
            println!("{} appeal(s)", list.count);
            for id in list.appeals {
                println!("  appeal{}", id);
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Show { id } => {
            let appeal = client
                .fetch(&id)
                .await
                .with_context(|| format!("Failed to fetch appeal {}", id))?;
            println!("{}", serde_json::to_string_pretty(&appeal)?);
            Ok(ExitCode::SUCCESS)
        }
    }
}

async fn submit(client: AppealClient, args: SubmitArgs) -> Result<ExitCode> {
    // Runs alongside the prompts; the outcome is only logged.
    let _probe = spawn_health_probe(client.clone());

    let (fields, no_prompt) = args.into_fields();
    let form = if no_prompt {
        fields.into_form()
    } else {
        fields.prompt_missing()?
    };

    let handler = FormHandler::new(client);
    let outcome = handler.submit(&form).await;
    println!("{}", view::render(&handler.view()));

    Ok(match outcome {
        SubmitOutcome::Submitted { .. } => ExitCode::SUCCESS,
        _ => ExitCode::FAILURE,
    })
}
