mod config;
mod error;

#[cfg(feature = "chat")]
mod chat;

use clap::{Parser, Subcommand};

use crate::config::resolve_chat_options;

#[derive(Parser)]
#[command(name = "sty")]
#[command(about = "Streaming terminal client for the chat relay", long_about = None)]
struct Cli {
    /// Base URL of the relay backend
    #[arg(long, global = true)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    #[cfg(feature = "chat")]
    /// Start an interactive chat session
    Chat {
        /// Model to use
        #[arg(short, long)]
        model: Option<String>,

        /// Developer prompt applied to outgoing requests
        #[arg(long)]
        developer_prompt: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        #[cfg(feature = "chat")]
        Command::Chat {
            model,
            developer_prompt,
        } => {
            let options = resolve_chat_options(cli.base_url, model, developer_prompt)?;
            chat::run(options).await?;
        }
    }

    Ok(())
}
