pub mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "todo-web")]
#[command(about = "Personal todo list web application")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Run the web server")]
    Serve(commands::serve::ServeArgs),

    #[command(about = "Create the database schema and exit")]
    Migrate,
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Serve(args) => commands::serve::handle(args).await,
        Commands::Migrate => commands::migrate::handle().await,
    }
}
