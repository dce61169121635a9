//! dishbook - command-line front end for the dish catalog.
//!
//! Drives the same view controllers a graphical front end would, against
//! the mutation API and (when configured) the hosted store.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use dishbook_core::types::DishId;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

mod commands;
mod context;
mod output;

/// dishbook - manage dishes and their ingredients
#[derive(Parser, Debug)]
#[command(name = "dishbook")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Mutation API base URL
    #[arg(long, env = "DISHBOOK_API_URL")]
    api_url: Option<String>,

    /// Sign-in email
    #[arg(long, env = "DISHBOOK_EMAIL")]
    email: Option<String>,

    /// Sign-in password
    #[arg(long, env = "DISHBOOK_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// Print JSON instead of text
    #[arg(long)]
    json: bool,

    /// Log filter (e.g. `dishbook=debug`)
    #[arg(long, default_value = "dishbook=info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List dishes, newest first
    #[command(alias = "ls")]
    List {
        /// Only dishes whose name or ingredients contain this text
        #[arg(short, long)]
        search: Option<String>,
    },

    /// Show one dish
    Show {
        /// Dish id
        id: DishId,
    },

    /// Add a dish
    Add {
        /// Dish name
        #[arg(short, long)]
        name: String,

        /// Comma-separated ingredients
        #[arg(short, long)]
        ingredients: String,

        /// Photo to upload
        #[arg(long)]
        image: Option<PathBuf>,
    },

    /// Edit a dish; omitted fields keep their current value
    Edit {
        /// Dish id
        id: DishId,

        /// New dish name
        #[arg(short, long)]
        name: Option<String>,

        /// New comma-separated ingredients
        #[arg(short, long)]
        ingredients: Option<String>,

        /// Replacement photo
        #[arg(long)]
        image: Option<PathBuf>,
    },

    /// Delete a dish
    #[command(alias = "rm")]
    Delete {
        /// Dish id
        id: DishId,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let filter =
        EnvFilter::try_new(&cli.log_level).unwrap_or_else(|_| EnvFilter::new("dishbook=info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let ctx = context::Context::connect(
        cli.api_url.as_deref(),
        cli.email.as_deref(),
        cli.password.as_deref(),
    )
    .await?;
    let out = output::Output::new(cli.json);

    match cli.command {
        Commands::List { search } => commands::list(&ctx, &out, search.as_deref()).await,
        Commands::Show { id } => commands::show(&ctx, &out, id).await,
        Commands::Add {
            name,
            ingredients,
            image,
        } => commands::add(&ctx, &out, &name, &ingredients, image.as_deref()).await,
        Commands::Edit {
            id,
            name,
            ingredients,
            image,
        } => {
            commands::edit(
                &ctx,
                &out,
                id,
                name.as_deref(),
                ingredients.as_deref(),
                image.as_deref(),
            )
            .await
        }
        Commands::Delete { id, yes } => commands::delete(&ctx, &out, id, yes).await,
    }
}
