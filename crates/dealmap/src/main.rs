use crate::prelude::*;
use clap::Parser;

mod details;
mod mcp;
mod prelude;
mod search;

#[derive(Debug, clap::Parser)]
#[command(
    author,
    version,
    about,
    long_about = "Search deals and businesses on The Dealmap"
)]
pub struct App {
    #[command(subcommand)]
    pub command: SubCommands,

    #[clap(flatten)]
    global: Global,
}

#[derive(Debug, Clone, clap::Args)]
pub struct Global {
    /// Dealmap API key
    #[clap(long, env = "DEALMAP_API_KEY", global = true, hide_env_values = true)]
    api_key: Option<String>,

    /// Dealmap API base URL
    #[clap(long, env = "DEALMAP_BASE_URL", global = true, default_value = dealmap::DEFAULT_BASE_URL)]
    base_url: String,

    /// Whether to display additional information.
    #[clap(long, env = "DEALMAP_VERBOSE", global = true, default_value = "false")]
    verbose: bool,
}

impl Global {
    /// Build an API client from the global options
    pub fn client(&self) -> Result<dealmap::Client> {
        let config = dealmap::ClientConfig::new(self.api_key.clone().unwrap_or_default())
            .with_base_url(&self.base_url);

        dealmap::Client::from_config(config).wrap_err(
            "Failed to create Dealmap client (set DEALMAP_API_KEY or pass --api-key)",
        )
    }
}

#[derive(Debug, clap::Parser)]
pub enum SubCommands {
    /// Search deals around a location
    Deals(crate::search::SearchArgs),

    /// Search businesses around a location
    Businesses(crate::search::SearchArgs),

    /// Show every attribute of a single deal
    Details(crate::details::DetailsArgs),

    /// Model Context Protocol server
    MCP(crate::mcp::App),
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    color_eyre::install()?;

    let app = App::parse();

    match app.command {
        SubCommands::Deals(args) => {
            crate::search::run(crate::search::SearchKind::Deals, args, app.global).await
        }
        SubCommands::Businesses(args) => {
            crate::search::run(crate::search::SearchKind::Businesses, args, app.global).await
        }
        SubCommands::Details(args) => crate::details::run(args, app.global).await,
        SubCommands::MCP(sub_app) => crate::mcp::run(sub_app, app.global).await,
    }
    .map_err(|err: color_eyre::eyre::Report| eyre!(err))
}
