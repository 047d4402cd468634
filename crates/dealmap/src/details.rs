use crate::prelude::{eprintln, println, *};
use dealmap::{AttributeSet, QueryParams};

#[derive(Debug, clap::Args, Clone)]
pub struct DetailsArgs {
    /// Deal identifier (the `id` attribute of a search result)
    pub deal_id: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Public data function - used by both CLI and MCP
pub async fn deal_details_data(deal_id: &str, global: &crate::Global) -> Result<AttributeSet> {
    let client = global.client()?;

    client
        .deal_details(deal_id, &QueryParams::new())
        .await
        .wrap_err_with(|| f!("Failed to fetch deal {deal_id}"))
}

pub async fn run(args: DetailsArgs, global: crate::Global) -> Result<()> {
    if global.verbose {
        eprintln!("Fetching deal {}...", args.deal_id);
        eprintln!();
    }

    let deal = deal_details_data(&args.deal_id, &global).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&deal)?);
    } else {
        details_table(&deal).printstd();
    }

    Ok(())
}

fn details_table(deal: &AttributeSet) -> prettytable::Table {
    let mut table = crate::prelude::new_table();
    table.add_row(prettytable::row!["Attribute", "Value"]);

    for (key, value) in deal.iter() {
        table.add_row(prettytable::row![key, value]);
    }

    table
}
