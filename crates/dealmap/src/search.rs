use crate::prelude::{eprintln, println, *};
use chrono::NaiveDate;
use colored::Colorize;
use dealmap::{AttributeSet, SearchOptions, SearchResult};
use dealmap_core::params::parse_key_value;

/// Which search endpoint to call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchKind {
    Deals,
    Businesses,
}

impl SearchKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchKind::Deals => "deals",
            SearchKind::Businesses => "businesses",
        }
    }

    /// Columns shown in the text output, as (label, attribute key)
    fn columns(&self) -> &'static [(&'static str, &'static str)] {
        match self {
            SearchKind::Deals => &[
                ("Title", "title"),
                ("Business", "business_name"),
                ("Address", "address_line"),
                ("Expires", "expiration_time"),
            ],
            SearchKind::Businesses => &[
                ("Name", "name"),
                ("Address", "address_line"),
                ("City", "city"),
                ("Phone", "phone"),
            ],
        }
    }

    fn id_key(&self) -> &'static str {
        match self {
            SearchKind::Deals => "id",
            SearchKind::Businesses => "business_id",
        }
    }
}

impl std::fmt::Display for SearchKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, clap::Args, Clone)]
#[command(after_help = "EXAMPLES:
  # Everything around Miami:
  dealmap deals \"Miami, FL\"

  # Pizza deals within 10 miles, 50 per page:
  dealmap deals \"Seattle, WA\" --query pizza --distance 10 --page-size 50

  # Second page of results:
  dealmap deals \"Seattle, WA\" --start-index 20

  # Search by coordinates and send an extra raw parameter:
  dealmap businesses \"47.6062,-122.3321\" --param q=*

NOTES:
  - The server defaults are: distance 5 miles, start index 0, page size 20
  - Page size is capped at 100 by the API")]
pub struct SearchArgs {
    /// Location: "City, ST", a ZIP code or "lat,lon"
    pub location: String,

    /// Keyword filter ("*" matches everything)
    #[arg(short, long)]
    pub query: Option<String>,

    /// Search radius in miles
    #[arg(short, long)]
    pub distance: Option<u32>,

    /// Index of the first result to return
    #[arg(short = 's', long)]
    pub start_index: Option<u32>,

    /// Number of results per page
    #[arg(short = 'n', long, value_parser = clap::value_parser!(u32).range(1..=100))]
    pub page_size: Option<u32>,

    /// Activity category code
    #[arg(short, long)]
    pub activity: Option<u32>,

    /// Capability (deal type) code
    #[arg(short, long)]
    pub capability: Option<u32>,

    /// Only deals expiring on or after this date (YYYY-MM-DD)
    #[arg(short, long)]
    pub expiration_date: Option<NaiveDate>,

    /// Extra query parameter passed through as-is (NAME=VALUE, repeatable)
    #[arg(short = 'p', long = "param", value_parser = parse_key_value)]
    pub params: Vec<(String, String)>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl SearchArgs {
    pub fn to_options(&self) -> SearchOptions {
        SearchOptions {
            location: Some(self.location.clone()),
            query: self.query.clone(),
            distance: self.distance,
            start_index: self.start_index,
            page_size: self.page_size,
            activity: self.activity,
            capability: self.capability,
            expiration_date: self.expiration_date,
            extra: self.params.iter().cloned().collect(),
        }
    }
}

/// Public data function - used by both CLI and MCP
pub async fn search_data(
    kind: SearchKind,
    options: &SearchOptions,
    global: &crate::Global,
) -> Result<SearchResult> {
    let client = global.client()?;
    let params = options.to_params();

    let result = match kind {
        SearchKind::Deals => client.search_deals(&params).await,
        SearchKind::Businesses => client.search_businesses(&params).await,
    };

    result.wrap_err_with(|| f!("Failed to search {kind}"))
}

pub async fn run(kind: SearchKind, args: SearchArgs, global: crate::Global) -> Result<()> {
    if global.verbose {
        eprintln!("Searching {kind} near {}...", args.location);
        eprintln!("Dealmap API Base: {}", global.base_url);
        eprintln!();
    }

    let data = search_data(kind, &args.to_options(), &global).await?;

    if args.json {
        println!("{}", format_search_json(&data)?);
    } else {
        println!("{}", format_search_text(kind, &data, &args));
    }

    Ok(())
}

fn format_search_json(result: &SearchResult) -> Result<String> {
    serde_json::to_string_pretty(result).map_err(|e| eyre!("JSON serialization failed: {}", e))
}

fn format_search_text(kind: SearchKind, result: &SearchResult, args: &SearchArgs) -> String {
    let mut out = String::new();
    let start = args.start_index.unwrap_or(0) as u64;
    let shown = result.records.len() as u64;

    out.push_str(&format!("\n{}\n", "=".repeat(80).bright_cyan()));
    out.push_str(&format!(
        "{}\n",
        format!("DEALMAP {} NEAR {}", kind.as_str().to_uppercase(), args.location)
            .bright_cyan()
            .bold()
    ));
    out.push_str(&format!("{}\n", "=".repeat(80).bright_cyan()));

    if result.records.is_empty() {
        out.push_str(&format!("\n{}\n", format!("No {kind} found.").yellow()));
    } else {
        for (idx, record) in result.records.iter().enumerate() {
            out.push_str(&format_record(kind, record, start + idx as u64 + 1));
        }
    }

    out.push_str(&format!(
        "\n{} {}-{} {} {} {}\n",
        "Showing".bright_white(),
        (start + 1).min(start + shown).to_string().bright_cyan().bold(),
        (start + shown).to_string().bright_cyan().bold(),
        "of".bright_white(),
        result.total.to_string().bright_cyan().bold(),
        kind.as_str().bright_white()
    ));

    if start + shown < result.total {
        out.push_str(&format!(
            "\n{}:\n  {}\n",
            "Next page".green(),
            format!(
                "dealmap {kind} \"{}\" --start-index {}",
                args.location,
                start + shown
            )
            .cyan()
        ));
    }

    if kind == SearchKind::Deals {
        if let Some(id) = result.records.first().and_then(|r| r.get("id")) {
            out.push_str(&format!(
                "\n{}:\n  {}\n",
                "To read a deal".green(),
                format!("dealmap details {id}").cyan()
            ));
        }
    }

    out
}

fn format_record(kind: SearchKind, record: &AttributeSet, number: u64) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "\n{} {}\n",
        format!("[{number}]").yellow().bold(),
        record.get(kind.id_key()).unwrap_or("(no id)").white().bold()
    ));

    for (label, key) in kind.columns() {
        let value = record.get(key).filter(|v| !v.is_empty()).unwrap_or("-");
        out.push_str(&format!("    {}: {}\n", label.green(), value));
    }

    out
}
