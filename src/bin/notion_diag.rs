//! Connectivity check against the Notion block-children endpoint.
//!
//! Prints the masked credential, upstream status, child block types and, with `--map`,
//! the press items the feed would serve.

use anyhow::{Context, Result};
use clap::Parser;
use notion_press_proxy::config::proxy::{DEFAULT_API_BASE, DEFAULT_NOTION_VERSION};
use notion_press_proxy::config::ApiKey;
use notion_press_proxy::notion::{types, NotionClient};
use notion_press_proxy::press::{map_rows, ClassifierRules};
use notion_press_proxy::FetchError;

#[derive(Parser, Debug)]
#[command(name = "notion_diag", about = "Probe a Notion table block through the API")]
struct Args {
    /// Block whose children to list.
    #[arg(long, env = "NOTION_BLOCK_ID")]
    block_id: String,

    #[arg(long, env = "NOTION_API_KEY", hide_env_values = true)]
    api_key: String,

    #[arg(long, env = "NOTION_API_BASE", default_value = DEFAULT_API_BASE)]
    api_base: String,

    #[arg(long, env = "NOTION_VERSION", default_value = DEFAULT_NOTION_VERSION)]
    notion_version: String,

    #[arg(long, default_value_t = 10)]
    page_size: u32,

    /// Also run the press mapper and print the items.
    #[arg(long)]
    map: bool,

    /// Dump the raw JSON body.
    #[arg(long)]
    raw: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    notion_press_proxy::telemetry::init_tracing();
    let args = Args::parse();

    let key = ApiKey::new(args.api_key.trim());
    println!("api key:   {key}");
    println!("block id:  {}", args.block_id);
    println!("endpoint:  {}/blocks/{}/children", args.api_base, args.block_id);

    let client = NotionClient::new(&args.api_base, key, &args.notion_version)?;
    let body = match client.block_children(&args.block_id, args.page_size).await {
        Ok(b) => b,
        Err(e @ FetchError::Status { .. }) => {
            println!("status:    {}", e.status().map(|s| s.to_string()).unwrap_or_default());
            println!("body:      {}", e.body().unwrap_or_default());
            return Err(e).context("notion rejected the request");
        }
        Err(e) => return Err(e).context("notion request failed"),
    };

    let rows = types::rows_from_body(&body);
    let info = types::page_info(&body);
    println!("status:    ok");
    println!("children:  {} (has_more={})", rows.len(), info.has_more);
    for (i, b) in rows.iter().enumerate() {
        let cells = b.row_cells().map(types::flatten_cells).unwrap_or_default();
        println!("  [{i:>3}] {:<10} {:?}", b.kind, cells);
    }

    if args.raw {
        println!("{}", serde_json::to_string_pretty(&body)?);
    }

    if args.map {
        let rules = ClassifierRules::load_default()?;
        let items = map_rows(&rows, chrono::Utc::now(), &rules);
        println!("{}", serde_json::to_string_pretty(&items)?);
    }
    Ok(())
}
