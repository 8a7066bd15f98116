use clap::{Args, Parser, Subcommand};

use countylens_places::{fetch_county_businesses, Business, BusinessQuery, PlacesClient};

#[derive(Debug, Parser)]
#[command(name = "countylens-cli")]
#[command(about = "County business lookup from the terminal")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Look up businesses in a county and print the ranked list.
    Search(SearchArgs),
}

#[derive(Debug, Args)]
struct SearchArgs {
    /// County name, with or without the "County" suffix.
    #[arg(long)]
    county: String,

    /// Full state name.
    #[arg(long, default_value = "Georgia")]
    state: String,

    /// Business category to look for, e.g. "gyms" or "coffee shops".
    #[arg(long)]
    category: String,

    /// Search radius in meters.
    #[arg(long)]
    radius: Option<u32>,

    /// Print raw JSON instead of a readable list.
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Search(args) => search(args).await,
    }
}

async fn search(args: SearchArgs) -> anyhow::Result<()> {
    let config = countylens_core::load_app_config_from_env()?;
    let client = PlacesClient::new(
        &config.google_maps_api_key,
        config.places_request_timeout_secs,
        config.places_page_delay_ms,
        config.places_max_pages,
    )?;

    let query = BusinessQuery {
        county_name: args.county,
        state_name: args.state,
        business_type: args.category,
        radius_meters: args.radius.unwrap_or(config.default_search_radius_meters),
    };

    tracing::info!(
        county = %query.county_name,
        state = %query.state_name,
        business_type = %query.business_type,
        "running lookup"
    );

    let businesses = fetch_county_businesses(&client, &query).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&businesses)?);
    } else {
        print_listing(&businesses);
    }

    Ok(())
}

fn print_listing(businesses: &[Business]) {
    if businesses.is_empty() {
        println!("No businesses found.");
        return;
    }

    println!("Found {} businesses:\n", businesses.len());
    for (index, business) in businesses.iter().enumerate() {
        println!(
            "{:>2}. {} ({}, {} reviews)",
            index + 1,
            business.name,
            format_rating(business.rating),
            business.total_ratings
        );
        println!("    {}", business.address);
    }
}

fn format_rating(rating: Option<f64>) -> String {
    rating.map_or_else(|| "unrated".to_owned(), |r| format!("{r:.1}"))
}
