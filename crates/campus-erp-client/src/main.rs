//! campus-erp-dashboard entry point.

use campus_erp_client::client::resources::{RESOURCES, find_resource};
use campus_erp_client::client::{CampusErpClient, DEFAULT_BASE_URL};
use campus_erp_client::output;
use clap::{Parser, Subcommand};

/// Terminal dashboard for the Campus ERP API.
#[derive(Debug, Parser)]
#[command(name = "campus-erp-dashboard")]
#[command(about = "Terminal dashboard for the Campus ERP API", long_about = None)]
struct Cli {
    /// Server base URL.
    #[arg(long, env = "CAMPUS_ERP_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    #[arg(short = 'u', long, env = "CAMPUS_ERP_USERNAME")]
    username: String,

    #[arg(short = 'p', long, env = "CAMPUS_ERP_PASSWORD", hide_env_values = true)]
    password: String,

    /// Print raw JSON instead of tables.
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Headline statistics.
    Stats,
    /// The ten most recent activities.
    Activities,
    /// One page of a resource listing.
    List {
        /// Resource name, e.g. `courses` or `library-resources`.
        resource: String,

        #[arg(long)]
        page: Option<i64>,

        #[arg(long)]
        limit: Option<i64>,
    },
    /// Names accepted by `list`.
    Resources,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    if let Commands::Resources = cli.command {
        for resource in RESOURCES {
            println!("{}", resource.name);
        }
        return Ok(());
    }

    let mut client = CampusErpClient::new(&cli.base_url);
    let login = client.login(&cli.username, &cli.password).await?;
    if !cli.json {
        println!("Signed in to {} as {}\n", client.base_url(), login.full_name);
    }

    match cli.command {
        Commands::Stats => {
            let stats = client.stats().await?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                println!("{}", output::render_stats(&stats));
            }
        }
        Commands::Activities => {
            let activities = client.recent_activities().await?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&activities)?);
            } else {
                println!("{}", output::render_activities(&activities));
            }
        }
        Commands::List {
            resource,
            page,
            limit,
        } => {
            let resource = find_resource(&resource)?;
            let listing = client.list_resource(&resource, page, limit).await?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&listing.data)?);
            } else {
                println!("{}", output::render_page(&resource, &listing));
            }
        }
        Commands::Resources => {}
    }

    Ok(())
}
