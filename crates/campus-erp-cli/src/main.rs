use campus_erp_cli::admin::{NewAdmin, create_admin};
use campus_erp_cli::seeder::{self, SeedConfig, UsersPerRole};
use clap::{Parser, Subcommand};
use dialoguer::{Input, Password};
use dotenvy::dotenv;
use sqlx::postgres::{PgPool, PgPoolOptions};

#[derive(Parser)]
#[command(name = "campus-erp-cli")]
#[command(about = "Campus ERP CLI - Administrative tools for Campus ERP", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an administrator account
    CreateAdmin {
        /// Login name
        #[arg(short = 'u', long)]
        username: Option<String>,

        /// Email address
        #[arg(short = 'e', long)]
        email: Option<String>,

        /// First name
        #[arg(short = 'f', long)]
        first_name: Option<String>,

        /// Last name
        #[arg(short = 'l', long)]
        last_name: Option<String>,

        /// Password (will be prompted securely if not provided)
        #[arg(short = 'p', long)]
        password: Option<String>,
    },
    /// Seed the database with fake campus data
    Seed {
        /// Number of departments to create
        #[arg(short = 'd', long, default_value = "5")]
        departments: usize,

        /// Number of courses per department
        #[arg(long, default_value = "6")]
        courses: usize,

        /// Number of staff accounts
        #[arg(long, default_value = "5")]
        staff: usize,

        /// Number of faculty accounts
        #[arg(long, default_value = "20")]
        faculty: usize,

        /// Number of student accounts
        #[arg(long, default_value = "200")]
        students: usize,

        /// Number of library resources
        #[arg(long, default_value = "60")]
        library: usize,

        /// Number of housing rooms
        #[arg(long, default_value = "40")]
        rooms: usize,
    },
    /// Clear all seeded data (keeps admins and the academic calendar)
    ClearSeed,
}

#[tokio::main]
async fn main() {
    dotenv().ok();

    let cli = Cli::parse();

    let Ok(database_url) = std::env::var("DATABASE_URL") else {
        fail("DATABASE_URL must be set");
    };

    let pool = match PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
    {
        Ok(pool) => pool,
        Err(e) => fail(&format!("Failed to connect to database: {}", e)),
    };

    match cli.command {
        Commands::CreateAdmin {
            username,
            email,
            first_name,
            last_name,
            password,
        } => handle_create_admin(&pool, username, email, first_name, last_name, password).await,
        Commands::Seed {
            departments,
            courses,
            staff,
            faculty,
            students,
            library,
            rooms,
        } => {
            let config = SeedConfig::new(departments)
                .with_courses_per_department(courses)
                .with_users(UsersPerRole {
                    staff,
                    faculty,
                    students,
                })
                .with_library_resources(library)
                .with_housing_rooms(rooms);
            handle_seed(&pool, config).await
        }
        Commands::ClearSeed => handle_clear_seed(&pool).await,
    }
}

fn fail(message: &str) -> ! {
    eprintln!("\n❌ {}", message);
    std::process::exit(1);
}

fn prompt(value: Option<String>, label: &str) -> String {
    if let Some(value) = value {
        return value;
    }
    match Input::<String>::new().with_prompt(label).interact_text() {
        Ok(value) => value,
        Err(e) => fail(&format!("Failed to read {}: {}", label.to_lowercase(), e)),
    }
}

async fn handle_create_admin(
    pool: &PgPool,
    username: Option<String>,
    email: Option<String>,
    first_name: Option<String>,
    last_name: Option<String>,
    password: Option<String>,
) {
    let username = prompt(username, "Username");
    let email = prompt(email, "Email address");
    let first_name = prompt(first_name, "First name");
    let last_name = prompt(last_name, "Last name");

    let password = password.unwrap_or_else(|| {
        match Password::new()
            .with_prompt("Password")
            .with_confirmation("Confirm password", "Passwords don't match")
            .interact()
        {
            Ok(password) => password,
            Err(e) => fail(&format!("Failed to read password: {}", e)),
        }
    });

    let admin = NewAdmin {
        username,
        email,
        first_name,
        last_name,
        password,
    };

    match create_admin(pool, &admin).await {
        Ok(id) => {
            println!("\n✅ Admin created successfully!");
            println!("   ID: {}", id);
            println!("   Username: {}", admin.username);
            println!("   Email: {}", admin.email);
            println!("   Name: {} {}", admin.first_name, admin.last_name);
        }
        Err(e) => fail(&format!("Error creating admin: {}", e)),
    }
}

async fn handle_seed(pool: &PgPool, config: SeedConfig) {
    if let Err(e) = seeder::seed_all(pool, config).await {
        fail(&format!("Error seeding database: {}", e));
    }
}

async fn handle_clear_seed(pool: &PgPool) {
    if let Err(e) = seeder::clear_all(pool).await {
        fail(&format!("Error clearing seeded data: {}", e));
    }
}
