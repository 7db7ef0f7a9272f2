use anyhow::{Context, Result};
use boscocare_cli::Operator;
use boscocare_config::{BackendConfig, ServerConfig};
use boscocare_models::auth::SIGN_UP_ROLES;
use clap::{Parser, Subcommand};
use dialoguer::{Input, Password, Select};
use dotenvy::dotenv;
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "boscocare-cli")]
#[command(about = "Boscocare CLI - Account checks against the hosted backend", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Register an account; it must be verified by email before signing in
    SignUp {
        /// Email address
        #[arg(short = 'e', long)]
        email: Option<String>,

        /// Password (will be prompted securely if not provided)
        #[arg(short = 'p', long)]
        password: Option<String>,

        /// Role stored on the account metadata
        #[arg(short = 'r', long)]
        role: Option<String>,
    },
    /// Sign in, report the resolved role and sign out again
    SignIn {
        /// Email address
        #[arg(short = 'e', long)]
        email: Option<String>,

        /// Password (will be prompted securely if not provided)
        #[arg(short = 'p', long)]
        password: Option<String>,
    },
    /// Show the role stored for an auth user id
    Role {
        /// Auth user id
        auth_user_id: Option<Uuid>,
    },
}

#[tokio::main]
async fn main() {
    dotenv().ok();

    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        eprintln!("\n❌ {:#}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let operator = Operator::from_config(
        &BackendConfig::from_env(),
        ServerConfig::from_env().email_redirect_url(),
    )
    .context("Failed to build backend clients")?;

    match cli.command {
        Commands::SignUp {
            email,
            password,
            role,
        } => handle_sign_up(&operator, email, password, role).await,
        Commands::SignIn { email, password } => handle_sign_in(&operator, email, password).await,
        Commands::Role { auth_user_id } => handle_role(&operator, auth_user_id).await,
    }
}

fn prompt_email(email: Option<String>) -> Result<String> {
    match email {
        Some(email) => Ok(email),
        None => Input::new()
            .with_prompt("Email address")
            .interact_text()
            .context("Failed to read email"),
    }
}

async fn handle_sign_up(
    operator: &Operator,
    email: Option<String>,
    password: Option<String>,
    role: Option<String>,
) -> Result<()> {
    let email = prompt_email(email)?;

    let password = match password {
        Some(password) => password,
        None => Password::new()
            .with_prompt("Password")
            .with_confirmation("Confirm password", "Passwords don't match")
            .interact()
            .context("Failed to read password")?,
    };

    let role = match role {
        Some(role) => role,
        None => {
            let selection = Select::new()
                .with_prompt("Role")
                .items(&SIGN_UP_ROLES)
                .default(0)
                .interact()
                .context("Failed to read role")?;
            SIGN_UP_ROLES[selection].to_string()
        }
    };

    let message = operator.sign_up(&email, &password, &role).await?;
    println!("\n✅ {}", message);
    println!("   Email: {}", email);
    println!("   Role: {}", role);
    Ok(())
}

async fn handle_sign_in(
    operator: &Operator,
    email: Option<String>,
    password: Option<String>,
) -> Result<()> {
    let email = prompt_email(email)?;

    let password = match password {
        Some(password) => password,
        None => Password::new()
            .with_prompt("Password")
            .interact()
            .context("Failed to read password")?,
    };

    let report = operator.check_sign_in(&email, &password).await?;
    if report.allowed {
        println!("\n✅ {} can sign in", email);
    } else {
        println!("\n⛔ {} is not authorized to sign in", email);
    }
    println!("{}", report);

    if let Some(error) = report.sign_out_error {
        eprintln!("⚠️  Sign-out after the check failed: {}", error);
    }
    Ok(())
}

async fn handle_role(operator: &Operator, auth_user_id: Option<Uuid>) -> Result<()> {
    let auth_user_id = match auth_user_id {
        Some(id) => id,
        None => Input::<String>::new()
            .with_prompt("Auth user id")
            .interact_text()
            .context("Failed to read auth user id")?
            .trim()
            .parse()
            .context("Not a valid UUID")?,
    };

    match operator.role_of(auth_user_id).await {
        Some(role) => println!("{} has role {}", auth_user_id, role),
        None => println!("{} has no known role", auth_user_id),
    }
    Ok(())
}
