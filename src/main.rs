use actix_web::middleware::NormalizePath;
use actix_web::web::Data;
use actix_web::{App, HttpServer, Responder, get};
use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use dotenvy::dotenv;
use std::io::{BufRead, Write};

use attendance_register::auth::password::hash_password;
use attendance_register::config::Config;
use attendance_register::db::init_db;
use attendance_register::docs::ApiDoc;
use attendance_register::model::role::Role;
use attendance_register::routes;

use tracing::info;
use tracing_appender::rolling;
use utoipa::OpenApi; // ← needed for ApiDoc::openapi()
use utoipa_swagger_ui::SwaggerUi;

#[derive(Parser)]
#[command(name = "attendance-register", about = "Visitor and staff attendance register")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP server (default)
    Serve,
    /// Create a staff account that can log in. The password is read from
    /// STAFF_PASSWORD, or prompted for on stdin when that is unset.
    CreateStaff {
        username: String,
        /// admin, staff or kiosk
        #[arg(long, default_value = "staff")]
        role: String,
    },
}

#[get("/")]
async fn index() -> impl Responder {
    "Attendance register is running"
}

fn parse_role(raw: &str) -> Result<Role> {
    match raw.to_ascii_lowercase().as_str() {
        "admin" => Ok(Role::Admin),
        "staff" => Ok(Role::Staff),
        "kiosk" => Ok(Role::Kiosk),
        other => Err(anyhow!("unknown role '{other}', expected admin, staff or kiosk")),
    }
}

fn read_password() -> Result<String> {
    let from_env = std::env::var("STAFF_PASSWORD").ok();
    if from_env.is_none() {
        print!("Password: ");
        std::io::stdout().flush()?;
    }
    password_from(from_env, &mut std::io::stdin().lock())
}

fn password_from(from_env: Option<String>, input: &mut impl BufRead) -> Result<String> {
    let password = match from_env {
        Some(password) => password,
        None => {
            let mut line = String::new();
            input
                .read_line(&mut line)
                .context("Failed to read password from stdin")?;
            line.trim_end_matches(['\r', '\n']).to_string()
        }
    };

    if password.is_empty() {
        return Err(anyhow!("password must not be empty"));
    }
    Ok(password)
}

#[actix_web::main]
async fn main() -> Result<()> {
    dotenv().ok();

    let config = Config::from_env()?;

    // Rolling daily log
    let file_appender = rolling::daily("logs", "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .with_target(false) // removes module path
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .pretty()
        .init();

    match Cli::parse().command.unwrap_or(Command::Serve) {
        Command::Serve => serve(config).await,
        Command::CreateStaff { username, role } => {
            let role = parse_role(&role)?;
            let password = read_password()?;
            create_staff(&config, &username, &password, role).await
        }
    }
}

async fn create_staff(config: &Config, username: &str, password: &str, role: Role) -> Result<()> {
    let pool = init_db(&config.database_url)
        .await
        .context("Failed to connect to database")?;

    let hashed = hash_password(password).map_err(|e| anyhow!("failed to hash password: {e}"))?;

    sqlx::query("INSERT INTO staff_accounts (username, password, role_id) VALUES (?, ?, ?)")
        .bind(username.trim())
        .bind(hashed)
        .bind(role.id())
        .execute(&pool)
        .await
        .with_context(|| format!("Failed to create staff account '{username}'"))?;

    info!(username, ?role, "Staff account created");
    println!("Created {role:?} account '{username}'");
    Ok(())
}

async fn serve(config: Config) -> Result<()> {
    info!("Server starting...");

    let pool = init_db(&config.database_url)
        .await
        .context("Failed to connect to database")?;

    let server_addr = config.server_addr.clone();
    let config_data = config.clone();

    HttpServer::new(move || {
        App::new()
            .wrap(actix_web::middleware::Logger::default())
            .wrap(NormalizePath::trim())
            .service(
                // wildcard {_:.*} matches the JS/CSS assets
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
            .app_data(Data::new(pool.clone()))
            .app_data(Data::new(config.clone()))
            .service(index)
            // Configure auth + protected routes with rate limiting
            .configure(|cfg| routes::configure(cfg, config_data.clone()))
    })
    .bind(&server_addr)
    .with_context(|| format!("Failed to bind {server_addr}"))?
    .run()
    .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_staff_takes_no_positional_password() {
        let parsed = Cli::try_parse_from(["attendance-register", "create-staff", "desk", "s3cret"]);
        assert!(parsed.is_err());

        let parsed =
            Cli::try_parse_from(["attendance-register", "create-staff", "desk", "--role", "kiosk"]);
        match parsed.unwrap().command {
            Some(Command::CreateStaff { username, role }) => {
                assert_eq!(username, "desk");
                assert_eq!(role, "kiosk");
            }
            _ => panic!("expected create-staff"),
        }
    }

    #[test]
    fn password_prefers_environment() {
        let mut stdin = "typed\n".as_bytes();
        let password = password_from(Some("from-env".into()), &mut stdin).unwrap();
        assert_eq!(password, "from-env");
    }

    #[test]
    fn password_falls_back_to_stdin_line() {
        let mut stdin = "correct horse\r\n".as_bytes();
        assert_eq!(password_from(None, &mut stdin).unwrap(), "correct horse");
    }

    #[test]
    fn empty_password_is_rejected() {
        assert!(password_from(None, &mut "\n".as_bytes()).is_err());
        assert!(password_from(Some(String::new()), &mut "".as_bytes()).is_err());
    }

    #[test]
    fn roles_parse_case_insensitively() {
        assert_eq!(parse_role("Admin").unwrap(), Role::Admin);
        assert!(parse_role("janitor").is_err());
    }
}
