//! Seeds the initial admin and employee accounts. Idempotent: existing
//! emails are left untouched.

use sqlx::postgres::PgPoolOptions;
use tracing::info;

use salontrack::auth::password::hash_password;
use salontrack::auth::repo::{Admin, Employee};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "seed=info,salontrack=info".to_string()),
        )
        .init();

    let database_url = std::env::var("DATABASE_URL")?;
    let db = PgPoolOptions::new()
        .max_connections(2)
        .connect(&database_url)
        .await?;

    sqlx::migrate!("./migrations").run(&db).await?;

    let admin_email =
        std::env::var("SEED_ADMIN_EMAIL").unwrap_or_else(|_| "admin@salontrack.local".into());
    let admin_password = std::env::var("SEED_ADMIN_PASSWORD").unwrap_or_else(|_| "admin123".into());
    Admin::seed(&db, &admin_email, &hash_password(&admin_password)?, "Admin").await?;
    info!(email = %admin_email, "admin seeded");

    let employee_password =
        std::env::var("SEED_EMPLOYEE_PASSWORD").unwrap_or_else(|_| "employee123".into());
    for (email, name) in [
        ("am@salontrack.local", "Am"),
        ("tulip@salontrack.local", "Tulip"),
    ] {
        Employee::seed(&db, email, &hash_password(&employee_password)?, name).await?;
        info!(%email, "employee seeded");
    }

    Ok(())
}
