//! Database seeder for Tally development and testing.
//!
//! Seeds a handful of demo accounts with known balances for local
//! development. Accounts are never created by the service itself, so a
//! fresh database needs this before the API returns anything useful.
//!
//! Usage: cargo run --bin seeder

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};
use std::str::FromStr;

use tally_db::entities::accounts;

/// Demo accounts seeded for local development (id, starting balance).
const DEMO_ACCOUNTS: &[(i64, &str)] = &[
    (1, "56.99"),
    (2, "25.00"),
    (3, "100.00"),
    (4, "12.50"),
    (5, "0.00"),
];

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let database_url =
        std::env::var("DATABASE_URL").expect("DATABASE_URL must be set in environment");

    println!("Connecting to database...");
    let db = tally_db::connect(&database_url)
        .await
        .expect("Failed to connect to database");

    println!("Seeding demo accounts...");
    seed_accounts(&db).await;

    println!("Seeding complete!");
}

/// Seeds the demo accounts, skipping any that already exist.
async fn seed_accounts(db: &DatabaseConnection) {
    for &(id, balance) in DEMO_ACCOUNTS {
        if accounts::Entity::find_by_id(id)
            .one(db)
            .await
            .ok()
            .flatten()
            .is_some()
        {
            println!("  Account {id} already exists, skipping...");
            continue;
        }

        let account = accounts::ActiveModel {
            id: Set(id),
            balance: Set(Decimal::from_str(balance).unwrap()),
            created_at: Set(Utc::now().into()),
            updated_at: Set(Utc::now().into()),
        };

        if let Err(e) = account.insert(db).await {
            eprintln!("Failed to insert account {id}: {e}");
        } else {
            println!("  Created account {id} with balance {balance}");
        }
    }
}
