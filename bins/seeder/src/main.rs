//! Database seeder for walletd development and testing.
//!
//! Seeds a demo user and their wallet so the API can be exercised locally
//! without a provisioning flow.
//!
//! Usage: cargo run --bin seeder

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};
use uuid::Uuid;

use walletd_db::entities::users;
use walletd_db::{WalletError, WalletRepository};
use walletd_shared::UserId;

/// Demo user ID (consistent for all seeds)
const DEMO_USER_ID: &str = "00000000-0000-0000-0000-000000000001";

/// Starting balance for the demo wallet.
const DEMO_BALANCE_CENTS: i64 = 10_000; // 100.00

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let database_url =
        std::env::var("DATABASE_URL").expect("DATABASE_URL must be set in environment");

    println!("Connecting to database...");
    let db = walletd_db::connect(&database_url)
        .await
        .expect("Failed to connect to database");

    println!("Seeding demo user...");
    seed_demo_user(&db).await;

    println!("Seeding demo wallet...");
    seed_demo_wallet(&db).await;

    println!("Seeding complete!");
}

fn demo_user_id() -> Uuid {
    Uuid::parse_str(DEMO_USER_ID).unwrap()
}

/// Seeds a demo user for development.
async fn seed_demo_user(db: &DatabaseConnection) {
    if users::Entity::find_by_id(demo_user_id())
        .one(db)
        .await
        .ok()
        .flatten()
        .is_some()
    {
        println!("  Demo user already exists, skipping...");
        return;
    }

    let user = users::ActiveModel {
        id: Set(demo_user_id()),
        email: Set("demo@walletd.dev".to_string()),
        created_at: Set(Utc::now().into()),
    };

    user.insert(db).await.expect("Failed to seed demo user");
}

/// Seeds the demo user's wallet with a starting balance.
async fn seed_demo_wallet(db: &DatabaseConnection) {
    let repo = WalletRepository::new(db.clone());

    match repo
        .create_wallet(
            UserId::from_uuid(demo_user_id()),
            Decimal::new(DEMO_BALANCE_CENTS, 2),
        )
        .await
    {
        Ok(wallet) => println!("  Created wallet {} with balance {}", wallet.id, wallet.balance),
        Err(WalletError::DuplicateOwner(_)) => {
            println!("  Demo wallet already exists, skipping...");
        }
        Err(err) => panic!("Failed to seed demo wallet: {err}"),
    }
}
