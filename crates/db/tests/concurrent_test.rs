//! Concurrent access tests for the atomic-apply protocol.
//!
//! These verify that the exclusive row lock serializes concurrent
//! operations on one wallet (no lost updates), that overdraws cannot slip
//! through under contention, and that operations on different wallets do
//! not block each other. They run against a real Postgres named by
//! `DATABASE_URL` and are skipped when it is not set.

use chrono::Utc;
use futures::future::join_all;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};
use std::sync::Arc;
use tokio::sync::Barrier;
use uuid::Uuid;

use walletd_db::entities::users;
use walletd_db::migration::{Migrator, MigratorTrait};
use walletd_db::{ApplyOperationInput, WalletError, WalletRepository};
use walletd_shared::{UserId, WalletId};

async fn test_db() -> Option<DatabaseConnection> {
    let url = std::env::var("DATABASE_URL")
        .or_else(|_| std::env::var("WALLETD__DATABASE__URL"))
        .ok();
    let Some(url) = url else {
        eprintln!("skipping: DATABASE_URL not set");
        return None;
    };
    let db = walletd_db::connect(&url).await.expect("connect to test db");
    Migrator::up(&db, None).await.expect("run migrations");
    Some(db)
}

async fn seed_wallet(db: &DatabaseConnection, balance: Decimal) -> (WalletRepository, WalletId) {
    let owner = UserId::new();
    users::ActiveModel {
        id: Set(owner.into_inner()),
        email: Set(format!("concurrent-test-{}@example.com", Uuid::new_v4())),
        created_at: Set(Utc::now().into()),
    }
    .insert(db)
    .await
    .expect("insert test user");

    let repo = WalletRepository::new(db.clone()).with_lock_timeout(30);
    let wallet = repo
        .create_wallet(owner, balance)
        .await
        .expect("create test wallet");
    (repo, WalletId::from_uuid(wallet.id))
}

fn operation(kind: &str, amount: &str) -> ApplyOperationInput {
    ApplyOperationInput {
        operation_type: kind.to_string(),
        amount: amount.to_string(),
    }
}

#[tokio::test]
async fn test_concurrent_deposits_are_not_lost() {
    let Some(db) = test_db().await else { return };
    let (repo, wallet_id) = seed_wallet(&db, dec!(0.00)).await;

    const TASKS: usize = 20;
    let barrier = Arc::new(Barrier::new(TASKS));

    let handles: Vec<_> = (0..TASKS)
        .map(|_| {
            let repo = repo.clone();
            let barrier = Arc::clone(&barrier);
            tokio::spawn(async move {
                barrier.wait().await;
                repo.apply_operation(wallet_id, operation("DEPOSIT", "10.00"))
                    .await
            })
        })
        .collect();

    for result in join_all(handles).await {
        result.expect("task panicked").expect("deposit failed");
    }

    let wallet = repo.get_wallet(wallet_id).await.unwrap();
    assert_eq!(wallet.balance, dec!(200.00));
    assert_eq!(repo.list_operations(wallet_id).await.unwrap().len(), TASKS);
}

#[tokio::test]
async fn test_mixed_concurrent_operations_serialize_to_the_sequential_sum() {
    let Some(db) = test_db().await else { return };
    let (repo, wallet_id) = seed_wallet(&db, dec!(100.00)).await;

    const PAIRS: usize = 10;
    let barrier = Arc::new(Barrier::new(PAIRS * 2));

    let mut handles = Vec::with_capacity(PAIRS * 2);
    for _ in 0..PAIRS {
        for kind in ["DEPOSIT", "WITHDRAW"] {
            let repo = repo.clone();
            let barrier = Arc::clone(&barrier);
            handles.push(tokio::spawn(async move {
                barrier.wait().await;
                repo.apply_operation(wallet_id, operation(kind, "5.00")).await
            }));
        }
    }

    for result in join_all(handles).await {
        result.expect("task panicked").expect("operation failed");
    }

    // Deposits and withdrawals cancel out in every serialization order;
    // a withdrawal can only fail here if an update was lost.
    let wallet = repo.get_wallet(wallet_id).await.unwrap();
    assert_eq!(wallet.balance, dec!(100.00));
    assert_eq!(
        repo.list_operations(wallet_id).await.unwrap().len(),
        PAIRS * 2
    );
}

#[tokio::test]
async fn test_concurrent_overdraws_allow_exactly_one_success() {
    let Some(db) = test_db().await else { return };
    let (repo, wallet_id) = seed_wallet(&db, dec!(10.00)).await;

    const TASKS: usize = 5;
    let barrier = Arc::new(Barrier::new(TASKS));

    let handles: Vec<_> = (0..TASKS)
        .map(|_| {
            let repo = repo.clone();
            let barrier = Arc::clone(&barrier);
            tokio::spawn(async move {
                barrier.wait().await;
                repo.apply_operation(wallet_id, operation("WITHDRAW", "10.00"))
                    .await
            })
        })
        .collect();

    let mut successes = 0;
    let mut insufficient = 0;
    for result in join_all(handles).await {
        match result.expect("task panicked") {
            Ok(_) => successes += 1,
            Err(WalletError::InsufficientFunds) => insufficient += 1,
            Err(err) => panic!("unexpected error: {err}"),
        }
    }

    // Whichever order the lock grants, only the first withdrawal can fit.
    assert_eq!(successes, 1);
    assert_eq!(insufficient, TASKS - 1);

    let wallet = repo.get_wallet(wallet_id).await.unwrap();
    assert_eq!(wallet.balance, dec!(0.00));
    assert_eq!(repo.list_operations(wallet_id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_operations_on_different_wallets_proceed_independently() {
    let Some(db) = test_db().await else { return };
    let (repo_a, wallet_a) = seed_wallet(&db, dec!(50.00)).await;
    let (repo_b, wallet_b) = seed_wallet(&db, dec!(50.00)).await;

    let barrier = Arc::new(Barrier::new(2));
    let barrier_a = Arc::clone(&barrier);
    let barrier_b = Arc::clone(&barrier);

    let task_a = tokio::spawn(async move {
        barrier_a.wait().await;
        repo_a.apply_operation(wallet_a, operation("DEPOSIT", "25.00")).await
    });
    let task_b = tokio::spawn(async move {
        barrier_b.wait().await;
        repo_b.apply_operation(wallet_b, operation("WITHDRAW", "25.00")).await
    });

    task_a.await.unwrap().expect("deposit on wallet a failed");
    task_b.await.unwrap().expect("withdraw on wallet b failed");

    let repo = WalletRepository::new(db.clone());
    assert_eq!(repo.get_wallet(wallet_a).await.unwrap().balance, dec!(75.00));
    assert_eq!(repo.get_wallet(wallet_b).await.unwrap().balance, dec!(25.00));
}
