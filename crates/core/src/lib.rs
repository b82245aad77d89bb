//! Core business logic for walletd.
//!
//! This crate contains pure business logic with ZERO web or database
//! dependencies. The balance-mutation arithmetic lives here; the
//! transactional orchestration around it lives in `walletd-db`.

pub mod wallet;
