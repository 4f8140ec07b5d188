pub mod collections;
pub mod health;
pub mod migrate;
pub mod seed;
