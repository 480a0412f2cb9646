pub mod health;
pub mod monitor;
