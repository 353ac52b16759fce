pub mod health;
pub mod retrieve;
pub mod upload;
