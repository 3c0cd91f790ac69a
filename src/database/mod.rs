pub mod manager;
pub mod models;
pub mod tokens;
pub mod users;
