pub mod logout;
pub mod users;
