pub mod login;
pub mod registration;

pub use login::login;
pub use registration::register;
