pub mod login;
pub mod session_badge;
