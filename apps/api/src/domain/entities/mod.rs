pub mod dispatch;
pub mod user;
