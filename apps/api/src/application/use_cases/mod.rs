pub mod reminder;
pub mod settings;
pub mod subscription;
pub mod user;
