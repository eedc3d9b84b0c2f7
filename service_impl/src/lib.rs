pub mod account;
pub mod clock;
pub mod config;
pub mod daily_summary;
pub mod dashboard;
pub mod macros;
pub mod password;
pub mod permission;
pub mod report;
pub mod session;
pub mod user_service;
pub mod uuid_service;

#[cfg(test)]
mod test;

pub use permission::PermissionServiceImpl;
pub use user_service::UserServiceImpl;
