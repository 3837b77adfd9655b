pub mod auth_service;
pub mod login_throttle;
pub mod report_service;
pub mod token_service;
