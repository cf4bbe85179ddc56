pub mod auth;
pub mod bid_service;
pub mod catalog_service;
pub mod conversation_service;
pub mod health_service;
pub mod message_service;
pub mod payment_service;
pub mod realtime;
pub mod review_service;
pub mod task_service;
pub mod user_service;
