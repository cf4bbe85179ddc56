pub mod bid;
pub mod catalog;
pub mod conversation;
pub mod message;
pub mod payment;
pub mod review;
pub mod task;
pub mod user;
