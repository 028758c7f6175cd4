pub mod config;
pub mod credential;
pub mod db;
pub mod error;
pub mod event;
pub mod referral;
pub mod response;
pub mod state;
pub mod vote;
