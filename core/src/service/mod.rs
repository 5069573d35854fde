pub mod dashboard;
pub mod tracker_service;
