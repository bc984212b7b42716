//! Utility modules for the greeting overlay service

pub mod cron_helper;
