//! Persistent record types for the safety_voice service: user accounts,
//! their audio recording, and weekly safe-zone windows.

pub mod config;
pub mod db;
pub mod entities;
pub mod models;
pub mod password;
pub mod validation;
