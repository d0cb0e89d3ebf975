//! Soil dashboard library.
//!
//! Everything except the terminal event loop lives here so it can be
//! exercised by unit and integration tests without a network, speaker or
//! sensor device.

#![deny(unused_must_use)]

pub mod adapters;
pub mod advice;
pub mod alerts;
pub mod app;
pub mod chart;
pub mod config;
pub mod error;
pub mod export;
pub mod fsm;
pub mod history;
pub mod reading;
pub mod scheduler;
pub mod sensors;
pub mod shell;
pub mod view;
