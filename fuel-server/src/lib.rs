//! Fuel route planner server.
//!
//! A web application that answers: "Driving from here to there, where
//! should I stop for fuel, and what will it cost?"

pub mod cache;
pub mod config;
pub mod domain;
pub mod geocode;
pub mod planner;
pub mod routing;
pub mod store;
pub mod web;
