//! Transit operations record manager.
//!
//! Keeps bus stops, routes, the stops each route serves, route schedules and
//! drivers. Driver fields are normalized and validated before they are
//! stored, and each stop's arrival times are derived from its route's
//! schedule.

pub mod config;
pub mod context;
pub mod domain;
pub mod reference;
pub mod schedule;
pub mod store;
pub mod validation;
pub mod web;
