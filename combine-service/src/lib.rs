//! combine-service: single-endpoint relay that turns two crafting elements
//! into a generated combination via the Gemini API.

pub mod config;
pub mod handlers;
pub mod services;
pub mod startup;
