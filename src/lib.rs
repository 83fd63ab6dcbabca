//! Larder Library
//!
//! Pantry-aware recipe discovery: fuzzy ingredient matching, the recipe
//! catalog client, user stores and the HTTP backend for the mobile app.

pub mod accounts;
pub mod browser;
pub mod catalog;
pub mod config;
pub mod db;
pub mod error;
pub mod favorites;
pub mod matching;
pub mod pantry;
pub mod recipe;
pub mod server;
pub mod speech;
