//! # Route Modules
//!
//! - [`categories`]: the category registry with legends.
//! - [`map`]: choropleth figures and the home-page panel update.
//! - [`pages`]: server-rendered home and about pages.

pub mod categories;
pub mod map;
pub mod pages;
