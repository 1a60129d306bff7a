//! Pixelkeys - Digital Game Key Storefront Backend
//!
//! This crate implements checkout session creation, payment confirmation
//! handling, and game-key fulfillment for the Pixelkeys storefront.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
