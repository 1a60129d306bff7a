//! Razorpay adapter - order creation over the Orders API.

mod gateway;

pub use gateway::{RazorpayConfig, RazorpayGateway};
