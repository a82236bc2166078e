pub mod client;

pub use client::{segment, ApiClient};
pub use reqwest::Method;
