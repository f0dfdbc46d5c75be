//! HTTP client layer — `DeskHttp`, the REST implementation of the exchange API.

pub mod client;

pub use client::DeskHttp;
