pub mod client;

pub use client::WikiClient;
