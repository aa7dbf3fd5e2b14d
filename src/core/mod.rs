// src/core/mod.rs

pub mod net;
pub mod retry;
pub mod sanitize;

pub use net::{Fetch, HttpClient, Page};
pub use retry::{RetryPolicy, Transient, with_retry};
