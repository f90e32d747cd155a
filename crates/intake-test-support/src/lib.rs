#![forbid(unsafe_code)]
#![warn(
    unused,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    rustdoc::broken_intra_doc_links,
    missing_docs
)]

//! Shared test helpers used across integration suites.
//! Layout: fixtures.rs (sample sources and payloads), mocks.rs (scripted backend), assert.rs (event collection).

pub mod assert;
pub mod fixtures;
pub mod mocks;
