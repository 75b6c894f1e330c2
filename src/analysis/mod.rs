//! Pressure metrics over a selected window of the `P2` channel.

pub mod metrics;
