pub mod config;
pub mod engine;
pub mod feed;
pub mod monitor;
pub mod notify;
pub mod pipeline;

#[cfg(test)]
pub(crate) mod test_support;
