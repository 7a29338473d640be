pub mod client;
pub mod codec;
pub mod transport;
pub mod types;

#[cfg(test)]
pub(crate) mod mock;
