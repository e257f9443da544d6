pub mod catalog;
pub mod config;
pub mod pipeline;
pub mod report;
pub mod store;
pub mod transcode;

pub use self::config::ConverterConfig;
pub use self::pipeline::Pipeline;
pub use self::report::Summary;

#[cfg(test)]
mod tests;
