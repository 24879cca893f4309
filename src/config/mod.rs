pub mod environment;

pub use environment::{BridgeStrategy, Config, SmtpConfig};
