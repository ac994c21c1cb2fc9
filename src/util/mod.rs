pub mod bridge_log;
pub mod options;
