mod extract;
mod gateways;
mod resolve;

pub use extract::cmd_extract;
pub use gateways::cmd_gateways;
pub use resolve::cmd_resolve;
