mod network;
mod redact;

pub use network::{is_private_ip, NetworkPolicy, PolicyError};
pub use redact::redact_headers;
