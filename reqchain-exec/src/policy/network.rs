use std::collections::BTreeSet;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use url::{Host, Url};

/// Outbound destination rules applied by the HTTP collaborator before every request and
/// every redirect hop.
#[derive(Debug, Clone)]
pub struct NetworkPolicy {
    /// Allowed URL schemes. Defaults to http and https.
    pub allowed_schemes: BTreeSet<String>,
    /// If non-empty, only these hosts (and their subdomains) are reachable.
    pub allowed_hosts: BTreeSet<String>,
    /// Cloud metadata endpoints and similar, always denied.
    pub blocked_hosts: BTreeSet<String>,
    /// Ports of common internal services.
    pub blocked_ports: BTreeSet<u16>,
    /// Permit loopback, private, link-local and CGNAT literals plus `localhost`.
    pub allow_private_networks: bool,
}

impl Default for NetworkPolicy {
    fn default() -> Self {
        Self {
            allowed_schemes: ["http", "https"].into_iter().map(String::from).collect(),
            allowed_hosts: BTreeSet::new(),
            blocked_hosts: [
                "169.254.169.254",
                "metadata.google.internal",
                "fd00:ec2::254",
                "100.100.100.200",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            blocked_ports: [22, 23, 25, 110, 143, 3306, 5432, 6379, 27017]
                .into_iter()
                .collect(),
            allow_private_networks: false,
        }
    }
}

impl NetworkPolicy {
    pub fn check_url(&self, raw: &str) -> Result<Url, PolicyError> {
        let url = Url::parse(raw).map_err(|e| PolicyError::InvalidUrl(format!("{raw}: {e}")))?;
        self.check(&url)?;
        Ok(url)
    }

    pub fn check(&self, url: &Url) -> Result<(), PolicyError> {
        if !self.allowed_schemes.contains(url.scheme()) {
            return Err(PolicyError::Scheme(url.scheme().to_string()));
        }

        let host = url.host().ok_or(PolicyError::MissingHost)?;
        let host_str = match &host {
            Host::Domain(d) => d.to_ascii_lowercase(),
            Host::Ipv4(ip) => ip.to_string(),
            Host::Ipv6(ip) => ip.to_string(),
        };

        if self.blocked_hosts.contains(&host_str) {
            return Err(PolicyError::BlockedHost(host_str));
        }

        if !self.allowed_hosts.is_empty() && !host_allowed(&self.allowed_hosts, &host_str) {
            return Err(PolicyError::HostNotAllowed(host_str));
        }

        if !self.allow_private_networks {
            let private = match host {
                Host::Domain(_) => host_str == "localhost" || host_str.ends_with(".localhost"),
                Host::Ipv4(ip) => is_private_v4(ip),
                Host::Ipv6(ip) => is_private_v6(ip),
            };
            if private {
                return Err(PolicyError::PrivateAddress(host_str));
            }
        }

        if let Some(port) = url.port() {
            if self.blocked_ports.contains(&port) {
                return Err(PolicyError::BlockedPort(port));
            }
        }

        Ok(())
    }
}

pub(crate) fn host_allowed(allowed_hosts: &BTreeSet<String>, host: &str) -> bool {
    // Exact match or subdomain match (e.g. allow "example.com" matches "api.example.com").
    if allowed_hosts.contains(host) {
        return true;
    }
    allowed_hosts
        .iter()
        .any(|h| host.ends_with(&format!(".{h}")))
}

pub fn is_private_ip(ip: IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => is_private_v4(v4),
        IpAddr::V6(v6) => is_private_v6(v6),
    }
}

fn is_private_v4(ip: Ipv4Addr) -> bool {
    let o = ip.octets();
    ip.is_unspecified()
        || ip.is_loopback()
        || ip.is_private()
        || ip.is_link_local()
        // 100.64/10 carrier-grade NAT
        || (o[0] == 100 && (64..=127).contains(&o[1]))
        // TEST-NET-2 and TEST-NET-3
        || (o[0] == 198 && o[1] == 51 && o[2] == 100)
        || (o[0] == 203 && o[1] == 0 && o[2] == 113)
}

fn is_private_v6(ip: Ipv6Addr) -> bool {
    if let Some(v4) = ip.to_ipv4_mapped() {
        return is_private_v4(v4);
    }
    ip.is_loopback()
        || ip.is_unspecified()
        || (ip.segments()[0] & 0xffc0 == 0xfe80) // fe80::/10 link-local
        || (ip.segments()[0] & 0xfe00 == 0xfc00) // fc00::/7 unique local
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PolicyError {
    #[error("invalid URL {0}")]
    InvalidUrl(String),
    #[error("scheme '{0}' is not allowed")]
    Scheme(String),
    #[error("URL has no host")]
    MissingHost,
    #[error("host '{0}' is blocked")]
    BlockedHost(String),
    #[error("host '{0}' is not in the allow-list")]
    HostNotAllowed(String),
    #[error("'{0}' is a private or loopback address")]
    PrivateAddress(String),
    #[error("port {0} is blocked")]
    BlockedPort(u16),
}
