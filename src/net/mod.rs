//! LAN address discovery for playlist URLs.

use std::net::IpAddr;

/// First non-loopback LAN IPv4 address of this host, if any.
pub fn lan_ipv4() -> Option<IpAddr> {
    match local_ip_address::local_ip() {
        Ok(ip) if ip.is_ipv4() && !ip.is_loopback() => Some(ip),
        _ => None,
    }
}

/// Domain to embed in M3U playlists. "Any interface" and loopback-adjacent
/// bind domains are useless to other devices on the network, so they are
/// replaced with the host's LAN IPv4 address when one can be discovered.
pub fn effective_domain(configured: &str) -> String {
    if configured.starts_with("0.") || configured.starts_with("127.") {
        lan_ipv4()
            .map(|ip| ip.to_string())
            .unwrap_or_else(|| "0.0.0.0".to_string())
    } else {
        configured.to_string()
    }
}
