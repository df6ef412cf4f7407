//! Access check for internal endpoints based on the client's real IP.

use ipnetwork::IpNetwork;
use std::net::IpAddr;
use std::str::FromStr;

/// A CIDR range whose clients may read internal statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrustedSubnet(IpNetwork);

impl TrustedSubnet {
    /// Returns true if `ip` (typically the `X-Real-IP` header value) parses
    /// and lies inside the subnet.
    pub fn allows(&self, ip: &str) -> bool {
        ip.trim()
            .parse::<IpAddr>()
            .is_ok_and(|addr| self.0.contains(addr))
    }
}

impl FromStr for TrustedSubnet {
    type Err = ipnetwork::IpNetworkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        IpNetwork::from_str(s.trim()).map(Self)
    }
}

impl std::fmt::Display for TrustedSubnet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ipv4_subnet() {
        let subnet: TrustedSubnet = "192.168.1.0/24".parse().unwrap();

        assert!(subnet.allows("192.168.1.10"));
        assert!(subnet.allows(" 192.168.1.255 "));
        assert!(!subnet.allows("192.168.2.1"));
    }

    #[test]
    fn test_ipv6_subnet() {
        let subnet: TrustedSubnet = "fd00::/8".parse().unwrap();

        assert!(subnet.allows("fd12:3456::1"));
        assert!(!subnet.allows("2001:db8::1"));
    }

    #[test]
    fn test_garbage_ip_is_refused() {
        let subnet: TrustedSubnet = "10.0.0.0/8".parse().unwrap();

        assert!(!subnet.allows(""));
        assert!(!subnet.allows("not-an-ip"));
    }

    #[test]
    fn test_invalid_cidr() {
        assert!("10.0.0.0/99".parse::<TrustedSubnet>().is_err());
        assert!("nonsense".parse::<TrustedSubnet>().is_err());
    }

    #[test]
    fn test_display() {
        let subnet: TrustedSubnet = "10.0.0.0/8".parse().unwrap();
        assert_eq!(subnet.to_string(), "10.0.0.0/8");
    }
}
