use core::fmt;

pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0";
pub const DEFAULT_LISTEN_PORT: u16 = 8080;

/// `ListenConfig` is the only configurable part of the probe: the address and
/// port the listener binds to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListenConfig {
    pub addr: String,
    pub port: u16,
}

// -- Constructors

impl ListenConfig {
    #[must_use]
    pub fn new(addr: String, port: u16) -> Self {
        Self { addr, port }
    }
}

impl Default for ListenConfig {
    fn default() -> Self {
        Self::new(String::from(DEFAULT_LISTEN_ADDR), DEFAULT_LISTEN_PORT)
    }
}

// -- Debug Display

impl fmt::Display for ListenConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.addr.contains(':') && !self.addr.starts_with('[') {
            write!(f, "[{}]:{}", self.addr, self.port)
        } else {
            write!(f, "{}:{}", self.addr, self.port)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_listens_on_all_interfaces() {
        let config = ListenConfig::default();
        assert_eq!(config.to_string(), "0.0.0.0:8080");
    }

    #[test]
    fn display_brackets_ipv6_hosts() {
        let config = ListenConfig::new(String::from("::1"), 3000);
        assert_eq!(config.to_string(), "[::1]:3000");

        let bracketed = ListenConfig::new(String::from("[::]"), 3000);
        assert_eq!(bracketed.to_string(), "[::]:3000");
    }

    #[test]
    fn display_keeps_hostnames() {
        let config = ListenConfig::new(String::from("localhost"), 0);
        assert_eq!(config.to_string(), "localhost:0");
    }
}
