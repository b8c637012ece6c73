//! Parsing of the user-supplied `host:port` command node address.

use std::fmt;
use std::num::IntErrorKind;
use std::str::FromStr;

use thiserror::Error;

/// Location of the command node that receives dispatched commands.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TargetAddress {
    host: String,
    port: u16,
}

impl TargetAddress {
    /// Builds an address from already validated parts.
    #[must_use]
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// Host name or IP literal.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// TCP port.
    #[must_use]
    pub const fn port(&self) -> u16 {
        self.port
    }
}

impl fmt::Display for TargetAddress {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}:{}", self.host, self.port)
    }
}

impl FromStr for TargetAddress {
    type Err = AddressParseError;

    /// Splits on the first `:`. Everything after it must be a decimal port,
    /// so a second colon makes the port invalid.
    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let Some((host, port)) = input.split_once(':') else {
            return Err(AddressParseError::MissingSeparator(input.to_owned()));
        };
        if host.is_empty() {
            return Err(AddressParseError::MissingHost(input.to_owned()));
        }
        if port.is_empty() {
            return Err(AddressParseError::MissingPort(input.to_owned()));
        }
        // `u16::from_str` tolerates a leading `+`; a port is digits only.
        if !port.bytes().all(|byte| byte.is_ascii_digit()) {
            return Err(AddressParseError::InvalidPort {
                input: input.to_owned(),
                port: port.to_owned(),
            });
        }
        let port = port.parse::<u16>().map_err(|error| match error.kind() {
            IntErrorKind::PosOverflow => AddressParseError::PortOutOfRange {
                input: input.to_owned(),
                port: port.to_owned(),
            },
            _ => AddressParseError::InvalidPort {
                input: input.to_owned(),
                port: port.to_owned(),
            },
        })?;
        Ok(Self::new(host, port))
    }
}

/// Errors encountered while parsing a [`TargetAddress`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressParseError {
    /// No `:` separated host from port.
    #[error("missing ':' between host and port in '{0}'")]
    MissingSeparator(String),
    /// Host segment was empty.
    #[error("missing host in '{0}'")]
    MissingHost(String),
    /// Port segment was empty.
    #[error("missing port in '{0}'")]
    MissingPort(String),
    /// Port segment was not a decimal number.
    #[error("port '{port}' in '{input}' is not a number")]
    InvalidPort { input: String, port: String },
    /// Port segment exceeded 65535.
    #[error("port '{port}' in '{input}' is out of range")]
    PortOutOfRange { input: String, port: String },
}

impl AddressParseError {
    /// Message shown to the user whenever an address is rejected.
    pub const USER_MESSAGE: &'static str = "Not a valid ip:port combination";
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("192.168.1.5:8080", "192.168.1.5", 8080)]
    #[case("localhost:0", "localhost", 0)]
    #[case("robot.local:65535", "robot.local", 65535)]
    #[case("node:007", "node", 7)]
    fn parses_host_and_port(#[case] input: &str, #[case] host: &str, #[case] port: u16) {
        let address: TargetAddress = input.parse().expect("address should parse");
        assert_eq!(address.host(), host);
        assert_eq!(address.port(), port);
    }

    #[rstest]
    #[case("nocolon")]
    #[case("192.168.1.5")]
    #[case("")]
    fn rejects_missing_separator(#[case] input: &str) {
        let error = input.parse::<TargetAddress>().expect_err("must fail");
        assert!(matches!(error, AddressParseError::MissingSeparator(_)));
    }

    #[test]
    fn rejects_missing_host() {
        let error = ":8080".parse::<TargetAddress>().expect_err("must fail");
        assert!(matches!(error, AddressParseError::MissingHost(_)));
    }

    #[test]
    fn rejects_missing_port() {
        let error = "host:".parse::<TargetAddress>().expect_err("must fail");
        assert!(matches!(error, AddressParseError::MissingPort(_)));
    }

    #[rstest]
    #[case("host:abc")]
    #[case("host:+80")]
    #[case("host:-1")]
    #[case("host:80:90")]
    #[case("host: 80")]
    fn rejects_non_numeric_port(#[case] input: &str) {
        let error = input.parse::<TargetAddress>().expect_err("must fail");
        assert!(matches!(error, AddressParseError::InvalidPort { .. }));
    }

    #[rstest]
    #[case("host:99999")]
    #[case("host:65536")]
    fn rejects_out_of_range_port(#[case] input: &str) {
        let error = input.parse::<TargetAddress>().expect_err("must fail");
        assert!(matches!(error, AddressParseError::PortOutOfRange { .. }));
    }

    #[test]
    fn displays_as_host_and_port() {
        let address = TargetAddress::new("192.168.1.5", 8080);
        assert_eq!(address.to_string(), "192.168.1.5:8080");
    }
}
