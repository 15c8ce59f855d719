use std::net::Ipv6Addr;

use crate::constants::{defaults, limits};
use crate::parse;

const TCP_PREFIX: &str = "tcp://";
const RTU_PREFIX: &str = "rtu://";

#[cfg(not(windows))]
const DEVICE_DIR: &str = "/dev/";

/// Where a request is sent
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Endpoint {
    /// Modbus TCP
    Tcp(TcpEndpoint),
    /// Modbus RTU over a serial line
    Serial(SerialEndpoint),
}

/// Host and port of a Modbus TCP server
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TcpEndpoint {
    /// host name or IP address, without brackets for IPv6
    pub host: String,
    /// TCP port
    pub port: u16,
}

/// Serial line settings of a Modbus RTU device
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SerialEndpoint {
    /// path of the serial device
    pub path: String,
    /// baud rate
    pub baud_rate: u32,
    /// data bits, 5 to 8
    pub data_bits: u8,
    /// parity
    pub parity: Parity,
    /// stop bits, 1 or 2
    pub stop_bits: u8,
}

/// Serial parity
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Parity {
    /// `N`
    None,
    /// `E`
    Even,
    /// `O`
    Odd,
}

/// Reasons an endpoint string is rejected
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EndpointError {
    /// the string starts with neither `tcp://` nor `rtu://`
    #[error("unknown protocol prefix")]
    UnknownScheme,
    /// the TCP host is empty or a bracketed address is malformed
    #[error("invalid host")]
    InvalidHost,
    /// the TCP port is not a 16-bit decimal number
    #[error("invalid port")]
    InvalidPort,
    /// the baud rate is not a decimal number
    #[error("invalid baud rate")]
    InvalidBaudRate,
    /// the data bits/parity/stop bits suffix is malformed
    #[error("invalid serial parameters")]
    InvalidSerialParams,
}

impl Endpoint {
    /// Parse `tcp://host[:port]` or `rtu://path[:baud[:DPS]]`
    pub fn parse(text: &str) -> Result<Self, EndpointError> {
        if let Some(rest) = strip_prefix_ignore_case(text, TCP_PREFIX) {
            let (host, port) = parse_host_port(rest)?;
            return Ok(Endpoint::Tcp(TcpEndpoint { host, port }));
        }

        if let Some(rest) = strip_prefix_ignore_case(text, RTU_PREFIX) {
            return parse_serial(rest).map(Endpoint::Serial);
        }

        Err(EndpointError::UnknownScheme)
    }

    /// true for RTU endpoints
    pub fn is_serial(&self) -> bool {
        matches!(self, Endpoint::Serial(_))
    }
}

impl std::str::FromStr for Endpoint {
    type Err = EndpointError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Endpoint::parse(s)
    }
}

impl Default for SerialEndpoint {
    fn default() -> Self {
        Self {
            path: String::new(),
            baud_rate: defaults::BAUD_RATE,
            data_bits: defaults::DATA_BITS,
            parity: Parity::None,
            stop_bits: defaults::STOP_BITS,
        }
    }
}

impl Parity {
    fn from_letter(letter: u8) -> Option<Self> {
        match letter.to_ascii_uppercase() {
            b'N' => Some(Parity::None),
            b'E' => Some(Parity::Even),
            b'O' => Some(Parity::Odd),
            _ => None,
        }
    }

    fn letter(self) -> char {
        match self {
            Parity::None => 'N',
            Parity::Even => 'E',
            Parity::Odd => 'O',
        }
    }
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Endpoint::Tcp(tcp) if tcp.host.contains(':') => {
                write!(f, "tcp://[{}]:{}", tcp.host, tcp.port)
            }
            Endpoint::Tcp(tcp) => write!(f, "tcp://{}:{}", tcp.host, tcp.port),
            Endpoint::Serial(serial) => write!(
                f,
                "rtu://{}:{}:{}{}{}",
                serial.path,
                serial.baud_rate,
                serial.data_bits,
                serial.parity.letter(),
                serial.stop_bits
            ),
        }
    }
}

fn strip_prefix_ignore_case<'a>(text: &'a str, prefix: &str) -> Option<&'a str> {
    match text.get(..prefix.len()) {
        Some(head) if head.eq_ignore_ascii_case(prefix) => Some(&text[prefix.len()..]),
        _ => None,
    }
}

fn parse_port(text: &str) -> Result<u16, EndpointError> {
    parse::decimal_u16(text).ok_or(EndpointError::InvalidPort)
}

/// split "host[:port]", "[v6]" or "[v6]:port"; a bare IPv6 literal is taken whole
fn parse_host_port(text: &str) -> Result<(String, u16), EndpointError> {
    if let Some(rest) = text.strip_prefix('[') {
        let (host, tail) = rest.split_once(']').ok_or(EndpointError::InvalidHost)?;
        let port = match tail {
            "" => defaults::TCP_PORT,
            tail => parse_port(tail.strip_prefix(':').ok_or(EndpointError::InvalidHost)?)?,
        };
        if host.parse::<Ipv6Addr>().is_err() {
            return Err(EndpointError::InvalidHost);
        }
        return Ok((host.to_owned(), port));
    }

    if text.parse::<Ipv6Addr>().is_ok() {
        return Ok((text.to_owned(), defaults::TCP_PORT));
    }

    let (host, port) = match text.split_once(':') {
        Some((host, port)) => (host, parse_port(port)?),
        None => (text, defaults::TCP_PORT),
    };

    if host.is_empty() {
        return Err(EndpointError::InvalidHost);
    }

    Ok((host.to_owned(), port))
}

fn parse_serial(text: &str) -> Result<SerialEndpoint, EndpointError> {
    let mut serial = SerialEndpoint::default();

    let device = match text.split_once(':') {
        None => text,
        Some((device, suffix)) => {
            let (baud, params) = match suffix.split_once(':') {
                Some((baud, params)) => (baud, Some(params)),
                None => (suffix, None),
            };

            serial.baud_rate = parse::decimal(baud)
                .and_then(|value| u32::try_from(value).ok())
                .ok_or(EndpointError::InvalidBaudRate)?;

            if let Some(params) = params {
                parse_serial_params(params, &mut serial)?;
            }

            device
        }
    };

    serial.path = resolve_device(device);
    Ok(serial)
}

/// parse the 3 character data bits, parity, stop bits suffix, e.g. `8N1`
fn parse_serial_params(text: &str, serial: &mut SerialEndpoint) -> Result<(), EndpointError> {
    let &[data_bits, parity, stop_bits] = text.as_bytes() else {
        return Err(EndpointError::InvalidSerialParams);
    };

    if !data_bits.is_ascii_digit() || !stop_bits.is_ascii_digit() {
        return Err(EndpointError::InvalidSerialParams);
    }

    let data_bits = data_bits - b'0';
    let stop_bits = stop_bits - b'0';

    if !limits::DATA_BITS.contains(&data_bits) || !limits::STOP_BITS.contains(&stop_bits) {
        return Err(EndpointError::InvalidSerialParams);
    }

    serial.data_bits = data_bits;
    serial.stop_bits = stop_bits;
    serial.parity = Parity::from_letter(parity).ok_or(EndpointError::InvalidSerialParams)?;
    Ok(())
}

#[cfg(not(windows))]
fn resolve_device(device: &str) -> String {
    if device.starts_with('/') {
        device.to_owned()
    } else {
        format!("{DEVICE_DIR}{device}")
    }
}

#[cfg(windows)]
fn resolve_device(device: &str) -> String {
    device.to_owned()
}
