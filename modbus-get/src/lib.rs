//! Single-shot Modbus reads for monitoring items, on top of [rodbus](https://docs.rs/rodbus)
//! and [Tokio](https://docs.rs/tokio).
//!
//! An item is described by up to eight positional parameters:
//!
//! `endpoint, [slave_id], [function], [address], [count], [data_type], [endianness], [offset]`
//!
//! The crate validates and defaults these parameters, reads the required span of bits or
//! registers from the device and turns the result into a scalar or a `[v0,v1,...]` list.
//!
//! # Features
//!
//! * Modbus TCP (`tcp://host[:port]`) and Modbus RTU (`rtu://device[:baud[:DPS]]`) endpoints
//! * Modicon style addresses (`40001` and friends) select the function when none is given
//! * 8, 16, 32 and 64 bit integers, IEEE 754 single and double precision values and single bits
//! * Big endian, little endian and both mid-endian (Modicon) byte orders
//! * Nothing is sent to a device unless every parameter is valid
//!
//! # Example
//!
//! ```no_run
//! use modbus_get::{ItemReader, ReaderConfig, RodbusTransport};
//! # use rodbus as _;
//! # use thiserror as _;
//! # use tokio_serial as _;
//! # use tracing as _;
//!
//! #[tokio::main]
//! async fn main() {
//!     let reader = ItemReader::new(RodbusTransport::new(), ReaderConfig::default());
//!
//!     // two holding registers starting at 40010, decoded as one big endian float
//!     match reader
//!         .get(&["tcp://192.168.1.10:502", "1", "", "40010", "1", "float"])
//!         .await
//!     {
//!         Ok(value) => println!("{value}"),
//!         Err(err) => println!("{err}"),
//!     }
//! }
//! ```

mod constants;
mod decode;
mod endpoint;
mod error;
mod format;
mod parse;
mod reader;
mod request;
mod types;

pub mod span;
pub mod transport;

pub use crate::decode::{decode, decode_values, DecodedValue, Number, RawData};
pub use crate::endpoint::{Endpoint, EndpointError, Parity, SerialEndpoint, TcpEndpoint};
pub use crate::error::{Error, InternalError, Param, ParameterError, TransportError};
pub use crate::format::{format_values, ItemValue};
pub use crate::reader::{ItemReader, ReaderConfig};
pub use crate::request::ReadRequest;
pub use crate::transport::{RodbusTransport, TransportLock};
pub use crate::types::{DataType, Endianness, FunctionCode};
