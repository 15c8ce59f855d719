use std::fmt::Debug;
use std::net::IpAddr;
use std::time::Duration;

use rodbus::client::{
    spawn_rtu_client_task, spawn_tcp_client_task, Channel, ClientState, HostAddr, Listener,
    PortState, RequestParam,
};
use rodbus::{
    default_retry_strategy, AddressRange, DecodeLevel, Indexed, MaybeAsync, RequestError,
    SerialSettings, UnitId,
};
use tokio::sync::mpsc;

use crate::decode::RawData;
use crate::endpoint::{Endpoint, Parity, SerialEndpoint, TcpEndpoint};
use crate::error::TransportError;
use crate::transport::{Connection, Transport};
use crate::types::FunctionCode;

// a single request is in flight at any time
const MAX_QUEUED_REQUESTS: usize = 1;

/// [`Transport`] backed by `rodbus` client channels
///
/// TCP endpoints use a Modbus TCP channel, serial endpoints an RTU channel. The channel is
/// enabled on connect and disabled again when the connection is closed.
#[derive(Clone, Copy, Debug, Default)]
pub struct RodbusTransport;

impl RodbusTransport {
    /// Create the transport
    pub fn new() -> Self {
        Self
    }
}

/// Open channel to a device
pub struct RodbusConnection {
    channel: Channel,
    param: RequestParam,
}

/// Where a channel is in its connection sequence
enum Progress {
    Pending,
    Up,
    Down(&'static str),
}

/// Channel state reported by a `rodbus` listener
trait LinkState: Copy + Debug + Send + 'static {
    fn progress(self) -> Progress;
}

impl LinkState for ClientState {
    fn progress(self) -> Progress {
        match self {
            ClientState::Disabled | ClientState::Connecting => Progress::Pending,
            ClientState::Connected => Progress::Up,
            ClientState::WaitAfterFailedConnect(_) => Progress::Down("unable to connect to"),
            ClientState::WaitAfterDisconnect(_) => Progress::Down("disconnected from"),
            ClientState::Shutdown => Progress::Down("channel shut down while connecting to"),
        }
    }
}

impl LinkState for PortState {
    fn progress(self) -> Progress {
        match self {
            PortState::Disabled => Progress::Pending,
            PortState::Open => Progress::Up,
            PortState::Wait(_) => Progress::Down("unable to open"),
            PortState::Shutdown => Progress::Down("channel shut down while connecting to"),
        }
    }
}

/// Forwards channel state changes to the task waiting for the connection
struct StateListener<T> {
    tx: mpsc::Sender<T>,
}

impl<T: LinkState> StateListener<T> {
    fn create() -> (Box<dyn Listener<T>>, mpsc::Receiver<T>) {
        let (tx, rx) = mpsc::channel(32);
        (Box::new(Self { tx }), rx)
    }
}

impl<T: LinkState> Listener<T> for StateListener<T> {
    fn update(&mut self, state: T) -> MaybeAsync<()> {
        let _ = self.tx.try_send(state);
        MaybeAsync::ready(())
    }
}

impl Transport for RodbusTransport {
    type Connection = RodbusConnection;

    async fn connect(
        &self,
        endpoint: &Endpoint,
        slave_id: u8,
        timeout: Duration,
    ) -> Result<RodbusConnection, TransportError> {
        tracing::info!("connecting to {endpoint}");
        let channel = match endpoint {
            Endpoint::Tcp(tcp) => {
                let (listener, rx) = StateListener::<ClientState>::create();
                let channel = spawn_tcp_client_task(
                    host_addr(tcp),
                    MAX_QUEUED_REQUESTS,
                    default_retry_strategy(),
                    DecodeLevel::nothing(),
                    Some(listener),
                );
                wait_for_link(channel, rx, endpoint, timeout).await?
            }
            Endpoint::Serial(serial) => {
                let (listener, rx) = StateListener::<PortState>::create();
                let channel = spawn_rtu_client_task(
                    &serial.path,
                    serial_settings(serial),
                    MAX_QUEUED_REQUESTS,
                    default_retry_strategy(),
                    DecodeLevel::nothing(),
                    Some(listener),
                );
                wait_for_link(channel, rx, endpoint, timeout).await?
            }
        };
        tracing::info!("connected to {endpoint}");

        Ok(RodbusConnection {
            channel,
            param: RequestParam::new(UnitId::new(slave_id), timeout),
        })
    }
}

impl Connection for RodbusConnection {
    async fn read(
        &mut self,
        function: FunctionCode,
        address: u16,
        count: u16,
    ) -> Result<RawData, TransportError> {
        tracing::debug!("reading {count} value(s) of {function:?} at address {address}");
        let range = AddressRange::try_from(address, count)
            .map_err(|err| TransportError::Read(err.to_string()))?;

        let raw = match function {
            FunctionCode::Coil => RawData::Bits(to_bits(
                self.channel
                    .read_coils(self.param, range)
                    .await
                    .map_err(request_error)?,
            )),
            FunctionCode::DiscreteInput => RawData::Bits(to_bits(
                self.channel
                    .read_discrete_inputs(self.param, range)
                    .await
                    .map_err(request_error)?,
            )),
            FunctionCode::InputRegister => RawData::Registers(to_registers(
                self.channel
                    .read_input_registers(self.param, range)
                    .await
                    .map_err(request_error)?,
            )),
            FunctionCode::HoldingRegister => RawData::Registers(to_registers(
                self.channel
                    .read_holding_registers(self.param, range)
                    .await
                    .map_err(request_error)?,
            )),
        };

        Ok(raw)
    }

    async fn close(self) {
        if self.channel.disable().await.is_err() {
            tracing::warn!("channel was already shut down");
        }
    }
}

async fn wait_for_link<S: LinkState>(
    channel: Channel,
    mut rx: mpsc::Receiver<S>,
    endpoint: &Endpoint,
    timeout: Duration,
) -> Result<Channel, TransportError> {
    let shut_down =
        || TransportError::Connect(format!("channel shut down while connecting to {endpoint}"));

    channel.enable().await.map_err(|_| shut_down())?;

    let link = async {
        loop {
            let Some(state) = rx.recv().await else {
                return Err(shut_down());
            };
            tracing::debug!("state: {state:?}");
            match state.progress() {
                Progress::Pending => {}
                Progress::Up => return Ok(()),
                Progress::Down(reason) => {
                    return Err(TransportError::Connect(format!("{reason} {endpoint}")))
                }
            }
        }
    };

    let err = match tokio::time::timeout(timeout, link).await {
        Ok(Ok(())) => return Ok(channel),
        Ok(Err(err)) => err,
        Err(_) => TransportError::ConnectTimeout,
    };

    tracing::warn!("{err}");
    let _ = channel.disable().await;
    Err(err)
}

fn host_addr(tcp: &TcpEndpoint) -> HostAddr {
    match tcp.host.parse::<IpAddr>() {
        Ok(ip) => HostAddr::ip(ip, tcp.port),
        // assume that it's a hostname
        Err(_) => HostAddr::dns(tcp.host.clone(), tcp.port),
    }
}

fn serial_settings(serial: &SerialEndpoint) -> SerialSettings {
    SerialSettings {
        baud_rate: serial.baud_rate,
        data_bits: match serial.data_bits {
            5 => tokio_serial::DataBits::Five,
            6 => tokio_serial::DataBits::Six,
            7 => tokio_serial::DataBits::Seven,
            _ => tokio_serial::DataBits::Eight,
        },
        stop_bits: match serial.stop_bits {
            2 => tokio_serial::StopBits::Two,
            _ => tokio_serial::StopBits::One,
        },
        parity: match serial.parity {
            Parity::None => tokio_serial::Parity::None,
            Parity::Even => tokio_serial::Parity::Even,
            Parity::Odd => tokio_serial::Parity::Odd,
        },
        ..SerialSettings::default()
    }
}

fn request_error(err: RequestError) -> TransportError {
    match err {
        RequestError::ResponseTimeout => TransportError::ResponseTimeout,
        err => TransportError::Read(err.to_string()),
    }
}

fn to_bits(values: Vec<Indexed<bool>>) -> Vec<u8> {
    values.into_iter().map(|x| u8::from(x.value)).collect()
}

fn to_registers(values: Vec<Indexed<u16>>) -> Vec<u16> {
    values.into_iter().map(|x| x.value).collect()
}
