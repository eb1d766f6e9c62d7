use super::{tcp_loops::*, ClientPacket};
use crate::{
    config::ConnectionConfigs,
    error::{ConnectError, SendError},
    state::State,
};
use std::net::SocketAddr;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;
use tokio::spawn;

/// A live link to the server.
///
/// Sending and receiving never block:
/// both sides are handled by their own task.
/// Dropping the connection stops the out loop,
/// which closes the socket's write half.
pub struct Connection {
    peer: SocketAddr,
    /// Send packets to the server.
    outbound_sender: tokio::sync::mpsc::UnboundedSender<ClientPacket>,
    /// Snapshots from the server, oldest first.
    snapshot_receiver: crossbeam_channel::Receiver<State>,
    /// Cleared once the receive loop is seen stopped and its queue drained.
    receiving: bool,
}
impl Connection {
    /// Open a tcp connection to `addr` and start its loops on the current runtime.
    pub async fn connect(addr: &str, configs: &ConnectionConfigs) -> Result<Self, ConnectError> {
        let timeout = configs.connect_timeout();
        let stream = match tokio::time::timeout(timeout, TcpStream::connect(addr)).await {
            Ok(Ok(stream)) => stream,
            Ok(Err(source)) => {
                return Err(ConnectError::Io {
                    addr: addr.to_string(),
                    source,
                })
            }
            Err(_) => {
                return Err(ConnectError::TimedOut {
                    addr: addr.to_string(),
                    timeout,
                })
            }
        };

        if let Err(err) = stream.set_nodelay(true) {
            log::warn!("Failed to set nodelay: {}", err);
        }

        let peer = stream.peer_addr().map_err(|source| ConnectError::Io {
            addr: addr.to_string(),
            source,
        })?;
        log::debug!("Tcp connection established with {}.", peer);

        let (read, write) = stream.into_split();
        Ok(Self::spawn(read, write, peer, configs))
    }

    /// Start the connection loops over any byte stream.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn<R, W>(read: R, write: W, peer: SocketAddr, configs: &ConnectionConfigs) -> Self
    where
        R: AsyncRead + Unpin + Send + 'static,
        W: AsyncWrite + Unpin + Send + 'static,
    {
        let (outbound_sender, outbound_receiver) = tokio::sync::mpsc::unbounded_channel();
        let (snapshot_sender, snapshot_receiver) = crossbeam_channel::unbounded();

        spawn(snapshot_in_loop(
            snapshot_sender,
            read,
            configs.max_snapshot_size,
            peer,
        ));
        spawn(packet_out_loop(outbound_receiver, write, peer));

        Self {
            peer,
            outbound_sender,
            snapshot_receiver,
            receiving: true,
        }
    }

    /// Queue a packet for the server. No acknowledgement is awaited.
    pub fn send(&self, packet: impl Into<ClientPacket>) -> Result<(), SendError> {
        self.outbound_sender
            .send(packet.into())
            .map_err(|_| SendError::Disconnected)
    }

    /// Try to take the oldest pending snapshot.
    ///
    /// `None` if there is none yet, or the receive loop has stopped.
    pub fn try_recv(&mut self) -> Option<State> {
        match self.snapshot_receiver.try_recv() {
            Ok(state) => Some(state),
            Err(crossbeam_channel::TryRecvError::Empty) => None,
            Err(crossbeam_channel::TryRecvError::Disconnected) => {
                if self.receiving {
                    log::warn!("No more snapshots from {}.", self.peer);
                    self.receiving = false;
                }
                None
            }
        }
    }

    /// If snapshots may still arrive.
    pub fn is_receiving(&self) -> bool {
        self.receiving
    }

    pub fn peer(&self) -> SocketAddr {
        self.peer
    }
}
