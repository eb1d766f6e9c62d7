use super::{ClientPacket, PacketCodec, SnapshotCodec};
use crate::state::State;
use futures_util::{SinkExt, StreamExt};
use std::net::SocketAddr;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio_util::codec::{FramedRead, FramedWrite};

/// Write queued packets to the server, in order.
///
/// Return when the sender is dropped or writing fails.
pub async fn packet_out_loop<W>(
    mut outbound_receiver: tokio::sync::mpsc::UnboundedReceiver<ClientPacket>,
    write: W,
    peer: SocketAddr,
) where
    W: AsyncWrite + Unpin,
{
    let mut framed = FramedWrite::new(write, PacketCodec);

    loop {
        if let Some(packet) = outbound_receiver.recv().await {
            if let Err(err) = framed.send(packet).await {
                log::warn!(
                    "{} while writing to {}. Dropping queued packets...",
                    err,
                    peer
                );
                break;
            }
        } else {
            log::debug!("Outbound channel for {} shutdown.", peer);
            break;
        }
    }

    log::debug!("Packet out loop for {} shutdown.", peer);
}

/// Decode snapshots from the server and queue them for the main loop.
///
/// Return on end of stream, on the first decode error or when the receiver is dropped.
/// Never blocks on the receiver.
pub async fn snapshot_in_loop<R>(
    snapshot_sender: crossbeam_channel::Sender<State>,
    read: R,
    max_snapshot_size: usize,
    peer: SocketAddr,
) where
    R: AsyncRead + Unpin,
{
    let mut framed = FramedRead::new(read, SnapshotCodec::new(max_snapshot_size));

    loop {
        match framed.next().await {
            Some(Ok(state)) => {
                if snapshot_sender.send(state).is_err() {
                    log::debug!("Snapshot receiver for {} dropped. Disconnecting...", peer);
                    break;
                }
            }
            Some(Err(err)) => {
                log::error!("{} while decoding snapshot from {}. Disconnecting...", err, peer);
                break;
            }
            None => {
                log::info!("{} closed the connection.", peer);
                break;
            }
        }
    }

    log::debug!("Snapshot in loop for {} shutdown.", peer);
}
