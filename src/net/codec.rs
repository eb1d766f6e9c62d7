use super::packets::{encode_packet, ClientPacket};
use super::PACKET_DELIMITER;
use crate::{error::DecodeError, state::State};
use bytes::{Buf, BytesMut};
use tokio_util::codec::{Decoder, Encoder};

/// Decode a stream of json snapshots.
///
/// The server ends every snapshot with `PACKET_DELIMITER`,
/// so a parse is only tried once a delimiter arrives.
/// At end of stream the rest is parsed regardless,
/// which also accepts snapshots written back to back.
#[derive(Debug, Clone, Copy)]
pub struct SnapshotCodec {
    max_snapshot_size: usize,
    /// Bytes of the pending buffer already searched for a delimiter.
    scanned: usize,
    #[cfg(test)]
    parses: usize,
}
impl SnapshotCodec {
    pub fn new(max_snapshot_size: usize) -> Self {
        Self {
            max_snapshot_size,
            scanned: 0,
            #[cfg(test)]
            parses: 0,
        }
    }

    fn check_size(&self, size: usize) -> Result<(), DecodeError> {
        if size > self.max_snapshot_size {
            Err(DecodeError::SnapshotTooLarge {
                size,
                max: self.max_snapshot_size,
            })
        } else {
            Ok(())
        }
    }

    /// Try to take one snapshot from the start of `src`.
    fn parse(&mut self, src: &mut BytesMut) -> Result<Option<State>, DecodeError> {
        #[cfg(test)]
        {
            self.parses += 1;
        }

        let (next, consumed) = {
            let mut stream = serde_json::Deserializer::from_slice(&src[..]).into_iter::<State>();
            let next = stream.next();
            (next, stream.byte_offset())
        };

        match next {
            Some(Ok(state)) => {
                self.check_size(consumed)?;
                src.advance(consumed);
                self.scanned = 0;
                Ok(Some(state))
            }
            Some(Err(err)) if err.is_eof() => {
                // Every delimiter so far was inside the snapshot.
                self.scanned = src.len();
                self.check_size(src.len())?;
                Ok(None)
            }
            Some(Err(err)) => Err(err.into()),
            None => {
                // Only whitespace left.
                src.clear();
                self.scanned = 0;
                Ok(None)
            }
        }
    }
}
impl Default for SnapshotCodec {
    fn default() -> Self {
        Self::new(crate::config::ConnectionConfigs::default().max_snapshot_size)
    }
}
impl Decoder for SnapshotCodec {
    type Item = State;
    type Error = DecodeError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<State>, DecodeError> {
        let scanned = self.scanned.min(src.len());
        if src[scanned..].contains(&PACKET_DELIMITER) {
            self.parse(src)
        } else {
            // Wait for the rest of the snapshot.
            self.scanned = src.len();
            self.check_size(src.len())?;
            Ok(None)
        }
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<State>, DecodeError> {
        match self.parse(src)? {
            Some(state) => Ok(Some(state)),
            None if src.is_empty() => Ok(None),
            None => Err(DecodeError::Truncated {
                remaining: src.len(),
            }),
        }
    }
}

/// Encode packets for the server.
#[derive(Debug, Clone, Copy, Default)]
pub struct PacketCodec;
impl Encoder<ClientPacket> for PacketCodec {
    type Error = std::io::Error;

    fn encode(&mut self, packet: ClientPacket, dst: &mut BytesMut) -> Result<(), Self::Error> {
        let buf = encode_packet(&packet)?;
        dst.extend_from_slice(&buf);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::net::Command;
    use crate::state::Vector3;

    const SHIP_2: &str = r#"{"ship_2": {"Owner": 2, "Position": {"X": 1, "Y": 2, "Z": 3}, "InRange": [1000]}}"#;

    #[test]
    fn test_decode_partial() {
        let mut codec = SnapshotCodec::default();
        let (head, tail) = SHIP_2.split_at(20);

        let mut buf = BytesMut::from(head);
        assert!(codec.decode(&mut buf).unwrap().is_none());
        assert_eq!(buf.len(), head.len());

        buf.extend_from_slice(tail.as_bytes());
        buf.extend_from_slice(b"\n");
        let state = codec.decode(&mut buf).unwrap().unwrap();
        assert_eq!(state.ships["ship_2"].in_range, vec![1000]);

        // Trailing newline is dropped.
        assert!(codec.decode(&mut buf).unwrap().is_none());
        assert!(buf.is_empty());
    }

    #[test]
    fn test_decode_many_in_one_buffer() {
        let mut codec = SnapshotCodec::default();
        let mut buf = BytesMut::from(format!("{}\n{}{{}}\n  ", SHIP_2, SHIP_2).as_str());

        assert_eq!(codec.decode(&mut buf).unwrap().unwrap().len(), 1);
        assert_eq!(codec.decode(&mut buf).unwrap().unwrap().len(), 1);
        assert!(codec.decode(&mut buf).unwrap().unwrap().is_empty());
        assert!(codec.decode(&mut buf).unwrap().is_none());
    }

    #[test]
    fn test_decode_malformed() {
        let mut codec = SnapshotCodec::default();
        let mut buf = BytesMut::from("{\"ship_2\": {\"Owner\": \"not a number\"}}\n");
        assert!(matches!(codec.decode(&mut buf), Err(DecodeError::Json(_))));

        let mut buf = BytesMut::from("[1, 2]\n");
        assert!(matches!(codec.decode(&mut buf), Err(DecodeError::Json(_))));
    }

    #[test]
    fn test_decode_truncated_at_eof() {
        let mut codec = SnapshotCodec::default();
        let mut buf = BytesMut::from(&SHIP_2[..30]);
        assert!(matches!(
            codec.decode_eof(&mut buf),
            Err(DecodeError::Truncated { remaining: 30 })
        ));

        let mut buf = BytesMut::from(" \n");
        assert!(codec.decode_eof(&mut buf).unwrap().is_none());
    }

    #[test]
    fn test_decode_too_large() {
        let mut codec = SnapshotCodec::new(16);
        let mut buf = BytesMut::from(&SHIP_2[..40]);
        assert!(matches!(
            codec.decode(&mut buf),
            Err(DecodeError::SnapshotTooLarge { size: 40, max: 16 })
        ));

        // Complete in a single read is still too large.
        let mut codec = SnapshotCodec::new(16);
        let mut buf = BytesMut::from(format!("{}\n", SHIP_2).as_str());
        assert!(matches!(
            codec.decode(&mut buf),
            Err(DecodeError::SnapshotTooLarge { max: 16, .. })
        ));
    }

    #[test]
    fn test_decode_back_to_back_at_eof() {
        let mut codec = SnapshotCodec::default();
        let mut buf = BytesMut::from(format!("{}{}", SHIP_2, SHIP_2).as_str());

        // No delimiter yet.
        assert!(codec.decode(&mut buf).unwrap().is_none());

        assert_eq!(codec.decode_eof(&mut buf).unwrap().unwrap().len(), 1);
        assert_eq!(codec.decode_eof(&mut buf).unwrap().unwrap().len(), 1);
        assert!(codec.decode_eof(&mut buf).unwrap().is_none());
    }

    #[test]
    fn test_decode_multiline_snapshot() {
        let mut codec = SnapshotCodec::default();
        let state: State = serde_json::from_str(SHIP_2).unwrap();
        let pretty = serde_json::to_string_pretty(&state).unwrap();
        let (head, tail) = pretty.split_at(pretty.len() / 2);

        let mut buf = BytesMut::from(head);
        assert!(codec.decode(&mut buf).unwrap().is_none());
        buf.extend_from_slice(tail.as_bytes());
        buf.extend_from_slice(b"\n");
        assert_eq!(codec.decode(&mut buf).unwrap().unwrap(), state);
    }

    /// A large snapshot trickling in is parsed once, when its delimiter arrives.
    #[test]
    fn test_decode_large_snapshot_in_chunks() {
        let state = State {
            ships: (0..20_000)
                .map(|owner| {
                    let ship = crate::state::ShipData {
                        owner,
                        position: Vector3::new(owner as f64 * -1.5, 2e10, -0.0),
                        in_range: vec![owner + 1, owner + 2],
                        new_in_range: vec![owner + 2],
                        gone_from_range: Vec::new(),
                    };
                    (format!("ship_{}", owner), ship)
                })
                .collect(),
        };
        let mut bytes = serde_json::to_vec(&state).unwrap();
        bytes.push(PACKET_DELIMITER);
        assert!(bytes.len() > 2_000_000);

        let mut codec = SnapshotCodec::default();
        let mut buf = BytesMut::new();
        let mut decoded = Vec::new();
        for chunk in bytes.chunks(8 * 1024) {
            buf.extend_from_slice(chunk);
            while let Some(state) = codec.decode(&mut buf).unwrap() {
                decoded.push(state);
            }
        }

        assert_eq!(decoded.len(), 1);
        assert_eq!(decoded[0].len(), 20_000);
        assert_eq!(decoded[0].ships["ship_7"].new_in_range, vec![9]);
        assert!(codec.parses <= 2);
        assert!(buf.is_empty());
    }

    #[test]
    fn test_encode_appends() {
        let mut codec = PacketCodec;
        let mut buf = BytesMut::new();
        codec
            .encode(ClientPacket::Login(crate::net::Login { user: 7 }), &mut buf)
            .unwrap();
        codec
            .encode(
                Command::SetTargetLocation {
                    location: Vector3::new(3.0, 4.0, 0.0),
                }
                .into(),
                &mut buf,
            )
            .unwrap();

        assert_eq!(
            &buf[..],
            b"{\"user\": 7}\n{\"command\": \"settargetlocation\", \"params\": {\"location\": {\"x\": 3, \"y\": 4, \"z\": 0}}}\n"
        );
    }
}
