use super::PACKET_DELIMITER;
use crate::state::{ShipId, Vector3};
use serde::Serialize;
use serde_json::ser::{CompactFormatter, Formatter};
use std::io::{self, Write};

pub const SENSOR_RANGE_ATTRIBUTE: &str = "sensorrange";

/// Everything the client can send to the server.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(untagged)]
pub enum ClientPacket {
    /// Must be the first packet sent on a connection.
    Login(Login),
    Command(Command),
}
impl ClientPacket {
    /// Short name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Login(_) => "login",
            Self::Command(Command::SetTargetLocation { .. }) => "settargetlocation",
            Self::Command(Command::SetAttribute { .. }) => "setattribute",
        }
    }
}
impl From<Command> for ClientPacket {
    fn from(command: Command) -> Self {
        Self::Command(command)
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct Login {
    pub user: ShipId,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "command", content = "params", rename_all = "lowercase")]
pub enum Command {
    /// Ask our ship to move toward this location.
    SetTargetLocation { location: Vector3 },
    SetAttribute { attribute: String, value: f64 },
}
impl Command {
    pub fn sensor_range(value: f64) -> Self {
        Self::SetAttribute {
            attribute: SENSOR_RANGE_ATTRIBUTE.to_string(),
            value,
        }
    }
}

/// Serialize a packet followed by the delimiter.
pub fn encode_packet(packet: &ClientPacket) -> serde_json::Result<Vec<u8>> {
    let mut buf = Vec::with_capacity(128);
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, WireFormatter);
    packet.serialize(&mut serializer)?;
    buf.push(PACKET_DELIMITER);
    Ok(buf)
}

/// Json as the server's own clients write it:
/// `{"key": value, "other": 1}`.
///
/// Floats with no fractional part are written as integers.
struct WireFormatter;
impl Formatter for WireFormatter {
    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        writer.write_all(b": ")
    }

    fn write_f64<W>(&mut self, writer: &mut W, value: f64) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        // Past 2^53 not every integer is representable anyway.
        if value.fract() == 0.0 && value.abs() < 9_007_199_254_740_992.0 {
            write!(writer, "{}", value as i64)
        } else {
            CompactFormatter.write_f64(writer, value)
        }
    }
}
