use crate::{
    config::ConnectionConfigs,
    error::{ConnectError, SendError},
    net::{ClientPacket, Command, Connection, Login},
    state::{ShipId, State, Vector3},
};
use tokio::runtime::Runtime;

/// Our side of the link to the server.
///
/// Every send is best effort: failures are logged and the packet dropped.
pub struct Client {
    user_id: ShipId,
    connection: Option<Connection>,
    /// Last location our ship was asked to move to.
    target_location: Option<Vector3>,
}
impl Client {
    pub fn new(user_id: ShipId) -> Self {
        Self {
            user_id,
            connection: None,
            target_location: None,
        }
    }

    /// Use an already established connection and identify to the server.
    pub fn with_connection(user_id: ShipId, connection: Connection) -> Self {
        let mut client = Self::new(user_id);
        client.attach(connection);
        client
    }

    /// Connect to the server and identify.
    ///
    /// On failure the client stays unconnected. There is no retry.
    pub fn connect(
        &mut self,
        addr: &str,
        configs: &ConnectionConfigs,
        rt: &Runtime,
    ) -> Result<(), ConnectError> {
        match rt.block_on(Connection::connect(addr, configs)) {
            Ok(connection) => {
                log::info!("Connection established with {}.", addr);
                self.attach(connection);
                Ok(())
            }
            Err(err) => {
                log::error!("Couldn't connect: {}", err);
                Err(err)
            }
        }
    }

    fn attach(&mut self, connection: Connection) {
        self.connection = Some(connection);
        self.send(ClientPacket::Login(Login { user: self.user_id }));
    }

    pub fn set_target_location(&mut self, location: Vector3) {
        self.target_location = Some(location);
        self.send(Command::SetTargetLocation { location });
    }

    pub fn set_attribute(&mut self, attribute: &str, value: f64) {
        self.send(Command::SetAttribute {
            attribute: attribute.to_string(),
            value,
        });
    }

    /// Forward a command issued by the viewer.
    pub fn send_command(&mut self, command: Command) {
        match command {
            Command::SetTargetLocation { location } => self.set_target_location(location),
            command => self.send(command),
        }
    }

    fn send(&self, packet: impl Into<ClientPacket>) {
        let packet = packet.into();
        let name = packet.name();
        let result = match &self.connection {
            Some(connection) => connection.send(packet),
            None => Err(SendError::NotConnected),
        };

        if let Err(err) = result {
            log::warn!("Could not send {}: {}. Dropping...", name, err);
        }
    }

    /// Take the oldest snapshot not yet seen, if any.
    pub fn try_recv_snapshot(&mut self) -> Option<State> {
        self.connection.as_mut()?.try_recv()
    }

    pub fn user_id(&self) -> ShipId {
        self.user_id
    }

    pub fn target_location(&self) -> Option<Vector3> {
        self.target_location
    }

    pub fn is_connected(&self) -> bool {
        self.connection
            .as_ref()
            .is_some_and(Connection::is_receiving)
    }
}
