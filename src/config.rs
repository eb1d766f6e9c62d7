use crate::state::ShipId;
use anyhow::Context;
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfigs {
    /// Also the owner id of our ship.
    pub user_id: ShipId,
    pub server_addr: String,
    pub log_level: LevelFilter,
    pub connection_configs: ConnectionConfigs,
    pub viewer_configs: ViewerConfigs,
    pub window_configs: WindowConfigs,
}
impl Default for ClientConfigs {
    fn default() -> Self {
        Self {
            user_id: 1000,
            server_addr: "127.0.0.1:4040".to_string(),
            log_level: LevelFilter::Debug,
            connection_configs: Default::default(),
            viewer_configs: Default::default(),
            window_configs: Default::default(),
        }
    }
}
impl ClientConfigs {
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let buf = std::fs::read(path)
            .with_context(|| format!("could not read configs at {}", path.display()))?;
        serde_json::from_slice(&buf)
            .with_context(|| format!("could not parse configs at {}", path.display()))
    }

    /// Load configs from the file given as first argument.
    pub fn from_args() -> anyhow::Result<Self> {
        Self::load_or_default(std::env::args_os().nth(1))
    }

    /// Defaults without a path. A path that can not be used is an error.
    pub fn load_or_default(path: Option<impl AsRef<Path>>) -> anyhow::Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionConfigs {
    /// Give up connecting after this long.
    pub connect_timeout_ms: u64,
    /// A snapshot over this many bytes, complete or not, ends the connection.
    pub max_snapshot_size: usize,
}
impl Default for ConnectionConfigs {
    fn default() -> Self {
        Self {
            connect_timeout_ms: 5000,
            max_snapshot_size: 16 * 1024 * 1024,
        }
    }
}
impl ConnectionConfigs {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfigs {
    /// World units per second.
    pub camera_speed: f64,
    /// Zoom multiplier per scroll step.
    pub zoom_speed: f64,
    pub ship_radius: f64,
    /// Sensor range sent when pressing key 1, 2, 3... in order.
    pub sensor_ranges: Vec<f64>,
}
impl Default for ViewerConfigs {
    fn default() -> Self {
        Self {
            camera_speed: 500.0,
            zoom_speed: 1.2,
            ship_radius: 10.0,
            sensor_ranges: vec![100.0, 200.0, 300.0],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfigs {
    pub title: String,
    pub width: i32,
    pub height: i32,
    pub resizable: bool,
}
impl Default for WindowConfigs {
    fn default() -> Self {
        Self {
            title: "exsim client".to_string(),
            width: 800,
            height: 600,
            resizable: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_configs() {
        let configs: ClientConfigs = serde_json::from_str(
            r#"{"user_id": 42, "log_level": "warn", "viewer_configs": {"sensor_ranges": [50]}}"#,
        )
        .unwrap();

        assert_eq!(configs.user_id, 42);
        assert_eq!(configs.log_level, LevelFilter::Warn);
        assert_eq!(configs.server_addr, "127.0.0.1:4040");
        assert_eq!(configs.viewer_configs.sensor_ranges, vec![50.0]);
        assert_eq!(configs.viewer_configs.camera_speed, 500.0);
        assert_eq!(configs.connection_configs.connect_timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_load_missing_file() {
        let err = ClientConfigs::load("does/not/exist.json").unwrap_err();
        assert!(format!("{:#}", err).contains("does/not/exist.json"));
    }

    #[test]
    fn test_load_or_default() {
        let configs = ClientConfigs::load_or_default(None::<&Path>).unwrap();
        assert_eq!(configs.user_id, 1000);

        assert!(ClientConfigs::load_or_default(Some("does/not/exist.json")).is_err());
    }

    #[test]
    fn test_load_file() {
        let path = std::env::temp_dir().join(format!("exsim-viewer-{}.json", std::process::id()));
        let mut configs = ClientConfigs::default();
        configs.server_addr = "10.0.0.1:4141".to_string();
        std::fs::write(&path, serde_json::to_vec(&configs).unwrap()).unwrap();

        let loaded = ClientConfigs::load(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(loaded.server_addr, "10.0.0.1:4141");
        assert_eq!(loaded.window_configs.title, "exsim client");
    }
}
