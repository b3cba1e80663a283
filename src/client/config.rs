use serde::Deserialize;
use std::path::Path;

/// client configuration, read once at startup.
/// field names mirror the shared config.json consumed by the whole rig.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(rename = "ServerIP")]
    pub server_ip: String,
    #[serde(rename = "WebSocketPort")]
    pub web_socket_port: u16,
    #[serde(rename = "RobotIP")]
    pub robot_ip: String,
    #[serde(rename = "RobotPort")]
    pub robot_port: u16,
    #[serde(rename = "PythonSimulation")]
    pub python_simulation: bool,
    #[serde(rename = "CoalesceCommands")]
    pub coalesce_commands: bool,
    #[serde(rename = "GameFPS")]
    pub game_fps: u16,
}

impl Config {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        use anyhow::Context;
        let file = std::fs::File::open(path)
            .with_context(|| format!("open config file {}", path.display()))?;
        serde_json::from_reader(file).context("parse config file")
    }

    pub fn connect_url(&self) -> String {
        format!("ws://{}:{}", self.server_ip, self.web_socket_port)
    }

    pub fn robot_addr(&self) -> String {
        format!("{}:{}", self.robot_ip, self.robot_port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_shared_config_layout() {
        let json = r#"{
            "ServerIP": "localhost",
            "WebSocketPort": 3002,
            "RobotIP": "10.9.70.103",
            "RobotPort": 8081,
            "PythonSimulation": true,
            "CoalesceCommands": false,
            "GameFPS": 24
        }"#;
        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.connect_url(), "ws://localhost:3002");
        assert_eq!(config.robot_addr(), "10.9.70.103:8081");
        assert!(config.python_simulation);
        assert_eq!(config.game_fps, 24);
    }
}
