//! # Configuration Module
//!
//! Handles loading and validating configuration from TOML files.

use serde::Deserialize;
use std::fs;
use std::net::SocketAddr;
use std::path::Path;

use crate::dsu::packet::ControllerResponseHead;
use crate::dsu::protocol::{ConnectionType, DeviceModel, MacAddress, SlotState};
use crate::error::{DsuServerError, Result};

/// Main configuration structure
#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub network: NetworkConfig,
    #[serde(default)]
    pub slot: SlotConfig,
}

/// Network configuration
#[derive(Debug, Deserialize, Clone)]
pub struct NetworkConfig {
    /// Address to bind the UDP socket to
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// Well-known DSU server port
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            port: default_port(),
        }
    }
}

/// Reported virtual slot configuration
#[derive(Debug, Deserialize, Clone)]
pub struct SlotConfig {
    /// Slot index reported to clients
    #[serde(default)]
    pub reporting_slot: u8,

    /// Motion capability: "none", "partial-gyro", or "full-gyro"
    #[serde(default = "default_device_model")]
    pub device_model: String,

    /// Physical connection: "none", "usb", or "bluetooth"
    #[serde(default = "default_connection_type")]
    pub connection_type: String,

    /// Reported hardware identifier, "aa:bb:cc:dd:ee:ff"
    #[serde(default = "default_mac_address")]
    pub mac_address: String,
}

impl Default for SlotConfig {
    fn default() -> Self {
        Self {
            reporting_slot: 0,
            device_model: default_device_model(),
            connection_type: default_connection_type(),
            mac_address: default_mac_address(),
        }
    }
}

// Default value functions
fn default_bind_address() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 26760 }

fn default_device_model() -> String { "full-gyro".to_string() }
fn default_connection_type() -> String { "none".to_string() }
fn default_mac_address() -> String { "00:00:00:00:00:00".to_string() }

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the configuration file
    ///
    /// # Returns
    ///
    /// * `Result<Config>` - Loaded and validated configuration
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - File cannot be read
    /// - TOML parsing fails
    /// - Validation fails
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns `ConfigValidation` if any field cannot be mapped onto the
    /// protocol's enumerations or the bind address does not parse.
    pub fn validate(&self) -> Result<()> {
        self.bind_addr()?;
        self.slot.device_model()?;
        self.slot.connection_type()?;
        self.slot.mac_address()?;
        Ok(())
    }

    /// The socket address to bind, combining address and port
    pub fn bind_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.network.bind_address, self.network.port)
            .parse()
            .map_err(|_| {
                DsuServerError::ConfigValidation(format!(
                    "invalid bind address: {}:{}",
                    self.network.bind_address, self.network.port
                ))
            })
    }
}

impl SlotConfig {
    /// Parse the configured device model
    pub fn device_model(&self) -> Result<DeviceModel> {
        match self.device_model.as_str() {
            "none" => Ok(DeviceModel::NotApplicable),
            "partial-gyro" => Ok(DeviceModel::NonFullGyro),
            "full-gyro" => Ok(DeviceModel::FullGyro),
            other => Err(DsuServerError::ConfigValidation(format!(
                "unknown device model \"{}\" (expected none, partial-gyro, or full-gyro)",
                other
            ))),
        }
    }

    /// Parse the configured connection type
    pub fn connection_type(&self) -> Result<ConnectionType> {
        match self.connection_type.as_str() {
            "none" => Ok(ConnectionType::NotApplicable),
            "usb" => Ok(ConnectionType::Usb),
            "bluetooth" => Ok(ConnectionType::Bluetooth),
            other => Err(DsuServerError::ConfigValidation(format!(
                "unknown connection type \"{}\" (expected none, usb, or bluetooth)",
                other
            ))),
        }
    }

    /// Parse the configured MAC address
    pub fn mac_address(&self) -> Result<MacAddress> {
        let parts: Vec<&str> = self.mac_address.split(':').collect();
        if parts.len() != 6 {
            return Err(DsuServerError::ConfigValidation(format!(
                "invalid MAC address \"{}\"",
                self.mac_address
            )));
        }

        let mut bytes = [0u8; 6];
        for (byte, part) in bytes.iter_mut().zip(parts) {
            *byte = u8::from_str_radix(part, 16).map_err(|_| {
                DsuServerError::ConfigValidation(format!(
                    "invalid MAC address \"{}\"",
                    self.mac_address
                ))
            })?;
        }
        Ok(MacAddress::from_bytes(bytes))
    }

    /// Build the static slot descriptor this configuration describes.
    ///
    /// Dynamic fields (state, battery) start at their disconnected
    /// defaults; the engine overwrites them per request from the input
    /// snapshot.
    pub fn descriptor_template(&self) -> Result<ControllerResponseHead> {
        Ok(ControllerResponseHead {
            reporting_slot: self.reporting_slot,
            slot_state: SlotState::Disconnected,
            device_model: self.device_model()?,
            connection_type: self.connection_type()?,
            mac_address: self.mac_address()?,
            battery_level: Default::default(),
        })
    }
}
