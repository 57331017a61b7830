//! Command definitions
//!
//! Represents commands from clients.

use serde::{Deserialize, Serialize};

use crate::record::Company;

/// Command types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum CommandType {
    List = 0x01,
    Get = 0x02,
    Add = 0x03,
    Delete = 0x04,
    Ping = 0x05,
}

/// Which record a GET or DELETE refers to
///
/// The tax id wins when both are given.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeySelector {
    pub tax_id: Option<String>,
    pub name: Option<String>,
}

impl KeySelector {
    pub fn by_tax_id(tax_id: impl Into<String>) -> Self {
        Self {
            tax_id: Some(tax_id.into()),
            name: None,
        }
    }

    pub fn by_name(name: impl Into<String>) -> Self {
        Self {
            tax_id: None,
            name: Some(name.into()),
        }
    }

    pub fn tax_id(&self) -> Option<&str> {
        self.tax_id.as_deref()
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

/// A parsed command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// List every record
    List,

    /// Fetch one record
    Get(KeySelector),

    /// Insert or update a record
    Add(Company),

    /// Delete one record
    Delete(KeySelector),

    /// Ping (health check)
    Ping,
}

impl Command {
    /// Get the command type
    pub fn command_type(&self) -> CommandType {
        match self {
            Command::List => CommandType::List,
            Command::Get(_) => CommandType::Get,
            Command::Add(_) => CommandType::Add,
            Command::Delete(_) => CommandType::Delete,
            Command::Ping => CommandType::Ping,
        }
    }
}
