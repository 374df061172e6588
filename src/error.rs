// Copyright 2024 Saptak Santra
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.


//! Error types

use std::fmt;

use crate::entity::EntityId;
use crate::query::QueryHandle;

/// ECS error type
#[derive(Debug, Clone, PartialEq)]
pub enum EcsError {
    /// Component type was never registered with the world
    UnknownComponentKind(&'static str),

    /// Entity identifier refers to a removed entity
    StaleEntity(EntityId),

    /// Query handle was not issued by this world
    UnknownQuery(QueryHandle),

    /// System read a query it did not declare at registration
    UndeclaredQuery {
        system: &'static str,
        query: QueryHandle,
    },

    /// One or more system steps failed during a tick
    SystemStepFailure(Vec<SystemFailure>),

    /// Failure raised from inside a system body
    SystemFailed(String),

    /// Invalid or unreadable configuration
    ConfigError(String),

    /// IO error (file operations, etc.)
    IoError(String),
}

/// A single system's failure inside one tick.
#[derive(Debug, Clone, PartialEq)]
pub struct SystemFailure {
    /// Name of the failing system
    pub system: &'static str,
    /// Rendered error or panic payload
    pub message: String,
}

impl fmt::Display for SystemFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.system, self.message)
    }
}

impl fmt::Display for EcsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EcsError::UnknownComponentKind(name) => {
                write!(f, "Unknown component kind: {name} was not registered")
            }
            EcsError::StaleEntity(entity) => write!(f, "Stale entity: {entity:?} was removed"),
            EcsError::UnknownQuery(handle) => write!(f, "Unknown query handle: {handle:?}"),
            EcsError::UndeclaredQuery { system, query } => {
                write!(f, "System {system} did not declare query {query:?}")
            }
            EcsError::SystemStepFailure(failures) => {
                write!(f, "{} system step(s) failed", failures.len())?;
                for failure in failures {
                    write!(f, "; {failure}")?;
                }
                Ok(())
            }
            EcsError::SystemFailed(msg) => write!(f, "System failed: {msg}"),
            EcsError::ConfigError(msg) => write!(f, "Config error: {msg}"),
            EcsError::IoError(msg) => write!(f, "IO error: {msg}"),
        }
    }
}

impl std::error::Error for EcsError {}

impl From<std::io::Error> for EcsError {
    fn from(err: std::io::Error) -> Self {
        EcsError::IoError(err.to_string())
    }
}

impl From<serde_json::Error> for EcsError {
    fn from(err: serde_json::Error) -> Self {
        EcsError::ConfigError(err.to_string())
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, EcsError>;
