// Store Adapter Use Case
// Binds a profile, then runs get/set through the browser tool

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info};

use crate::domain::{BrowserCommand, ConnectionDescriptor, Invocation, ProfileRegistry};
use crate::error::{AdapterError, Result};
use crate::port::{CapturedLine, CommandOutput, CommandRunner};

/// Result of one get/set call
///
/// `response` and `error` are the browser tool's stdout and stderr lines,
/// passed through without interpretation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoreResponse {
    pub response: CapturedLine,
    pub error: CapturedLine,
    pub exit_code: Option<i32>,
    pub duration_ms: i64,
}

impl StoreResponse {
    /// The (response, error) pair
    pub fn pair(&self) -> (&str, &str) {
        (&self.response.text, &self.error.text)
    }

    pub fn into_pair(self) -> (String, String) {
        (self.response.text, self.error.text)
    }
}

impl From<CommandOutput> for StoreResponse {
    fn from(output: CommandOutput) -> Self {
        Self {
            response: output.stdout,
            error: output.stderr,
            exit_code: output.exit_code,
            duration_ms: output.duration_ms,
        }
    }
}

#[derive(Debug, Clone)]
struct Connection {
    profile: String,
    descriptor: ConnectionDescriptor,
}

/// Store Adapter
///
/// Two states: unconnected (after `new`) and connected (after a successful
/// `connect`). `connect` takes `&mut self`, so rebinding can never race an
/// in-flight get/set on the same instance.
pub struct StoreAdapter {
    registry: Arc<ProfileRegistry>,
    runner: Arc<dyn CommandRunner>,
    command: BrowserCommand,
    connection: Option<Connection>,
}

impl StoreAdapter {
    pub fn new(registry: Arc<ProfileRegistry>, runner: Arc<dyn CommandRunner>) -> Self {
        Self {
            registry,
            runner,
            command: BrowserCommand::default(),
            connection: None,
        }
    }

    /// Use a different browser executable
    pub fn with_command(mut self, command: BrowserCommand) -> Self {
        self.command = command;
        self
    }

    /// Bind this adapter to `profile`
    ///
    /// Purely a configuration lookup; the backend is not contacted.
    ///
    /// # Errors
    /// - DomainError::UnknownServer if any of the four fields is undefined.
    ///   The previous binding (if any) is kept.
    pub fn connect(&mut self, profile: &str) -> Result<()> {
        let resolved = self.registry.lookup(profile)?;
        let descriptor = resolved.descriptor();

        info!(
            profile = %resolved.name,
            host = %descriptor.host(),
            port = %descriptor.port(),
            user = %descriptor.user(),
            "Connected to illdb profile"
        );

        self.connection = Some(Connection {
            profile: resolved.name,
            descriptor,
        });
        Ok(())
    }

    pub fn is_connected(&self) -> bool {
        self.connection.is_some()
    }

    /// Uppercased name of the bound profile
    pub fn profile_name(&self) -> Option<&str> {
        self.connection.as_ref().map(|c| c.profile.as_str())
    }

    pub fn descriptor(&self) -> Option<&ConnectionDescriptor> {
        self.connection.as_ref().map(|c| &c.descriptor)
    }

    /// Read `key` from `bucket`
    ///
    /// # Errors
    /// - AdapterError::NotConnected before a successful connect
    /// - AdapterError::Run if the browser tool cannot be run
    pub async fn get_by_key(&self, bucket: &str, key: &str) -> Result<StoreResponse> {
        let descriptor = self.require_descriptor()?;
        let invocation = Invocation::get(&self.command, bucket, descriptor, key);
        self.run(&invocation).await
    }

    /// Write `value` under `key` in `bucket`
    ///
    /// # Errors
    /// - AdapterError::NotConnected before a successful connect
    /// - AdapterError::Run if the browser tool cannot be run
    pub async fn set_key_value(
        &self,
        bucket: &str,
        key: &str,
        value: &str,
    ) -> Result<StoreResponse> {
        let descriptor = self.require_descriptor()?;
        let invocation = Invocation::set(&self.command, bucket, descriptor, key, value);
        debug!(command = %invocation, "Prepared set command");
        self.run(&invocation).await
    }

    fn require_descriptor(&self) -> Result<&ConnectionDescriptor> {
        self.descriptor().ok_or(AdapterError::NotConnected)
    }

    async fn run(&self, invocation: &Invocation<'_>) -> Result<StoreResponse> {
        debug!(
            verb = %invocation.verb(),
            bucket = %invocation.bucket(),
            command = %invocation,
            "Running browser command"
        );

        let output = self
            .runner
            .run(invocation.program(), &invocation.args())
            .await?;

        Ok(StoreResponse::from(output))
    }
}
