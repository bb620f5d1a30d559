// System check registry implementation
// Real environment probes behind the CheckRegistry port

use async_trait::async_trait;
use std::process::Stdio;
use tokio::net::TcpListener;
use tokio::process::Command;
use tracing::{debug, info};

use portside_core::domain::CheckId;
use portside_core::port::{CheckError, CheckRegistry, CheckResult};

/// Check registry probing the real host environment.
///
/// The local port is snapshotted at construction; the composition
/// root rebuilds the registry if the configured port changes.
pub struct SystemCheckRegistry {
    local_port: u16,
}

impl SystemCheckRegistry {
    pub fn new(local_port: u16) -> Self {
        Self { local_port }
    }

    /// Probe the installed Java runtime and report its version banner
    async fn probe_java_version(&self) -> Result<CheckResult, CheckError> {
        debug!("Probing java runtime");

        // `java -version` prints the banner on stderr
        let output = Command::new("java")
            .arg("-version")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| {
                CheckError::Failure(format!("java runtime not found on PATH: {}", e))
            })?;

        if !output.status.success() {
            return Err(CheckError::Failure(format!(
                "java -version exited with {}",
                output.status
            )));
        }

        let banner = String::from_utf8_lossy(&output.stderr);
        let version = banner
            .lines()
            .next()
            .unwrap_or("java (unknown version)")
            .to_string();

        info!(version = %version, "Java runtime detected");
        Ok(version)
    }

    /// Probe whether the configured local port can still be bound
    async fn probe_port_available(&self) -> Result<CheckResult, CheckError> {
        debug!(port = self.local_port, "Probing local port");

        match TcpListener::bind(("127.0.0.1", self.local_port)).await {
            Ok(_listener) => Ok(format!("port {} is available", self.local_port)),
            Err(e) => Err(CheckError::Failure(format!(
                "port {} is already in use: {}",
                self.local_port, e
            ))),
        }
    }
}

#[async_trait]
impl CheckRegistry for SystemCheckRegistry {
    fn contains(&self, id: &CheckId) -> bool {
        matches!(
            id.as_str(),
            CheckId::JAVA_VERSION | CheckId::PORT_AVAILABLE
        )
    }

    async fn probe(&self, id: &CheckId) -> Result<CheckResult, CheckError> {
        match id.as_str() {
            CheckId::JAVA_VERSION => self.probe_java_version().await,
            CheckId::PORT_AVAILABLE => self.probe_port_available().await,
            other => Err(CheckError::Fault(format!(
                "no probe registered for check id: {}",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_port_available_on_free_port() {
        // grab an ephemeral port, then release it for the probe
        let listener = TcpListener::bind(("127.0.0.1", 0)).await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let registry = SystemCheckRegistry::new(port);
        let result = registry
            .probe(&CheckId::new(CheckId::PORT_AVAILABLE))
            .await
            .unwrap();
        assert!(result.contains(&port.to_string()));
    }

    #[tokio::test]
    async fn test_port_in_use_is_a_typed_failure() {
        let listener = TcpListener::bind(("127.0.0.1", 0)).await.unwrap();
        let port = listener.local_addr().unwrap().port();

        let registry = SystemCheckRegistry::new(port);
        let result = registry.probe(&CheckId::new(CheckId::PORT_AVAILABLE)).await;
        assert!(matches!(result, Err(CheckError::Failure(_))));
    }

    #[tokio::test]
    async fn test_unknown_id_is_a_fault() {
        let registry = SystemCheckRegistry::new(0);
        let result = registry.probe(&CheckId::new("check-bogus")).await;
        assert!(matches!(result, Err(CheckError::Fault(_))));
    }

    #[test]
    fn test_contains_known_ids_only() {
        let registry = SystemCheckRegistry::new(0);
        assert!(registry.contains(&CheckId::new(CheckId::JAVA_VERSION)));
        assert!(registry.contains(&CheckId::new(CheckId::PORT_AVAILABLE)));
        assert!(!registry.contains(&CheckId::new("check-bogus")));
    }

    #[tokio::test]
    async fn test_java_probe_reports_failure_not_fault_when_missing() {
        // whether or not java is installed, the probe must resolve to
        // a result or a typed Failure, never a Fault
        let registry = SystemCheckRegistry::new(0);
        match registry.probe(&CheckId::new(CheckId::JAVA_VERSION)).await {
            Ok(version) => assert!(!version.is_empty()),
            Err(CheckError::Failure(_)) => {}
            Err(CheckError::Fault(f)) => panic!("unexpected fault: {}", f),
        }
    }
}
