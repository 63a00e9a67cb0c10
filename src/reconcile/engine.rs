//! Reconciliation engine
//!
//! Converges dropin presence with the desired Memcached state:
//!
//! | Desired | Dropin present | Action |
//! |---------|----------------|--------|
//! | enabled | no | discover, probe, install |
//! | enabled | yes | none |
//! | disabled | yes | remove |
//! | disabled | no | none |
//!
//! Calls on one engine are serialised, so concurrent toggles resolve in
//! lock order rather than racing on the dropin path.

use crate::backend::{
    BackendProbe, Endpoint, MemcachedProbe, PortDiscovery, ProbeResult, Unavailable,
};
use crate::config::{resolve_account, Config};
use crate::dropin::{DropinWriter, TemplateSource};
use crate::error::{MemdropResult, DISABLE_REJECTED, ENABLE_REJECTED};
use crate::reconcile::report::{Action, Correction, Failure, Report, StartupReport, ToggleResponse};
use crate::settings::{Parameter, SettingsStore, ENABLE_MEMCACHED};
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

pub struct ReconciliationEngine {
    account: String,
    host: String,
    discovery: PortDiscovery,
    probe: Arc<dyn BackendProbe>,
    dropin: DropinWriter,
    lock: Mutex<()>,
}

impl ReconciliationEngine {
    pub fn new(
        account: impl Into<String>,
        host: impl Into<String>,
        discovery: PortDiscovery,
        probe: Arc<dyn BackendProbe>,
        dropin: DropinWriter,
    ) -> Self {
        Self {
            account: account.into(),
            host: host.into(),
            discovery,
            probe,
            dropin,
            lock: Mutex::new(()),
        }
    }

    /// Build an engine wired to the real filesystem and a TCP probe
    pub fn from_config(config: &Config) -> MemdropResult<Self> {
        let account = resolve_account(config)?;
        let discovery = PortDiscovery::new(&config.backend)?;
        let probe = Arc::new(MemcachedProbe::new(&config.backend));
        let dropin = DropinWriter::new(
            config.dropin.path(),
            TemplateSource::from_config(config.dropin.template.clone()),
        );

        Ok(Self::new(
            account,
            config.backend.host.clone(),
            discovery,
            probe,
            dropin,
        ))
    }

    pub fn account(&self) -> &str {
        &self.account
    }

    pub fn dropin(&self) -> &DropinWriter {
        &self.dropin
    }

    /// Status file consulted for this account
    pub fn status_file(&self) -> PathBuf {
        self.discovery.status_file(&self.account)
    }

    /// Look up the current endpoint without changing anything
    pub async fn discover(&self) -> Result<Endpoint, Unavailable> {
        let port = self.discovery.discover(&self.account).await?;
        Ok(Endpoint::new(self.host.clone(), port))
    }

    /// Probe an endpoint without changing anything
    pub async fn probe(&self, endpoint: &Endpoint) -> ProbeResult {
        self.probe.verify(endpoint).await
    }

    /// Converge the dropin to `desired`.
    ///
    /// An unreadable template or a failed write is reported as
    /// [`Failure::InstallFailed`], not as `Err`.
    pub async fn apply(&self, desired: bool) -> MemdropResult<Report> {
        let _guard = self.lock.lock().await;
        self.converge(desired).await
    }

    /// Converge the dropin to `desired`, then save it as the Memcached setting.
    ///
    /// Nothing is saved when converging fails. If saving fails after the
    /// dropin changed, the dropin is put back the way it was.
    pub async fn apply_and_save(
        &self,
        settings: &dyn SettingsStore,
        desired: bool,
    ) -> MemdropResult<Report> {
        let _guard = self.lock.lock().await;

        let before = self.dropin.exists().await;
        let report = self.converge(desired).await?;
        if !report.succeeded() {
            return Ok(report);
        }

        if let Err(e) = settings
            .update_option(ENABLE_MEMCACHED, Value::from(desired as u8))
            .await
        {
            if report.wrote() {
                self.compensate(before).await;
            }
            return Err(e);
        }

        Ok(report)
    }

    /// Re-run discovery, probe and install even if a dropin is present.
    ///
    /// Picks up a port the platform moved since the dropin was written.
    pub async fn refresh(&self) -> MemdropResult<Report> {
        let _guard = self.lock.lock().await;
        self.enable().await
    }

    /// Correct drift between the persisted desired state and the dropin.
    ///
    /// On failure the persisted state is degraded to whatever is actually
    /// on disk afterwards.
    pub async fn startup(&self, settings: &dyn SettingsStore) -> MemdropResult<StartupReport> {
        let _guard = self.lock.lock().await;

        let desired = settings.is_enabled(ENABLE_MEMCACHED).await?;
        if desired == self.dropin.exists().await {
            debug!("Dropin already matches desired state ({})", desired);
            return Ok(StartupReport {
                desired,
                correction: Correction::None,
            });
        }

        let reason = match self.converge(desired).await {
            Ok(report) if report.succeeded() => {
                info!("Corrected dropin drift (desired: {})", desired);
                return Ok(StartupReport {
                    desired,
                    correction: Correction::Applied(report),
                });
            }
            Ok(report) => report
                .failure_reason()
                .map(ToString::to_string)
                .unwrap_or_default(),
            Err(e) => e.to_string(),
        };

        let now = self.dropin.exists().await;
        if now {
            settings.enable_option(ENABLE_MEMCACHED).await?;
        } else {
            settings.disable_option(ENABLE_MEMCACHED).await?;
        }
        warn!(
            "Could not converge dropin to desired state {}: {}; desired state is now {}",
            desired, reason, now
        );

        Ok(StartupReport {
            desired,
            correction: Correction::RolledBack { now, reason },
        })
    }

    /// Flip an admin parameter.
    ///
    /// For Memcached the dropin is converged first and the option is only
    /// persisted once that succeeded, so a rejected toggle leaves the stored
    /// value untouched.
    pub async fn toggle(
        &self,
        settings: &dyn SettingsStore,
        parameter: Parameter,
    ) -> MemdropResult<ToggleResponse> {
        let _guard = self.lock.lock().await;

        let option = parameter.option_name();
        let current = settings.is_enabled(option).await?;
        let toggled = !current;

        if parameter.drives_dropin() {
            // Enabling always re-verifies, so a stale dropin is never kept as is
            let outcome = if toggled {
                self.enable().await
            } else {
                self.converge(false).await
            };
            let converged = match outcome {
                Ok(report) => {
                    if let Some(failure) = report.failure_reason() {
                        warn!("Toggle of {} rejected: {}", parameter, failure);
                    }
                    report.succeeded()
                }
                Err(e) => {
                    warn!("Toggle of {} rejected: {}", parameter, e);
                    false
                }
            };

            if !converged {
                let message = if toggled { ENABLE_REJECTED } else { DISABLE_REJECTED };
                return Ok(ToggleResponse {
                    option,
                    state: current as u8,
                    error: Some(message.to_string()),
                });
            }
        }

        let persisted = match settings.update_option(option, Value::from(toggled as u8)).await {
            Ok(persisted) => persisted,
            Err(e) => {
                if parameter.drives_dropin() {
                    self.compensate(current).await;
                }
                return Err(e);
            }
        };

        let state = if persisted { toggled } else { current };
        info!("Parameter {} is now {}", parameter, state as u8);
        Ok(ToggleResponse {
            option,
            state: state as u8,
            error: None,
        })
    }

    /// Best-effort return of the dropin to `desired` after a later step failed
    async fn compensate(&self, desired: bool) {
        match self.converge(desired).await {
            Ok(report) if report.succeeded() => {
                debug!("Restored dropin to desired state {}", desired)
            }
            Ok(report) => warn!(
                "Could not restore dropin: {}",
                report
                    .failure_reason()
                    .map(ToString::to_string)
                    .unwrap_or_default()
            ),
            Err(e) => warn!("Could not restore dropin: {}", e),
        }
    }

    async fn converge(&self, desired: bool) -> MemdropResult<Report> {
        let present = self.dropin.exists().await;
        match (desired, present) {
            (true, false) => self.enable().await,
            (false, true) => Ok(self.disable().await),
            _ => {
                debug!("Dropin already converged (desired: {})", desired);
                Ok(Report::success(desired, Action::Unchanged))
            }
        }
    }

    async fn enable(&self) -> MemdropResult<Report> {
        let port = match self.discovery.discover(&self.account).await {
            Ok(port) => port,
            Err(why) => {
                warn!("Not installing dropin: {}", why);
                return Ok(Report::failure(true, Failure::DiscoveryUnavailable(why)));
            }
        };

        let endpoint = Endpoint::new(self.host.clone(), port);
        let probe = self.probe.verify(&endpoint).await;
        if !probe.is_working() {
            // A dropin pointing at a dead endpoint breaks every request
            if let Err(e) = self.dropin.remove().await {
                warn!("Failed to remove stale dropin: {}", e);
            }
            return Ok(Report::failure(true, Failure::ProbeFailed { endpoint, probe }));
        }

        match self.dropin.install(&endpoint).await {
            Ok(()) => Ok(Report::success(true, Action::Installed(endpoint))),
            Err(e) if e.is_install_failure() => Ok(Report::failure(
                true,
                Failure::InstallFailed {
                    endpoint,
                    reason: e.to_string(),
                },
            )),
            Err(e) => Err(e),
        }
    }

    async fn disable(&self) -> Report {
        match self.dropin.remove().await {
            Ok(true) => Report::success(false, Action::Removed),
            Ok(false) => Report::success(false, Action::Unchanged),
            Err(e) => Report::failure(
                false,
                Failure::RemoveFailed {
                    reason: e.to_string(),
                },
            ),
        }
    }
}
