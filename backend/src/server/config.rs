//! Server settings loaded via OrthoConfig and the typed configuration built
//! from them.

use std::net::SocketAddr;
use std::time::Duration;

use assessmate::domain::ports::SecretGenerator;
use assessmate::domain::{NotificationWorkerConfig, PasswordHashing};
use assessmate::outbound::jwt::JwtSettings;
use assessmate::outbound::payment::SandboxGatewaySettings;
use assessmate::outbound::secrets::RandomSecretGenerator;
use ortho_config::OrthoConfig;
use serde::Deserialize;
use tracing::warn;
use zeroize::Zeroizing;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_ISSUER: &str = "assessmate";
const DEFAULT_QUEUE_CAPACITY: usize = 256;

/// Raw settings read from `ASSESSMATE_*` variables, files, and flags.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "ASSESSMATE")]
pub struct ServerSettings {
    /// Socket address the HTTP listener binds to.
    pub bind_addr: Option<String>,
    /// HMAC secret for access tokens. Required in release builds.
    pub jwt_secret: Option<String>,
    pub jwt_issuer: Option<String>,
    /// Capacity of the notification channel.
    pub queue_capacity: Option<usize>,
    pub notification_max_attempts: Option<u32>,
    pub notification_initial_backoff_ms: Option<u64>,
    pub notification_max_backoff_ms: Option<u64>,
    /// Emails delivered concurrently by the notification worker.
    pub notification_concurrency: Option<usize>,
    pub password_memory_kib: Option<u32>,
    pub password_iterations: Option<u32>,
    pub password_parallelism: Option<u32>,
    pub registration_timeout_ms: Option<u64>,
    /// Base URL of the checkout page issued with each payment.
    pub checkout_base_url: Option<String>,
    /// Accept a generated signing secret outside debug builds.
    #[ortho_config(default = false)]
    pub allow_ephemeral_secret: bool,
}

/// Typed configuration consumed by [`super::create_server`].
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) jwt: JwtSettings,
    pub(crate) queue_capacity: usize,
    pub(crate) worker: NotificationWorkerConfig,
    pub(crate) hashing: PasswordHashing,
    pub(crate) registration_timeout: Option<Duration>,
    pub(crate) gateway: SandboxGatewaySettings,
}

impl ServerConfig {
    /// Resolve defaults and validate `settings`.
    ///
    /// # Errors
    /// Returns [`std::io::Error`] when the bind address cannot be parsed or
    /// no signing secret is configured for a release build.
    pub fn from_settings(settings: ServerSettings) -> std::io::Result<Self> {
        let raw_addr = settings.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        let bind_addr = raw_addr.parse::<SocketAddr>().map_err(|err| {
            std::io::Error::other(format!("invalid bind address {raw_addr}: {err}"))
        })?;

        let secret = match settings.jwt_secret {
            Some(secret) if !secret.trim().is_empty() => secret,
            _ if cfg!(debug_assertions) || settings.allow_ephemeral_secret => {
                warn!("using generated token signing secret (dev only)");
                RandomSecretGenerator.generate()
            }
            _ => {
                return Err(std::io::Error::other(
                    "ASSESSMATE_JWT_SECRET must be set in release builds",
                ));
            }
        };

        let worker_defaults = NotificationWorkerConfig::default();
        let worker = NotificationWorkerConfig {
            max_attempts: settings
                .notification_max_attempts
                .unwrap_or(worker_defaults.max_attempts)
                .max(1),
            initial_backoff: settings
                .notification_initial_backoff_ms
                .map_or(worker_defaults.initial_backoff, Duration::from_millis),
            max_backoff: settings
                .notification_max_backoff_ms
                .map_or(worker_defaults.max_backoff, Duration::from_millis),
            concurrency: settings
                .notification_concurrency
                .unwrap_or(worker_defaults.concurrency)
                .max(1),
        };

        let hashing_defaults = PasswordHashing::default();
        let hashing = PasswordHashing {
            memory_kib: settings
                .password_memory_kib
                .unwrap_or(hashing_defaults.memory_kib),
            iterations: settings
                .password_iterations
                .unwrap_or(hashing_defaults.iterations),
            parallelism: settings
                .password_parallelism
                .unwrap_or(hashing_defaults.parallelism),
        };

        let mut gateway = SandboxGatewaySettings::default();
        if let Some(base) = settings.checkout_base_url {
            gateway.checkout_base_url = base;
        }

        Ok(Self {
            bind_addr,
            jwt: JwtSettings {
                secret: Zeroizing::new(secret),
                issuer: settings
                    .jwt_issuer
                    .unwrap_or_else(|| DEFAULT_ISSUER.to_owned()),
            },
            queue_capacity: settings
                .queue_capacity
                .unwrap_or(DEFAULT_QUEUE_CAPACITY)
                .max(1),
            worker,
            hashing,
            registration_timeout: settings.registration_timeout_ms.map(Duration::from_millis),
            gateway,
        })
    }

    /// Return the socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}
