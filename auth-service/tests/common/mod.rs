use std::sync::Arc;

use auth_service::config::AuthSettings;
use auth_service::config::HashingSettings;
use auth_service::domain::identity::service::AuthService;
use auth_service::outbound::repositories::InMemoryIdentityRepository;

pub const SIGNING_KEY: &str = "test-secret-key-for-jwt-signing-at-least-32-bytes";
pub const ISSUER: &str = "auth-service";

/// Deployment settings with a reduced Argon2 cost profile so the
/// credential-heavy tests stay quick
pub fn test_settings() -> AuthSettings {
    AuthSettings {
        signing_key: SIGNING_KEY.to_string(),
        issuer: ISSUER.to_string(),
        token_ttl_hours: 24,
        hashing: HashingSettings {
            memory_kib: 8192,
            iterations: 1,
            parallelism: 1,
        },
    }
}

/// Build a gateway over a fresh in-memory store.
///
/// The store handle is returned as well so tests can attach sibling
/// gateways to the same deployment.
pub fn spawn_service() -> (
    Arc<AuthService<InMemoryIdentityRepository>>,
    Arc<InMemoryIdentityRepository>,
) {
    init_tracing();

    let repository = Arc::new(InMemoryIdentityRepository::new());
    let service = AuthService::new(Arc::clone(&repository), &test_settings())
        .expect("Failed to build auth service");

    (Arc::new(service), repository)
}

fn init_tracing() {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "auth_service=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}
