//! Application state wiring all services together.
//!
//! AppState holds the concrete service instances used by both CLI and HTTP
//! handlers. Services are generic over repository/hasher traits, but AppState
//! pins them to the concrete infra implementations.

use std::path::PathBuf;
use std::sync::Arc;

use chatkeep_core::service::conversation::ConversationService;
use chatkeep_core::service::identity::IdentityService;
use chatkeep_infra::crypto::hash::SaltedSha256Hasher;
use chatkeep_infra::sqlite::conversation::SqliteConversationRepository;
use chatkeep_infra::sqlite::pool::{DatabasePool, database_url};
use chatkeep_infra::sqlite::session::SqliteSessionRepository;
use chatkeep_infra::sqlite::user::SqliteUserRepository;
use chatkeep_types::config::ChatkeepConfig;

/// Concrete type aliases for the service generics pinned to infra implementations.
pub type ConcreteIdentityService =
    IdentityService<SqliteUserRepository, SqliteSessionRepository, SaltedSha256Hasher>;

pub type ConcreteConversationService = ConversationService<SqliteConversationRepository>;

/// Shared application state holding all services.
#[derive(Clone)]
pub struct AppState {
    pub identity_service: Arc<ConcreteIdentityService>,
    pub conversation_service: Arc<ConcreteConversationService>,
    pub config: Arc<ChatkeepConfig>,
    pub data_dir: PathBuf,
    pub db_pool: DatabasePool,
}

impl AppState {
    /// Open (or create) the database under `data_dir` and wire services.
    pub async fn init(data_dir: PathBuf, config: ChatkeepConfig) -> anyhow::Result<Self> {
        tokio::fs::create_dir_all(&data_dir).await?;

        let db_pool = DatabasePool::new(&database_url(&data_dir)).await?;
        Ok(Self::from_pool(db_pool, config, data_dir))
    }

    /// Wire services over an already-open pool.
    pub fn from_pool(db_pool: DatabasePool, config: ChatkeepConfig, data_dir: PathBuf) -> Self {
        let identity_service = IdentityService::new(
            SqliteUserRepository::new(db_pool.clone()),
            SqliteSessionRepository::new(db_pool.clone()),
            SaltedSha256Hasher::new(),
        )
        .with_session_ttl(chrono::Duration::days(i64::from(config.session_ttl_days)));

        let conversation_service =
            ConversationService::new(SqliteConversationRepository::new(db_pool.clone()))
                .with_page_limits(config.default_page_size, config.max_page_size);

        Self {
            identity_service: Arc::new(identity_service),
            conversation_service: Arc::new(conversation_service),
            config: Arc::new(config),
            data_dir,
            db_pool,
        }
    }
}
