use uuid::Uuid;

/// Raw credential of the seeded API key; only its hash is ever stored
pub const TEST_API_KEY: &str = "test-api-key-123";

/// Tables holding fixture-owned rows, dependents before owners
pub const CLEANUP_ORDER: [&str; 6] = [
    "webhook_deliveries",
    "processing_results",
    "processing_jobs",
    "webhook_configs",
    "api_keys",
    "users",
];

/// Tables the seed populates
pub const SEEDED_TABLES: [&str; 3] = ["users", "api_keys", "webhook_configs"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserFixture {
    pub id: Uuid,
    pub email: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiKeyFixture {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: &'static str,
    /// bcrypt digest of [`TEST_API_KEY`]
    pub key_hash: &'static str,
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebhookConfigFixture {
    pub id: Uuid,
    pub user_id: Uuid,
    pub url: &'static str,
    pub secret: &'static str,
    pub is_active: bool,
}

/// The fixed fixture graph: one user owning one API key and one webhook config
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixtureGraph {
    pub user: UserFixture,
    pub api_key: ApiKeyFixture,
    pub webhook: WebhookConfigFixture,
}

const USER_ID: Uuid = Uuid::from_u128(0x550e8400_e29b_41d4_a716_446655440000);
const API_KEY_ID: Uuid = Uuid::from_u128(0x550e8400_e29b_41d4_a716_446655440001);
const WEBHOOK_ID: Uuid = Uuid::from_u128(0x550e8400_e29b_41d4_a716_446655440002);

impl Default for FixtureGraph {
    fn default() -> Self {
        Self {
            user: UserFixture {
                id: USER_ID,
                email: "test@example.com",
            },
            api_key: ApiKeyFixture {
                id: API_KEY_ID,
                user_id: USER_ID,
                name: "Test API Key",
                key_hash: "$2b$12$LQv3c1yqBWVHxkd0LHAkCOYz6TtxMQJqhN8/LewdBPj3bp.Gm.QG2",
                is_active: true,
            },
            webhook: WebhookConfigFixture {
                id: WEBHOOK_ID,
                user_id: USER_ID,
                url: "http://localhost:9999/webhook",
                secret: "test-webhook-secret",
                is_active: true,
            },
        }
    }
}
