use {
    crate::gateway::MpesaGateway,
    async_trait::async_trait,
    serde::{Deserialize, Serialize},
    std::time::{SystemTime, UNIX_EPOCH},
};

/// Counties the dashboard can be scoped to.
pub const REGIONS: [&str; 47] = [
    "Nairobi",
    "Mombasa",
    "Kisumu",
    "Nakuru",
    "Eldoret",
    "Thika",
    "Malindi",
    "Meru",
    "Machakos",
    "Kakamega",
    "Nyeri",
    "Murang'a",
    "Embu",
    "Kericho",
    "Bomet",
    "Narok",
    "Baringo",
    "Laikipia",
    "Bungoma",
    "Busia",
    "Siaya",
    "Homa Bay",
    "Migori",
    "Kisii",
    "Nyamira",
    "Garissa",
    "Wajir",
    "Mandera",
    "Marsabit",
    "Isiolo",
    "Kitui",
    "Makueni",
    "Taita Taveta",
    "Kilifi",
    "Kwale",
    "Tana River",
    "Samburu",
    "Turkana",
    "West Pokot",
    "Elgeyo Marakwet",
    "Trans Nzoia",
    "Nandi",
    "Vihiga",
    "Tharaka Nithi",
    "Lamu",
    "Kajiado",
    "Kiambu",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentType {
    MobileWallet,
    CarrierMoney,
    BankTransfer,
}

impl PaymentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentType::MobileWallet => "Mobile Wallet",
            PaymentType::CarrierMoney => "Carrier Money",
            PaymentType::BankTransfer => "Bank Transfer",
        }
    }

    pub fn all() -> [PaymentType; 3] {
        [
            PaymentType::MobileWallet,
            PaymentType::CarrierMoney,
            PaymentType::BankTransfer,
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sector {
    Transport,
    Communication,
    Retail,
    Banking,
    Government,
    Utilities,
}

impl Sector {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sector::Transport => "Transport",
            Sector::Communication => "Communication",
            Sector::Retail => "Retail",
            Sector::Banking => "Banking",
            Sector::Government => "Government",
            Sector::Utilities => "Utilities",
        }
    }

    pub fn all() -> [Sector; 6] {
        [
            Sector::Transport,
            Sector::Communication,
            Sector::Retail,
            Sector::Banking,
            Sector::Government,
            Sector::Utilities,
        ]
    }
}

/// A single observed transaction. Consumed by the window aggregator,
/// never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionEvent {
    pub timestamp: i64,
    pub region: String,
    pub payment_type: PaymentType,
    pub sector: Sector,
}

#[derive(Debug)]
pub struct SourceError(pub String);

impl std::fmt::Display for SourceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "event source error: {}", self.0)
    }
}

impl std::error::Error for SourceError {}

/// Supplier of raw transaction events for one region.
///
/// An empty batch is a valid answer; the pipeline falls back to synthetic
/// data when nothing is available.
#[async_trait]
pub trait EventSource: Send + Sync {
    async fn fetch_events(&self, region: &str) -> Result<Vec<TransactionEvent>, SourceError>;
}

/// Event source backed by the payment gateway.
///
/// The gateway does not expose a transaction feed yet; the token fetch
/// verifies connectivity and the batch comes back empty. Callers treat the
/// empty batch as "simulate this cycle".
pub struct GatewayEventSource {
    gateway: MpesaGateway,
}

impl GatewayEventSource {
    pub fn new(gateway: MpesaGateway) -> Self {
        Self { gateway }
    }
}

#[async_trait]
impl EventSource for GatewayEventSource {
    async fn fetch_events(&self, _region: &str) -> Result<Vec<TransactionEvent>, SourceError> {
        self.gateway
            .oauth_token()
            .await
            .map_err(|e| SourceError(e.to_string()))?;
        Ok(Vec::new())
    }
}

/// Fixed in-memory source for tests and demos.
pub struct StaticEventSource {
    events: Vec<TransactionEvent>,
}

impl StaticEventSource {
    pub fn new(events: Vec<TransactionEvent>) -> Self {
        Self { events }
    }

    pub fn empty() -> Self {
        Self { events: Vec::new() }
    }
}

#[async_trait]
impl EventSource for StaticEventSource {
    async fn fetch_events(&self, region: &str) -> Result<Vec<TransactionEvent>, SourceError> {
        Ok(self
            .events
            .iter()
            .filter(|e| e.region == region)
            .cloned()
            .collect())
    }
}

/// Helper to get current Unix timestamp
pub fn current_timestamp() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs() as i64
}
