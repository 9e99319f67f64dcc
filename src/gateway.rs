//! Daraja payment gateway client (STK push)
//!
//! Request-to-pay against the Safaricom sandbox:
//!
//! - `GET  {base}/oauth/v1/generate?grant_type=client_credentials`
//! - `POST {base}/mpesa/stkpush/v1/processrequest`
//!
//! Gateway rejections are surfaced verbatim to the caller and never
//! retried.

use base64::{engine::general_purpose, Engine as _};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

use crate::config::Config;

#[derive(Debug)]
pub enum GatewayError {
    /// Token endpoint unreachable or credentials refused
    Auth(String),
    Http(reqwest::Error),
    InvalidPhone(String),
    InvalidAmount(i64),
    /// Raw gateway payload, passed through untouched
    Rejected(Value),
}

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        GatewayError::Http(err)
    }
}

impl std::fmt::Display for GatewayError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GatewayError::Auth(e) => write!(f, "Gateway auth error: {}", e),
            GatewayError::Http(e) => write!(f, "Gateway HTTP error: {}", e),
            GatewayError::InvalidPhone(p) => {
                write!(f, "Phone number must be in format 2547XXXXXXXX, got {}", p)
            }
            GatewayError::InvalidAmount(a) => write!(f, "Amount must be positive, got {}", a),
            GatewayError::Rejected(payload) => write!(f, "Gateway rejected request: {}", payload),
        }
    }
}

impl std::error::Error for GatewayError {}

/// Credentials and endpoints for one gateway environment.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub base_url: String,
    pub consumer_key: String,
    pub consumer_secret: String,
    pub shortcode: String,
    pub passkey: String,
    pub callback_url: String,
}

impl GatewayConfig {
    pub fn from_config(config: &Config) -> Self {
        Self {
            base_url: config.mpesa_base_url.clone(),
            consumer_key: config.mpesa_consumer_key.clone(),
            consumer_secret: config.mpesa_consumer_secret.clone(),
            shortcode: config.mpesa_shortcode.clone(),
            passkey: config.mpesa_passkey.clone(),
            callback_url: config.mpesa_callback_url.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct OauthResponse {
    access_token: String,
}

pub struct MpesaGateway {
    client: reqwest::Client,
    config: GatewayConfig,
}

impl MpesaGateway {
    pub fn new(config: GatewayConfig) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(15))
            .build()?;
        Ok(Self { client, config })
    }

    /// Fetch an OAuth bearer token from the sandbox.
    pub async fn oauth_token(&self) -> Result<String, GatewayError> {
        let url = format!(
            "{}/oauth/v1/generate?grant_type=client_credentials",
            self.config.base_url
        );

        let response = self
            .client
            .get(&url)
            .basic_auth(&self.config.consumer_key, Some(&self.config.consumer_secret))
            .timeout(Duration::from_secs(10))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(GatewayError::Auth(format!(
                "token endpoint returned {}",
                response.status()
            )));
        }

        let body: OauthResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::Auth(e.to_string()))?;
        Ok(body.access_token)
    }

    /// Initiate an STK push prompt on the subscriber's handset.
    ///
    /// `phone` must be in international format without '+', e.g.
    /// 2547XXXXXXXX; `amount` is whole KES.
    pub async fn stk_push(
        &self,
        phone: &str,
        amount: i64,
        account_reference: &str,
        transaction_desc: &str,
    ) -> Result<Value, GatewayError> {
        validate_phone(phone)?;
        if amount <= 0 {
            return Err(GatewayError::InvalidAmount(amount));
        }

        let token = self.oauth_token().await?;
        let timestamp = chrono::Utc::now().format("%Y%m%d%H%M%S").to_string();
        let password = stk_password(&self.config.shortcode, &self.config.passkey, &timestamp);

        let url = format!("{}/mpesa/stkpush/v1/processrequest", self.config.base_url);
        let payload = serde_json::json!({
            "BusinessShortCode": self.config.shortcode,
            "Password": password,
            "Timestamp": timestamp,
            "TransactionType": "CustomerPayBillOnline",
            "Amount": amount,
            "PartyA": phone,
            "PartyB": self.config.shortcode,
            "PhoneNumber": phone,
            "CallBackURL": self.config.callback_url,
            "AccountReference": account_reference,
            "TransactionDesc": transaction_desc,
        });

        let response = self
            .client
            .post(&url)
            .bearer_auth(&token)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        let body: Value = response
            .json()
            .await
            .unwrap_or_else(|e| Value::String(e.to_string()));

        if status.is_success() {
            Ok(body)
        } else {
            Err(GatewayError::Rejected(body))
        }
    }
}

/// Kenyan MSISDN in international format without '+': 254 prefix followed
/// by at least nine more digits.
pub fn validate_phone(phone: &str) -> Result<(), GatewayError> {
    let valid = phone.len() >= 12
        && phone.starts_with("254")
        && phone.chars().all(|c| c.is_ascii_digit());
    if valid {
        Ok(())
    } else {
        Err(GatewayError::InvalidPhone(phone.to_string()))
    }
}

/// Daraja request password: base64(shortcode + passkey + timestamp).
fn stk_password(shortcode: &str, passkey: &str, timestamp: &str) -> String {
    general_purpose::STANDARD.encode(format!("{}{}{}", shortcode, passkey, timestamp))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_phone_accepts_kenyan_msisdn() {
        assert!(validate_phone("254712345678").is_ok());
        assert!(validate_phone("2547123456789").is_ok());
    }

    #[test]
    fn test_validate_phone_rejects_bad_input() {
        assert!(validate_phone("0712345678").is_err());
        assert!(validate_phone("25471234").is_err());
        assert!(validate_phone("+254712345678").is_err());
        assert!(validate_phone("25471234567a").is_err());
    }

    #[test]
    fn test_stk_password_encoding() {
        let password = stk_password("174379", "passkey", "20260101120000");
        let decoded = general_purpose::STANDARD.decode(password).unwrap();
        assert_eq!(decoded, b"174379passkey20260101120000");
    }

    fn offline_gateway() -> MpesaGateway {
        MpesaGateway::new(GatewayConfig {
            base_url: "https://sandbox.invalid".to_string(),
            consumer_key: "key".to_string(),
            consumer_secret: "secret".to_string(),
            shortcode: "174379".to_string(),
            passkey: "passkey".to_string(),
            callback_url: "https://example.com/callback".to_string(),
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_stk_push_rejects_bad_phone_before_any_request() {
        let gateway = offline_gateway();
        let result = gateway.stk_push("0712345678", 100, "Donation", "Donation").await;
        assert!(matches!(result, Err(GatewayError::InvalidPhone(_))));
    }

    #[tokio::test]
    async fn test_stk_push_rejects_non_positive_amount() {
        let gateway = offline_gateway();
        let result = gateway.stk_push("254712345678", 0, "Donation", "Donation").await;
        assert!(matches!(result, Err(GatewayError::InvalidAmount(0))));
    }

    #[test]
    fn test_rejected_error_carries_raw_payload() {
        let payload = serde_json::json!({"errorCode": "500.001.1001"});
        let err = GatewayError::Rejected(payload.clone());
        assert!(err.to_string().contains("500.001.1001"));
    }

    #[tokio::test]
    #[ignore] // Run only against the live sandbox with real credentials
    async fn test_oauth_token_live() {
        let config = GatewayConfig::from_config(&crate::config::Config::from_env());
        let gateway = MpesaGateway::new(config).unwrap();
        let token = gateway.oauth_token().await.unwrap();
        assert!(!token.is_empty());
    }
}
