//! Telegram WebApp init-data verification.
//!
//! The client forwards the init data string it received from Telegram in the
//! `Authorization: tma <init data>` header. Verification recomputes the
//! HMAC-SHA256 signature over the canonicalized key/value pairs, keyed by a
//! secret derived from the bot token, and only then trusts the embedded user
//! payload.

use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpRequest};
use anyhow::anyhow;
use futures_util::future::{ready, Ready};
use hmac::{Hmac, Mac};
use serde::Deserialize;
use sha2::Sha256;
use std::env;
use thiserror::Error;
use url::form_urlencoded;

use crate::http::error::ApiError;

type HmacSha256 = Hmac<Sha256>;

/// Label Telegram uses to derive the signing key from the bot token.
const SIGNING_LABEL: &[u8] = b"WebAppData";

/// Identity payload embedded in the init data.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct TelegramUser {
    pub id: i64,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub photo_url: Option<String>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    /// No init data supplied, or no `hash` field inside it.
    #[error("missing init data")]
    MissingToken,
    /// Signature did not match the canonicalized pairs.
    #[error("invalid init data signature")]
    InvalidSignature,
    /// `user` field absent, unparsable, or without a usable id.
    #[error("invalid embedded user")]
    InvalidUser,
}

impl From<AuthError> for ApiError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::MissingToken => ApiError::MissingInitData,
            AuthError::InvalidSignature => ApiError::InvalidInitData,
            AuthError::InvalidUser => ApiError::InvalidUser,
        }
    }
}

fn hmac_sha256(key: &[u8], message: &[u8]) -> [u8; 32] {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC can take key of any size");
    mac.update(message);
    mac.finalize().into_bytes().into()
}

/// Equal-length comparison that accumulates the XOR of every position, so
/// the runtime does not depend on where the strings diverge.
fn constant_time_eq(a: &str, b: &str) -> bool {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    if a.len() != b.len() {
        return false;
    }
    let mut diff = 0u8;
    for (x, y) in a.iter().zip(b) {
        diff |= x ^ y;
    }
    diff == 0
}

/// Verifies an init data string against the bot token and extracts the
/// embedded user. Pure function of its inputs.
pub fn verify_init_data(init_data: &str, bot_token: &str) -> Result<TelegramUser, AuthError> {
    let pairs: Vec<(String, String)> = form_urlencoded::parse(init_data.as_bytes())
        .into_owned()
        .collect();

    let hash = pairs
        .iter()
        .find(|(k, _)| k == "hash")
        .map(|(_, v)| v.clone())
        .ok_or(AuthError::MissingToken)?;

    // Canonical form: every pair except `hash`, sorted by key, one per line.
    let mut rest: Vec<&(String, String)> = pairs.iter().filter(|(k, _)| k != "hash").collect();
    rest.sort_by(|a, b| a.0.cmp(&b.0));
    let data_check = rest
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("\n");

    let secret_key = hmac_sha256(SIGNING_LABEL, bot_token.as_bytes());
    let calculated = hex::encode(hmac_sha256(&secret_key, data_check.as_bytes()));
    if !constant_time_eq(&calculated, &hash) {
        return Err(AuthError::InvalidSignature);
    }

    let user_json = pairs
        .iter()
        .find(|(k, _)| k == "user")
        .map(|(_, v)| v.as_str())
        .ok_or(AuthError::InvalidUser)?;
    let user: TelegramUser =
        serde_json::from_str(user_json).map_err(|_| AuthError::InvalidUser)?;
    if user.id <= 0 {
        return Err(AuthError::InvalidUser);
    }

    Ok(user)
}

//////////////////////////////////////////////////
// ─────────  InitDataAuth extractor  ─────────
//////////////////////////////////////////////////

/// Extracts and verifies the init data header, exposing the Telegram user.
#[derive(Debug, Clone)]
pub struct InitDataAuth {
    pub user: TelegramUser,
}

impl FromRequest for InitDataAuth {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _pl: &mut Payload) -> Self::Future {
        let res = (|| {
            // Expect:  Authorization: tma <init data>
            let hdr = req
                .headers()
                .get("Authorization")
                .and_then(|v| v.to_str().ok())
                .unwrap_or_default();

            let init_data = hdr.strip_prefix("tma ").unwrap_or_default();
            if init_data.is_empty() {
                return Err(AuthError::MissingToken.into());
            }

            let bot_token = env::var("BOT_TOKEN")
                .map_err(|_| ApiError::Internal(anyhow!("BOT_TOKEN must be set")))?;

            let user = verify_init_data(init_data, &bot_token)?;
            Ok(InitDataAuth { user })
        })();

        ready(res)
    }
}
