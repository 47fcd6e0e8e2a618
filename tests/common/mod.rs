//! Shared helpers for signing Telegram init data the way the platform does.

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

pub const BOT_TOKEN: &str = "12345:test-bot-token";

fn hmac_sha256(key: &[u8], message: &[u8]) -> [u8; 32] {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC can take key of any size");
    mac.update(message);
    mac.finalize().into_bytes().into()
}

/// Signs `pairs` with `bot_token` and renders the init data string with the
/// pairs in the given order followed by the `hash` field.
///
/// Values must not contain `&`, `=`, `%` or `+`; the helper skips URL
/// encoding so tests stay readable.
pub fn sign_init_data(pairs: &[(&str, &str)], bot_token: &str) -> String {
    let mut sorted = pairs.to_vec();
    sorted.sort_by_key(|(k, _)| *k);
    let data_check = sorted
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("\n");

    let secret_key = hmac_sha256(b"WebAppData", bot_token.as_bytes());
    let hash = hex::encode(hmac_sha256(&secret_key, data_check.as_bytes()));

    let mut query = pairs
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>();
    query.push(format!("hash={hash}"));
    query.join("&")
}

/// Init data for a plain user with the given id.
pub fn init_data_for(id: i64, bot_token: &str) -> String {
    let user = format!(r#"{{"id":{id},"username":"chief_{id}","first_name":"Chief"}}"#);
    sign_init_data(&[("auth_date", "1700000000"), ("user", user.as_str())], bot_token)
}
