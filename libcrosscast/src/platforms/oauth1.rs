//! OAuth 1.0a request signing (RFC 5849)
//!
//! Twitter's v2 tweet endpoint still authenticates with OAuth 1.0a
//! user context. Only the pieces that endpoint needs are implemented:
//! HMAC-SHA1 signatures and the `Authorization: OAuth ...` header.
//! JSON request bodies do not participate in the signature; only query
//! and oauth parameters do.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use hmac::{Hmac, Mac};
use rand::distributions::Alphanumeric;
use rand::Rng;
use sha1::Sha1;

type HmacSha1 = Hmac<Sha1>;

/// Consumer and access token key material for one signing identity.
#[derive(Debug, Clone)]
pub struct OAuth1Keys {
    pub consumer_key: String,
    pub consumer_secret: String,
    pub token: String,
    pub token_secret: String,
}

/// Percent-encoding per RFC 3986: only `A-Z a-z 0-9 - _ . ~` pass
/// through. OAuth requires exactly this alphabet, spaces as `%20`.
pub fn percent_encode(input: &str) -> String {
    urlencoding::encode(input).into_owned()
}

/// Random 32-character alphanumeric nonce.
pub fn nonce() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(32)
        .map(char::from)
        .collect()
}

/// The signature base string: `METHOD&encode(url)&encode(params)`
/// where `params` is every (already encoded) pair sorted and joined.
pub fn signature_base_string(method: &str, base_url: &str, params: &[(String, String)]) -> String {
    let mut encoded: Vec<(String, String)> = params
        .iter()
        .map(|(k, v)| (percent_encode(k), percent_encode(v)))
        .collect();
    encoded.sort();

    let param_string = encoded
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&");

    format!(
        "{}&{}&{}",
        method.to_uppercase(),
        percent_encode(base_url),
        percent_encode(&param_string)
    )
}

/// HMAC-SHA1 over the base string, keyed with
/// `encode(consumer_secret)&encode(token_secret)`, as base64.
pub fn sign(base_string: &str, consumer_secret: &str, token_secret: &str) -> String {
    let signing_key = format!(
        "{}&{}",
        percent_encode(consumer_secret),
        percent_encode(token_secret)
    );

    let mut mac =
        HmacSha1::new_from_slice(signing_key.as_bytes()).expect("HMAC accepts keys of any length");
    mac.update(base_string.as_bytes());

    BASE64.encode(mac.finalize().into_bytes())
}

/// Build the `Authorization: OAuth ...` header value for one request
///
/// `extra_params` are request parameters outside the header (query or
/// form-encoded body) that must be covered by the signature. A JSON
/// body contributes nothing, so Twitter v2 callers pass `&[]`.
pub fn authorization_header(
    keys: &OAuth1Keys,
    method: &str,
    base_url: &str,
    extra_params: &[(&str, &str)],
    nonce: &str,
    timestamp: &str,
) -> String {
    let oauth_params: Vec<(String, String)> = vec![
        ("oauth_consumer_key".to_string(), keys.consumer_key.clone()),
        ("oauth_nonce".to_string(), nonce.to_string()),
        ("oauth_signature_method".to_string(), "HMAC-SHA1".to_string()),
        ("oauth_timestamp".to_string(), timestamp.to_string()),
        ("oauth_token".to_string(), keys.token.clone()),
        ("oauth_version".to_string(), "1.0".to_string()),
    ];

    let mut all_params = oauth_params.clone();
    all_params.extend(
        extra_params
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string())),
    );

    let base_string = signature_base_string(method, base_url, &all_params);
    let signature = sign(&base_string, &keys.consumer_secret, &keys.token_secret);

    let mut header_params = oauth_params;
    header_params.push(("oauth_signature".to_string(), signature));
    header_params.sort();

    let rendered = header_params
        .iter()
        .map(|(k, v)| format!("{}=\"{}\"", percent_encode(k), percent_encode(v)))
        .collect::<Vec<_>>()
        .join(", ");

    format!("OAuth {}", rendered)
}
