use base64::engine::general_purpose::{STANDARD as B64, URL_SAFE_NO_PAD};
use base64::Engine;
use chrono::Utc;
use hmac::{Hmac, Mac};
use lambda_http::{http::StatusCode, Body, Error, Request, Response};
use pbkdf2::pbkdf2_hmac;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use uuid::Uuid;

use weekdo_atoms::categories::service as categories;
use weekdo_atoms::respond;
use weekdo_atoms::store::Store;
use weekdo_atoms::users::model::{UserRecord, UserSummary};

type HmacSha256 = Hmac<Sha256>;

const PBKDF2_ITERATIONS: u32 = 200_000;
const TOKEN_TTL_SECS: i64 = 7 * 24 * 60 * 60;
const TOKEN_HEADER: &str = r#"{"alg":"HS256","typ":"JWT"}"#;

/// Claims carried inside the signed session token.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    #[serde(rename = "userId")]
    pub user_id: String,
    pub username: String,
    pub exp: i64,
}

#[derive(Debug, Deserialize)]
struct RegisterPayload {
    username: String,
    email: String,
    password: String,
}

#[derive(Debug, Deserialize)]
struct LoginPayload {
    email: String,
    password: String,
}

#[derive(Debug, Serialize)]
struct AuthResponse {
    message: &'static str,
    token: String,
    user: UserSummary,
}

/// POST /auth/register - create the account, seed the default
/// categories, and hand back a session token straight away.
pub async fn register(store: &Store, secret: &str, body: &[u8]) -> Result<Response<Body>, Error> {
    let payload: RegisterPayload = match respond::parse_json(body) {
        Ok(payload) => payload,
        Err(resp) => return Ok(resp),
    };

    if store.find_user_id_by_email(&payload.email).await?.is_some()
        || store
            .find_user_id_by_username(&payload.username)
            .await?
            .is_some()
    {
        return Ok(respond::error(StatusCode::BAD_REQUEST, "User already exists"));
    }

    let (password_salt, password_hash) = hash_password(&payload.password);
    let record = UserRecord {
        id: Uuid::new_v4().to_string(),
        username: payload.username,
        email: payload.email,
        password_salt,
        password_hash,
        created_at: Utc::now().to_rfc3339(),
    };
    store.create_user(&record).await?;
    categories::create_defaults(store, &record.id).await?;

    tracing::info!("registered user {}", record.username);

    let token = mint_token(&record.id, &record.username, secret, Utc::now().timestamp())?;
    respond::json(
        StatusCode::CREATED,
        &AuthResponse {
            message: "User registered successfully",
            token,
            user: UserSummary::of(&record),
        },
    )
}

/// POST /auth/login. Unknown email and wrong password answer
/// identically so the response does not leak which accounts exist.
pub async fn login(store: &Store, secret: &str, body: &[u8]) -> Result<Response<Body>, Error> {
    let payload: LoginPayload = match respond::parse_json(body) {
        Ok(payload) => payload,
        Err(resp) => return Ok(resp),
    };

    let record = match store.find_user_id_by_email(&payload.email).await? {
        Some(user_id) => store.get_user(&user_id).await?,
        None => None,
    };
    let Some(record) = record else {
        return Ok(respond::error(StatusCode::UNAUTHORIZED, "Invalid credentials"));
    };

    if !verify_password(&payload.password, &record.password_salt, &record.password_hash) {
        return Ok(respond::error(StatusCode::UNAUTHORIZED, "Invalid credentials"));
    }

    let token = mint_token(&record.id, &record.username, secret, Utc::now().timestamp())?;
    respond::json(
        StatusCode::OK,
        &AuthResponse {
            message: "Login successful",
            token,
            user: UserSummary::of(&record),
        },
    )
}

/// GET /auth/me - current user, password material stripped
pub async fn me(store: &Store, user_id: &str) -> Result<Response<Body>, Error> {
    match store.get_user(user_id).await? {
        Some(record) => respond::json(StatusCode::OK, &record.public()),
        None => Ok(respond::error(StatusCode::NOT_FOUND, "User not found")),
    }
}

/// Gate for every protected route: pull the bearer token out of the
/// Authorization header and verify it. A missing token is 401, a bad or
/// expired one is 403, matching the original middleware split.
pub fn authenticate(event: &Request, secret: &str) -> Result<Claims, Response<Body>> {
    let header = event
        .headers()
        .get("Authorization")
        .and_then(|value| value.to_str().ok());
    let token = header.and_then(|header| header.split_whitespace().nth(1));

    let Some(token) = token else {
        return Err(respond::error(
            StatusCode::UNAUTHORIZED,
            "Access token required",
        ));
    };

    verify_token(token, secret, Utc::now().timestamp()).ok_or_else(|| {
        respond::error(StatusCode::FORBIDDEN, "Invalid or expired token")
    })
}

/// Salted pbkdf2-HMAC-SHA256 password record: (base64 salt, base64 key).
pub fn hash_password(password: &str) -> (String, String) {
    let mut salt = [0u8; 16];
    rand::thread_rng().fill_bytes(&mut salt);
    let mut key = [0u8; 32];
    pbkdf2_hmac::<Sha256>(password.as_bytes(), &salt, PBKDF2_ITERATIONS, &mut key);
    (B64.encode(salt), B64.encode(key))
}

pub fn verify_password(password: &str, salt_b64: &str, hash_b64: &str) -> bool {
    let Ok(salt) = B64.decode(salt_b64) else {
        return false;
    };
    let mut key = [0u8; 32];
    pbkdf2_hmac::<Sha256>(password.as_bytes(), &salt, PBKDF2_ITERATIONS, &mut key);
    B64.encode(key) == hash_b64
}

/// JWT-shaped token: base64url(header).base64url(claims).base64url(sig),
/// signed with HMAC-SHA256 and expiring after 7 days.
pub fn mint_token(
    user_id: &str,
    username: &str,
    secret: &str,
    now: i64,
) -> Result<String, Error> {
    let claims = Claims {
        user_id: user_id.to_string(),
        username: username.to_string(),
        exp: now + TOKEN_TTL_SECS,
    };

    let header = URL_SAFE_NO_PAD.encode(TOKEN_HEADER);
    let body = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&claims)?);
    let message = format!("{}.{}", header, body);

    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|_| Error::from("invalid token signing key"))?;
    mac.update(message.as_bytes());
    let signature = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());

    Ok(format!("{}.{}", message, signature))
}

/// None on any defect: wrong shape, bad signature, expired, garbled
/// claims. Callers only need pass/fail.
pub fn verify_token(token: &str, secret: &str, now: i64) -> Option<Claims> {
    let mut parts = token.split('.');
    let header = parts.next()?;
    let body = parts.next()?;
    let signature = parts.next()?;
    if parts.next().is_some() {
        return None;
    }

    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).ok()?;
    mac.update(format!("{}.{}", header, body).as_bytes());
    let signature = URL_SAFE_NO_PAD.decode(signature).ok()?;
    mac.verify_slice(&signature).ok()?;

    let claims: Claims = serde_json::from_slice(&URL_SAFE_NO_PAD.decode(body).ok()?).ok()?;
    if claims.exp < now {
        return None;
    }
    Some(claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_roundtrip() {
        let (salt, hash) = hash_password("hunter2");
        assert!(verify_password("hunter2", &salt, &hash));
        assert!(!verify_password("hunter3", &salt, &hash));
    }

    #[test]
    fn salts_are_unique_per_hash() {
        let (salt_a, hash_a) = hash_password("same-password");
        let (salt_b, hash_b) = hash_password("same-password");
        assert_ne!(salt_a, salt_b);
        assert_ne!(hash_a, hash_b);
    }

    #[test]
    fn token_roundtrip() {
        let token = mint_token("u1", "kawtar", "secret", 1_700_000_000).unwrap();
        let claims = verify_token(&token, "secret", 1_700_000_000).unwrap();
        assert_eq!(claims.user_id, "u1");
        assert_eq!(claims.username, "kawtar");
        assert_eq!(claims.exp, 1_700_000_000 + TOKEN_TTL_SECS);
    }

    #[test]
    fn token_rejects_wrong_secret_and_tampering() {
        let token = mint_token("u1", "kawtar", "secret", 1_700_000_000).unwrap();
        assert!(verify_token(&token, "other-secret", 1_700_000_000).is_none());

        let mut tampered = token.clone();
        tampered.replace_range(0..1, "x");
        assert!(verify_token(&tampered, "secret", 1_700_000_000).is_none());

        assert!(verify_token("not-a-token", "secret", 1_700_000_000).is_none());
    }

    #[test]
    fn token_expires_after_seven_days() {
        let minted_at = 1_700_000_000;
        let token = mint_token("u1", "kawtar", "secret", minted_at).unwrap();
        assert!(verify_token(&token, "secret", minted_at + TOKEN_TTL_SECS - 1).is_some());
        assert!(verify_token(&token, "secret", minted_at + TOKEN_TTL_SECS + 1).is_none());
    }
}
