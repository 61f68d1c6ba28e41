use anyhow::{anyhow, Result};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};

use backend_domain::{AuthConfig, Claims, TokenService};

struct Keys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

/// HS256 admin tokens. Without a secret every issue and verify call fails.
pub struct JwtTokenService {
    keys: Option<Keys>,
    ttl_hours: i64,
}

impl JwtTokenService {
    pub fn new(config: &AuthConfig) -> Self {
        let keys = config.jwt_secret.as_deref().map(|secret| Keys {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        });
        Self {
            keys,
            ttl_hours: config.token_ttl_hours,
        }
    }

    fn keys(&self) -> Result<&Keys> {
        self.keys
            .as_ref()
            .ok_or_else(|| anyhow!("jwt secret not configured"))
    }
}

impl TokenService for JwtTokenService {
    fn issue(&self, username: &str) -> Result<String> {
        let now = Utc::now();
        let expires = Duration::try_hours(self.ttl_hours)
            .and_then(|ttl| now.checked_add_signed(ttl))
            .ok_or_else(|| anyhow!("token ttl of {} hours is out of range", self.ttl_hours))?;
        let claims = Claims {
            username: username.to_string(),
            iat: now.timestamp(),
            exp: expires.timestamp(),
        };
        Ok(encode(&Header::default(), &claims, &self.keys()?.encoding)?)
    }

    fn verify(&self, token: &str) -> Result<Claims> {
        let data = decode::<Claims>(token, &self.keys()?.decoding, &Validation::default())?;
        Ok(data.claims)
    }
}
