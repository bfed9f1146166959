use chrono::{serde::ts_seconds, DateTime, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, TokenData, Validation};
use rocket::{
    http::{Cookie, SameSite, Status},
    request::{FromRequest, Outcome},
    time::Duration,
    Request,
};
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::Error;
use crate::model::common::voter::VoterAddress;

pub const CALLER_TOKEN_COOKIE: &str = "caller_token";

const BEARER_PREFIX: &str = "Bearer ";

/// Proof of who is calling, issued by the identity layer.
/// The ledger only checks the signature and expiry; the address inside is
/// used as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallerToken {
    #[serde(rename = "sub")]
    address: VoterAddress,
}

impl CallerToken {
    pub fn new(address: VoterAddress) -> Self {
        Self { address }
    }

    /// The caller's address.
    pub fn address(&self) -> &VoterAddress {
        &self.address
    }

    /// Sign this token as a JWT valid for the configured lifetime.
    pub fn encode(self, config: &Config) -> Result<String, Error> {
        let claims = Claims {
            token: self,
            expire_at: Utc::now() + config.auth_ttl(),
        };
        let jwt = jsonwebtoken::encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(config.jwt_secret()),
        )?;
        Ok(jwt)
    }

    /// Sign this token and wrap it in a cookie.
    pub fn into_cookie(self, config: &Config) -> Result<Cookie<'static>, Error> {
        let jwt = self.encode(config)?;
        Ok(Cookie::build(CALLER_TOKEN_COOKIE, jwt)
            .max_age(Duration::seconds(config.auth_ttl().num_seconds()))
            .http_only(true)
            .same_site(SameSite::Strict)
            .finish())
    }

    /// Verify and decode a JWT.
    pub fn decode(jwt: &str, config: &Config) -> Result<Self, Error> {
        let token = jsonwebtoken::decode(
            jwt,
            &DecodingKey::from_secret(config.jwt_secret()),
            &Validation::default(),
        )
        .map(|claims: TokenData<Claims>| claims.claims.token)?;
        Ok(token)
    }
}

/// JWT claims: the token itself plus an expiry datetime.
#[derive(Serialize, Deserialize)]
struct Claims {
    #[serde(flatten)]
    token: CallerToken,
    #[serde(rename = "exp", with = "ts_seconds")]
    expire_at: DateTime<Utc>,
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for CallerToken {
    type Error = Error;

    /// Get a [`CallerToken`] from the cookie, or failing that from a bearer
    /// `Authorization` header.
    async fn from_request(req: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        let config = match req.rocket().state::<Config>() {
            Some(config) => config,
            None => {
                error!("Config is not in managed state");
                return Outcome::Failure((
                    Status::InternalServerError,
                    Error::Unauthorized("Identity check unavailable".to_string()),
                ));
            }
        };

        let cookie = req.cookies().get(CALLER_TOKEN_COOKIE);
        let jwt = cookie.map(|cookie| cookie.value()).or_else(|| {
            req.headers()
                .get_one("Authorization")
                .and_then(|header| header.strip_prefix(BEARER_PREFIX))
        });
        let jwt = match jwt {
            Some(jwt) => jwt,
            None => {
                return Outcome::Failure((
                    Status::Unauthorized,
                    Error::Unauthorized("No caller token".to_string()),
                ))
            }
        };

        match Self::decode(jwt, config) {
            Ok(token) => Outcome::Success(token),
            Err(e) => {
                debug!("Rejected caller token: {e}");
                Outcome::Failure((Status::Unauthorized, e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Config {
        Config::example()
    }

    #[test]
    fn token_round_trips_through_jwt() {
        let token = CallerToken::new(VoterAddress::example1());
        let jwt = token.clone().encode(&config()).unwrap();
        assert_eq!(CallerToken::decode(&jwt, &config()).unwrap(), token);
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let other = Config::example_with_secret("not-the-real-secret");
        let jwt = CallerToken::new(VoterAddress::example1())
            .encode(&other)
            .unwrap();
        assert!(matches!(
            CallerToken::decode(&jwt, &config()),
            Err(Error::Jwt(_))
        ));
    }

    #[test]
    fn cookie_carries_the_jwt() {
        let cookie = CallerToken::new(VoterAddress::example2())
            .into_cookie(&config())
            .unwrap();
        assert_eq!(cookie.name(), CALLER_TOKEN_COOKIE);
        let token = CallerToken::decode(cookie.value(), &config()).unwrap();
        assert_eq!(token.address(), &VoterAddress::example2());
    }
}
