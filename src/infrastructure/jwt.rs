use crate::domain::auth::{AccessClaims, TokenCodec, VerificationError};
use crate::domain::users::User;
use anyhow::Result;
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use time::OffsetDateTime;

/// HS256 token codec. The secret is shared by all instances of the service
/// (base64-encoded in configuration) and loaded exactly once at startup.
pub struct JwtTokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    access_token_ttl: i64,
}

impl JwtTokenCodec {
    pub fn from_base64_secret(secret: &str, access_token_ttl: i64) -> Result<Self> {
        let encoding_key = EncodingKey::from_base64_secret(secret)
            .map_err(|e| anyhow::anyhow!("Failed to decode signing secret: {}", e))?;
        let decoding_key = DecodingKey::from_base64_secret(secret)
            .map_err(|e| anyhow::anyhow!("Failed to decode signing secret: {}", e))?;

        Ok(Self {
            encoding_key,
            decoding_key,
            access_token_ttl,
        })
    }
}

impl TokenCodec for JwtTokenCodec {
    fn issue(&self, user: &User) -> Result<String> {
        let now = OffsetDateTime::now_utc().unix_timestamp();
        let claims = AccessClaims {
            sub: user.email.clone(),
            user_id: user.id,
            role: user.role,
            full_name: user.full_name(),
            iat: now,
            exp: now + self.access_token_ttl,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| anyhow::anyhow!("Failed to sign access token: {}", e))
    }

    fn verify(&self, token: &str) -> Result<AccessClaims, VerificationError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 0;

        decode::<AccessClaims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => VerificationError::Expired,
                ErrorKind::InvalidSignature => VerificationError::BadSignature,
                ErrorKind::InvalidAlgorithm | ErrorKind::InvalidAlgorithmName => {
                    VerificationError::Unsupported
                }
                _ => VerificationError::Malformed,
            })
    }

    fn access_token_ttl(&self) -> i64 {
        self.access_token_ttl
    }
}
