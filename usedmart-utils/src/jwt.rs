//! Bearer token helpers.
use jsonwebtoken::{
    decode, encode, errors::Error as JwtError, Algorithm, DecodingKey, EncodingKey, Header,
    TokenData, Validation,
};
use serde::{de::DeserializeOwned, Serialize};

#[inline]
pub fn encode_jwt<T: Serialize>(
    claims: &T,
    secret: &[u8],
    algorithm: Option<Algorithm>,
) -> Result<String, JwtError> {
    let header = Header::new(algorithm.unwrap_or(Algorithm::HS256));
    encode(&header, claims, &EncodingKey::from_secret(secret))
}

#[inline]
pub fn decode_jwt<T: DeserializeOwned>(
    token: &str,
    secret: &[u8],
    validation: Option<Validation>,
) -> Result<TokenData<T>, JwtError> {
    let validation = validation.unwrap_or_default();
    decode::<T>(token, &DecodingKey::from_secret(secret), &validation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct TestClaims {
        sub: String,
        exp: i64,
        iss: String,
    }

    #[test]
    fn test_decode_with_issuer_validation() {
        let claims = TestClaims {
            sub: "7".into(),
            exp: chrono::Utc::now().timestamp() + 60,
            iss: "usedmart".into(),
        };
        let token = encode_jwt(&claims, b"secret", None).unwrap();

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&["usedmart"]);
        let data = decode_jwt::<TestClaims>(&token, b"secret", Some(validation)).unwrap();
        assert_eq!(data.claims, claims);

        assert!(decode_jwt::<TestClaims>(&token, b"other", None).is_err());
    }
}
