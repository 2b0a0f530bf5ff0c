//! Fixed RSA keys for signing test ID tokens.

use chrono::Utc;
use jsonwebtoken::{encode, errors::Error, Algorithm, EncodingKey, Header};
use serde_json::{json, Value};

/// An RSA key pair with the public half published as a JWK.
#[derive(Debug, Clone, Copy)]
pub struct MockKey {
    pub kid: &'static str,
    private_pem: &'static str,
    modulus: &'static str,
}

/// Published by a freshly started [`MockIdp`](super::MockIdp).
pub const PRIMARY_KEY: MockKey = MockKey {
    kid: "mock-key-1",
    private_pem: include_str!("keys/primary.pem"),
    modulus: "uD_iKjL9YncW2unoM-fU3eGHXzvJuke2tj3eTBvQYi2Jl9S7g2Z_4eMOvr9bxJ1kl9ImKrnI18wyC0bupD9puIcEkMlVSLJi8RclE46CJBmy4d3yt2fX7S8AkMr7DZCEroU_17nj1c5uZiDHxHyrtv0Z-ETcSHH1y2cGIQlH6aLLbNBI3eNiyeEi7nQiOo7L6Ezb56zZMumugQFSqE_T66GkCkzxMlYax3peh_gKz-DHe5C6BpB458j5XJma1wLAPrtDZwp8StPTd2iYsk3cuR6RQUu7141DbbXUL-VVb7JxiaQxpNtik8bYCVihdY-p7JQSW75XuZ6xpFwtq6rqHQ",
};

/// Not published until a test rotates it in. Also useful for forging.
pub const SECONDARY_KEY: MockKey = MockKey {
    kid: "mock-key-2",
    private_pem: include_str!("keys/secondary.pem"),
    modulus: "pvP5K7xSbbGqWvF74-wP2DeS7mYWPSd_2mDuxq8FUZJxUeveDD7sTbQeFIl7FM40OL6oRh67u3q4ZE98Q_pP9Gd8y8u6Qel5I5LlR_7Xbx7Pi4RVTeH5qAfotToillIva8hR-vTMFEP1iRhVjeyf7_yHjEW4JWYgETlmnrjDkYU_o9-3ywjA7as1GX4iXy-UzBHsQmvqnv7VcPlYvmOP24_3xCnUUVrGmD9zLwW6TmyPdsVGOxxDWCIkYbTYEv0w1DmjikJAfrtHDR7Lx1gOEGnRfYwBxy4P3-iL-jWFfdpTCBV97jyqxtNojHf7k4lp9MO-VjcmiR8FdCFLpJPKHw",
};

impl MockKey {
    /// Public key in JWK form, as a provider's key set lists it.
    pub fn jwk(&self) -> Value {
        json!({
            "kty": "RSA",
            "use": "sig",
            "alg": "RS256",
            "kid": self.kid,
            "n": self.modulus,
            "e": "AQAB",
        })
    }

    /// Sign `claims` as an RS256 token carrying this key's `kid`.
    pub fn sign(&self, claims: &Value) -> Result<String, Error> {
        self.sign_as(self.kid, claims)
    }

    /// Sign `claims` with this key while claiming another `kid`.
    pub fn sign_as(&self, kid: &str, claims: &Value) -> Result<String, Error> {
        let mut header = Header::new(Algorithm::RS256);
        header.kid = Some(kid.to_string());

        let key = EncodingKey::from_rsa_pem(self.private_pem.as_bytes())?;
        encode(&header, claims, &key)
    }
}

/// A minimal valid claim set, expiring an hour from now.
pub fn id_token_claims(issuer: &str, audience: &str, subject: &str) -> Value {
    let now = Utc::now().timestamp();
    json!({
        "iss": issuer,
        "aud": audience,
        "sub": subject,
        "iat": now,
        "exp": now + 3600,
    })
}
