//! Signed user identity tokens.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use uuid::Uuid;

type HmacSha256 = Hmac<Sha256>;

/// Issues and verifies `<user_id>.<signature>` tokens.
///
/// The signature is the hex HMAC-SHA256 of the user id keyed by
/// `signing_secret`. Nothing is stored server-side: a token is valid exactly
/// when its signature matches.
pub struct IdentityService {
    signing_secret: String,
}

/// Identity attached to a request by the identity middleware.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserIdentity {
    pub user_id: String,
    pub token: String,
    /// `true` when the identity was minted for this request.
    pub issued: bool,
}

impl IdentityService {
    pub fn new(signing_secret: impl Into<String>) -> Self {
        Self {
            signing_secret: signing_secret.into(),
        }
    }

    fn mac(&self, user_id: &str) -> HmacSha256 {
        let mut mac = HmacSha256::new_from_slice(self.signing_secret.as_bytes())
            .expect("HMAC accepts any key length");
        mac.update(user_id.as_bytes());
        mac
    }

    /// Signs `user_id` into a token.
    pub fn issue(&self, user_id: &str) -> String {
        let signature = hex::encode(self.mac(user_id).finalize().into_bytes());
        format!("{user_id}.{signature}")
    }

    /// Returns the user id carried by `token` if its signature is valid.
    pub fn verify(&self, token: &str) -> Option<String> {
        let (user_id, signature) = token.rsplit_once('.')?;
        if user_id.is_empty() {
            return None;
        }

        let signature = hex::decode(signature).ok()?;
        self.mac(user_id)
            .verify_slice(&signature)
            .ok()
            .map(|()| user_id.to_string())
    }

    /// Creates a fresh random identity.
    pub fn mint(&self) -> UserIdentity {
        let user_id = Uuid::new_v4().to_string();
        let token = self.issue(&user_id);

        UserIdentity {
            user_id,
            token,
            issued: true,
        }
    }

    /// Verifies `token` when present, otherwise mints a new identity.
    pub fn identify(&self, token: Option<&str>) -> UserIdentity {
        match token.and_then(|t| self.verify(t).map(|user_id| (t, user_id))) {
            Some((token, user_id)) => UserIdentity {
                user_id,
                token: token.to_string(),
                issued: false,
            },
            None => self.mint(),
        }
    }
}
