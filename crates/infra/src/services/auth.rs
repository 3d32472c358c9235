use courtside_domain::ID;
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::Deserialize;
use tracing::debug;

/// Authorization collaborator, consulted once per inbound realtime
/// connection. A token that does not resolve leaves the connection
/// anonymous; it is never an error.
pub trait IIdentityResolver: Send + Sync {
    fn resolve_identity(&self, token: &str) -> Option<ID>;
}

#[derive(Debug, Deserialize)]
struct Claims {
    id: String,
    #[allow(dead_code)]
    exp: usize,
}

/// Validates HS256 tokens minted by the external credential-issuing
/// surface; the subscriber identity travels in the `id` claim.
pub struct JwtIdentityResolver {
    secret: String,
}

impl JwtIdentityResolver {
    pub fn new(secret: String) -> Self {
        Self { secret }
    }
}

impl IIdentityResolver for JwtIdentityResolver {
    fn resolve_identity(&self, token: &str) -> Option<ID> {
        let decoded = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::default(),
        );
        match decoded {
            Ok(data) => match data.claims.id.parse::<ID>() {
                Ok(id) => Some(id),
                Err(_) => {
                    debug!("Connection token carried a malformed subscriber id");
                    None
                }
            },
            Err(e) => {
                debug!("Rejected connection token: {:?}", e);
                None
            }
        }
    }
}
