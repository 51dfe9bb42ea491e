/// Authorization decisions. Pure functions over already-extracted
/// credentials and already-loaded records; no I/O happens here.
use crate::{
    auth::token::AccessTokenCodec,
    config::DEV_PLATFORM,
    db::Chirp,
};
use thiserror::Error;
use uuid::Uuid;

/// Webhook event that grants the premium flag
pub const USER_UPGRADED_EVENT: &str = "user.upgraded";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Denial {
    #[error("{0}")]
    Unauthorized(&'static str),

    #[error("{0}")]
    Forbidden(&'static str),

    #[error("{0}")]
    NotFound(&'static str),
}

/// What a webhook event asks of us
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WebhookAction {
    UpgradeUser,
    Ignore,
}

/// Resolve the acting user from an access token. The subject comes from the
/// token only, never from a request body.
pub fn resolve_actor(codec: &AccessTokenCodec, access_token: &str) -> Result<Uuid, Denial> {
    codec.verify(access_token).map_err(|e| {
        tracing::debug!(error = %e, "access token rejected");
        Denial::Unauthorized("Couldn't validate token")
    })
}

/// Only the owner may delete a chirp; a missing chirp is reported first
pub fn authorize_chirp_deletion(actor: Uuid, chirp: Option<&Chirp>) -> Result<(), Denial> {
    let chirp = chirp.ok_or(Denial::NotFound("Chirp not found"))?;

    if chirp.user_id != actor {
        return Err(Denial::Forbidden("You can't delete this chirp"));
    }

    Ok(())
}

/// Reset is only ever allowed on a dev deployment
pub fn authorize_admin_reset(platform: &str) -> Result<(), Denial> {
    if platform != DEV_PLATFORM {
        return Err(Denial::Forbidden("Reset is only allowed in dev environment"));
    }

    Ok(())
}

/// The presented API key must match the shared webhook secret exactly
pub fn authorize_webhook(presented: Option<&str>, expected: &str) -> Result<(), Denial> {
    match presented {
        Some(key) if constant_time_eq(key.as_bytes(), expected.as_bytes()) => Ok(()),
        _ => Err(Denial::Unauthorized("Invalid API key")),
    }
}

/// Unknown events are acknowledged and ignored
pub fn classify_webhook_event(event: &str) -> WebhookAction {
    if event == USER_UPGRADED_EVENT {
        WebhookAction::UpgradeUser
    } else {
        WebhookAction::Ignore
    }
}

/// Constant-time byte slice comparison; only the length may short-circuit
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    a.iter().zip(b.iter()).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::token::ACCESS_TOKEN_TTL;
    use chrono::Utc;

    fn chirp_owned_by(user_id: Uuid) -> Chirp {
        Chirp {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
            body: "hello".to_string(),
            user_id,
        }
    }

    #[test]
    fn test_resolve_actor() {
        let codec = AccessTokenCodec::new("secret");
        let id = Uuid::new_v4();
        let token = codec.mint(id, ACCESS_TOKEN_TTL).unwrap();

        assert_eq!(resolve_actor(&codec, &token), Ok(id));
        assert!(matches!(
            resolve_actor(&AccessTokenCodec::new("other"), &token),
            Err(Denial::Unauthorized(_))
        ));
        assert!(matches!(resolve_actor(&codec, "junk"), Err(Denial::Unauthorized(_))));
    }

    #[test]
    fn test_owner_may_delete() {
        let owner = Uuid::new_v4();
        let chirp = chirp_owned_by(owner);
        assert_eq!(authorize_chirp_deletion(owner, Some(&chirp)), Ok(()));
    }

    #[test]
    fn test_non_owner_is_forbidden() {
        let chirp = chirp_owned_by(Uuid::new_v4());
        assert!(matches!(
            authorize_chirp_deletion(Uuid::new_v4(), Some(&chirp)),
            Err(Denial::Forbidden(_))
        ));
    }

    #[test]
    fn test_missing_chirp_is_not_found() {
        assert!(matches!(
            authorize_chirp_deletion(Uuid::new_v4(), None),
            Err(Denial::NotFound(_))
        ));
    }

    #[test]
    fn test_admin_reset_only_on_dev() {
        assert_eq!(authorize_admin_reset("dev"), Ok(()));
        assert!(authorize_admin_reset("prod").is_err());
        assert!(authorize_admin_reset("Dev").is_err());
        assert!(authorize_admin_reset("").is_err());
    }

    #[test]
    fn test_webhook_key() {
        assert_eq!(authorize_webhook(Some("abc123"), "abc123"), Ok(()));
        assert!(authorize_webhook(Some("abc124"), "abc123").is_err());
        assert!(authorize_webhook(Some("abc"), "abc123").is_err());
        assert!(authorize_webhook(None, "abc123").is_err());
    }

    #[test]
    fn test_classify_webhook_event() {
        assert_eq!(classify_webhook_event("user.upgraded"), WebhookAction::UpgradeUser);
        assert_eq!(classify_webhook_event("user.downgraded"), WebhookAction::Ignore);
        assert_eq!(classify_webhook_event("USER.UPGRADED"), WebhookAction::Ignore);
    }

    #[test]
    fn test_constant_time_eq() {
        assert!(constant_time_eq(b"", b""));
        assert!(constant_time_eq(b"abc", b"abc"));
        assert!(!constant_time_eq(b"abc", b"abd"));
        assert!(!constant_time_eq(b"abc", b"abcd"));
    }
}
