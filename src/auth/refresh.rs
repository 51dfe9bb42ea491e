/// Opaque refresh token minting
use rand::{rngs::OsRng, RngCore};
use thiserror::Error;

/// Random bytes behind each refresh token
pub const REFRESH_TOKEN_BYTES: usize = 32;

#[derive(Debug, Error)]
#[error("Entropy source failure: {0}")]
pub struct EntropyError(String);

/// Mint a refresh token: 32 OS-random bytes as 64 lowercase hex characters
pub fn mint_refresh_token() -> Result<String, EntropyError> {
    let mut bytes = [0u8; REFRESH_TOKEN_BYTES];
    OsRng
        .try_fill_bytes(&mut bytes)
        .map_err(|e| EntropyError(e.to_string()))?;

    Ok(hex::encode(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_token_shape() {
        let token = mint_refresh_token().unwrap();
        assert_eq!(token.len(), 64);
        assert!(token.chars().all(|c| matches!(c, '0'..='9' | 'a'..='f')));
    }

    #[test]
    fn test_tokens_do_not_collide() {
        let tokens: HashSet<String> = (0..1000).map(|_| mint_refresh_token().unwrap()).collect();
        assert_eq!(tokens.len(), 1000);
    }
}
