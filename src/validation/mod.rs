/// Chirp body validation and cleanup
use crate::error::{ChirpError, ChirpResult};
use validator::{Validate, ValidationErrors};

/// Words replaced with the mask when a chirp is shown
pub const PROFANE_WORDS: [&str; 3] = ["kerfuffle", "sharbert", "fornax"];

const PROFANITY_MASK: &str = "****";

/// Replace profane words with a mask.
///
/// Words are split on single spaces and matched case-insensitively. A word
/// with punctuation attached ("sharbert!") is left alone.
pub fn censor_profanity(body: &str) -> String {
    body.split(' ')
        .map(|word| {
            let lowered = word.to_lowercase();
            if PROFANE_WORDS.contains(&lowered.as_str()) {
                PROFANITY_MASK
            } else {
                word
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Run derive-based validation, reporting the first failure as a 400
pub fn validate_request<T: Validate>(request: &T) -> ChirpResult<()> {
    request
        .validate()
        .map_err(|errors| ChirpError::Validation(first_message(&errors)))
}

fn first_message(errors: &ValidationErrors) -> String {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by_key(|(field, _)| *field);

    fields
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |err| match &err.message {
                Some(message) => message.to_string(),
                None => format!("Invalid {}", field),
            })
        })
        .next()
        .unwrap_or_else(|| "Invalid request".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[test]
    fn test_censor_profanity() {
        assert_eq!(
            censor_profanity("I had something interesting for breakfast"),
            "I had something interesting for breakfast"
        );
        assert_eq!(
            censor_profanity("I hear Mastodon is better than Chirpy. sharbert I need to migrate"),
            "I hear Mastodon is better than Chirpy. **** I need to migrate"
        );
        assert_eq!(
            censor_profanity("I really need a kerfuffle to go to bed sooner, Fornax !"),
            "I really need a **** to go to bed sooner, **** !"
        );
    }

    #[test]
    fn test_punctuation_is_not_stripped() {
        assert_eq!(censor_profanity("Sharbert!"), "Sharbert!");
        assert_eq!(censor_profanity("KERFUFFLE"), "****");
    }

    #[test]
    fn test_whitespace_is_preserved() {
        assert_eq!(censor_profanity("a  fornax"), "a  ****");
        assert_eq!(censor_profanity(""), "");
    }

    #[derive(Validate)]
    struct Body {
        #[validate(length(max = 140, message = "Chirp is too long"))]
        body: String,
    }

    #[test]
    fn test_validate_request_message() {
        let ok = Body { body: "x".repeat(140) };
        assert!(validate_request(&ok).is_ok());

        let long = Body { body: "x".repeat(141) };
        match validate_request(&long) {
            Err(ChirpError::Validation(msg)) => assert_eq!(msg, "Chirp is too long"),
            other => panic!("expected validation error, got {:?}", other),
        }
    }
}
