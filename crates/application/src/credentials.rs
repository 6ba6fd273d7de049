//! Random credentials for newly created accounts.

use zuper_core::{AppError, AppResult};
use zuper_domain::MIN_GENERATED_PASSWORD_LENGTH;

const UPPERCASE: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const LOWERCASE: &[u8] = b"abcdefghijklmnopqrstuvwxyz";
const DIGITS: &[u8] = b"0123456789";
const SYMBOLS: &[u8] = b"!@#$%^&*()-_=+[]{}";
const MAX_ATTEMPTS: usize = 32;

/// Generates a password of at least [`MIN_GENERATED_PASSWORD_LENGTH`] characters
/// containing upper and lower case letters, digits and symbols.
pub fn generate_password(requested_length: usize) -> AppResult<String> {
    let length = requested_length.max(MIN_GENERATED_PASSWORD_LENGTH);
    let alphabet: Vec<u8> = [UPPERCASE, LOWERCASE, DIGITS, SYMBOLS].concat();

    for _ in 0..MAX_ATTEMPTS {
        let candidate = sample(&alphabet, length)?;
        if covers_every_class(&candidate) {
            return String::from_utf8(candidate)
                .map_err(|error| AppError::Internal(format!("generated password: {error}")));
        }
    }

    Err(AppError::Internal(
        "failed to generate a password covering every character class".to_owned(),
    ))
}

fn sample(alphabet: &[u8], length: usize) -> AppResult<Vec<u8>> {
    // Largest multiple of the alphabet size that fits in a byte; bytes above it
    // are discarded so every symbol is equally likely.
    let limit = 256 - (256 % alphabet.len());
    let mut output = Vec::with_capacity(length);
    let mut buffer = [0_u8; 64];

    while output.len() < length {
        getrandom::fill(&mut buffer)
            .map_err(|error| AppError::Internal(format!("random source unavailable: {error}")))?;
        output.extend(
            buffer
                .iter()
                .map(|byte| usize::from(*byte))
                .filter(|byte| *byte < limit)
                .map(|byte| alphabet[byte % alphabet.len()])
                .take(length - output.len()),
        );
    }

    Ok(output)
}

fn covers_every_class(candidate: &[u8]) -> bool {
    [UPPERCASE, LOWERCASE, DIGITS, SYMBOLS]
        .iter()
        .all(|class| candidate.iter().any(|byte| class.contains(byte)))
}
