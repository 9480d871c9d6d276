//! Masking of secret values

const MASK: &str = "****";
/// Shorter secrets are masked entirely.
const MIN_REVEAL_LEN: usize = 8;
const REVEAL_SUFFIX_LEN: usize = 4;

/// Mask a secret for display, keeping only the last few characters of long
/// values so operators can tell keys apart.
pub fn mask_secret(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() < MIN_REVEAL_LEN {
        return MASK.to_string();
    }
    let tail: String = chars[chars.len() - REVEAL_SUFFIX_LEN..].iter().collect();
    format!("{MASK}{tail}")
}
