//! Token generation
//!
//! Labels become search tokens in three steps: lowercase, escape every
//! character outside `[a-z0-9]` as `_xx` (two hex digits), append a `_N`
//! sequence number assigned over the whole sorted index. `Log.cpp` with
//! sequence 331 becomes `log_2ecpp_331`; `log_env_distances` becomes
//! `log_5fenv_5fdistances_<N>` because literal underscores are escaped too.

/// Lowercase and hex-escape a label into a token base (no sequence suffix).
pub fn escape_label(label: &str) -> String {
    let mut base = String::with_capacity(label.len());
    for ch in label.chars().flat_map(|c| c.to_lowercase()) {
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() {
            base.push(ch);
        } else {
            let mut buf = [0u8; 4];
            for byte in ch.encode_utf8(&mut buf).bytes() {
                base.push('_');
                base.push_str(&format!("{:02x}", byte));
            }
        }
    }
    base
}

/// Attach the global sequence number to a token base.
pub fn with_sequence(base: &str, seq: usize) -> String {
    format!("{}_{}", base, seq)
}

/// Strip the trailing `_<digits>` sequence group from a token. A literal
/// underscore in the label is escaped to `_5f`, so for every token that
/// carries a suffix the final group is that suffix. One ambiguity remains:
/// a suffix-less token whose base ends in an all-digit hex escape (`_28`
/// from `(`) reads as if it carried one, so such escapes are stripped too.
pub fn strip_sequence(token: &str) -> &str {
    match token.rfind('_') {
        Some(pos) if pos + 1 < token.len() && token[pos + 1..].bytes().all(|b| b.is_ascii_digit()) => {
            &token[..pos]
        }
        _ => token,
    }
}

/// Whether a string is a well-formed token: non-empty and built only from
/// lowercase ASCII, digits and underscores.
pub fn is_well_formed(token: &str) -> bool {
    !token.is_empty()
        && token
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'_')
}

/// Whether a token still carries its sequence suffix.
pub fn has_sequence(token: &str) -> bool {
    strip_sequence(token).len() < token.len()
}
