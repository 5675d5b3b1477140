//! Invite codes and organization slugs.

use rand::{seq::IndexedRandom, Rng};

pub const INVITE_PREFIX: &str = "GR-";
const INVITE_LEN: usize = 6;
const INVITE_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

pub fn generate_invite_code() -> String {
    generate_invite_code_with(&mut rand::rng())
}

pub fn generate_invite_code_with<R: Rng + ?Sized>(rng: &mut R) -> String {
    let mut code = String::with_capacity(INVITE_PREFIX.len() + INVITE_LEN);
    code.push_str(INVITE_PREFIX);
    for _ in 0..INVITE_LEN {
        // the charset is never empty
        if let Some(&c) = INVITE_CHARSET.choose(rng) {
            code.push(c as char);
        }
    }
    code
}

/// Draws codes until `is_taken` rejects none of them.
pub fn generate_unique_invite_code(is_taken: impl Fn(&str) -> bool) -> String {
    let mut rng = rand::rng();
    loop {
        let code = generate_invite_code_with(&mut rng);
        if !is_taken(&code) {
            return code;
        }
    }
}

/// Codes are compared upper-cased with surrounding whitespace dropped.
pub fn normalize_invite_code(code: &str) -> String {
    code.trim().to_uppercase()
}

pub fn is_well_formed_invite_code(code: &str) -> bool {
    let code = normalize_invite_code(code);
    let Some(rest) = code.strip_prefix(INVITE_PREFIX) else {
        return false;
    };
    rest.len() == INVITE_LEN && rest.bytes().all(|b| INVITE_CHARSET.contains(&b))
}

/// Lower-cases a requested slug and replaces anything outside `[a-z0-9-]`.
pub fn slugify(requested: &str) -> String {
    requested
        .trim()
        .chars()
        .flat_map(char::to_lowercase)
        .map(|c| match c {
            'a'..='z' | '0'..='9' | '-' => c,
            _ => '-',
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    #[test]
    fn generated_codes_are_well_formed() {
        for _ in 0..64 {
            let code = generate_invite_code();
            assert!(is_well_formed_invite_code(&code), "{code}");
        }
    }

    #[test]
    fn lowercase_codes_normalize() {
        assert_eq!(normalize_invite_code(" gr-ab12cd "), "GR-AB12CD");
        assert!(is_well_formed_invite_code("gr-ab12cd"));
        assert!(!is_well_formed_invite_code("GR-AB12C"));
        assert!(!is_well_formed_invite_code("XX-AB12CD"));
    }

    #[test]
    fn unique_generation_skips_taken_codes() {
        let calls = Cell::new(0);
        let code = generate_unique_invite_code(|_| {
            calls.set(calls.get() + 1);
            calls.get() < 3
        });
        assert_eq!(calls.get(), 3);
        assert!(is_well_formed_invite_code(&code));
    }

    #[test]
    fn slugify_replaces_disallowed_chars() {
        assert_eq!(slugify("Tech Startup!"), "tech-startup-");
        assert_eq!(slugify("design-community"), "design-community");
    }
}
