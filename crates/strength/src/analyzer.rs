use crate::types::{Analysis, Pattern, Strength, StrengthLevel};

/// Characters counted as symbols.
pub const SYMBOLS: &str = "!@#$%^&*()_+-=[]{};':\"\\|,.<>/?";

/// Matched case-insensitively as substrings.
pub const COMMON_PASSWORDS: [&str; 12] = [
    "password",
    "123456",
    "password123",
    "admin",
    "qwerty",
    "letmein",
    "welcome",
    "monkey",
    "1234567890",
    "abc123",
    "password1",
    "iloveyou",
];

const LOWERCASE_POOL: u32 = 26;
const UPPERCASE_POOL: u32 = 26;
const DIGIT_POOL: u32 = 10;
const SYMBOL_POOL: u32 = 32;

const LENGTH_BONUS_AT_8: i32 = 25;
const LENGTH_BONUS_AT_12: i32 = 25;
const MIXED_CASE_BONUS: i32 = 20;
const DIGIT_BONUS: i32 = 15;
const SYMBOL_BONUS: i32 = 15;

const REPEATED_PENALTY: i32 = 15;
const SEQUENTIAL_PENALTY: i32 = 10;
const DICTIONARY_PENALTY: i32 = 25;
const PATTERN_PENALTY: i32 = 5;

/// Score a password.
pub fn analyze(password: &str) -> Analysis {
    let chars: Vec<char> = password.chars().collect();
    let length = chars.len();

    let has_lowercase = chars.iter().any(|c| c.is_ascii_lowercase());
    let has_uppercase = chars.iter().any(|c| c.is_ascii_uppercase());
    let has_digits = chars.iter().any(|c| c.is_ascii_digit());
    let has_symbols = chars.iter().any(|c| SYMBOLS.contains(*c));

    let has_repeated_chars = chars.windows(3).any(|w| w[0] == w[1] && w[1] == w[2]);
    let has_sequential_chars = has_sequential_run(&chars);

    let lowered = password.to_lowercase();
    let is_dictionary_word = COMMON_PASSWORDS.iter().any(|common| lowered.contains(common));

    let patterns = detect_patterns(&chars);

    let charset = charset_size(has_lowercase, has_uppercase, has_digits, has_symbols);
    let entropy_bits = entropy_bits(length, charset);

    let mut score: i32 = 0;
    if length >= 8 {
        score += LENGTH_BONUS_AT_8;
    }
    if length >= 12 {
        score += LENGTH_BONUS_AT_12;
    }
    if has_lowercase && has_uppercase {
        score += MIXED_CASE_BONUS;
    }
    if has_digits {
        score += DIGIT_BONUS;
    }
    if has_symbols {
        score += SYMBOL_BONUS;
    }

    if has_repeated_chars {
        score -= REPEATED_PENALTY;
    }
    if has_sequential_chars {
        score -= SEQUENTIAL_PENALTY;
    }
    if is_dictionary_word {
        score -= DICTIONARY_PENALTY;
    }
    score -= PATTERN_PENALTY * patterns.len() as i32;

    let score = score.clamp(0, 100) as u8;
    let level = StrengthLevel::from_score(score);

    Analysis {
        length,
        has_lowercase,
        has_uppercase,
        has_digits,
        has_symbols,
        has_repeated_chars,
        has_sequential_chars,
        is_dictionary_word,
        patterns,
        strength: Strength {
            score,
            level,
            crack_time: level.crack_time(),
            entropy_bits,
        },
    }
}

/// Size of the character pool implied by the classes present.
pub fn charset_size(lowercase: bool, uppercase: bool, digits: bool, symbols: bool) -> u32 {
    let mut size = 0;
    if lowercase {
        size += LOWERCASE_POOL;
    }
    if uppercase {
        size += UPPERCASE_POOL;
    }
    if digits {
        size += DIGIT_POOL;
    }
    if symbols {
        size += SYMBOL_POOL;
    }
    size
}

fn entropy_bits(length: usize, charset: u32) -> f64 {
    if charset == 0 || length == 0 {
        return 0.0;
    }
    let bits = length as f64 * f64::from(charset).log2();
    (bits * 10.0).round() / 10.0
}

// abc..xyz or 012..789, three long, case-insensitive
fn has_sequential_run(chars: &[char]) -> bool {
    chars.windows(3).any(|w| {
        let w: Vec<char> = w.iter().map(|c| c.to_ascii_lowercase()).collect();
        is_forward_run(&w, |c| c.is_ascii_lowercase()) || is_forward_run(&w, |c| c.is_ascii_digit())
    })
}

fn is_forward_run(window: &[char], class: impl Fn(char) -> bool) -> bool {
    window.iter().all(|c| class(*c)) && window.windows(2).all(|p| p[1] as u32 == p[0] as u32 + 1)
}

fn detect_patterns(chars: &[char]) -> Vec<Pattern> {
    let mut patterns = Vec::new();
    if chars.is_empty() {
        return patterns;
    }

    if chars.iter().all(|c| c.is_ascii_alphabetic()) {
        patterns.push(Pattern::OnlyLetters);
    }
    if chars.iter().all(|c| c.is_ascii_digit()) {
        patterns.push(Pattern::OnlyDigits);
    }
    if chars.len() >= 2 && chars.iter().all(|c| *c == chars[0]) {
        patterns.push(Pattern::RepeatedCharacter);
    }
    if chars.windows(4).any(|w| w.iter().all(|c| c.is_ascii_digit())) {
        patterns.push(Pattern::FourDigitSequence);
    }
    if chars.windows(4).any(is_year) {
        patterns.push(Pattern::ContainsYear);
    }
    patterns
}

fn is_year(w: &[char]) -> bool {
    let century = matches!((w[0], w[1]), ('1', '9') | ('2', '0'));
    century && w[2].is_ascii_digit() && w[3].is_ascii_digit()
}
