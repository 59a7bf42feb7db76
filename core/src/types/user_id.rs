use nutype::nutype;

pub const MAX_USER_ID_LENGTH: usize = 64;

/// A single-token, case-normalized user identifier.
#[nutype(
    sanitize(trim, lowercase),
    validate(
        not_empty,
        len_char_max = MAX_USER_ID_LENGTH,
        predicate = |s: &str| !s.chars().any(char::is_whitespace)
    ),
    derive(
        Debug,
        Clone,
        PartialEq,
        Eq,
        PartialOrd,
        Ord,
        AsRef,
        Deref,
        TryFrom,
        Into,
        Hash,
        Display,
        Serialize,
        Deserialize,
    )
)]
pub struct UserId(String);
