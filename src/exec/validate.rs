/// Substrings whose presence rejects a snippet before launch, checked
/// case-insensitively in this order.
///
/// This filter is purely lexical. It deters the obvious dangerous
/// constructs but is bypassable through string concatenation, attribute
/// indirection, or alternate spellings. The process boundary, not this
/// list, is what actually contains the snippet.
pub const DENIED_TOKENS: [&str; 12] = [
    "import os",
    "import subprocess",
    "import sys",
    "os.system",
    "subprocess.",
    "exec(",
    "eval(",
    "__import__",
    "open(",
    "file(",
    "input(",
    "raw_input(",
];

/// Why a request was rejected before any process was spawned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectionReason {
    /// The `code` field was absent or not a string
    MissingCode,
    /// The code was empty after trimming surrounding whitespace
    EmptyCode,
    /// The code contained a deny-listed token
    DeniedToken(&'static str),
}

impl RejectionReason {
    /// Message reported to the client. Never echoes the matched token.
    pub fn public_message(&self) -> &'static str {
        match self {
            RejectionReason::MissingCode => "code is required",
            RejectionReason::EmptyCode => "code cannot be empty",
            RejectionReason::DeniedToken(_) => {
                "code contains commands not permitted for security reasons"
            }
        }
    }
}

/// Normalize and screen a raw snippet.
///
/// Returns the trimmed code unchanged on acceptance; the code is passed
/// downstream as opaque text, with no escaping or quoting applied.
pub fn validate(raw: Option<&str>) -> Result<String, RejectionReason> {
    let code = raw.ok_or(RejectionReason::MissingCode)?.trim();

    if code.is_empty() {
        return Err(RejectionReason::EmptyCode);
    }

    let lowered = code.to_lowercase();
    for token in DENIED_TOKENS {
        if lowered.contains(token) {
            return Err(RejectionReason::DeniedToken(token));
        }
    }

    Ok(code.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_code_trimmed() {
        let code = validate(Some("  print('hello')\n")).unwrap();
        assert_eq!(code, "print('hello')");
    }

    #[test]
    fn missing_code_is_rejected() {
        assert_eq!(validate(None), Err(RejectionReason::MissingCode));
    }

    #[test]
    fn whitespace_only_code_is_empty() {
        assert_eq!(validate(Some("   \n\t  ")), Err(RejectionReason::EmptyCode));
        assert_eq!(validate(Some("")), Err(RejectionReason::EmptyCode));
    }

    #[test]
    fn denied_tokens_are_rejected() {
        for token in DENIED_TOKENS {
            let code = format!("x = 1\n{}", token);
            assert_eq!(
                validate(Some(&code)),
                Err(RejectionReason::DeniedToken(token)),
                "token {:?} should be rejected",
                token
            );
        }
    }

    #[test]
    fn deny_list_is_case_insensitive() {
        assert_eq!(
            validate(Some("IMPORT OS")),
            Err(RejectionReason::DeniedToken("import os"))
        );
        assert_eq!(
            validate(Some("Eval(x)")),
            Err(RejectionReason::DeniedToken("eval("))
        );
    }

    #[test]
    fn first_matching_token_wins() {
        // Both "os.system" and "eval(" are present; "os.system" comes
        // first in the list.
        assert_eq!(
            validate(Some("eval(os.system('ls'))")),
            Err(RejectionReason::DeniedToken("os.system"))
        );
    }

    #[test]
    fn token_anywhere_in_code_is_rejected() {
        assert_eq!(
            validate(Some("print('hi')\nimport subprocess\nprint('bye')")),
            Err(RejectionReason::DeniedToken("import subprocess"))
        );
    }

    #[test]
    fn near_miss_spellings_pass_the_filter() {
        // The filter is lexical and does not catch obfuscated forms.
        assert!(validate(Some("getattr(o, 's' + 'ystem')")).is_ok());
        assert!(validate(Some("print('benign')")).is_ok());
    }

    #[test]
    fn public_messages() {
        assert_eq!(RejectionReason::MissingCode.public_message(), "code is required");
        assert_eq!(RejectionReason::EmptyCode.public_message(), "code cannot be empty");
        assert_eq!(
            RejectionReason::DeniedToken("exec(").public_message(),
            "code contains commands not permitted for security reasons"
        );
    }
}
