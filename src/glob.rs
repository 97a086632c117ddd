use regex::Regex;

/// Match a window name against a glob pattern.
///
/// `*` matches any run of characters (including none) and `?` matches exactly
/// one character. Every other character is literal. The match is anchored and
/// case-sensitive. If the pattern cannot be compiled it is compared literally.
pub fn matches(name: &str, pattern: &str) -> bool {
    match compile(pattern) {
        Ok(re) => re.is_match(name),
        Err(err) => {
            tracing::debug!(pattern, %err, "glob did not compile, comparing literally");
            name == pattern
        }
    }
}

fn compile(pattern: &str) -> Result<Regex, regex::Error> {
    let mut source = String::with_capacity(pattern.len() + 8);
    source.push_str("(?s)^");

    let mut literal = String::new();
    for c in pattern.chars() {
        match c {
            '*' | '?' => {
                source.push_str(&regex::escape(&literal));
                literal.clear();
                source.push_str(if c == '*' { ".*" } else { "." });
            }
            _ => literal.push(c),
        }
    }
    source.push_str(&regex::escape(&literal));
    source.push('$');

    Regex::new(&source)
}
