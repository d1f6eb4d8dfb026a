//! Message translation
//!
//! User-facing strings go through a [`Translator`]. Placeholders are `%1`,
//! `%2`, ... and are substituted after lookup.

/// Locale-aware message lookup
pub trait Translator: Send + Sync {
    /// Translate `msgid` without substitution
    fn lookup(&self, msgid: &str) -> String;

    /// Translate `msgid` and fill `%n` placeholders from `args`
    fn gettext(&self, msgid: &str, args: &[&str]) -> String {
        substitute(&self.lookup(msgid), args)
    }
}

/// Identity translator
#[derive(Debug, Clone, Copy, Default)]
pub struct NullTranslator;

impl Translator for NullTranslator {
    fn lookup(&self, msgid: &str) -> String {
        msgid.to_string()
    }
}

/// Replace `%1`..`%n` with `args`; unmatched placeholders are left as-is
#[must_use]
pub fn substitute(template: &str, args: &[&str]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }

        let mut digits = String::new();
        while let Some(d) = chars.peek().copied().filter(char::is_ascii_digit) {
            digits.push(d);
            chars.next();
        }

        match digits.parse::<usize>().ok().and_then(|n| n.checked_sub(1)) {
            Some(idx) if idx < args.len() => out.push_str(args[idx]),
            _ => {
                out.push('%');
                out.push_str(&digits);
            }
        }
    }

    out
}
