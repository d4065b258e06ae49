use std::borrow::Cow;
use url::Url;

/// Canonicalizes a URL into the host+path form the vectorizer was fitted on.
///
/// The scheme, query string, and fragment are dropped, and a leading `www.`
/// is stripped from the host. Inputs without a scheme are parsed as if they
/// carried `http://`. This function is total: input that cannot be parsed as
/// a URL at all is returned unchanged, so `normalize(normalize(u)) ==
/// normalize(u)` holds for every string.
pub fn normalize(url: &str) -> String {
    let candidate: Cow<str> = if url.contains("://") {
        Cow::Borrowed(url)
    } else {
        Cow::Owned(format!("http://{url}"))
    };

    match Url::parse(&candidate) {
        Ok(parsed) => {
            let mut host = parsed.host_str().unwrap_or("");
            // Stripped repeatedly so the result is a fixed point.
            while let Some(rest) = host.strip_prefix("www.") {
                host = rest;
            }
            format!("{host}{}", parsed.path())
        }
        Err(_) => url.to_string(),
    }
}

/// Splits a URL into the lexical feature tokens the fitted vectorizer
/// expects. This must stay bit-for-bit identical to the tokenization used
/// when the artifact vocabulary was fitted; fidelity here, not elegance,
/// determines classification accuracy.
///
/// The sequence starts as the slash/dash splits of the input. Every token
/// containing a `.` is additionally decomposed into its dot-fragments with
/// the first `"com"` and the first `"www"` fragment discarded, and the
/// remaining fragments are appended to the end of the sequence. Appended
/// fragments are scanned too, so the decomposition runs to a fixed point.
/// Tokens are not lowercased and not deduplicated; casing and repetition
/// are meaningful features.
pub fn tokenize(url: &str) -> Vec<String> {
    if url.is_empty() {
        return Vec::new();
    }

    let mut tokens: Vec<String> = url.split(['/', '-']).map(str::to_owned).collect();

    // Worklist pass over the growing sequence. Dot-fragments contain no
    // further dots, so every appended token is scanned exactly once and the
    // loop terminates after at most one extra pass.
    let mut idx = 0;
    while idx < tokens.len() {
        if tokens[idx].contains('.') {
            let mut fragments: Vec<String> =
                tokens[idx].split('.').map(str::to_owned).collect();
            if let Some(pos) = fragments.iter().position(|f| f == "com") {
                fragments.remove(pos);
            }
            if let Some(pos) = fragments.iter().position(|f| f == "www") {
                fragments.remove(pos);
            }
            tokens.extend(fragments);
        }
        idx += 1;
    }

    tokens
}

/// Tokens dropped by [`tokenize_simple`]; too common to carry signal.
const STOP_WORDS: [&str; 10] = [
    "www", "com", "net", "org", "io", "co", "uk", "https", "http", "ftp",
];

/// Simplified, case-insensitive tokenization variant.
///
/// Lowercases the URL, strips a leading protocol and any query/fragment
/// suffix, extracts maximal alphanumeric runs, and drops a fixed stop-list.
/// This variant is more robust than [`tokenize`] but is NOT interchangeable
/// with it: classifying against an artifact fitted with [`tokenize`] through
/// this function silently degrades accuracy instead of failing loudly. It is
/// not wired into the shipped pipeline.
pub fn tokenize_simple(url: &str) -> Vec<String> {
    let lowered = url.to_lowercase();
    let stripped = lowered
        .strip_prefix("https://")
        .or_else(|| lowered.strip_prefix("http://"))
        .or_else(|| lowered.strip_prefix("ftp://"))
        .unwrap_or(&lowered);
    let stripped = match stripped.find(['?', '#']) {
        Some(pos) => &stripped[..pos],
        None => stripped,
    };

    stripped
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|t| !t.is_empty() && !STOP_WORDS.contains(t))
        .map(str::to_owned)
        .collect()
}
