use std::borrow::Cow;
use url::Url;

/// Maximum length of a derived file name, in characters
const MAX_FILE_NAME_CHARS: usize = 100;

/// Derive a file name from the last `/`-delimited segment of a URL path.
///
/// The segment is percent-decoded and sanitized. Query string and fragment
/// never contribute. Falls back to `fallback` when nothing usable remains.
pub fn file_name_from_url(url: &str, fallback: &str) -> String {
    let segment = match Url::parse(url) {
        Ok(parsed) => parsed
            .path_segments()
            .and_then(|mut segments| segments.next_back())
            .map(str::to_string),
        // Not expected for resolved URLs; fall back to the raw string
        Err(_) => url
            .split(['?', '#'])
            .next()
            .and_then(|path| path.rsplit('/').next())
            .map(str::to_string),
    };

    let Some(segment) = segment.filter(|s| !s.is_empty()) else {
        return fallback.to_string();
    };

    let decoded = urlencoding::decode(&segment).unwrap_or(Cow::Borrowed(segment.as_str()));
    let name = sanitize_filename(&decoded);

    if name.trim_matches(['_', '.', ' ']).is_empty() {
        fallback.to_string()
    } else {
        name
    }
}

/// Convert a string to a sanitized filename
pub fn sanitize_filename(name: &str) -> String {
    // Replace path separators and characters most filesystems reject
    let name: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    // Limit filename length, keeping the extension
    if name.chars().count() > MAX_FILE_NAME_CHARS {
        let (stem, ext) = split_extension(&name);
        let keep = MAX_FILE_NAME_CHARS.saturating_sub(ext.chars().count());
        format!("{}{}", stem.chars().take(keep).collect::<String>(), ext)
    } else {
        name
    }
}

/// Split a file name into stem and extension (including the dot)
pub fn split_extension(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(pos) if pos > 0 => (&name[..pos], &name[pos..]),
        _ => (name, ""),
    }
}

/// Produce `name`, or `name` with a numeric suffix, that `is_taken` rejects.
///
/// Example: `a.png`, then `a_1.png`, `a_2.png`, ...
pub fn unique_name(name: &str, mut is_taken: impl FnMut(&str) -> bool) -> String {
    if !is_taken(name) {
        return name.to_string();
    }

    let (stem, ext) = split_extension(name);
    let mut counter = 1usize;
    loop {
        let candidate = format!("{}_{}{}", stem, counter, ext);
        if !is_taken(&candidate) {
            return candidate;
        }
        counter += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_last_segment() {
        assert_eq!(
            file_name_from_url("https://site.com/img/a.png", "image.jpg"),
            "a.png"
        );
        assert_eq!(
            file_name_from_url("https://site.com/img/a.png?w=200#x", "image.jpg"),
            "a.png"
        );
    }

    #[test]
    fn test_percent_decoding() {
        assert_eq!(
            file_name_from_url("https://site.com/my%20photo.jpg", "image.jpg"),
            "my photo.jpg"
        );
        // Encoded separators must not survive as separators
        assert_eq!(
            file_name_from_url("https://site.com/a%2Fb.png", "image.jpg"),
            "a_b.png"
        );
    }

    #[test]
    fn test_fallback_on_empty_segment() {
        assert_eq!(file_name_from_url("https://site.com/", "image.jpg"), "image.jpg");
        assert_eq!(file_name_from_url("https://site.com", "image.jpg"), "image.jpg");
        assert_eq!(
            file_name_from_url("https://site.com/gallery/", "image.jpg"),
            "image.jpg"
        );
        assert_eq!(file_name_from_url("https://site.com/..%2F", "image.jpg"), "image.jpg");
    }

    #[test]
    fn test_long_names_keep_extension() {
        let long = format!("https://site.com/{}.jpeg", "x".repeat(300));
        let name = file_name_from_url(&long, "image.jpg");
        assert_eq!(name.chars().count(), MAX_FILE_NAME_CHARS);
        assert!(name.ends_with(".jpeg"));
    }

    #[test]
    fn test_unique_name() {
        let mut taken = HashSet::new();
        for expected in ["a.png", "a_1.png", "a_2.png"] {
            let name = unique_name("a.png", |n| taken.contains(n));
            assert_eq!(name, expected);
            taken.insert(name);
        }

        let name = unique_name("README", |n| n == "README");
        assert_eq!(name, "README_1");
    }

    #[test]
    fn test_split_extension() {
        assert_eq!(split_extension("a.tar.gz"), ("a.tar", ".gz"));
        assert_eq!(split_extension(".hidden"), (".hidden", ""));
        assert_eq!(split_extension("plain"), ("plain", ""));
    }
}
