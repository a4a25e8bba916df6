// Review text normalization applied before sentence segmentation.

const EMOTICONS: [&str; 3] = [":o)", ":-)", ";-)"];

/// Collapses runs of dots, lowercases, blanks out emoticons and turns
/// underscores and hyphens into spaces.
pub fn normalize_review_text(raw: &str) -> String {
    let mut collapsed = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '.' && chars.peek() == Some(&'.') {
            continue;
        }
        collapsed.push(c);
    }

    let mut text = collapsed.to_lowercase();
    for emoticon in EMOTICONS {
        text = text.replace(emoticon, " ");
    }
    text.replace(|c: char| c == '_' || c == '-', " ")
}
