//! Input sanitization for user-supplied text fields.

/// Strip `<script>` and `</script>` tags (any case) from the input. Applied
/// to titles, descriptions, and comment text before storage.
pub fn sanitize_input(input: &str) -> String {
    const TAGS: [&str; 2] = ["<script>", "</script>"];
    let mut out = String::with_capacity(input.len());
    let bytes = input.as_bytes();
    let mut i = 0;
    'outer: while i < bytes.len() {
        for tag in TAGS {
            let t = tag.as_bytes();
            if bytes.len() - i >= t.len() && bytes[i..i + t.len()].eq_ignore_ascii_case(t) {
                i += t.len();
                continue 'outer;
            }
        }
        let ch = input[i..].chars().next().unwrap();
        out.push(ch);
        i += ch.len_utf8();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_script_tags_any_case() {
        assert_eq!(
            sanitize_input("<script>alert('x')</script>Hello"),
            "alert('x')Hello"
        );
        assert_eq!(sanitize_input("<SCRIPT>x</ScRiPt>"), "x");
    }

    #[test]
    fn leaves_plain_text_alone() {
        assert_eq!(sanitize_input("Retainer Agreement — draft"), "Retainer Agreement — draft");
        assert_eq!(sanitize_input(""), "");
    }

    #[test]
    fn keeps_other_markup() {
        assert_eq!(sanitize_input("<b>bold</b>"), "<b>bold</b>");
    }
}
