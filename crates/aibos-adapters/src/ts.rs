//! TypeScript literal helpers shared by the generators.

use aibos_spec::naming::is_identifier;

/// Escape a string for a single-quoted JavaScript literal.
pub fn escape_string(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('\'', "\\'")
        .replace('\n', "\\n")
}

/// `'value'`
pub fn string_literal(s: &str) -> String {
    format!("'{}'", escape_string(s))
}

/// `['a', 'b']`
pub fn string_array<S: AsRef<str>>(items: &[S]) -> String {
    let items: Vec<String> = items.iter().map(|s| string_literal(s.as_ref())).collect();
    format!("[{}]", items.join(", "))
}

/// Object key, quoted unless it is a plain identifier.
pub fn property_key(key: &str) -> String {
    if is_identifier(key) {
        key.to_string()
    } else {
        string_literal(key)
    }
}

/// `'a' | 'b'`, or `never` for an empty set.
pub fn string_union<'a>(items: impl IntoIterator<Item = &'a str>) -> String {
    let items: Vec<String> = items.into_iter().map(string_literal).collect();
    if items.is_empty() {
        "never".to_string()
    } else {
        items.join(" | ")
    }
}

/// Text safe to place inside a `/* */` block.
pub fn comment_text(s: &str) -> String {
    s.replace("*/", "*\\/")
}

/// JSDoc block indented by `indent`, or nothing when there are no lines.
pub fn doc_comment(lines: &[String], indent: &str) -> String {
    let lines: Vec<String> = lines.iter().map(|line| comment_text(line)).collect();
    match lines.as_slice() {
        [] => String::new(),
        [line] => format!("{indent}/** {line} */\n"),
        lines => {
            let mut out = format!("{indent}/**\n");
            for line in lines {
                out.push_str(&format!("{indent} * {line}\n"));
            }
            out.push_str(&format!("{indent} */\n"));
            out
        }
    }
}
