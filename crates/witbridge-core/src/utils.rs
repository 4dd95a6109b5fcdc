/// Convert PascalCase, camelCase, snake_case or dotted names to kebab-case.
///
/// Runs of uppercase letters are treated as one word, so acronyms stay together.
///
/// # Examples
/// ```
/// use witbridge_core::utils::to_kebab_case;
/// assert_eq!(to_kebab_case("FooBar"), "foo-bar");
/// assert_eq!(to_kebab_case("fooBar"), "foo-bar");
/// assert_eq!(to_kebab_case("HTTPServer"), "http-server");
/// assert_eq!(to_kebab_case("foo_bar"), "foo-bar");
/// ```
pub fn to_kebab_case(s: &str) -> String {
    fn is_separator(c: char) -> bool {
        matches!(c, '_' | '-' | '.' | ' ')
    }

    let chars: Vec<char> = s.chars().collect();
    let mut result = String::with_capacity(s.len() + 4);
    for (i, &c) in chars.iter().enumerate() {
        if is_separator(c) {
            if !result.is_empty() && !result.ends_with('-') {
                result.push('-');
            }
            continue;
        }
        if c.is_ascii_uppercase() && i > 0 {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_ascii_lowercase());
            let boundary = prev.is_ascii_lowercase()
                || prev.is_ascii_digit()
                || (prev.is_ascii_uppercase() && next_is_lower);
            if boundary && !result.is_empty() && !result.ends_with('-') {
                result.push('-');
            }
        }
        result.push(c.to_ascii_lowercase());
    }
    while result.ends_with('-') {
        result.pop();
    }
    result
}

/// Generated name for the `index`-th case of a plain variant.
///
/// Named unions derive case names from their own name; anonymous unions fall back to
/// ordinal names.
///
/// # Examples
/// ```
/// use witbridge_core::utils::variant_case_name;
/// assert_eq!(variant_case_name(Some("StringOrNumber"), 1), "string-or-number1");
/// assert_eq!(variant_case_name(None, 0), "case0");
/// ```
pub fn variant_case_name(union_name: Option<&str>, index: usize) -> String {
    match union_name {
        Some(name) => format!("{}{index}", to_kebab_case(name)),
        None => format!("case{index}"),
    }
}

/// Render a host number the way the host prints it (`1`, not `1.0`).
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{n}")
    }
}
