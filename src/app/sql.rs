//! Textual classification of SQL statements.
//!
//! The harness never parses SQL properly; it only needs two facts about a
//! statement: whether it is a single read-only query, and whether it carries
//! a top-level ORDER BY. Both are answered by scanning for words at nesting
//! depth zero, outside string literals and comments.

struct TopLevelScan {
    /// Lowercased words found at paren depth zero
    words: Vec<String>,
    /// A second statement follows a top-level semicolon
    multiple_statements: bool,
}

fn scan_top_level(query: &str) -> TopLevelScan {
    let lower = query.trim().to_lowercase();
    let chars: Vec<char> = lower.chars().collect();
    let len = chars.len();

    let mut words = Vec::new();
    let mut current = String::new();
    let mut multiple_statements = false;
    let mut depth: i32 = 0;
    let mut in_string = false;
    let mut i = 0;

    fn flush(current: &mut String, words: &mut Vec<String>) {
        if !current.is_empty() {
            words.push(std::mem::take(current));
        }
    }

    while i < len {
        let c = chars[i];

        // -- line comments
        if !in_string && c == '-' && i + 1 < len && chars[i + 1] == '-' {
            flush(&mut current, &mut words);
            while i < len && chars[i] != '\n' {
                i += 1;
            }
            continue;
        }

        // /* block comments */
        if !in_string && c == '/' && i + 1 < len && chars[i + 1] == '*' {
            flush(&mut current, &mut words);
            i += 2;
            while i + 1 < len && !(chars[i] == '*' && chars[i + 1] == '/') {
                i += 1;
            }
            i += 2;
            continue;
        }

        // String literals, with '' as the escaped quote
        if c == '\'' {
            flush(&mut current, &mut words);
            if in_string {
                if i + 1 < len && chars[i + 1] == '\'' {
                    i += 2;
                    continue;
                }
                in_string = false;
            } else {
                in_string = true;
            }
            i += 1;
            continue;
        }

        if in_string {
            i += 1;
            continue;
        }

        if c == '(' {
            flush(&mut current, &mut words);
            depth += 1;
            i += 1;
            continue;
        }
        if c == ')' {
            flush(&mut current, &mut words);
            depth -= 1;
            i += 1;
            continue;
        }

        // A top-level semicolon ends the statement; anything after it
        // (besides whitespace) is a second statement.
        if depth == 0 && c == ';' {
            flush(&mut current, &mut words);
            if chars[i + 1..].iter().any(|ch| !ch.is_whitespace()) {
                multiple_statements = true;
            }
            break;
        }

        if depth == 0 && (c.is_alphanumeric() || c == '_') {
            current.push(c);
        } else {
            flush(&mut current, &mut words);
        }

        i += 1;
    }
    flush(&mut current, &mut words);

    TopLevelScan {
        words,
        multiple_statements,
    }
}

/// Whether the statement is a single read-only query.
///
/// PostgreSQL allows DML inside CTEs (`WITH ... UPDATE`), so checking the
/// first verb is not enough; every top-level verb is inspected. Multiple
/// statements and `SELECT INTO` (which creates a table) are rejected.
pub fn is_read_only(query: &str) -> bool {
    let scan = scan_top_level(query);
    if scan.multiple_statements {
        return false;
    }

    let mut found_select = false;
    for word in &scan.words {
        match word.as_str() {
            "select" => found_select = true,
            "into" if found_select => return false,
            "insert" | "update" | "delete" | "create" | "drop" | "alter" | "truncate" => {
                return false;
            }
            _ => {}
        }
    }
    found_select
}

/// Whether the statement orders its own result set. ORDER BY inside a
/// subquery or CTE body does not count; only the outermost query's ordering
/// is semantically required of the result.
pub fn has_top_level_order_by(query: &str) -> bool {
    let scan = scan_top_level(query);
    scan.words
        .windows(2)
        .any(|pair| pair[0] == "order" && pair[1] == "by")
}
