use crate::statement::Dialect;

/// Statement text paired with a boolean mask telling which positions are
/// outside every parenthesized scope and quoted literal. Clause keywords,
/// item commas, and predicate connectors are only recognized on searchable
/// positions, so subqueries, function arguments, and string literals stay
/// opaque.
#[derive(Debug)]
pub struct SearchableText {
    chars: Vec<char>,
    searchable: Vec<bool>,
    dialect: Dialect,
}

impl SearchableText {
    pub fn new(text: &str, dialect: Dialect) -> Self {
        let chars: Vec<char> = text.chars().collect();
        let mut searchable = vec![false; chars.len()];

        let mut depth: i32 = 0;
        let mut quote: Option<char> = None;
        let mut position = 0;
        while position < chars.len() {
            let current = chars[position];
            match quote {
                Some(open) => {
                    if current == open {
                        // a doubled quote stays inside the literal
                        if chars.get(position + 1) == Some(&open) {
                            position += 2;
                            continue;
                        }
                        quote = None;
                    }
                }
                None => {
                    if dialect.is_quote(current) {
                        quote = Some(current);
                    } else if current == '(' {
                        depth += 1;
                    } else if current == ')' {
                        depth -= 1;
                    } else if depth == 0 {
                        searchable[position] = true;
                    }
                }
            }
            position += 1;
        }

        Self { chars, searchable, dialect }
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub fn is_searchable(&self, position: usize) -> bool {
        self.searchable.get(position).copied().unwrap_or(false)
    }

    pub fn slice(&self, start: usize, end: usize) -> String {
        let end = end.min(self.chars.len());
        if start >= end {
            return String::new();
        }
        self.chars[start..end].iter().collect()
    }

    fn is_word_char(&self, ch: char) -> bool {
        ch.is_alphanumeric() || ch == '_' || self.dialect.is_quote(ch)
    }

    /// All whole-word occurrences of a keyword on searchable positions.
    /// Multi-word keywords tolerate any whitespace run between their words.
    /// Returns `(start, end)` spans, end exclusive.
    pub fn find_keyword(&self, words: &[&str]) -> Vec<(usize, usize)> {
        let mut found = vec![];
        for start in 0..self.chars.len() {
            if !self.searchable[start] {
                continue;
            }
            if start > 0 && self.is_word_char(self.chars[start - 1]) {
                continue;
            }
            if let Some(end) = self.match_words_at(start, words) {
                if end < self.chars.len() && self.is_word_char(self.chars[end]) {
                    continue;
                }
                found.push((start, end));
            }
        }
        found
    }

    fn match_words_at(&self, start: usize, words: &[&str]) -> Option<usize> {
        let mut position = start;
        for (index, word) in words.iter().enumerate() {
            if index > 0 {
                let whitespace_start = position;
                while position < self.chars.len() && self.chars[position].is_whitespace() {
                    position += 1;
                }
                if position == whitespace_start {
                    return None;
                }
            }
            for expected in word.chars() {
                if position >= self.chars.len() {
                    return None;
                }
                if self.chars[position].to_ascii_uppercase() != expected {
                    return None;
                }
                position += 1;
            }
        }
        Some(position)
    }

    /// Split on a separator character found at searchable positions,
    /// trimming each part and dropping empty ones.
    pub fn split_top_level(&self, separator: char) -> Vec<String> {
        let mut parts = vec![];
        let mut start = 0;
        for (position, &current) in self.chars.iter().enumerate() {
            if current == separator && self.searchable[position] {
                parts.push(self.slice(start, position));
                start = position + 1;
            }
        }
        parts.push(self.slice(start, self.chars.len()));

        parts
            .into_iter()
            .map(|part| part.trim().to_string())
            .filter(|part| !part.is_empty())
            .collect()
    }
}

/// Collapse whitespace runs outside quoted literals into single spaces and
/// trim the ends. Parsing normalizes every clause slice through this, which
/// is what makes rendering deterministic.
pub fn collapse_whitespace(text: &str, dialect: Dialect) -> String {
    let mut out = String::with_capacity(text.len());
    let mut quote: Option<char> = None;
    let mut pending_space = false;

    for current in text.trim().chars() {
        match quote {
            Some(open) => {
                out.push(current);
                if current == open {
                    quote = None;
                }
            }
            None => {
                if current.is_whitespace() {
                    pending_space = true;
                    continue;
                }
                if pending_space {
                    out.push(' ');
                    pending_space = false;
                }
                if dialect.is_quote(current) {
                    quote = Some(current);
                }
                out.push(current);
            }
        }
    }

    out
}

/// Whether the text is a single parenthesized group. Such a predicate keeps
/// its own parentheses when spliced into a clause instead of gaining another
/// pair on every render.
pub fn is_enclosed(text: &str, dialect: Dialect) -> bool {
    let chars: Vec<char> = text.trim().chars().collect();
    if chars.len() < 2 || chars[0] != '(' || chars[chars.len() - 1] != ')' {
        return false;
    }

    let mut depth: i32 = 0;
    let mut quote: Option<char> = None;
    for (position, &current) in chars.iter().enumerate() {
        match quote {
            Some(open) => {
                if current == open {
                    quote = None;
                }
            }
            None => {
                if dialect.is_quote(current) {
                    quote = Some(current);
                } else if current == '(' {
                    depth += 1;
                } else if current == ')' {
                    depth -= 1;
                    if depth == 0 && position < chars.len() - 1 {
                        return false;
                    }
                }
            }
        }
    }
    depth == 0
}

/// Case-insensitive whole-word containment test, used to find a field's
/// textual form inside a derived select expression such as `SUM(b.Qty)`.
pub fn contains_word(haystack: &str, needle: &str) -> bool {
    let hay: Vec<char> = haystack.chars().collect();
    let ned: Vec<char> = needle.chars().collect();
    if ned.is_empty() || hay.len() < ned.len() {
        return false;
    }

    let is_ident = |ch: char| ch.is_alphanumeric() || ch == '_';
    for start in 0..=hay.len() - ned.len() {
        let matched = (0..ned.len())
            .all(|offset| hay[start + offset].to_ascii_uppercase() == ned[offset].to_ascii_uppercase());
        if !matched {
            continue;
        }
        let before_ok = start == 0 || !is_ident(hay[start - 1]);
        let after = start + ned.len();
        let after_ok = after == hay.len() || !is_ident(hay[after]);
        if before_ok && after_ok {
            return true;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use crate::statement::{collapse_whitespace, contains_word, is_enclosed, Dialect, SearchableText};

    #[test]
    pub fn test_mask_parentheses() {
        let mask = SearchableText::new("a, SUM(b, c), d", Dialect::default());

        let parts = mask.split_top_level(',');

        assert_eq!(parts, vec!["a", "SUM(b, c)", "d"]);
    }

    #[test]
    pub fn test_mask_quoted_literal() {
        let mask = SearchableText::new("name = 'WHERE x, y'", Dialect::default());

        assert!(mask.find_keyword(&["WHERE"]).is_empty());
        assert_eq!(mask.split_top_level(',').len(), 1);
    }

    #[test]
    pub fn test_mask_doubled_quote() {
        let mask = SearchableText::new("note = 'it''s, fine', other", Dialect::default());

        let parts = mask.split_top_level(',');

        assert_eq!(parts, vec!["note = 'it''s, fine'", "other"]);
    }

    #[test]
    pub fn test_keyword_whole_word() {
        let mask = SearchableText::new("SELECT fromage FROM t", Dialect::default());

        let found = mask.find_keyword(&["FROM"]);

        assert_eq!(found.len(), 1);
        assert_eq!(mask.slice(found[0].0, found[0].1), "FROM");
    }

    #[test]
    pub fn test_keyword_multi_word_flexible_whitespace() {
        let mask = SearchableText::new("GROUP   BY a", Dialect::default());

        let found = mask.find_keyword(&["GROUP", "BY"]);

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].0, 0);
    }

    #[test]
    pub fn test_keyword_inside_parentheses_is_ignored() {
        let mask = SearchableText::new("(SELECT x FROM s) FROM t", Dialect::default());

        assert_eq!(mask.find_keyword(&["FROM"]).len(), 1);
    }

    #[test]
    pub fn test_collapse_whitespace_preserves_literals() {
        let collapsed = collapse_whitespace("a   =\n'two  spaces'", Dialect::default());

        assert_eq!(collapsed, "a = 'two  spaces'");
    }

    #[test]
    pub fn test_is_enclosed() {
        let dialect = Dialect::default();

        assert!(is_enclosed("(a = 1)", dialect));
        assert!(is_enclosed("((a = 1) OR (b = 2))", dialect));
        assert!(!is_enclosed("(a = 1) AND (b = 2)", dialect));
        assert!(!is_enclosed("a = 1", dialect));
        assert!(is_enclosed("(a = ')(')", dialect));
    }

    #[test]
    pub fn test_contains_word() {
        assert!(contains_word("SUM(b.Qty)", "b.Qty"));
        assert!(contains_word("a.Name", "a.name"));
        assert!(!contains_word("SUM(b.Qty)", "a.Qty"));
        assert!(!contains_word("QtyTotal", "Qty"));
    }
}
