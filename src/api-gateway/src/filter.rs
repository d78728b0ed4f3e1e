//! Backend filter expressions
//!
//! Builds the `where` parameter understood by the backend's record listing
//! endpoint, e.g. `(Directory Identifier,eq,acme)~and((Title,like,%pizza%)~or(...))`.
//! Free-text terms only enter an expression through [`Filter::contains`], which
//! always runs them through [`sanitize_search_term`].

use std::fmt;

/// A composable filter over backend record fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter(Node);

#[derive(Debug, Clone, PartialEq, Eq)]
enum Node {
    Compare {
        field: String,
        op: &'static str,
        value: String,
    },
    Group {
        joiner: &'static str,
        children: Vec<Node>,
    },
}

impl Filter {
    /// Field equals value
    pub fn eq(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self(Node::Compare {
            field: field.into(),
            op: "eq",
            value: value.into(),
        })
    }

    /// Field contains the sanitized term (backend `like` semantics)
    pub fn contains(field: impl Into<String>, term: &str) -> Self {
        Self(Node::Compare {
            field: field.into(),
            op: "like",
            value: format!("%{}%", sanitize_search_term(term)),
        })
    }

    pub fn and(filters: impl IntoIterator<Item = Filter>) -> Self {
        Self::group("~and", filters)
    }

    pub fn or(filters: impl IntoIterator<Item = Filter>) -> Self {
        Self::group("~or", filters)
    }

    fn group(joiner: &'static str, filters: impl IntoIterator<Item = Filter>) -> Self {
        Self(Node::Group {
            joiner,
            children: filters.into_iter().map(|f| f.0).collect(),
        })
    }
}

impl Node {
    fn write(&self, f: &mut fmt::Formatter<'_>, nested: bool) -> fmt::Result {
        match self {
            Node::Compare { field, op, value } => write!(f, "({},{},{})", field, op, value),
            Node::Group { joiner, children } => {
                let wrap = nested && children.len() > 1;
                if wrap {
                    f.write_str("(")?;
                }
                for (i, child) in children.iter().enumerate() {
                    if i > 0 {
                        f.write_str(joiner)?;
                    }
                    child.write(f, true)?;
                }
                if wrap {
                    f.write_str(")")?;
                }
                Ok(())
            }
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.write(f, false)
    }
}

/// Escape the SQL wildcards `%` and `_` with a backslash and drop `'`, `"` and `;`.
///
/// This hardens string-built filter expressions; it does not make them
/// equivalent to parameterized queries.
pub fn sanitize_search_term(term: &str) -> String {
    let mut sanitized = String::with_capacity(term.len());
    for c in term.chars() {
        match c {
            '%' | '_' => {
                sanitized.push('\\');
                sanitized.push(c);
            }
            '\'' | '"' | ';' => {}
            _ => sanitized.push(c),
        }
    }
    sanitized
}
