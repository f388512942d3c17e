//! Safe SQL identifier handling.
//!
//! Every column, table and key name a [`TableView`](crate::TableView) is
//! configured with passes through [`Ident`] before it can appear in SQL text.
//! Request input never becomes an identifier at all, so the only strings that
//! reach the generated SQL untouched are ones that survived this parser.
//!
//! - Unquoted parts are validated against: `[A-Za-z_][A-Za-z0-9_$]*`
//! - Quoted parts allow any characters except NUL and escape `"` as `""`
//!
//! # Example
//! ```ignore
//! use pggrid::Ident;
//!
//! let t = Ident::parse("public.employees")?;
//! let c = Ident::parse(r#"e."lastName""#)?;
//! # Ok::<(), pggrid::GridError>(())
//! ```

use crate::error::{GridError, GridResult};

/// A part of a SQL identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentPart {
    /// Unquoted identifier: must match `[A-Za-z_][A-Za-z0-9_$]*`.
    Unquoted(String),
    /// Quoted identifier: allows any characters except NUL.
    Quoted(String),
}

impl IdentPart {
    fn raw(&self) -> &str {
        match self {
            IdentPart::Unquoted(s) => s,
            IdentPart::Quoted(s) => s,
        }
    }
}

/// A SQL identifier (column, table, or schema name).
///
/// Supports dotted notation (e.g., `schema.table.column`) and quoted
/// identifiers (e.g., `e."lastName"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ident {
    pub parts: Vec<IdentPart>,
}

impl Ident {
    /// Create a quoted identifier.
    pub fn quoted(name: &str) -> GridResult<Self> {
        if name.is_empty() {
            return Err(GridError::validation("Empty quoted identifier"));
        }
        if name.contains('\0') {
            return Err(GridError::validation(
                "Identifier cannot contain NUL character",
            ));
        }
        Ok(Self {
            parts: vec![IdentPart::Quoted(name.to_string())],
        })
    }

    /// Parse an identifier string, supporting dotted and quoted forms.
    ///
    /// - Dotted: `schema.table.column`
    /// - Quoted: `"CamelCase"."UserTable"`
    /// - Mixed: `public."UserTable".id`
    pub fn parse(s: &str) -> GridResult<Self> {
        if s.is_empty() {
            return Err(GridError::validation("Identifier cannot be empty"));
        }
        if s.contains('\0') {
            return Err(GridError::validation(
                "Identifier cannot contain NUL character",
            ));
        }

        let mut parts = Vec::new();
        let mut chars = s.chars().peekable();

        while chars.peek().is_some() {
            // Consume '.' between parts (but require there is a next part).
            if !parts.is_empty() {
                match chars.next() {
                    Some('.') => {
                        if chars.peek().is_none() {
                            return Err(GridError::validation("Trailing '.' in identifier"));
                        }
                    }
                    Some(c) => {
                        return Err(GridError::validation(format!(
                            "Expected '.' between identifier parts, got '{c}'"
                        )));
                    }
                    None => break,
                }
            }

            // Quoted identifier part.
            if chars.peek() == Some(&'"') {
                chars.next(); // opening quote
                let mut name = String::new();
                loop {
                    match chars.next() {
                        Some('"') => {
                            // Escaped quote: ""
                            if chars.peek() == Some(&'"') {
                                chars.next();
                                name.push('"');
                            } else {
                                break;
                            }
                        }
                        Some(c) => name.push(c),
                        None => return Err(GridError::validation("Unclosed quoted identifier")),
                    }
                }
                if name.is_empty() {
                    return Err(GridError::validation("Empty quoted identifier"));
                }
                parts.push(IdentPart::Quoted(name));
                continue;
            }

            // Unquoted identifier part.
            let mut name = String::new();
            while let Some(&c) = chars.peek() {
                if c == '.' {
                    break;
                }
                if name.is_empty() {
                    // First char: letter or underscore.
                    if c == '_' || c.is_ascii_alphabetic() {
                        name.push(c);
                        chars.next();
                    } else {
                        return Err(GridError::validation(format!(
                            "Invalid identifier start character: '{c}'"
                        )));
                    }
                } else {
                    // Subsequent chars: letter, digit, underscore, or $.
                    if c == '_' || c == '$' || c.is_ascii_alphanumeric() {
                        name.push(c);
                        chars.next();
                    } else {
                        return Err(GridError::validation(format!(
                            "Invalid character in identifier: '{c}'"
                        )));
                    }
                }
            }
            if name.is_empty() {
                return Err(GridError::validation("Empty identifier segment"));
            }
            parts.push(IdentPart::Unquoted(name));
        }

        if parts.is_empty() {
            return Err(GridError::validation("Empty identifier"));
        }

        Ok(Self { parts })
    }

    /// The name under which the engine reports this column in a result row.
    ///
    /// PostgreSQL names an unaliased result column after the final segment of
    /// the selected identifier: `SELECT e.name` yields a column called `name`.
    /// Quoting is not part of the reported name.
    pub fn result_key(&self) -> &str {
        // parse() guarantees at least one part.
        self.parts
            .last()
            .map(IdentPart::raw)
            .unwrap_or_default()
    }

    /// Render the identifier as SQL.
    pub fn to_sql(&self) -> String {
        let mut cap = self.parts.len().saturating_sub(1); // dots
        for part in &self.parts {
            match part {
                IdentPart::Unquoted(s) => cap += s.len(),
                IdentPart::Quoted(s) => cap += s.len() + 2, // surrounding quotes (escapes may add more)
            }
        }
        let mut out = String::with_capacity(cap);
        self.write_sql(&mut out);
        out
    }

    pub(crate) fn write_sql(&self, out: &mut String) {
        for (i, part) in self.parts.iter().enumerate() {
            if i > 0 {
                out.push('.');
            }
            match part {
                IdentPart::Unquoted(s) => out.push_str(s),
                IdentPart::Quoted(s) => {
                    out.push('"');
                    for ch in s.chars() {
                        if ch == '"' {
                            out.push('"');
                            out.push('"');
                        } else {
                            out.push(ch);
                        }
                    }
                    out.push('"');
                }
            }
        }
    }
}

/// Convert an input into an [`Ident`].
///
/// This is mainly for ergonomics in configuration APIs.
pub trait IntoIdent {
    fn into_ident(self) -> GridResult<Ident>;
}

impl IntoIdent for Ident {
    fn into_ident(self) -> GridResult<Ident> {
        Ok(self)
    }
}

impl IntoIdent for &Ident {
    fn into_ident(self) -> GridResult<Ident> {
        Ok(self.clone())
    }
}

impl IntoIdent for &str {
    fn into_ident(self) -> GridResult<Ident> {
        Ident::parse(self)
    }
}

impl IntoIdent for String {
    fn into_ident(self) -> GridResult<Ident> {
        Ident::parse(&self)
    }
}
