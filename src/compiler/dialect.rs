use serde::{Deserialize, Serialize};

/// Supported SQL dialects.
///
/// A dialect fixes identifier quoting, bind style, and the bind-symbol
/// prefix once, when a builder or compiler is constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Dialect {
    #[default]
    Generic,
    Sqlite,
    Mysql,
    Postgres,
}

impl Dialect {
    /// The rendering style for this dialect.
    pub fn style(self) -> DialectStyle {
        match self {
            Dialect::Generic | Dialect::Sqlite => DialectStyle {
                quotes: ('"', '"'),
                bind: BindStyle::Anonymous,
                prefix: '?',
            },
            Dialect::Mysql => DialectStyle {
                quotes: ('`', '`'),
                bind: BindStyle::Anonymous,
                prefix: '?',
            },
            Dialect::Postgres => DialectStyle {
                quotes: ('"', '"'),
                bind: BindStyle::Numbered,
                prefix: '$',
            },
        }
    }
}

/// How bound values are referenced in rendered SQL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BindStyle {
    /// Opaque placeholder, e.g. `?`
    Anonymous,
    /// Prefix plus 1-based ordinal, e.g. `$1 $2`
    Numbered,
    /// Prefix plus generated 0-based name, e.g. `@param0`
    Named,
}

/// Identifier quoting, bind style, and symbol prefix for one engine
/// family. Fixed for the lifetime of the compiler it is given to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialectStyle {
    pub quotes: (char, char),
    pub bind: BindStyle,
    pub prefix: char,
}

impl DialectStyle {
    /// Quote an identifier, quoting each dotted segment separately so
    /// `t1.age` becomes `"t1"."age"`. A bare `*` passes through.
    pub fn quote(&self, ident: &str) -> String {
        if ident == "*" {
            return ident.to_string();
        }
        let (open, close) = self.quotes;
        let mut out = String::with_capacity(ident.len() + 4);
        for (i, part) in ident.split('.').enumerate() {
            if i > 0 {
                out.push('.');
            }
            out.push(open);
            out.push_str(part);
            out.push(close);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_compound_identifier() {
        let style = Dialect::Generic.style();
        assert_eq!(style.quote("age"), "\"age\"");
        assert_eq!(style.quote("t1.age"), "\"t1\".\"age\"");
        assert_eq!(style.quote("*"), "*");

        let mysql = Dialect::Mysql.style();
        assert_eq!(mysql.quote("user.id"), "`user`.`id`");
    }
}
