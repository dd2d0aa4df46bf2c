//! Canonical command grammar: `<verb> [Class] [id] [attribute] [value]`.
//!
//! Arguments are separated by whitespace. A double-quoted segment is one
//! argument with the quotes removed, so `update User 1 name "Ada L"` sets
//! `name` to `Ada L`. Arguments past the ones a verb uses are ignored.

/// A parsed console command. Both grammars produce this type; validation
/// happens later, so every argument is optional here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Create {
        class: Option<String>,
    },
    Show {
        class: Option<String>,
        id: Option<String>,
    },
    Destroy {
        class: Option<String>,
        id: Option<String>,
    },
    All {
        class: Option<String>,
    },
    Update {
        class: Option<String>,
        id: Option<String>,
        attribute: Option<String>,
        value: Option<String>,
    },
    /// Only reachable through `<Class>.count()`.
    Count {
        class: String,
    },
    Help {
        topic: Option<String>,
    },
    Quit,
}

/// Verbs accepted at the start of a canonical line.
pub const VERBS: [&str; 8] = [
    "create", "show", "destroy", "all", "update", "help", "quit", "EOF",
];

/// Whether `line` starts with a canonical verb.
pub fn is_canonical(line: &str) -> bool {
    line.split_whitespace()
        .next()
        .is_some_and(|word| VERBS.contains(&word))
}

/// Parse a canonical line. Returns `None` when the first word is not a verb.
pub fn parse(line: &str) -> Option<Command> {
    let mut tokens = split_args(line).into_iter();
    let verb = tokens.next()?;
    let mut next = || tokens.next();

    let command = match verb.as_str() {
        "create" => Command::Create { class: next() },
        "show" => Command::Show {
            class: next(),
            id: next(),
        },
        "destroy" => Command::Destroy {
            class: next(),
            id: next(),
        },
        "all" => Command::All { class: next() },
        "update" => Command::Update {
            class: next(),
            id: next(),
            attribute: next(),
            value: next(),
        },
        "help" => Command::Help { topic: next() },
        "quit" | "EOF" => Command::Quit,
        _ => return None,
    };
    Some(command)
}

/// Split on whitespace, treating `"..."` as a single token without its quotes.
/// An unterminated quote runs to the end of the line.
pub fn split_args(line: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_token = false;
    let mut in_quotes = false;

    for c in line.chars() {
        match c {
            '"' => {
                in_quotes = !in_quotes;
                in_token = true;
            }
            c if c.is_whitespace() && !in_quotes => {
                if in_token {
                    tokens.push(std::mem::take(&mut current));
                    in_token = false;
                }
            }
            c => {
                current.push(c);
                in_token = true;
            }
        }
    }
    if in_token {
        tokens.push(current);
    }
    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_whitespace_and_groups_quotes() {
        assert_eq!(split_args("  show  User   42 "), vec!["show", "User", "42"]);
        assert_eq!(
            split_args(r#"update User 1 name "Ada Lovelace""#),
            vec!["update", "User", "1", "name", "Ada Lovelace"]
        );
        assert_eq!(split_args(r#"a "" b"#), vec!["a", "", "b"]);
        assert_eq!(split_args(r#"a "open ended"#), vec!["a", "open ended"]);
        assert!(split_args("   ").is_empty());
    }

    #[test]
    fn parses_each_verb() {
        assert_eq!(
            parse("create State"),
            Some(Command::Create {
                class: Some("State".into())
            })
        );
        assert_eq!(
            parse("show User"),
            Some(Command::Show {
                class: Some("User".into()),
                id: None
            })
        );
        assert_eq!(parse("all"), Some(Command::All { class: None }));
        assert_eq!(parse("EOF"), Some(Command::Quit));
        assert_eq!(
            parse("update Place 1 max_guest 4 extra"),
            Some(Command::Update {
                class: Some("Place".into()),
                id: Some("1".into()),
                attribute: Some("max_guest".into()),
                value: Some("4".into()),
            })
        );
    }

    #[test]
    fn unknown_verbs_are_not_canonical() {
        assert!(!is_canonical("User.all()"));
        assert!(!is_canonical("Create User"));
        assert!(is_canonical("  destroy User 1"));
        assert_eq!(parse("launch rocket"), None);
    }
}
