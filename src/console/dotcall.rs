//! Dot-call grammar: `<Class>.<method>(<args>)`.
//!
//! ```text
//! call    ::= class "." method
//! class   ::= any text before the first "."
//! method  ::= "all" "(" ws ")"
//!           | "count" "(" ws ")"
//!           | ("show" | "destroy") "(" args ")"
//!           | "update" "(" arg "," arg "," value ")"
//! args    ::= ws | arg ("," arg)*
//! arg     ::= ws ( '"' chars-except-quote '"' | chars-except-comma ) ws
//! value   ::= rest of the call; surrounding quotes removed
//! ```
//!
//! Calls are translated into the same [`Command`] the canonical grammar
//! builds, except `count()`, which has no canonical verb. Anything outside
//! the grammar yields `None` and the console ignores the line.

use super::Command;

pub fn parse(line: &str) -> Option<Command> {
    let (class, rest) = line.trim().split_once('.')?;
    let open = rest.find('(')?;
    let method = rest[..open].trim();
    let inner = rest[open + 1..].strip_suffix(')')?;

    let class_name = non_empty(class.trim());

    match method {
        "all" if inner.trim().is_empty() => Some(Command::All { class: class_name }),
        "count" if inner.trim().is_empty() => Some(Command::Count {
            class: class.trim().to_string(),
        }),
        "show" | "destroy" => {
            let id = split_call_args(inner)?.into_iter().next().and_then(non_empty_owned);
            Some(if method == "show" {
                Command::Show {
                    class: class_name,
                    id,
                }
            } else {
                Command::Destroy {
                    class: class_name,
                    id,
                }
            })
        }
        "update" => {
            let (id, tail) = take_arg(inner)?;
            let (attribute, tail) = take_arg(tail?)?;
            let value = unquote(tail?.trim());
            Some(Command::Update {
                class: class_name,
                id: non_empty_owned(id),
                attribute: non_empty_owned(attribute),
                value,
            })
        }
        _ => None,
    }
}

/// Split a whole argument list. `None` if a quoted argument is unterminated
/// or followed by anything other than a comma.
fn split_call_args(inner: &str) -> Option<Vec<String>> {
    if inner.trim().is_empty() {
        return Some(Vec::new());
    }
    let mut args = Vec::new();
    let mut rest = Some(inner);
    while let Some(s) = rest {
        let (arg, tail) = take_arg(s)?;
        args.push(arg);
        rest = tail;
    }
    Some(args)
}

/// Take one argument off the front of `s`, returning it and the text after
/// its separating comma (`None` if it was the last argument).
fn take_arg(s: &str) -> Option<(String, Option<&str>)> {
    let s = s.trim_start();
    if let Some(body) = s.strip_prefix('"') {
        let end = body.find('"')?;
        let arg = body[..end].to_string();
        let after = body[end + 1..].trim_start();
        if after.is_empty() {
            return Some((arg, None));
        }
        let tail = after.strip_prefix(',')?;
        return Some((arg, Some(tail)));
    }
    match s.split_once(',') {
        Some((arg, tail)) => Some((arg.trim().to_string(), Some(tail))),
        None => Some((s.trim().to_string(), None)),
    }
}

/// The update value: a fully quoted value loses its quotes (and may be
/// empty); a bare value must be non-empty.
fn unquote(value: &str) -> Option<String> {
    if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
        return Some(value[1..value.len() - 1].to_string());
    }
    non_empty(value)
}

fn non_empty(s: &str) -> Option<String> {
    (!s.is_empty()).then(|| s.to_string())
}

fn non_empty_owned(s: String) -> Option<String> {
    (!s.is_empty()).then_some(s)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn some(s: &str) -> Option<String> {
        Some(s.to_string())
    }

    #[test]
    fn listing_and_counting() {
        assert_eq!(
            parse("User.all()"),
            Some(Command::All { class: some("User") })
        );
        assert_eq!(
            parse("State.count()"),
            Some(Command::Count {
                class: "State".into()
            })
        );
        assert_eq!(parse("User.all(1)"), None);
    }

    #[test]
    fn show_and_destroy_take_an_id() {
        assert_eq!(
            parse(r#"User.show("246c227a")"#),
            Some(Command::Show {
                class: some("User"),
                id: some("246c227a"),
            })
        );
        assert_eq!(
            parse("City.destroy(abc)"),
            Some(Command::Destroy {
                class: some("City"),
                id: some("abc"),
            })
        );
        assert_eq!(
            parse("City.show()"),
            Some(Command::Show {
                class: some("City"),
                id: None,
            })
        );
    }

    #[test]
    fn ids_may_contain_dots() {
        assert_eq!(
            parse(r#"User.show("a.b")"#),
            Some(Command::Show {
                class: some("User"),
                id: some("a.b"),
            })
        );
    }

    #[test]
    fn update_takes_id_attribute_and_rest_as_value() {
        assert_eq!(
            parse(r#"User.update("123", "first_name", "Bob")"#),
            Some(Command::Update {
                class: some("User"),
                id: some("123"),
                attribute: some("first_name"),
                value: some("Bob"),
            })
        );
        assert_eq!(
            parse(r#"Place.update("9", "latitude", 40.7128)"#),
            Some(Command::Update {
                class: some("Place"),
                id: some("9"),
                attribute: some("latitude"),
                value: some("40.7128"),
            })
        );
        assert_eq!(
            parse(r#"Place.update("9", "tags", a, b)"#),
            Some(Command::Update {
                class: some("Place"),
                id: some("9"),
                attribute: some("tags"),
                value: some("a, b"),
            })
        );
    }

    #[test]
    fn update_needs_three_arguments() {
        assert_eq!(parse(r#"User.update("123", "name")"#), None);
        assert_eq!(parse(r#"User.update("123")"#), None);
    }

    #[test]
    fn missing_class_is_forwarded_for_validation() {
        assert_eq!(
            parse(r#".show("1")"#),
            Some(Command::Show {
                class: None,
                id: some("1"),
            })
        );
    }

    #[test]
    fn unrecognised_calls_are_dropped() {
        assert_eq!(parse("User.fly()"), None);
        assert_eq!(parse("User.all("), None);
        assert_eq!(parse("User.all"), None);
        assert_eq!(parse(r#"User.show("unterminated)"#), None);
        assert_eq!(parse("no dot here"), None);
    }
}
