use serde::Serializer;

/// Normalize a filename to a cleaned, forward-slash separated path
///
/// Cleaning is purely lexical and never touches the filesystem:
/// - repeated separators collapse into one
/// - `.` elements are dropped
/// - `..` removes the element before it, unless that is `..` itself or the path root
/// - an empty result becomes `.`
pub(crate) fn normalize_filename(filename: &str) -> String {
    let slashed = if std::path::MAIN_SEPARATOR == '/' {
        filename.to_string()
    } else {
        filename.replace(std::path::MAIN_SEPARATOR, "/")
    };

    clean_path(&slashed)
}

fn clean_path(path: &str) -> String {
    let rooted = path.starts_with('/');
    let mut elements: Vec<&str> = Vec::new();

    for element in path.split('/') {
        match element {
            "" | "." => {}
            ".." => match elements.last() {
                Some(last) if *last != ".." => {
                    elements.pop();
                }
                _ if rooted => {}
                _ => elements.push(".."),
            },
            element => elements.push(element),
        }
    }

    let joined = elements.join("/");
    if rooted {
        format!("/{joined}")
    } else if joined.is_empty() {
        ".".to_string()
    } else {
        joined
    }
}

/// Serialize an expression as the HCL text it would be written as
pub(crate) fn serialize_expression<S>(
    expression: &hcl::Expression,
    serializer: S,
) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let formatted = hcl::format::to_string(expression).map_err(serde::ser::Error::custom)?;
    serializer.serialize_str(&formatted)
}

pub(crate) fn serialize_optional_expression<S>(
    expression: &Option<hcl::Expression>,
    serializer: S,
) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match expression {
        Some(expression) => serialize_expression(expression, serializer),
        None => serializer.serialize_none(),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn clean() {
        let cases = [
            ("a/b/../c.tfcomponents.hcl", "a/c.tfcomponents.hcl"),
            ("./a//b/./c", "a/b/c"),
            ("a/..", "."),
            ("", "."),
            ("../../a", "../../a"),
            ("a/../../b", "../b"),
            ("/../a/", "/a"),
            ("/", "/"),
        ];

        for (input, expected) in cases {
            assert_eq!(clean_path(input), expected, "cleaning {input:?}");
        }
    }

    #[test]
    fn normalize_keeps_forward_slashes() {
        assert_eq!(
            normalize_filename("dir/./sub/../main.tfcomponents.hcl"),
            "dir/main.tfcomponents.hcl"
        );
    }
}
