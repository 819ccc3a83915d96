//! Command-line template rendering.

use crate::error::PersistError;

/// Tokenize `template` with shell quoting rules and substitute `{key}`
/// placeholders in each argument.
///
/// Tokenizing happens before substitution, so a substituted value containing
/// spaces or quotes stays a single argument. No shell is involved.
pub fn render_command(
    template: &str,
    vars: &[(&str, &str)],
) -> Result<Vec<String>, PersistError> {
    let tokens = shlex::split(template).ok_or_else(|| PersistError::MalformedCommand {
        template: template.to_string(),
    })?;

    Ok(tokens
        .into_iter()
        .map(|arg| {
            vars.iter().fold(arg, |acc, (key, value)| {
                acc.replace(&format!("{{{key}}}"), value)
            })
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_command() {
        let argv = render_command(
            "qri add --data {data}  --structure {structure} {dataset}",
            &[
                ("data", "/tmp/qri/data.json"),
                ("structure", "structure.json"),
                ("dataset", "me/craigslist"),
            ],
        )
        .unwrap();
        assert_eq!(
            argv,
            vec![
                "qri",
                "add",
                "--data",
                "/tmp/qri/data.json",
                "--structure",
                "structure.json",
                "me/craigslist",
            ]
        );
    }

    #[test]
    fn test_quoted_arguments_stay_whole() {
        let argv = render_command(
            r#"qri save --title "my data" {dataset}"#,
            &[("dataset", "me/x")],
        )
        .unwrap();
        assert_eq!(argv, vec!["qri", "save", "--title", "my data", "me/x"]);

        let argv = render_command("tool 'it''s' plain", &[]).unwrap();
        assert_eq!(argv, vec!["tool", "its", "plain"]);
    }

    #[test]
    fn test_values_with_spaces_stay_one_argument() {
        let argv = render_command("tool --file={data}", &[("data", "my \"file\".json")]).unwrap();
        assert_eq!(argv, vec!["tool", "--file=my \"file\".json"]);
    }

    #[test]
    fn test_unbalanced_quotes_rejected() {
        let err = render_command(r#"qri save --title "my data"#, &[]).unwrap_err();
        assert!(matches!(err, PersistError::MalformedCommand { .. }));
    }

    #[test]
    fn test_unknown_placeholders_left_alone() {
        let argv = render_command("tool {other}", &[("data", "x")]).unwrap();
        assert_eq!(argv, vec!["tool", "{other}"]);
    }

    #[test]
    fn test_empty_template() {
        assert!(render_command("   ", &[]).unwrap().is_empty());
    }
}
