//! journal config command.

use crate::{finish, CommandOutput, JournalBackend};

/// Run the config command from test arguments.
pub fn run_config_for_test(args: &[&str], backend: &dyn JournalBackend) -> CommandOutput {
    let owned: Vec<String> = args.iter().map(|a| (*a).to_string()).collect();
    finish(execute_config(&owned, backend))
}

fn execute_config(
    args: &[String],
    backend: &dyn JournalBackend,
) -> Result<CommandOutput, (i32, String)> {
    let stdout = match args.iter().map(String::as_str).collect::<Vec<_>>().as_slice() {
        [] | ["show"] => backend.config().to_yaml().map_err(|err| (1, err))?,
        ["path"] => match backend.config_path() {
            Some(path) => format!("{}\n", path.display()),
            None => "no config file found; using defaults\n".to_string(),
        },
        ["--help"] | ["-h"] => {
            let help = concat!(
                "Usage: journal config [show|path]\n",
                "\n",
                "show  print the effective configuration (default)\n",
                "path  print the config file in use\n",
            );
            return Err((0, help.to_string()));
        }
        [other, ..] => return Err((2, format!("unknown config subcommand: {other}"))),
    };
    Ok(CommandOutput {
        stdout,
        stderr: String::new(),
        exit_code: 0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests_common::MockBackend;

    #[test]
    fn show_prints_effective_yaml() {
        let backend = MockBackend::new();
        let out = run_config_for_test(&[], &backend);
        assert_eq!(out.exit_code, 0);
        assert!(out.stdout.contains("base_url: http://127.0.0.1:5000"), "{}", out.stdout);
        assert!(out.stdout.contains("failure_policy: persistent-pending"));
        assert_eq!(run_config_for_test(&["show"], &backend), out);
    }

    #[test]
    fn show_output_reloads_to_the_same_config() {
        let mut backend = MockBackend::new();
        backend.config.server.delete_field = "#path".into();
        let out = run_config_for_test(&["show"], &backend);
        assert_eq!(out.exit_code, 0);
        let reloaded = journal_core::config::ClientConfig::from_yaml_str(&out.stdout);
        assert_eq!(reloaded.as_ref(), Ok(&backend.config), "{}", out.stdout);
    }

    #[test]
    fn path_without_file_mentions_defaults() {
        let backend = MockBackend::new();
        let out = run_config_for_test(&["path"], &backend);
        assert_eq!(out.stdout, "no config file found; using defaults\n");
    }

    #[test]
    fn unknown_subcommand_is_usage_error() {
        let backend = MockBackend::new();
        let out = run_config_for_test(&["edit"], &backend);
        assert_eq!(out.exit_code, 2);
        assert_eq!(out.stderr, "unknown config subcommand: edit\n");
    }
}
