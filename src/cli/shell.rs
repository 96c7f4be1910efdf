//! Interactive shell mode
//!
//! A REPL over the same clap definition as the command line: each line is
//! split into words and parsed as if it followed `renamer-dash`. Completion
//! and help walk that definition too, so new subcommands show up without
//! touching this file.

use std::ops::ControlFlow;

use anyhow::Result;
use clap::{Arg, Command as ClapCommand, CommandFactory, Parser};
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Config, Editor, Helper};

use super::{Cli, Commands, Invocation};
use crate::inventory::SortKey;

/// Words the shell handles itself
const BUILTINS: &[&str] = &["help", "exit", "quit"];

/// Subcommands that make no sense from inside the shell
const HIDDEN: &[&str] = &["help", "shell"];

/// Completion and hints driven by the clap command tree
struct ShellHelper {
    root: ClapCommand,
}

impl ShellHelper {
    fn new() -> Self {
        let mut root = Cli::command();
        // Propagates global flags into every subcommand
        root.build();
        Self { root }
    }

    /// Start of the word under the cursor and the words that could replace it
    fn candidates(&self, line: &str) -> (usize, Vec<String>) {
        let start = line.rfind(char::is_whitespace).map(|i| i + 1).unwrap_or(0);
        let (done, partial) = line.split_at(start);

        let mut command = &self.root;
        let mut awaiting: Option<&Arg> = None;
        for word in done.split_whitespace() {
            if awaiting.take().is_some() {
                continue;
            }
            if let Some(arg) = find_flag(command, word) {
                awaiting = Some(arg).filter(|a| a.get_action().takes_values());
            } else if let Some(sub) = command.find_subcommand(word) {
                command = sub;
            }
        }

        let mut words = match awaiting {
            Some(arg) => value_candidates(arg),
            None if partial.starts_with('-') => command
                .get_arguments()
                .filter(|a| !a.is_hide_set())
                .filter_map(|a| a.get_long())
                .map(|long| format!("--{}", long))
                .collect(),
            None => {
                let mut names = visible_subcommands(command)
                    .map(|c| c.get_name().to_string())
                    .collect::<Vec<_>>();
                if std::ptr::eq(command, &self.root) {
                    names.extend(BUILTINS.iter().map(|b| b.to_string()));
                }
                names
            }
        };

        words.retain(|w| w.starts_with(partial));
        words.sort();
        words.dedup();
        (start, words)
    }
}

fn find_flag<'a>(command: &'a ClapCommand, word: &str) -> Option<&'a Arg> {
    if let Some(long) = word.strip_prefix("--") {
        command.get_arguments().find(|a| a.get_long() == Some(long))
    } else {
        let mut short = word.strip_prefix('-')?.chars();
        let (Some(c), None) = (short.next(), short.next()) else {
            return None;
        };
        command.get_arguments().find(|a| a.get_short() == Some(c))
    }
}

/// Values worth offering after a flag
fn value_candidates(arg: &Arg) -> Vec<String> {
    let declared: Vec<String> = arg
        .get_possible_values()
        .iter()
        .map(|v| v.get_name().to_string())
        .collect();
    if !declared.is_empty() {
        return declared;
    }
    match arg.get_id().as_str() {
        "sort" => SortKey::all().iter().map(|k| k.field().to_string()).collect(),
        _ => Vec::new(),
    }
}

fn visible_subcommands(command: &ClapCommand) -> impl Iterator<Item = &ClapCommand> {
    command
        .get_subcommands()
        .filter(|c| !c.is_hide_set() && !HIDDEN.contains(&c.get_name()))
}

impl Completer for ShellHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &rustyline::Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let (start, words) = self.candidates(&line[..pos]);
        let pairs = words
            .into_iter()
            .map(|w| Pair {
                display: w.clone(),
                replacement: w,
            })
            .collect();
        Ok((start, pairs))
    }
}

impl Hinter for ShellHelper {
    type Hint = String;

    /// Grey remainder of the only possible completion
    fn hint(&self, line: &str, pos: usize, _ctx: &rustyline::Context<'_>) -> Option<String> {
        if pos < line.len() || line.ends_with(char::is_whitespace) {
            return None;
        }
        let (start, words) = self.candidates(line);
        match words.as_slice() {
            [only] => only.get(pos - start..).filter(|rest| !rest.is_empty()).map(str::to_string),
            _ => None,
        }
    }
}

impl Highlighter for ShellHelper {}
impl Validator for ShellHelper {}
impl Helper for ShellHelper {}

/// Split a line into words; single or double quotes group, `""` is an empty word
fn split_words(line: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut word: Option<String> = None;
    let mut quote: Option<char> = None;

    for c in line.chars() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (None, '"' | '\'') => {
                quote = Some(c);
                word.get_or_insert_with(String::new);
            }
            (None, c) if c.is_whitespace() => words.extend(word.take()),
            (_, c) => word.get_or_insert_with(String::new).push(c),
        }
    }
    words.extend(word);
    words
}

/// Flags given on the line win over the session's
fn line_invocation(cli: &Cli, session: &Invocation) -> Invocation {
    let mut invocation = session.clone();
    if let Some(server) = &cli.server {
        invocation.settings.server.base_url = server.clone();
    }
    if cli.output.json {
        invocation.format = cli.output.format();
    }
    invocation.quiet |= cli.output.quiet;
    invocation
}

/// Execute one line; `Break` ends the shell
async fn run_line(helper: &ShellHelper, words: Vec<String>, session: &Invocation) -> Result<ControlFlow<()>> {
    match words.first().map(String::as_str) {
        None => return Ok(ControlFlow::Continue(())),
        Some("exit" | "quit") => return Ok(ControlFlow::Break(())),
        Some("help") if words.len() == 1 => {
            print_help(&helper.root);
            return Ok(ControlFlow::Continue(()));
        }
        _ => {}
    }

    let argv = std::iter::once("renamer-dash".to_string()).chain(words);
    let cli = match Cli::try_parse_from(argv) {
        Ok(cli) => cli,
        Err(e) => {
            // Covers `--help` and usage errors alike
            let _ = e.print();
            return Ok(ControlFlow::Continue(()));
        }
    };

    let invocation = line_invocation(&cli, session);
    match cli.command {
        None => {}
        Some(Commands::Shell) => println!("Already in shell mode."),
        Some(command) => super::dispatch(command, &invocation).await?,
    }
    Ok(ControlFlow::Continue(()))
}

/// `(path, about)` for every runnable command, nested ones spelled out
fn help_rows(command: &ClapCommand, prefix: &str) -> Vec<(String, String)> {
    let mut rows = Vec::new();
    for sub in visible_subcommands(command) {
        let path = if prefix.is_empty() {
            sub.get_name().to_string()
        } else {
            format!("{} {}", prefix, sub.get_name())
        };
        if sub.has_subcommands() {
            rows.extend(help_rows(sub, &path));
        } else {
            let about = sub.get_about().map(|a| a.to_string()).unwrap_or_default();
            rows.push((path, about));
        }
    }
    rows
}

fn print_help(root: &ClapCommand) {
    println!("Commands:");
    for (path, about) in help_rows(root, "") {
        println!("  {:<24}{}", path, about);
    }
    println!();
    println!("  {:<24}{}", "help", "Show this help");
    println!("  {:<24}{}", "exit, quit", "Leave the shell");
    println!();
    println!("Any command takes --json, --quiet and --server URL; add --help for its options.");
}

fn history_path() -> Option<std::path::PathBuf> {
    directories::ProjectDirs::from("com", "renamer", "RenamerDash")
        .map(|dirs| dirs.data_dir().join("shell_history"))
}

/// Run the interactive shell
pub async fn run(session: Invocation) -> Result<()> {
    println!(
        "Renamer Dash Shell v{} on {}",
        env!("CARGO_PKG_VERSION"),
        session.settings.server.base_url
    );
    println!("Type 'help' for commands, Tab to complete, 'exit' to quit.\n");

    let config = Config::builder()
        .history_ignore_space(true)
        .completion_type(rustyline::CompletionType::List)
        .build();
    let mut rl = Editor::with_config(config)?;
    rl.set_helper(Some(ShellHelper::new()));

    let history = history_path();
    if let Some(path) = &history {
        let _ = rl.load_history(path);
    }

    loop {
        let line = match rl.readline("renamer> ") {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) => {
                println!("^C");
                continue;
            }
            Err(ReadlineError::Eof) => break,
            Err(e) => {
                tracing::error!("Shell input failed: {}", e);
                break;
            }
        };

        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        rl.add_history_entry(line)?;

        let Some(helper) = rl.helper() else { break };
        match run_line(helper, split_words(line), &session).await {
            Ok(ControlFlow::Continue(())) => {}
            Ok(ControlFlow::Break(())) => break,
            Err(e) => eprintln!("Error: {:#}", e),
        }
    }

    if let Some(path) = &history {
        if let Some(parent) = path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        if let Err(e) = rl.save_history(path) {
            tracing::warn!("Could not save shell history to {:?}: {}", path, e);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::OutputFormat;
    use crate::config::Settings;

    fn complete(line: &str) -> Vec<String> {
        ShellHelper::new().candidates(line).1
    }

    #[test]
    fn test_split_words_quotes() {
        assert_eq!(
            split_words(r#"config set-library "/srv/audio books""#),
            vec!["config", "set-library", "/srv/audio books"]
        );
        assert_eq!(
            split_words("inventory list  --filter 'de la'  --desc"),
            vec!["inventory", "list", "--filter", "de la", "--desc"]
        );
        assert_eq!(split_words(r#"config set-library """#), vec!["config", "set-library", ""]);
        assert!(split_words("   ").is_empty());
    }

    #[test]
    fn test_completes_top_level_from_cli_definition() {
        assert_eq!(complete("sch"), vec!["scheduler"]);
        assert_eq!(complete("e"), vec!["exit"]);

        let all = complete("");
        for name in ["status", "update-db", "inventory", "watch", "help", "quit"] {
            assert!(all.contains(&name.to_string()), "missing {}", name);
        }
        assert!(!all.contains(&"shell".to_string()));
    }

    #[test]
    fn test_completes_nested_subcommands() {
        let helper = ShellHelper::new();
        assert_eq!(helper.candidates("scheduler t"), (10, vec!["toggle".to_string()]));
        assert_eq!(complete("config "), vec!["local", "path", "set-library", "show"]);
        assert_eq!(complete("inventory ex"), vec!["export"]);
    }

    #[test]
    fn test_completes_sort_values_and_flags() {
        let helper = ShellHelper::new();
        assert_eq!(
            helper.candidates("inventory list --sort r"),
            (22, vec!["release_date".to_string()])
        );
        assert_eq!(complete("inventory list --sort ").len(), SortKey::all().len());
        // Value already given: back to flags
        assert_eq!(complete("inventory list --sort title --de"), vec!["--desc"]);
        // Global flags reach nested commands
        assert_eq!(complete("inventory list --js"), vec!["--json"]);
    }

    #[test]
    fn test_help_rows_follow_cli_definition() {
        let root = ShellHelper::new().root;
        let rows = help_rows(&root, "");
        let paths: Vec<_> = rows.iter().map(|(p, _)| p.as_str()).collect();
        assert!(paths.contains(&"scheduler toggle"));
        assert!(paths.contains(&"config set-library"));
        assert!(!paths.contains(&"shell"));
        assert!(!paths.contains(&"scheduler"));

        let export = rows.iter().find(|(p, _)| p == "inventory export").unwrap();
        assert!(export.1.contains("JSON"));
    }

    #[test]
    fn test_line_flags_override_session() {
        let session = Invocation {
            settings: Settings::default(),
            format: OutputFormat::Text,
            quiet: false,
        };
        let cli = Cli::try_parse_from(["renamer-dash", "status", "--json", "--server", "http://nas:9000"])
            .unwrap();
        let invocation = line_invocation(&cli, &session);
        assert_eq!(invocation.format, OutputFormat::Json);
        assert_eq!(invocation.settings.server.base_url, "http://nas:9000");
        assert!(!invocation.quiet);
    }
}
