use crate::commands::dispatcher::CommandDispatcher;
use crate::config::Config;
use crate::core::error::AssistError;

use console::style;
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::{Hinter, HistoryHinter};
use rustyline::history::FileHistory;
use rustyline::validate::Validator;
use rustyline::{CompletionType, Config as EditorConfig, Context, EditMode, Editor, Helper};

/// Completes slash commands; plain chat text gets history hints only.
pub struct AssistHelper {
    commands: CommandDispatcher,
    history_hinter: HistoryHinter,
}

impl AssistHelper {
    pub fn new(commands: CommandDispatcher) -> Self {
        Self {
            commands,
            history_hinter: HistoryHinter {},
        }
    }

    fn command_candidates(&self, typed: &str) -> Vec<Pair> {
        self.commands
            .get_command_names()
            .into_iter()
            .filter(|cmd| cmd.starts_with(typed))
            .map(|cmd| Pair {
                display: cmd.clone(),
                replacement: cmd,
            })
            .collect()
    }
}

impl Helper for AssistHelper {}

impl Completer for AssistHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let typed = line
            .get(..pos)
            .and_then(|head| head.strip_prefix('/'))
            .filter(|head| !head.contains(' '));
        match typed {
            Some(typed) => Ok((1, self.command_candidates(typed))),
            None => Ok((pos, Vec::new())),
        }
    }
}

impl Hinter for AssistHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, ctx: &Context<'_>) -> Option<String> {
        self.history_hinter.hint(line, pos, ctx)
    }
}

impl Highlighter for AssistHelper {}

impl Validator for AssistHelper {}

/// Creates a configured rustyline editor
pub fn create_editor(
    commands: CommandDispatcher,
) -> Result<Editor<AssistHelper, FileHistory>, AssistError> {
    let config = EditorConfig::builder()
        .history_ignore_space(true)
        .completion_type(CompletionType::List)
        .edit_mode(EditMode::Emacs)
        .build();

    let mut editor = Editor::with_config(config)
        .map_err(|e| AssistError::Input(format!("Failed to create line editor: {}", e)))?;
    editor.set_helper(Some(AssistHelper::new(commands)));

    let _ = editor.load_history(&Config::input_history_path());

    Ok(editor)
}

/// Reads a line of input using rustyline
pub fn read_input(
    editor: &mut Editor<AssistHelper, FileHistory>,
) -> Result<Option<String>, AssistError> {
    let prompt = if cfg!(windows) && std::env::var("PSModulePath").is_ok() {
        "> ".to_string()
    } else {
        style("> ").bold().cyan().to_string()
    };
    match editor.readline(&prompt) {
        Ok(line) => {
            if !line.trim().is_empty() {
                editor.add_history_entry(&line).map_err(|e| {
                    AssistError::Input(format!("Failed to add history entry: {}", e))
                })?;
            }
            Ok(Some(line))
        }
        Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
            println!("Exiting...");
            Ok(None)
        }
        Err(err) => Err(AssistError::Input(format!("Input error: {}", err))),
    }
}

/// Saves the editor history
pub fn save_history(editor: &mut Editor<AssistHelper, FileHistory>) -> Result<(), AssistError> {
    let history_path = Config::input_history_path();

    if let Some(parent) = history_path.parent() {
        if !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }

    editor
        .save_history(&history_path)
        .map_err(|e| AssistError::Input(format!("Failed to save history: {}", e)))
}
