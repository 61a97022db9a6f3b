//! Rustyline-based REPL editor with history and completion.

use std::path::PathBuf;

use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::hint::{Hinter, HistoryHinter};
use rustyline::history::DefaultHistory;
use rustyline::{
    CompletionType, Config, Context, EditMode, Editor, Helper, Highlighter, Validator,
};

/// Events returned by the REPL editor.
pub(crate) enum ReadlineEvent {
    /// A complete line of input (possibly multi-line, joined).
    Line(String),
    /// The user pressed Ctrl+C, cancelling current input.
    Interrupted,
    /// The user pressed Ctrl+D, signalling end-of-input.
    Eof,
}

/// Helper that provides slash-command completion and history hints.
#[derive(Helper, Validator, Highlighter)]
struct ReplHelper {
    hinter: HistoryHinter,
    commands: &'static [&'static str],
}

impl Completer for ReplHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        // Slash commands are only recognized at the start of the line.
        let prefix = &line[..pos];
        if !prefix.starts_with('/') || prefix.contains(char::is_whitespace) {
            return Ok((pos, Vec::new()));
        }

        let matches: Vec<Pair> = self
            .commands
            .iter()
            .filter(|cmd| cmd.starts_with(prefix))
            .map(|cmd| Pair {
                display: (*cmd).to_string(),
                replacement: (*cmd).to_string(),
            })
            .collect();

        Ok((0, matches))
    }
}

impl Hinter for ReplHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, ctx: &Context<'_>) -> Option<String> {
        self.hinter.hint(line, pos, ctx)
    }
}

/// Rustyline-based REPL editor with command history and tab completion.
pub(crate) struct ReplEditor {
    editor: Editor<ReplHelper, DefaultHistory>,
    history_path: Option<PathBuf>,
    prompt: &'static str,
}

impl ReplEditor {
    /// Create a new REPL editor.
    ///
    /// History is kept in `~/.warden/<history_file>` when a home directory
    /// is available, and not persisted otherwise.
    pub(crate) fn new(
        history_file: &str,
        prompt: &'static str,
        commands: &'static [&'static str],
    ) -> anyhow::Result<Self> {
        let config = Config::builder()
            .history_ignore_dups(true)?
            .completion_type(CompletionType::List)
            .edit_mode(EditMode::Emacs)
            .auto_add_history(true)
            .build();

        let helper = ReplHelper {
            hinter: HistoryHinter::new(),
            commands,
        };

        let mut editor = Editor::with_config(config)?;
        editor.set_helper(Some(helper));

        let history_path = history_path(history_file);
        if let Some(path) = &history_path {
            // Missing history on first run is expected.
            let _ = editor.load_history(path);
        }

        Ok(Self {
            editor,
            history_path,
            prompt,
        })
    }

    /// Read a line of input from the user.
    ///
    /// A line ending with `\` continues on the next line; the pieces are
    /// joined with a newline.
    pub(crate) fn readline(&mut self) -> ReadlineEvent {
        let continuation = "  ";

        let mut accumulated = String::new();
        let mut is_continuation = false;

        loop {
            let p = if is_continuation {
                continuation
            } else {
                self.prompt
            };

            match self.editor.readline(p) {
                Ok(line) => {
                    if let Some(stripped) = line.strip_suffix('\\') {
                        accumulated.push_str(stripped);
                        accumulated.push('\n');
                        is_continuation = true;
                        continue;
                    }

                    accumulated.push_str(&line);

                    if let Some(path) = &self.history_path
                        && let Err(e) = self.editor.save_history(path)
                    {
                        tracing::debug!(error = %e, "failed to save history");
                    }

                    return ReadlineEvent::Line(accumulated);
                },
                Err(ReadlineError::Interrupted) => return ReadlineEvent::Interrupted,
                Err(_) => return ReadlineEvent::Eof,
            }
        }
    }
}

fn history_path(file: &str) -> Option<PathBuf> {
    let dir = directories::BaseDirs::new()?
        .home_dir()
        .join(warden_config::loader::CONFIG_DIR_NAME);
    std::fs::create_dir_all(&dir).ok()?;
    Some(dir.join(file))
}
