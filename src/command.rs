use argh::{EarlyExit, FromArgs};
use std::fmt;

/// Conventional process exit code type used by this crate.
///
/// A value of 0 indicates success; any non-zero value indicates failure.
pub type ExitCode = i32;

/// Path used when a command is given without one.
pub const DEFAULT_PATH: &str = ".";

#[derive(FromArgs, Debug, Default, Clone, PartialEq, Eq)]
/// File manipulation and directory navigation over a saved working directory.
pub struct Invocation {
    #[argh(positional)]
    /// command to execute (ls, cd, mkdir, rmdir, rm, cp, mv, find, cat, logs, pwd), followed by its path and, for cp and mv, a destination.
    pub operands: Vec<String>,

    #[argh(option, short = 'p')]
    /// substring to look for in file names (find)
    pub pattern: Option<String>,

    #[argh(option, short = 'r')]
    /// directory to remove together with its contents (rm)
    pub recursive: Option<String>,

    #[argh(option, short = 'f')]
    /// file to print (cat)
    pub file: Option<String>,

    #[argh(switch, short = 'a')]
    /// also show entries whose name starts with a dot (ls)
    pub all: bool,
}

/// Arguments that could not be turned into a [`Command`].
///
/// `output` is ready to print; `is_error` is false for `--help`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidArgs {
    pub output: String,
    pub is_error: bool,
}

impl InvalidArgs {
    pub fn exit_code(&self) -> ExitCode {
        if self.is_error { 2 } else { 0 }
    }
}

impl Invocation {
    /// Split the operands into a [`Command`].
    ///
    /// `program` only appears in the usage text printed when no command was
    /// given.
    pub fn into_command(self, program: &str) -> Result<Command, InvalidArgs> {
        let mut operands = self.operands.into_iter();
        let Some(name) = operands.next() else {
            return Err(InvalidArgs {
                output: format!(
                    "Required positional arguments not provided:\n    command\n\n{}",
                    usage(program)
                ),
                is_error: true,
            });
        };
        let path = operands.next();
        let destination = operands.next();
        if let Some(extra) = operands.next() {
            return Err(InvalidArgs {
                output: format!("Unrecognized argument: {}\n", extra),
                is_error: true,
            });
        }

        Ok(Command {
            kind: CommandKind::from(name.as_str()),
            name,
            path,
            destination,
            pattern: self.pattern,
            recursive: self.recursive,
            file: self.file,
            show_all: self.all,
        })
    }
}

/// The `--help` text argh generates for [`Invocation`].
fn usage(program: &str) -> String {
    match Invocation::from_args(&[program], &["--help"]) {
        Err(EarlyExit { output, .. }) => output,
        Ok(_) => String::new(),
    }
}

/// Parse one command line, `args` excluding the program name.
pub fn parse_args(program: &str, args: &[&str]) -> Result<Command, InvalidArgs> {
    Invocation::from_args(&[program], args)
        .map_err(|EarlyExit { output, status }| InvalidArgs {
            output,
            is_error: status.is_err(),
        })?
        .into_command(program)
}

/// Every command the tool knows, plus whatever else was typed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandKind {
    Ls,
    Cd,
    Mkdir,
    Rmdir,
    Rm,
    Cp,
    Mv,
    Find,
    Cat,
    Logs,
    Pwd,
    Unknown(String),
}

impl From<&str> for CommandKind {
    fn from(name: &str) -> Self {
        match name {
            "ls" => CommandKind::Ls,
            "cd" => CommandKind::Cd,
            "mkdir" => CommandKind::Mkdir,
            "rmdir" => CommandKind::Rmdir,
            "rm" => CommandKind::Rm,
            "cp" => CommandKind::Cp,
            "mv" => CommandKind::Mv,
            "find" => CommandKind::Find,
            "cat" => CommandKind::Cat,
            "logs" => CommandKind::Logs,
            "pwd" => CommandKind::Pwd,
            other => CommandKind::Unknown(other.to_string()),
        }
    }
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CommandKind::Ls => "ls",
            CommandKind::Cd => "cd",
            CommandKind::Mkdir => "mkdir",
            CommandKind::Rmdir => "rmdir",
            CommandKind::Rm => "rm",
            CommandKind::Cp => "cp",
            CommandKind::Mv => "mv",
            CommandKind::Find => "find",
            CommandKind::Cat => "cat",
            CommandKind::Logs => "logs",
            CommandKind::Pwd => "pwd",
            CommandKind::Unknown(name) => name,
        };
        f.write_str(name)
    }
}

/// A parsed command line, consumed once by the interpreter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    /// Which handler runs the command.
    pub kind: CommandKind,
    /// The name as typed, used in the command log.
    pub name: String,
    /// First positional after the name; see [`Command::path`].
    pub path: Option<String>,
    /// Second positional, only read by `cp` and `mv`.
    pub destination: Option<String>,
    /// `-p`: substring searched for by `find`.
    pub pattern: Option<String>,
    /// `-r`: directory `rm` removes with its contents. Wins over `path`.
    pub recursive: Option<String>,
    /// `-f`: file printed by `cat`. Wins over `path`.
    pub file: Option<String>,
    /// `-a`: `ls` includes dot entries.
    pub show_all: bool,
}

impl Command {
    /// A bare command with no arguments.
    pub fn new(name: &str) -> Self {
        Self {
            kind: CommandKind::from(name),
            name: name.to_string(),
            path: None,
            destination: None,
            pattern: None,
            recursive: None,
            file: None,
            show_all: false,
        }
    }

    /// Builders mirroring the command-line flags, mostly for tests.
    pub fn with_path(mut self, path: &str) -> Self {
        self.path = Some(path.to_string());
        self
    }

    pub fn with_destination(mut self, destination: &str) -> Self {
        self.destination = Some(destination.to_string());
        self
    }

    pub fn with_pattern(mut self, pattern: &str) -> Self {
        self.pattern = Some(pattern.to_string());
        self
    }

    pub fn with_recursive(mut self, path: &str) -> Self {
        self.recursive = Some(path.to_string());
        self
    }

    pub fn with_file(mut self, file: &str) -> Self {
        self.file = Some(file.to_string());
        self
    }

    pub fn with_show_all(mut self) -> Self {
        self.show_all = true;
        self
    }

    /// The positional path, `.` when none was given.
    pub fn path(&self) -> &str {
        self.path.as_deref().unwrap_or(DEFAULT_PATH)
    }
}
