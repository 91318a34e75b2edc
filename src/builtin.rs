use crate::command::{Command, CommandKind};
use crate::command_log::LogSink;
use crate::error::{FsError, Result};
use crate::ops::FileOps;
use crate::store::WorkingDirectoryStore;
use std::io::Write;

/// A command implementation.
///
/// Handlers render results to `stdout` and return failures untouched; the
/// interpreter decides how failures are shown and logged.
pub(crate) type Handler<S> =
    fn(&Command, &mut FileOps<S>, &dyn LogSink, &mut dyn Write) -> Result<()>;

/// Dispatch table: the handler for each known command, `None` for unknown names.
pub(crate) fn handler_for<S: WorkingDirectoryStore>(kind: &CommandKind) -> Option<Handler<S>> {
    let handler: Handler<S> = match kind {
        CommandKind::Ls => ls,
        CommandKind::Cd => cd,
        CommandKind::Mkdir => mkdir,
        CommandKind::Rmdir => rmdir,
        CommandKind::Rm => rm,
        CommandKind::Cp => cp,
        CommandKind::Mv => mv,
        CommandKind::Find => find,
        CommandKind::Cat => cat,
        CommandKind::Logs => logs,
        CommandKind::Pwd => pwd,
        CommandKind::Unknown(_) => return None,
    };
    Some(handler)
}

fn ls<S: WorkingDirectoryStore>(
    cmd: &Command,
    ops: &mut FileOps<S>,
    _log: &dyn LogSink,
    stdout: &mut dyn Write,
) -> Result<()> {
    for entry in ops.list(cmd.path(), cmd.show_all)? {
        let suffix = if entry.is_dir { "/" } else { "" };
        writeln!(stdout, "{}{}", entry.name, suffix)?;
    }
    Ok(())
}

fn cd<S: WorkingDirectoryStore>(
    cmd: &Command,
    ops: &mut FileOps<S>,
    _log: &dyn LogSink,
    _stdout: &mut dyn Write,
) -> Result<()> {
    ops.change_directory(cmd.path()).map(drop)
}

fn mkdir<S: WorkingDirectoryStore>(
    cmd: &Command,
    ops: &mut FileOps<S>,
    _log: &dyn LogSink,
    _stdout: &mut dyn Write,
) -> Result<()> {
    ops.create_directory(cmd.path()).map(drop)
}

fn rmdir<S: WorkingDirectoryStore>(
    cmd: &Command,
    ops: &mut FileOps<S>,
    _log: &dyn LogSink,
    stdout: &mut dyn Write,
) -> Result<()> {
    let removed = ops.remove_empty_directory(cmd.path())?;
    writeln!(
        stdout,
        "Empty directory '{}' removed successfully.",
        removed.display()
    )?;
    Ok(())
}

/// `rm -r <dir>` removes a tree, plain `rm <file>` a single file.
fn rm<S: WorkingDirectoryStore>(
    cmd: &Command,
    ops: &mut FileOps<S>,
    _log: &dyn LogSink,
    stdout: &mut dyn Write,
) -> Result<()> {
    match cmd.recursive.as_deref() {
        Some(target) => {
            if let Some(ignored) = cmd.path.as_deref() {
                tracing::warn!(ignored, recursive = target, "rm: -r given, ignoring path");
            }
            let removed = ops.remove_directory_recursive(target)?;
            writeln!(
                stdout,
                "Directory '{}' and its contents removed recursively.",
                removed.display()
            )?;
        }
        None => {
            let removed = ops.remove_file(cmd.path())?;
            writeln!(stdout, "File '{}' removed successfully.", removed.display())?;
        }
    }
    Ok(())
}

fn cp<S: WorkingDirectoryStore>(
    cmd: &Command,
    ops: &mut FileOps<S>,
    _log: &dyn LogSink,
    stdout: &mut dyn Write,
) -> Result<()> {
    let destination = cmd
        .destination
        .as_deref()
        .ok_or(FsError::MissingArgument("destination"))?;
    let transfer = ops.copy(cmd.path(), destination)?;
    let what = if transfer.is_dir { "Directory" } else { "File" };
    writeln!(
        stdout,
        "{} '{}' copied to '{}'.",
        what,
        transfer.source.display(),
        transfer.destination.display()
    )?;
    Ok(())
}

fn mv<S: WorkingDirectoryStore>(
    cmd: &Command,
    ops: &mut FileOps<S>,
    _log: &dyn LogSink,
    stdout: &mut dyn Write,
) -> Result<()> {
    let destination = cmd
        .destination
        .as_deref()
        .ok_or(FsError::MissingArgument("destination"))?;
    let transfer = ops.move_entry(cmd.path(), destination)?;
    writeln!(
        stdout,
        "Moved '{}' to '{}'.",
        transfer.source.display(),
        transfer.destination.display()
    )?;
    Ok(())
}

fn find<S: WorkingDirectoryStore>(
    cmd: &Command,
    ops: &mut FileOps<S>,
    _log: &dyn LogSink,
    stdout: &mut dyn Write,
) -> Result<()> {
    let pattern = cmd
        .pattern
        .as_deref()
        .ok_or(FsError::MissingArgument("--pattern"))?;
    let matches = ops.find(cmd.path(), pattern)?;

    if matches.is_empty() {
        writeln!(
            stdout,
            "No files/directories matching the pattern '{}' found.",
            pattern
        )?;
        return Ok(());
    }
    writeln!(stdout, "Matching files/directories:")?;
    for path in matches {
        writeln!(stdout, "{}", path.display())?;
    }
    Ok(())
}

/// Prints the `-f` file, or the positional path when `-f` is absent.
fn cat<S: WorkingDirectoryStore>(
    cmd: &Command,
    ops: &mut FileOps<S>,
    _log: &dyn LogSink,
    stdout: &mut dyn Write,
) -> Result<()> {
    let file = cmd
        .file
        .as_deref()
        .or(cmd.path.as_deref())
        .ok_or(FsError::MissingArgument("--file"))?;
    let contents = ops.cat(file)?;

    stdout.write_all(contents.as_bytes())?;
    if !contents.is_empty() && !contents.ends_with('\n') {
        writeln!(stdout)?;
    }
    Ok(())
}

fn logs<S: WorkingDirectoryStore>(
    _cmd: &Command,
    _ops: &mut FileOps<S>,
    log: &dyn LogSink,
    stdout: &mut dyn Write,
) -> Result<()> {
    match log.contents()? {
        Some(text) => stdout.write_all(text.as_bytes())?,
        None => writeln!(stdout, "No logs available.")?,
    }
    Ok(())
}

fn pwd<S: WorkingDirectoryStore>(
    _cmd: &Command,
    ops: &mut FileOps<S>,
    _log: &dyn LogSink,
    stdout: &mut dyn Write,
) -> Result<()> {
    writeln!(stdout, "{}", ops.working_directory().display())?;
    Ok(())
}
