//! Command-line vocabulary of the `wfshade` binary.
//!
//! [`parse_args`] turns `argv` into an [`Invocation`]; [`Command::execute`]
//! runs it against any [`ShaderControl`] backend.  Shader arguments may be
//! relative on the command line but are made absolute (see
//! [`Command::resolve_paths`]) before anything is sent, because the
//! compositor resolves paths against its own working directory.

use crate::ipc::message::Response;
use crate::traits::{ShaderControl, ViewId};
use std::fmt;
use std::path::{Path, PathBuf};

pub const USAGE: &str = "\
usage: wfshade [--socket <path>] <command> [args]

commands:
  set-view   <view-id> <shader>   apply a shader to a view
  unset-view <view-id>            remove a view's shader
  view-has   <view-id>            report whether a view has a shader
  set-fs     <output> <shader>    apply a fullscreen shader to an output
  unset-fs   <output>             remove an output's fullscreen shader
  fs-has     <output>             report whether an output has a fullscreen shader
  toggle-fs  <output> <shader>    remove the output's shader if set, else apply <shader>

The socket defaults to the config file's \"socket\" or $WAYFIRE_SOCKET.";

/// One shader operation requested on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    SetView { view: ViewId, shader: PathBuf },
    UnsetView { view: ViewId },
    ViewHas { view: ViewId },
    SetFs { output: String, shader: PathBuf },
    UnsetFs { output: String },
    FsHas { output: String },
    ToggleFs { output: String, shader: PathBuf },
}

/// A parsed command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// `--socket` override.
    pub socket: Option<PathBuf>,
    pub command: Command,
}

/// What a command produced.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Set/unset acknowledgement (possibly carrying a compositor error).
    Ack(Response),
    /// Answer to a query.
    Flag(bool),
    /// Toggle result and whether a shader is active afterwards.
    Toggled(Response, bool),
}

impl Outcome {
    /// Failure the compositor reported inside an acknowledgement.
    pub fn remote_error(&self) -> Option<&str> {
        match self {
            Outcome::Ack(r) | Outcome::Toggled(r, _) => r.error(),
            Outcome::Flag(_) => None,
        }
    }
}

/// Problems with the command line itself.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    #[error("no command given")]
    NoCommand,
    #[error("unknown command: {0:?}")]
    UnknownCommand(String),
    #[error("{command}: missing <{argument}>")]
    MissingArgument {
        command: &'static str,
        argument: &'static str,
    },
    #[error("unexpected argument: {0:?}")]
    UnexpectedArgument(String),
    #[error("invalid view id {0:?}: expected a non-negative integer")]
    InvalidViewId(String),
    #[error("--socket requires a path")]
    MissingSocketPath,
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::SetView { view, shader } => write!(f, "set-view {} {}", view, shader.display()),
            Command::UnsetView { view } => write!(f, "unset-view {}", view),
            Command::ViewHas { view } => write!(f, "view-has {}", view),
            Command::SetFs { output, shader } => write!(f, "set-fs {} {}", output, shader.display()),
            Command::UnsetFs { output } => write!(f, "unset-fs {}", output),
            Command::FsHas { output } => write!(f, "fs-has {}", output),
            Command::ToggleFs { output, shader } => {
                write!(f, "toggle-fs {} {}", output, shader.display())
            }
        }
    }
}

fn parse_view_id(s: &str) -> Result<ViewId, CommandError> {
    s.trim()
        .parse()
        .map_err(|_| CommandError::InvalidViewId(s.to_string()))
}

/// Parse `args` (without the program name).
///
/// Returns `Ok(None)` when help was requested.
pub fn parse_args<I>(args: I) -> Result<Option<Invocation>, CommandError>
where
    I: IntoIterator<Item = String>,
{
    let mut args = args.into_iter();
    let mut socket = None;

    let name = loop {
        match args.next() {
            None => return Err(CommandError::NoCommand),
            Some(a) if a == "-h" || a == "--help" => return Ok(None),
            Some(a) if a == "--socket" => {
                socket = Some(PathBuf::from(args.next().ok_or(CommandError::MissingSocketPath)?));
            }
            Some(a) if a.starts_with("--socket=") => {
                let p = &a["--socket=".len()..];
                if p.is_empty() {
                    return Err(CommandError::MissingSocketPath);
                }
                socket = Some(PathBuf::from(p));
            }
            Some(a) => break a,
        }
    };

    let mut positional = |command: &'static str, argument: &'static str| {
        args.next()
            .ok_or(CommandError::MissingArgument { command, argument })
    };

    let command = match name.as_str() {
        "set-view" => Command::SetView {
            view: parse_view_id(&positional("set-view", "view-id")?)?,
            shader: positional("set-view", "shader")?.into(),
        },
        "unset-view" => Command::UnsetView {
            view: parse_view_id(&positional("unset-view", "view-id")?)?,
        },
        "view-has" => Command::ViewHas {
            view: parse_view_id(&positional("view-has", "view-id")?)?,
        },
        "set-fs" => Command::SetFs {
            output: positional("set-fs", "output")?,
            shader: positional("set-fs", "shader")?.into(),
        },
        "unset-fs" => Command::UnsetFs {
            output: positional("unset-fs", "output")?,
        },
        "fs-has" => Command::FsHas {
            output: positional("fs-has", "output")?,
        },
        "toggle-fs" => Command::ToggleFs {
            output: positional("toggle-fs", "output")?,
            shader: positional("toggle-fs", "shader")?.into(),
        },
        _ => return Err(CommandError::UnknownCommand(name)),
    };

    if let Some(extra) = args.next() {
        return Err(CommandError::UnexpectedArgument(extra));
    }
    Ok(Some(Invocation { socket, command }))
}

impl Command {
    /// Make shader paths absolute relative to `cwd`.
    pub fn resolve_paths(self, cwd: &Path) -> Self {
        let abs = |p: PathBuf| if p.is_absolute() { p } else { cwd.join(p) };
        match self {
            Command::SetView { view, shader } => Command::SetView {
                view,
                shader: abs(shader),
            },
            Command::SetFs { output, shader } => Command::SetFs {
                output,
                shader: abs(shader),
            },
            Command::ToggleFs { output, shader } => Command::ToggleFs {
                output,
                shader: abs(shader),
            },
            other => other,
        }
    }

    /// Run the command against `ctl`.
    pub fn execute<S: ShaderControl>(&self, ctl: &S) -> Result<Outcome, S::Error> {
        Ok(match self {
            Command::SetView { view, shader } => Outcome::Ack(ctl.set_view_shader(*view, shader)?),
            Command::UnsetView { view } => Outcome::Ack(ctl.unset_view_shader(*view)?),
            Command::ViewHas { view } => Outcome::Flag(ctl.view_has_shader(*view)?),
            Command::SetFs { output, shader } => Outcome::Ack(ctl.set_fs_shader(output, shader)?),
            Command::UnsetFs { output } => Outcome::Ack(ctl.unset_fs_shader(output)?),
            Command::FsHas { output } => Outcome::Flag(ctl.fs_has_shader(output)?),
            Command::ToggleFs { output, shader } => {
                let (resp, active) = ctl.toggle_fs_shader(output, shader)?;
                Outcome::Toggled(resp, active)
            }
        })
    }

    /// Line to print for `outcome`, if the command reports anything.
    pub fn summary(&self, outcome: &Outcome) -> Option<String> {
        match (self, outcome) {
            (Command::ViewHas { view }, Outcome::Flag(b)) => {
                Some(format!("View {} has shader: {}", view, b))
            }
            (Command::FsHas { output }, Outcome::Flag(b)) => {
                Some(format!("Output {} has shader: {}", output, b))
            }
            (Command::ToggleFs { output, .. }, Outcome::Toggled(_, active)) => {
                Some(format!("Output {} has shader: {}", output, active))
            }
            _ => None,
        }
    }
}
