//! Command-line surface: global flags via clap, then a case-insensitive
//! command token with positional arguments.

use clap::{ArgAction, Parser};
use std::path::PathBuf;

use crate::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "b2c",
    about = "Manage users and extension attributes in an Azure AD B2C directory",
    version,
    after_help = "Run 'b2c Help' for the command list or 'b2c Syntax' for examples."
)]
pub struct Cli {
    /// Config file to use instead of the built-in defaults
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Command followed by its arguments, e.g. `Get-User <objectId>`
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, value_name = "COMMAND")]
    pub args: Vec<String>,
}

/// A recognised command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Static command list.
    Help,
    /// Static syntax examples.
    Syntax,
    /// One authenticated Graph call.
    Graph(GraphCommand),
}

/// A command that calls the Graph API, with its required arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphCommand {
    /// All users, a single user by object id, or a query.
    GetUser(Option<String>),
    CreateUser {
        json_path: PathBuf,
    },
    UpdateUser {
        object_id: String,
        json_path: PathBuf,
    },
    DeleteUser {
        object_id: String,
    },
    GetExtensionAttribute {
        app_object_id: String,
    },
    CreateExtensionAttribute {
        app_object_id: String,
        json_path: PathBuf,
    },
    DeleteExtensionAttribute {
        app_object_id: String,
        extension_object_id: String,
    },
    GetB2cApplication,
}

impl Command {
    /// Match the command token (case-insensitive) and check argument counts.
    ///
    /// Extra arguments are ignored. Missing ones produce `AppError::Usage`
    /// before anything touches the network.
    pub fn parse(args: &[String]) -> Result<Self, AppError> {
        let Some((token, rest)) = args.split_first() else {
            return Err(usage(
                "Please enter a command as the first argument.  Try 'b2c Help' for a list of commands.",
            ));
        };

        match token.to_uppercase().as_str() {
            "HELP" => Ok(Self::Help),
            "SYNTAX" => Ok(Self::Syntax),
            other => GraphCommand::parse(other, rest).map(Self::Graph),
        }
    }
}

impl GraphCommand {
    fn parse(token: &str, rest: &[String]) -> Result<Self, AppError> {
        let arg = |i: usize| rest.get(i).cloned();

        match token {
            "GET-USER" => Ok(Self::GetUser(arg(0))),
            "CREATE-USER" => match arg(0) {
                Some(path) => Ok(Self::CreateUser {
                    json_path: path.into(),
                }),
                None => Err(usage(
                    "Please include a path to a .json file.  Run b2c Syntax to see examples.",
                )),
            },
            "UPDATE-USER" => match (arg(0), arg(1)) {
                (Some(object_id), Some(path)) => Ok(Self::UpdateUser {
                    object_id,
                    json_path: path.into(),
                }),
                _ => Err(usage(
                    "Please include an objectId and a path to a .json file.  Run b2c Syntax to see examples.",
                )),
            },
            "DELETE-USER" => match arg(0) {
                Some(object_id) => Ok(Self::DeleteUser { object_id }),
                None => Err(usage(
                    "Please include an objectId.  Run b2c Syntax to see examples.",
                )),
            },
            "GET-EXTENSION-ATTRIBUTE" => match arg(0) {
                Some(app_object_id) => Ok(Self::GetExtensionAttribute { app_object_id }),
                None => Err(usage(
                    "Please include the b2c-extensions-app objectId.  Run b2c Syntax to see examples.",
                )),
            },
            "CREATE-EXTENSION-ATTRIBUTE" => match (arg(0), arg(1)) {
                (Some(app_object_id), Some(path)) => Ok(Self::CreateExtensionAttribute {
                    app_object_id,
                    json_path: path.into(),
                }),
                _ => Err(usage(
                    "Please include the b2c-extensions-app objectId and a path to a .json file.  Run b2c Syntax to see examples.",
                )),
            },
            "DELETE-EXTENSION-ATTRIBUTE" => match (arg(0), arg(1)) {
                (Some(app_object_id), Some(extension_object_id)) => {
                    Ok(Self::DeleteExtensionAttribute {
                        app_object_id,
                        extension_object_id,
                    })
                }
                _ => Err(usage(
                    "Please include the b2c-extensions-app objectId and the extension property objectId.  Run b2c Syntax to see examples.",
                )),
            },
            "GET-B2C-APPLICATION" => Ok(Self::GetB2cApplication),
            _ => Err(usage(
                "Invalid command.  Try 'b2c Help' for a list of commands.",
            )),
        }
    }
}

fn usage(message: &str) -> AppError {
    AppError::Usage(message.to_string())
}
