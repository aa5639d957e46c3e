//! Terminal presentation: responses, follow-up hints, errors and usage text.

use colored::Colorize;
use std::error::Error;

use crate::error::AppError;
use crate::graph::models::pretty_json;
use crate::graph::GraphResponse;

const SYNTAX_NOTES: &[&str] = &[
    "- Square brackets indicate optional arguments",
    "- For information on supported query expressions, including $filter, $top, $orderby, and $expand, see https://docs.microsoft.com/en-us/graph/query-parameters",
    "- To find the objectId of the b2c-extensions-app, run Get-B2C-Application",
];

const SYNTAX_COMMANDS: &[(&str, &str)] = &[
    ("Get-User", "b2c Get-User [UserObjectId || Query]"),
    ("", "b2c Get-User 6d51065f-2e1d-4707-8ec9-ad491bae55dd"),
    ("", "b2c Get-User \"$filter=startswith(displayName,'a')\""),
    ("Create-User", "b2c Create-User RelativePathToJson"),
    ("", "b2c Create-User ./usertemplate-email.json"),
    ("Update-User", "b2c Update-User UserObjectId RelativePathToJson"),
    (
        "",
        "b2c Update-User 6d51065f-2e1d-4707-8ec9-ad491bae55dd ./usertemplate-email.json",
    ),
    ("Delete-User", "b2c Delete-User UserObjectId"),
    ("", "b2c Delete-User 6d51065f-2e1d-4707-8ec9-ad491bae55dd"),
    (
        "Get-Extension-Attribute",
        "b2c Get-Extension-Attribute B2CExtensionsApplicationObjectId",
    ),
    ("", "b2c Get-Extension-Attribute 909544d8-f8c0-49c7-b137-a89faff6f882"),
    (
        "Create-Extension-Attribute",
        "b2c Create-Extension-Attribute B2CExtensionsApplicationObjectId RelativePathToJson",
    ),
    (
        "",
        "b2c Create-Extension-Attribute 909544d8-f8c0-49c7-b137-a89faff6f882 ./extension.json",
    ),
    (
        "Delete-Extension-Attribute",
        "b2c Delete-Extension-Attribute B2CExtensionsApplicationObjectId ExtensionObjectId",
    ),
    ("Get-B2C-Application", "b2c Get-B2C-Application"),
    ("Help", "b2c Help"),
    ("Syntax", "b2c Syntax"),
];

const HELP_COMMANDS: &[(&str, &str)] = &[
    ("Get-User", "Read users from your B2C directory.  Optionally accepts an ObjectId or a query expression as a 2nd argument."),
    ("Create-User", "Create a new user in your B2C directory.  Requires a path to a .json file which contains required and optional information as a 2nd argument."),
    ("Update-User", "Update an existing user in your B2C directory.  Requires an objectId as a 2nd argument & a path to a .json file as a 3rd argument."),
    ("Delete-User", "Delete an existing user in your B2C directory.  Requires an objectId as a 2nd argument."),
    ("Get-Extension-Attribute", "Lists all extension attributes in your B2C directory.  Requires the b2c-extensions-app objectId as the 2nd argument."),
    ("Create-Extension-Attribute", "Registers a new extension attribute.  Requires the b2c-extensions-app objectId & a path to a .json file."),
    ("Delete-Extension-Attribute", "Removes an extension attribute.  Requires the b2c-extensions-app objectId & the extension property objectId."),
    ("Get-B2C-Application", "Get the B2C Extensions Application in your B2C directory, so you can retrieve the objectId and pass it to other commands."),
    ("Help", "Prints this help menu."),
    ("Syntax", "Gives syntax information for each command, along with examples."),
];

/// Rendered response body and whether it should be flagged.
pub struct RenderedBody {
    pub text: String,
    pub attention: bool,
}

/// Pretty-print a response body. A body mentioning `error` is flagged even on
/// 2xx; this only affects colouring.
pub fn render_body(response: &GraphResponse) -> Option<RenderedBody> {
    if response.body.trim().is_empty() {
        return None;
    }

    let text = pretty_json(&response.body);
    let attention = text.contains("error");
    Some(RenderedBody { text, attention })
}

pub fn print_response(response: &GraphResponse) {
    println!("{}", response.status_line().green());
    println!();

    if let Some(body) = render_body(response) {
        if body.attention {
            println!("{}", body.text.red());
        } else {
            println!("{}", body.text);
        }
    }
}

pub fn print_hints(hints: &[String]) {
    if hints.is_empty() {
        return;
    }
    println!();
    for hint in hints {
        println!("{}", hint.cyan());
    }
}

fn render_table(rows: &[(&str, &str)]) -> String {
    rows.iter()
        .map(|(name, text)| format!("{:<29}: {}", name, text))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn help_text() -> String {
    render_table(HELP_COMMANDS)
}

pub fn syntax_text() -> String {
    render_table(SYNTAX_COMMANDS)
}

pub fn print_help() {
    println!("{}", help_text().cyan());
}

pub fn print_syntax() {
    for note in SYNTAX_NOTES {
        println!("{}", note);
    }
    println!();
    println!("{}", syntax_text().cyan());
}

/// Error messages from the innermost cause outward.
pub fn error_chain(err: &AppError) -> Vec<String> {
    let mut messages = vec![err.to_string()];
    let mut source = err.source();
    while let Some(cause) = source {
        messages.push(cause.to_string());
        source = cause.source();
    }
    messages.reverse();
    messages
}

/// Print an error to stderr with an attention marker.
pub fn display_error(err: &AppError) {
    if let AppError::Usage(message) = err {
        eprintln!("{}", message.red());
        return;
    }

    for message in error_chain(err) {
        eprintln!("{} {}", "ERROR".red().bold(), message.red());
    }
}
