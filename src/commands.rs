//! Command router: one command, one token, one Graph call.

use std::fs;
use std::path::Path;
use tracing::info;
use uuid::Uuid;

use crate::auth::oauth::OAuth2Client;
use crate::cli::GraphCommand;
use crate::config::Config;
use crate::error::AppError;
use crate::graph::models::{first_value_id, object_id, B2C_EXTENSIONS_APP};
use crate::graph::{GraphClient, GraphRequest, GraphResponse};

/// Translate a command into its Graph request. Reads JSON body files.
pub fn build_request(command: &GraphCommand) -> Result<GraphRequest, AppError> {
    let request = match command {
        GraphCommand::GetUser(None) => GraphRequest::get_users(None),
        GraphCommand::GetUser(Some(arg)) => user_lookup(arg),
        GraphCommand::CreateUser { json_path } => GraphRequest::create_user(read_json(json_path)?),
        GraphCommand::UpdateUser {
            object_id,
            json_path,
        } => GraphRequest::update_user(object_id, read_json(json_path)?),
        GraphCommand::DeleteUser { object_id } => GraphRequest::delete_user(object_id),
        GraphCommand::GetExtensionAttribute { app_object_id } => {
            GraphRequest::get_extensions(app_object_id)
        }
        GraphCommand::CreateExtensionAttribute {
            app_object_id,
            json_path,
        } => GraphRequest::register_extension(app_object_id, read_json(json_path)?),
        GraphCommand::DeleteExtensionAttribute {
            app_object_id,
            extension_object_id,
        } => GraphRequest::unregister_extension(app_object_id, extension_object_id),
        GraphCommand::GetB2cApplication => GraphRequest::get_b2c_extensions_app(),
    };

    Ok(request)
}

/// GET-USER argument: a GUID is an object id, anything else is a query.
fn user_lookup(arg: &str) -> GraphRequest {
    if Uuid::parse_str(arg).is_ok() {
        GraphRequest::get_user_by_id(arg)
    } else {
        GraphRequest::get_users(Some(arg.to_string()))
    }
}

/// Body files are passed through verbatim, without schema checks.
fn read_json(path: &Path) -> Result<String, AppError> {
    fs::read_to_string(path).map_err(|source| AppError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Run a Graph command: build the request, acquire a token, send.
pub async fn execute(
    command: &GraphCommand,
    config: &Config,
) -> Result<GraphResponse, AppError> {
    let request = build_request(command)?;

    let oauth_client = OAuth2Client::new(config)?;
    let graph_client = GraphClient::new(config)?;

    info!(
        "Using tenant {} ({})",
        config.b2c.tenant,
        if config.environment.is_empty() {
            "default environment"
        } else {
            config.environment.as_str()
        }
    );

    let token = oauth_client.acquire_token(&config.b2c).await?;
    let response = graph_client.send(&request, &token).await?;

    info!("{}", response.status_line());
    Ok(response)
}

/// Follow-up suggestions derived from a successful response.
///
/// CREATE-USER needs the new `id`; GET-B2C-APPLICATION needs `value[0].id`.
/// Either one missing is `AppError::NotFound`.
pub fn follow_up_hints(
    command: &GraphCommand,
    response: &GraphResponse,
) -> Result<Vec<String>, AppError> {
    match command {
        GraphCommand::CreateUser { .. } => {
            let id = object_id(&response.body).ok_or_else(|| {
                AppError::NotFound("no 'id' in the Create-User response".to_string())
            })?;
            Ok(vec![
                format!("B2C user ID is {}", id),
                format!("e.g. b2c Get-User {}", id),
                format!("     b2c Update-User {} <path to json file>", id),
                format!("     b2c Delete-User {}", id),
            ])
        }
        GraphCommand::GetB2cApplication => {
            let id = first_value_id(&response.body).ok_or_else(|| {
                AppError::NotFound(format!(
                    "no application whose displayName starts with '{}'",
                    B2C_EXTENSIONS_APP
                ))
            })?;
            Ok(vec![
                format!("B2C application ID is {}", id),
                format!("Run b2c Get-Extension-Attribute {}", id),
            ])
        }
        GraphCommand::CreateExtensionAttribute { app_object_id, .. } => {
            Ok(object_id(&response.body)
                .map(|id| {
                    vec![
                        format!("Extension property ID is {}", id),
                        format!(
                            "To remove it: b2c Delete-Extension-Attribute {} {}",
                            app_object_id, id
                        ),
                    ]
                })
                .unwrap_or_default())
        }
        _ => Ok(Vec::new()),
    }
}
