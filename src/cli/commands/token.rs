use anyhow::Context;
use serde_json::json;

use crate::auth::{generate_jwt, Claims};
use crate::cli::utils::output_success;
use crate::cli::OutputFormat;

pub fn handle(user_id: i64, role_id: i64, output_format: OutputFormat) -> anyhow::Result<()> {
    let claims = Claims::new(user_id, role_id);
    let token = generate_jwt(&claims).context("failed to issue token (is JWT_SECRET set?)")?;
    match output_format {
        OutputFormat::Json => output_success(
            output_format,
            "Token issued",
            Some(json!({ "token": token, "tokenType": "Bearer", "expiresIn": claims.expires_in() })),
        ),
        OutputFormat::Text => {
            println!("{}", token);
            Ok(())
        }
    }
}
