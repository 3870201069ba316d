//! Print the OpenAPI document as JSON.

use std::io::Write;

use color_eyre::eyre::{Context, Result};
use taskboard::doc::ApiDoc;
use utoipa::OpenApi;

fn main() -> Result<()> {
    color_eyre::install()?;
    let document = ApiDoc::openapi()
        .to_pretty_json()
        .wrap_err("failed to serialise OpenAPI document")?;
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{document}").wrap_err("failed to write OpenAPI document")?;
    Ok(())
}
