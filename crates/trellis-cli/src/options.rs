use std::path::Path;

use anyhow::Result;
use trellis::Config;
use trellis_gen::GenerateOptions;

/// Generator options from `trellis.toml`, with directories resolved
/// against the config file's own directory
pub fn generate_options(config_path: &Path) -> Result<GenerateOptions> {
    let config = Config::load(config_path)?;
    let base = match config_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => Path::new(".").to_path_buf(),
    };
    let routing = config.routing;
    tracing::debug!(
        config = %config_path.display(),
        app_dir = %routing.app_dir,
        gen_dir = %routing.gen_dir,
        "loaded routing config"
    );

    Ok(GenerateOptions::new(
        base.join(&routing.app_dir),
        base.join(&routing.resolver_dir),
        base.join(&routing.gen_dir),
    )
    .with_view_model_namespace(routing.view_model_namespace)
    .with_app_context_type(routing.app_context_type)
    .with_template_ext(routing.template_ext)
    .with_live_bad_request_message(routing.live_bad_request_message))
}
