//! Update command - refresh the registry cache from the remote index

use anyhow::Result;
use portier_core::PortierConfig;
use portier_registry::RegistrySource;

use crate::cli::UpdateArgs;
use crate::output;

pub async fn run(_args: UpdateArgs) -> Result<()> {
    let config = PortierConfig::load_default()?;
    let source = RegistrySource::new(config.registry_url);

    match source.update().await {
        Ok(count) => {
            output::success(&format!(
                "Registry cache updated: {} packages ({})",
                count,
                source.cache_path().display()
            ));
            Ok(())
        }
        Err(e) => {
            // The local registry keeps working; this is advisory
            output::warning(&format!("Registry update failed: {}", e));
            output::info("The local registry is unchanged and still usable");
            std::process::exit(1);
        }
    }
}
