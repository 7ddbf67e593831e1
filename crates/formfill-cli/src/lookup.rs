//! `lookup` command: fetches one registry record and prints the values it
//! would write into the checkout form.

use formfill_core::AppConfig;
use formfill_registry::{sanitize_ico, CompanyFill, RegistryClient};

pub(crate) fn registry_client(config: &AppConfig) -> anyhow::Result<RegistryClient> {
    let client = RegistryClient::with_base_url(
        config.request_timeout_secs,
        &config.user_agent,
        &config.registry_base_url,
    )?;
    Ok(client)
}

/// # Errors
///
/// Returns an error if the identifier fails the checksum, the registry does
/// not know it, or the request fails.
pub(crate) async fn run_lookup(config: &AppConfig, raw: &str) -> anyhow::Result<()> {
    let ico = sanitize_ico(raw);
    let client = registry_client(config)?;
    let record = client.fetch(&ico).await?;

    let Some(fill) = CompanyFill::from_record(&record) else {
        println!("{ico}: record has no legal name, nothing to fill");
        return Ok(());
    };
    println!("company  {}", fill.company);
    println!("vat id   {}", fill.vat_id);
    println!("street   {}", fill.street);
    println!("city     {}", fill.city);
    println!("zip      {}", fill.zip);
    println!("country  {}", fill.country);
    Ok(())
}
