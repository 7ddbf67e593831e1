//! `fill` command: mounts every helper on an in-memory checkout form built
//! from the form profile, types a street query, selects a suggestion and
//! prints the resulting field states.

use std::sync::Arc;

use anyhow::{bail, Context};
use formfill_contact::{DialCodeSource, DialPicker};
use formfill_core::{load_form_profile, AppConfig, FieldId, Form, FormProfile, SelectOption};
use formfill_widgets::{mount, Page, Panel, QueryPhase};

use crate::lookup::registry_client;
use crate::{suggest_client, usage_counter};

/// Country options offered by the in-memory country selects. Values equal
/// their code so the printed form stays readable.
const COUNTRIES: [&str; 5] = ["CZ", "SK", "AT", "DE", "PL"];

pub(crate) async fn run_fill(
    config: &AppConfig,
    query: &str,
    pick: usize,
    path: Option<String>,
    ico: Option<&str>,
) -> anyhow::Result<()> {
    let profile = match &config.form_profile_path {
        Some(path) => load_form_profile(path)?,
        None => FormProfile::default(),
    };
    let form = profile_form(&profile);

    let page = Page {
        path: path.unwrap_or_else(|| config.checkout_route.clone()),
        form: form.clone(),
        profile,
        suggest: suggest_client(config)?,
        registry: registry_client(config)?,
        usage: usage_counter(config),
        dial: Some(Arc::new(DialPicker::new(Some("+420"))) as Arc<dyn DialCodeSource>),
    };
    let mounted = mount(page, config)?;

    let autocomplete = mounted
        .autocomplete
        .as_ref()
        .context("form profile has no address block")?;
    let street = autocomplete
        .streets()
        .into_iter()
        .next()
        .context("form profile has no address block")?;

    form.normalize(&street, query);
    autocomplete.on_input(&street);
    let phase = autocomplete.settled(&street).await;
    tracing::debug!(street = %street, phase = ?phase, "suggest query settled");

    match mounted.panel(&street).map(|p| p.panel()) {
        Some(Panel::Suggestions(rows)) => {
            for (i, row) in rows.iter().enumerate() {
                let marker = if i == pick { '>' } else { ' ' };
                println!("{marker}{i:>2}  {:<40} {}", row.main, row.secondary);
            }
        }
        Some(panel) => println!("{}", panel.message().unwrap_or("no suggestions")),
        None => {}
    }

    if phase == Some(QueryPhase::Rendered) {
        let available = autocomplete.results(&street).len();
        if pick >= available {
            bail!("--pick {pick} is out of range, only {available} suggestions shown");
        }
        autocomplete.click(&street, pick);
    }

    if let Some(ico) = ico {
        let registry = mounted
            .registry
            .as_ref()
            .context("form profile has no company identifier field")?;
        form.normalize(registry.field(), ico);
        registry.on_input();
        let phase = registry.settled().await;
        println!("registry: {phase:?}");
    }

    println!();
    for field in form.snapshot() {
        let marker = if field.marker_shown { "✓" } else { " " };
        println!(
            "{marker} {:<16} {:<32} {:?}",
            field.id.as_str(),
            field.value,
            field.validation
        );
    }
    println!("{}", autocomplete.usage_summary());
    Ok(())
}

/// Builds an empty form with every field the profile names. Country fields
/// become selects.
fn profile_form(profile: &FormProfile) -> Form {
    let form = Form::new();
    let countries = profile.marker_skip_list();
    let add = |id: &FieldId| {
        if form.has_field(id) {
            return;
        }
        if countries.contains(id) {
            form.add_select(id.clone(), country_options());
        } else {
            form.add_text_field(id.clone());
        }
    };

    for block in &profile.address_blocks {
        for id in [&block.street, &block.city, &block.zip]
            .into_iter()
            .chain(block.country.as_ref())
        {
            add(id);
        }
    }
    if let Some(registry) = &profile.registry {
        add(&registry.ico);
        for id in [
            &registry.vat_id,
            &registry.company,
            &registry.street,
            &registry.city,
            &registry.zip,
            &registry.country,
        ]
        .into_iter()
        .flatten()
        {
            add(id);
        }
    }
    for id in [&profile.contact.email, &profile.contact.phone]
        .into_iter()
        .flatten()
    {
        add(id);
    }
    form
}

fn country_options() -> Vec<SelectOption> {
    std::iter::once(SelectOption::new("", None))
        .chain(COUNTRIES.iter().map(|&code| SelectOption::new(code, Some(code))))
        .collect()
}
