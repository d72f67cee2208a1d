//! Command handlers. Each writes its result to `out`.

use std::io::Write;

use anyhow::{bail, Context};
use covin_client::error::ClientError;
use covin_client::services::Services;
use covin_core::alert_form::AlertScreen;
use covin_core::dates::tomorrow_query_date;
use covin_core::matching::match_sessions;
use covin_core::types::DistrictId;
use covin_core::vaccine::VaccineType;

use crate::cli::{AlertCommand, AlertFields, Command};
use crate::render;

/// Run one command against `services`.
///
/// `confirm` is asked before anything destructive; it receives the
/// question and returns the user's answer.
pub async fn run<W, C>(
    command: Command,
    services: &Services,
    out: &mut W,
    confirm: C,
) -> anyhow::Result<()>
where
    W: Write,
    C: FnOnce(&str) -> bool,
{
    match command {
        Command::Districts => districts(services, out).await,
        Command::Centers {
            district,
            vaccine,
            available,
        } => centers(services, out, district, vaccine, available).await,
        Command::Directory { district } => directory(services, out, district).await,
        Command::Alert(AlertCommand::Show) => show_alert(services, out).await,
        Command::Alert(AlertCommand::Set(fields)) => set_alert(services, out, &fields).await,
        Command::Alert(AlertCommand::Delete { yes }) => {
            delete_alert(services, out, yes, confirm).await
        }
        Command::Alert(AlertCommand::Preview { vaccine }) => {
            preview_alert(services, out, vaccine).await
        }
    }
}

async fn districts<W: Write>(services: &Services, out: &mut W) -> anyhow::Result<()> {
    let districts = services
        .directory
        .districts()
        .await
        .context("Failed to load districts")?;
    out.write_all(render::districts(&districts).as_bytes())?;
    Ok(())
}

async fn centers<W: Write>(
    services: &Services,
    out: &mut W,
    district_id: DistrictId,
    vaccine: VaccineType,
    available_only: bool,
) -> anyhow::Result<()> {
    let (district, response) = futures::join!(
        services.directory.district(district_id),
        services.availability.find_centers(district_id, vaccine),
    );
    let response = response?;

    // The district name is only a label; a directory failure is not fatal here.
    let label = match district {
        Ok(Some(d)) => d.district_name,
        Ok(None) => district_id.to_string(),
        Err(e) => {
            tracing::warn!(error = %e, district_id, "District lookup failed");
            district_id.to_string()
        }
    };
    let tomorrow = tomorrow_query_date(chrono::Local::now().date_naive());
    let heading = format!("{label} - {vaccine} - {tomorrow}");

    out.write_all(render::centers(&heading, &response.centers, available_only).as_bytes())?;
    Ok(())
}

async fn directory<W: Write>(
    services: &Services,
    out: &mut W,
    district_id: DistrictId,
) -> anyhow::Result<()> {
    let centers = services
        .directory
        .centers(district_id)
        .await
        .context("Failed to load center directory")?;
    out.write_all(render::directory(&centers).as_bytes())?;
    Ok(())
}

async fn show_alert<W: Write>(services: &Services, out: &mut W) -> anyhow::Result<()> {
    let mut workflow = services.alert_workflow();
    let screen = workflow.load().await.map_err(signed_in_hint)?;

    let AlertScreen::Viewing(alert) = screen else {
        writeln!(out, "No alert registered. Create one with `covin-locator alert set`.")?;
        return Ok(());
    };

    let (district, names) = futures::join!(
        services.directory.district(alert.district_id),
        services.directory.center_names(alert.district_id),
    );
    let district = district.ok().flatten().map(|d| d.district_name);
    let names = names.unwrap_or_default();

    out.write_all(render::alert(alert, district.as_deref(), &names).as_bytes())?;
    Ok(())
}

async fn set_alert<W: Write>(
    services: &Services,
    out: &mut W,
    fields: &AlertFields,
) -> anyhow::Result<()> {
    let mut workflow = services.alert_workflow();
    workflow.load().await.map_err(signed_in_hint)?;
    workflow.edit();
    if let Some(draft) = workflow.draft_mut() {
        fields.apply(draft);
    }

    match workflow.submit().await {
        Ok(alert) => {
            writeln!(out, "Alert saved.")?;
            out.write_all(render::alert(&alert, None, &Default::default()).as_bytes())?;
            Ok(())
        }
        Err(ClientError::Validation(errors)) => {
            out.write_all(render::violations(&errors).as_bytes())?;
            bail!("{} invalid field(s)", errors.violations().len())
        }
        Err(e) => Err(signed_in_hint(e)),
    }
}

async fn delete_alert<W, C>(
    services: &Services,
    out: &mut W,
    yes: bool,
    confirm: C,
) -> anyhow::Result<()>
where
    W: Write,
    C: FnOnce(&str) -> bool,
{
    let mut workflow = services.alert_workflow();
    if workflow.load().await.map_err(signed_in_hint)?.alert().is_none() {
        writeln!(out, "No alert registered.")?;
        return Ok(());
    }

    let deleted = workflow
        .delete(|| yes || confirm("Delete your alert?"))
        .await
        .map_err(signed_in_hint)?;
    if deleted {
        writeln!(out, "Alert deleted.")?;
    } else {
        writeln!(out, "Kept your alert.")?;
    }
    Ok(())
}

async fn preview_alert<W: Write>(
    services: &Services,
    out: &mut W,
    vaccine: VaccineType,
) -> anyhow::Result<()> {
    let alert = services
        .alerts
        .get_alert(services.session.as_ref())
        .await
        .map_err(signed_in_hint)?;
    let Some(alert) = alert else {
        writeln!(out, "No alert registered.")?;
        return Ok(());
    };

    let response = services
        .availability
        .find_centers(alert.district_id, vaccine)
        .await?;
    let found = match_sessions(&alert, &response.centers);
    out.write_all(render::matches(&alert, &found).as_bytes())?;
    Ok(())
}

/// Point at the token variable when an alert call had no usable session.
fn signed_in_hint(err: ClientError) -> anyhow::Error {
    match err {
        ClientError::Auth(_) => anyhow::Error::new(err)
            .context("Sign in first: set COVIN_ACCESS_TOKEN to a current access token"),
        other => other.into(),
    }
}
