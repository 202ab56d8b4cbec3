//! Full installation pipeline

use crate::{InstallReport, OpsCtx};
use nutforge_builder::{extract_archive, run_build};
use nutforge_errors::Error;
use nutforge_events::EventEmitter;
use nutforge_hash::Checksum;
use nutforge_install::{bootstrap_user_config, stage_install};
use nutforge_net::fetch_source;
use nutforge_types::Recipe;
use tokio::fs;

/// Install a package from its recipe
///
/// Phases run strictly in order, each consuming the previous phase's
/// artifact: resolve, acquire + verify, extract, build, stage, bootstrap.
/// Any error before staging leaves the prefix untouched.
///
/// # Errors
///
/// Returns the first fatal error from any phase. Bootstrap problems are
/// not errors; they surface as warning events.
pub async fn install(ctx: &OpsCtx, recipe: &Recipe) -> Result<InstallReport, Error> {
    let package = &recipe.package;
    ctx.tx
        .emit_operation_started(format!("install {package}"));

    // Dependencies first: a missing library must abort before anything is
    // fetched or written.
    let resolution = ctx.resolver.resolve(&recipe.dependencies, &ctx.tx).await?;

    let work = ctx
        .config
        .work_path()
        .join(format!("{}-{}", package.name, package.version));
    fs::create_dir_all(&work)
        .await
        .map_err(|e| Error::io_with_path(&e, &work))?;

    let expected = Checksum::from_hex(&package.sha256)?;
    let archive = work.join(format!("{}-{}.tar.gz", package.name, package.version));
    fetch_source(&ctx.net, &package.source_url, &archive, &expected, &ctx.tx).await?;

    let source_dir = extract_archive(&archive, &work.join("src"), &ctx.tx).await?;

    let artifact = run_build(&recipe.build, &resolution, &source_dir, &ctx.tx).await?;

    let prefix = ctx
        .config
        .prefix_path(&package.name, &package.version.to_string());
    let staged = stage_install(&prefix, &artifact, &source_dir, recipe, &ctx.tx).await?;

    let user_root = ctx.config.user_config_root(&package.name)?;
    let bootstrap = bootstrap_user_config(
        &prefix,
        &user_root,
        &recipe.resources,
        &package.display_name,
        &ctx.tx,
    )
    .await;

    ctx.tx
        .emit_operation_completed(format!("install {package}"), true);

    Ok(InstallReport {
        package: package.name.clone(),
        version: package.version.to_string(),
        prefix: staged.prefix,
        binary: staged.binary,
        staged_files: staged.staged_files.len(),
        themes_seeded: bootstrap.seeded,
        user_root: bootstrap.user_root,
    })
}
