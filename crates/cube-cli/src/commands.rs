use std::env;

use anyhow::{Context, Result};
use tokio::runtime::Runtime;
use tracing::{debug, info_span};

use cube_client::ApiClient;
use cube_cli::config::{FileConfig, Overrides, resolve};
use cube_cli::logging::mask_secret;
use cube_cli::report::{ReportFormat, print_report, render_catalog};
use cube_model::RunResult;
use cube_validate::RunConfig;

use crate::cli::{CheckArgs, ConnectionArgs, ReportFormatArg};

pub fn run_check(connection: &ConnectionArgs, args: &CheckArgs) -> Result<RunResult> {
    let config = load_run_config(
        connection,
        Overrides {
            concurrency: args.concurrency,
            fail_fast: args.fail_fast,
            cubes: args.cubes.clone(),
            ..Overrides::default()
        },
    )?;
    let span = info_span!("check", api_url = %config.api_url);
    let _guard = span.enter();

    let result = runtime()?
        .block_on(cube_validate::run(&config))
        .context("cube validation did not start")?;
    print_report(&result, report_format(args.format)).context("render report")?;
    Ok(result)
}

pub fn run_cubes(connection: &ConnectionArgs) -> Result<()> {
    let config = load_run_config(connection, Overrides::default())?;
    let client =
        ApiClient::connect(&config.api_url, &config.credential).context("create API client")?;
    let catalog = runtime()?
        .block_on(client.fetch_catalog())
        .context("fetch cube catalog")?;
    println!("{}", render_catalog(&catalog));
    Ok(())
}

fn load_run_config(connection: &ConnectionArgs, overrides: Overrides) -> Result<RunConfig> {
    let working_dir = env::current_dir().context("resolve working directory")?;
    let file = FileConfig::discover(connection.config.as_deref(), &working_dir)?;
    let config = resolve(
        file,
        Overrides {
            api_url: connection.api_url.clone(),
            api_token: connection.api_token.clone(),
            ..overrides
        },
    )?;
    debug!(
        api_url = %config.api_url,
        credential = %mask_secret(&config.credential),
        concurrency = config.settings.concurrency_limit,
        fail_fast = config.settings.fail_fast,
        "Resolved configuration"
    );
    Ok(config)
}

fn runtime() -> Result<Runtime> {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("start async runtime")
}

fn report_format(format: ReportFormatArg) -> ReportFormat {
    match format {
        ReportFormatArg::Table => ReportFormat::Table,
        ReportFormatArg::Json => ReportFormat::Json,
    }
}
