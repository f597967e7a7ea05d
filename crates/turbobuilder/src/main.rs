//! TurboBuilder CLI - Generate, build, release, validate, sync and test projects

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use turbobuilder_core::phases::{self, ProjectContext};
use turbobuilder_core::setup::validate_builder_version;
use turbobuilder_core::templates::{build_zips, TemplateFetcher};
use turbobuilder_core::{console, RuntimePaths, Toolchain, BUILDER_VERSION};

#[derive(Parser, Debug)]
#[command(name = "turbobuilder")]
#[command(about = "Generate, build, release, validate, sync and test web and PHP projects")]
#[command(disable_version_flag = true, arg_required_else_help = true)]
pub struct Args {
    /// Generate a project of the given type in the current folder
    /// (lib_php, lib_ts, lib_js, site_php, server_php, app_angular, lib_angular, app_node_cmd)
    #[arg(
        short,
        long,
        value_name = "TYPE",
        conflicts_with_all = ["build", "release", "sync", "validate", "test", "clean"]
    )]
    pub generate: Option<String>,

    /// Build the project into target/<name>
    #[arg(short, long)]
    pub build: bool,

    /// Build a release into target/<name>-<version>
    #[arg(short, long)]
    pub release: bool,

    /// Sync the built or released files to the configured destination
    #[arg(short, long)]
    pub sync: bool,

    /// Run all the validation rules
    #[arg(short = 'l', long)]
    pub validate: bool,

    /// Run the configured unit tests
    #[arg(short, long)]
    pub test: bool,

    /// Delete the target folder
    #[arg(short, long)]
    pub clean: bool,

    /// Also empty the sync destinations when cleaning
    #[arg(long = "clean-sync", requires = "clean")]
    pub clean_sync: bool,

    /// Print the builder version
    #[arg(short = 'v', long)]
    pub version: bool,

    /// Local directory to use for templates instead of the embedded ones (for development use)
    #[arg(long = "template-dir", value_name = "DIR")]
    pub template_dir: Option<PathBuf>,

    /// Build zip files for all templates in the template directory (for development use)
    #[arg(long = "build-zips", requires = "template_dir")]
    pub build_zips: bool,

    /// Show debug logs
    #[arg(long)]
    pub verbose: bool,
}

impl Args {
    fn runs_project_phase(&self) -> bool {
        self.build || self.release || self.sync || self.validate || self.test
    }
}

fn init_logger(verbose: bool) {
    let default_filter = if verbose {
        "turbobuilder=debug,turbobuilder_core=debug,warn"
    } else {
        "warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .without_time()
                .compact(),
        )
        .init();
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    init_logger(args.verbose);

    if let Err(e) = run(args).await {
        console::error(format!("{:#}", e));
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<()> {
    if args.version {
        console::text(BUILDER_VERSION);
        return Ok(());
    }

    if args.build_zips {
        let dir = args
            .template_dir
            .as_deref()
            .context("--build-zips needs --template-dir")?;
        build_zips(dir).await?;
        return Ok(());
    }

    let paths = RuntimePaths::from_current_dir()?;
    let toolchain = Toolchain::from_env();

    if let Some(project_type) = &args.generate {
        let mut fetcher = match &args.template_dir {
            Some(dir) => TemplateFetcher::from_local(dir.clone()),
            None => TemplateFetcher::from_env()?,
        };
        return phases::generate(&paths, project_type, &mut fetcher).await;
    }

    if !args.clean && !args.runs_project_phase() {
        anyhow::bail!("Nothing to do. Run turbobuilder --help to see the available options");
    }

    if args.clean {
        phases::clean(&paths, &toolchain, args.clean_sync)?;
    }

    if !args.runs_project_phase() {
        return Ok(());
    }

    let ctx = ProjectContext::load(paths.clone(), toolchain.clone(), false)?;
    if let Some(warning) = validate_builder_version(&ctx.setup)? {
        console::warning(warning);
    }
    tracing::debug!(project_type = %ctx.project_type, version = %ctx.version, "loaded project");

    if args.build {
        phases::build(&ctx).await?;
    }

    let release_ctx = if args.release {
        let release_ctx = ProjectContext::load(paths, toolchain, true)?;
        phases::release(&release_ctx).await?;
        Some(release_ctx)
    } else {
        None
    };

    if args.validate && !args.build && !args.release {
        phases::validate(&ctx, true).await?;
    }

    if args.sync {
        phases::sync(release_ctx.as_ref().unwrap_or(&ctx), true)?;
    }

    if args.test {
        phases::test(&ctx).await?;
    }

    Ok(())
}
