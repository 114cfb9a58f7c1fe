use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, bail};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use log::{info, warn};

use vacancy_pivot::utils::io::export_report;
use vacancy_pivot::utils::logging::console::{print_report, print_roles};
use vacancy_pivot::utils::logging::{create_spinner, finish_and_clear, finish_progress_bar};
use vacancy_pivot::{
    AnalysisConfig, AnalysisSession, EmptyKeywordPolicy, Error, KeywordSet, MatchMode,
    RoleCatalog, RoleQuery, analyze, default_date_range,
};

/// Emerging job role analysis over vacancy postings
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the roles of a role catalog with their default keywords
    Roles {
        /// Role catalog CSV
        #[arg(short, long)]
        catalog: PathBuf,

        /// Write the catalog to this CSV file
        #[arg(short, long)]
        export: Option<PathBuf>,
    },
    /// Filter and aggregate vacancies for one or more roles
    Analyze(AnalyzeArgs),
}

#[derive(clap::Args, Debug)]
struct AnalyzeArgs {
    /// Vacancy table (CSV or Parquet)
    #[arg(short, long)]
    data: Option<PathBuf>,

    /// Role catalog CSV supplying default keywords
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// JSON configuration file; command-line options override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Role to analyze; repeat for several roles (default: every catalog role)
    #[arg(short, long)]
    role: Vec<String>,

    /// Comma-separated keywords replacing the catalog defaults
    #[arg(short, long)]
    keywords: Option<String>,

    /// First day of the range, YYYY-MM-DD (default: two years before last month)
    #[arg(long)]
    start: Option<NaiveDate>,

    /// Last day of the range, YYYY-MM-DD (default: end of last month)
    #[arg(long)]
    end: Option<NaiveDate>,

    /// Directory to write the report tables to as CSV
    #[arg(short, long)]
    export: Option<PathBuf>,

    /// Rows kept by the ranked views
    #[arg(long)]
    top_n: Option<usize>,

    /// Treat an empty keyword list as matching every row
    #[arg(long)]
    match_all_empty: bool,

    /// Match keywords as literal text instead of patterns
    #[arg(long)]
    literal: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match Args::parse().command {
        Command::Roles { catalog, export } => {
            let catalog = RoleCatalog::load(&catalog, AnalysisConfig::default().batch_size)
                .with_context(|| format!("loading role catalog {}", catalog.display()))?;
            print_roles(&catalog);
            if let Some(path) = export {
                catalog.export(&path)?;
                info!("Wrote {} roles to {}", catalog.len(), path.display());
            }
            Ok(())
        }
        Command::Analyze(args) => run_analyze(args),
    }
}

fn build_config(args: &AnalyzeArgs) -> anyhow::Result<AnalysisConfig> {
    let mut config = match &args.config {
        Some(path) => AnalysisConfig::from_json_file(path)?,
        None => AnalysisConfig::default(),
    };

    if let Some(data) = &args.data {
        config.data_path = Some(data.clone());
    }
    if let Some(catalog) = &args.catalog {
        config.catalog_path = Some(catalog.clone());
    }
    if let Some(top_n) = args.top_n {
        config.top_n = top_n;
    }
    if args.match_all_empty {
        config.empty_keywords = EmptyKeywordPolicy::MatchAll;
    }
    if args.literal {
        config.match_mode = MatchMode::Literal;
    }

    config.validate()?;
    Ok(config)
}

fn date_range(args: &AnalyzeArgs) -> anyhow::Result<(NaiveDate, NaiveDate)> {
    let Some((default_start, default_end)) = default_date_range(Local::now().date_naive()) else {
        bail!("could not compute the default date range");
    };
    Ok((
        args.start.unwrap_or(default_start),
        args.end.unwrap_or(default_end),
    ))
}

/// Build one query per requested role
fn build_queries(
    args: &AnalyzeArgs,
    config: &AnalysisConfig,
    catalog: Option<&RoleCatalog>,
) -> anyhow::Result<Vec<RoleQuery>> {
    let (start, end) = date_range(args)?;

    let roles: Vec<String> = if args.role.is_empty() {
        match catalog {
            Some(catalog) => catalog.roles().map(str::to_string).collect(),
            None => bail!("no role given and no role catalog to take roles from"),
        }
    } else {
        args.role.clone()
    };

    roles
        .into_iter()
        .map(|role| -> anyhow::Result<RoleQuery> {
            let profile = catalog.and_then(|catalog| catalog.lookup(&role));
            let keywords = match (&args.keywords, catalog) {
                (Some(raw), _) => KeywordSet::parse(raw, config.match_mode)?,
                (None, Some(catalog)) => catalog.require(&role)?.keyword_set(config.match_mode)?,
                (None, None) => bail!("no keywords given for role '{role}' and no role catalog"),
            };
            let query = RoleQuery::new(role, keywords, start, end)?;
            Ok(match profile {
                Some(profile) => query.with_description(profile.description.as_str()),
                None => query,
            })
        })
        .collect()
}

fn run_analyze(args: AnalyzeArgs) -> anyhow::Result<()> {
    let config = build_config(&args)?;

    let catalog = config
        .catalog_path
        .as_deref()
        .map(|path| {
            RoleCatalog::load(path, config.batch_size)
                .with_context(|| format!("loading role catalog {}", path.display()))
        })
        .transpose()?;

    let queries = build_queries(&args, &config, catalog.as_ref())?;

    let session = if config.data_path.is_some() {
        let spinner = create_spinner(Some("Loading vacancy data..."));
        let start = Instant::now();
        let session = AnalysisSession::open(config.clone())?;
        finish_progress_bar(
            &spinner,
            Some(&format!(
                "Loaded {} vacancies in {:?}",
                session.table().num_rows(),
                start.elapsed()
            )),
        );
        Some(session)
    } else {
        warn!("No vacancy data path given");
        None
    };

    for query in &queries {
        let spinner = create_spinner(Some(&format!("Analyzing {}...", query.role())));
        let result = match &session {
            Some(session) => session.analyze(query),
            None => analyze(None, query, &config),
        };
        finish_and_clear(&spinner);

        let report = match result {
            Ok(report) => report,
            Err(Error::InputMissing) => {
                println!("No data");
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        };

        print_report(&report)?;

        if let Some(dir) = &args.export {
            let dir = export_dir(dir, query.role(), queries.len());
            let written = export_report(&dir, &report)?;
            info!("Wrote {} report files to {}", written.len(), dir.display());
        }
    }

    Ok(())
}

/// Export directory for a role; several roles each get their own subdirectory
fn export_dir(base: &Path, role: &str, role_count: usize) -> PathBuf {
    if role_count <= 1 {
        return base.to_path_buf();
    }
    let slug: String = role
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect();
    base.join(slug)
}
