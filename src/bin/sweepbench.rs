use std::{
    io::{Write, stdout},
    num::NonZeroU32,
    path::PathBuf,
};

use anyhow::{Result, bail};
use clap::Parser;

use sweepbench::{
    checkout::{BuildFailurePolicy, GitCheckoutBuild},
    config::SweepConfig,
    config_file::{FILE_EXTENSIONS, LoadConfigFile, save_config_file},
    dimension::Dimension,
    get_terminal_width::get_terminal_width,
    group::{group_rows, write_groups},
    info,
    io_utils::bash::cmd_as_bash_string,
    row::ResultSet,
    serde::{git_branch_name::GitBranchName, task::Task},
    sweep::{PlanStep, runner::run_sweep},
    utillib::logging::{LogLevel, LogLevelOpt, set_log_level},
};

const PROGRAM_NAME: &str = "sweepbench";
const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(clap::Parser, Debug)]
#[command(
    next_line_help = true,
    term_width = get_terminal_width(4),
    bin_name = "sweepbench",
)]
/// Run an external benchmark program over a sweep of parameters and
/// write the averaged tick counts to data files for plotting.
struct Opts {
    #[clap(flatten)]
    log_level: LogLevelOpt,

    /// Path to the config file (default: `./sweepbench.*` where a
    /// single one exists where the `*` is the suffix for one of the
    /// supported config file formats (run `config-formats` to get the
    /// list); if none exists, use the compiled-in defaults)
    #[clap(long)]
    config: Option<PathBuf>,

    /// The subcommand to run. Use `--help` after the sub-command to
    /// get a list of the allowed options there.
    #[clap(subcommand)]
    subcommand: SubCommand,
}

/// Command line overrides for the config file settings.
#[derive(clap::Args, Debug)]
struct SweepOverrides {
    /// Branches to check out and build before benchmarking, comma
    /// separated
    #[clap(long)]
    branch: Option<Dimension<GitBranchName>>,

    /// Do not check out or build anything, benchmark the current
    /// executable
    #[clap(long, conflicts_with = "branch")]
    no_branch: bool,

    /// Maximum key value(s): `N`, `N,M,..` or `FROM..=TO[:STEP]`
    #[clap(short, long)]
    key_max: Option<Dimension<u64>>,

    /// Thread count(s), same syntax as `--key-max`
    #[clap(short, long)]
    threads: Option<Dimension<u64>>,

    /// Iteration count(s), same syntax as `--key-max`
    #[clap(short, long)]
    iters: Option<Dimension<u64>>,

    /// Task token(s) passed via `-a`, comma separated
    #[clap(short = 'a', long)]
    task: Option<Dimension<Task>>,

    /// Number of runs averaged per combination
    #[clap(short = 'n', long)]
    repeats: Option<NonZeroU32>,

    /// The program to benchmark
    #[clap(long)]
    program: Option<PathBuf>,

    /// What to do if checking out or building a branch fails (abort,
    /// continue)
    #[clap(long)]
    on_build_failure: Option<BuildFailurePolicy>,
}

impl SweepOverrides {
    fn apply(self, config: &mut SweepConfig) {
        let Self {
            branch,
            no_branch,
            key_max,
            threads,
            iters,
            task,
            repeats,
            program,
            on_build_failure,
        } = self;
        if no_branch {
            config.branch = None;
        }
        if let Some(branch) = branch {
            config.branch = Some(branch);
        }
        if let Some(key_max) = key_max {
            config.key_max = key_max;
        }
        if let Some(threads) = threads {
            config.threads = threads;
        }
        if let Some(iters) = iters {
            config.iters = iters;
        }
        if let Some(task) = task {
            config.task = task;
        }
        if let Some(repeats) = repeats {
            config.repeats = repeats;
        }
        if let Some(program) = program {
            config.executable.program = program;
        }
        if let Some(on_build_failure) = on_build_failure {
            config.repository.on_build_failure = on_build_failure;
        }
    }
}

#[derive(clap::Subcommand, Debug)]
enum SubCommand {
    /// Print the version
    Version,

    /// Show the supported config format types.
    ConfigFormats,

    /// Re-encode the effective config (serialization type determined
    /// by file extension) and save at the given path.
    ConfigSave {
        #[clap(flatten)]
        overrides: SweepOverrides,

        output_path: PathBuf,
    },

    /// Run the sweep, then group the rows by their first column and
    /// write one `<key>.data` file per group.
    Run {
        #[clap(flatten)]
        overrides: SweepOverrides,

        /// Where to write the data files (default: from config, `.`)
        #[clap(short, long)]
        output_dir: Option<PathBuf>,

        /// Only show what would be run
        #[clap(long)]
        dry_run: bool,
    },

    /// Run the sweep and print the rows to stdout.
    Sweep {
        #[clap(flatten)]
        overrides: SweepOverrides,

        /// Print JSON instead of tab separated values
        #[clap(long)]
        json: bool,
    },
}

fn print_plan(config: &SweepConfig) -> Result<()> {
    let params = config.sweep_parameters();
    let mut out = stdout().lock();
    writeln!(
        out,
        "# {} combinations, each run {} times",
        params.combinations(),
        params.repeats
    )?;
    for step in params.plan() {
        match step {
            PlanStep::SwitchBranch(branch) => {
                writeln!(out, "{}", config.repository.describe_switch(branch))?
            }
            PlanStep::Measure(point) => writeln!(
                out,
                "{}",
                cmd_as_bash_string(&config.executable.command(&point))
            )?,
        }
    }
    Ok(())
}

fn sweep(config: &SweepConfig) -> Result<ResultSet> {
    let params = config.sweep_parameters();
    info!(
        "sweeping {} combinations, varying: {:?}",
        params.combinations(),
        params.varying()
    );
    run_sweep(
        &params,
        GitCheckoutBuild::new(config.repository.clone()),
        config.executable.clone(),
    )
}

fn print_result_set(config: &SweepConfig, result: &ResultSet, json: bool) -> Result<()> {
    let mut out = stdout().lock();
    if json {
        serde_json::to_writer(&mut out, result)?;
        writeln!(out)?;
    } else {
        let mut header = config.sweep_parameters().varying();
        header.push("avg");
        writeln!(out, "# {}", header.join("\t"))?;
        for row in result.rows() {
            writeln!(out, "{}", row.to_tsv_line())?;
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let Opts {
        log_level,
        config,
        subcommand,
    } = Opts::parse();
    set_log_level(LogLevel::try_from(log_level)?);

    let load_config = |overrides: SweepOverrides| -> Result<SweepConfig> {
        let mut config = SweepConfig::load_config(config.as_ref())?;
        overrides.apply(&mut config);
        Ok(config)
    };

    match subcommand {
        SubCommand::Version => println!("{PROGRAM_NAME} version {VERSION}"),

        SubCommand::ConfigFormats => {
            println!("These configuration file formats are supported:");
            for (extension, backend) in FILE_EXTENSIONS {
                println!("  .{extension}\t{}", backend.format_name());
            }
        }

        SubCommand::ConfigSave {
            overrides,
            output_path,
        } => {
            let config = load_config(overrides)?;
            save_config_file(&output_path, &config)?;
        }

        SubCommand::Run {
            overrides,
            output_dir,
            dry_run,
        } => {
            let mut config = load_config(overrides)?;
            if let Some(output_dir) = output_dir {
                config.output_dir = output_dir;
            }
            if dry_run {
                return print_plan(&config);
            }
            let params = config.sweep_parameters();
            if params.varying().len() < 2 {
                bail!(
                    "writing data files needs at least 2 varying dimensions \
                     (group key and x), but only {:?} vary; use the `sweep` \
                     subcommand to just print the results",
                    params.varying()
                )
            }
            let result = sweep(&config)?;
            let groups = group_rows(result.rows())?;
            for path in write_groups(&groups, &config.output_dir)? {
                println!("{}", path.to_string_lossy());
            }
        }

        SubCommand::Sweep { overrides, json } => {
            let config = load_config(overrides)?;
            let result = sweep(&config)?;
            print_result_set(&config, &result, json)?;
        }
    }

    Ok(())
}
