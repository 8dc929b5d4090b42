use crate::args::*;
use clap::Parser;
use colored::Colorize;
use debileweb_common::api::*;
use debileweb_common::errors::*;
use env_logger::Env;
use serde::Serialize;
use std::fs;
use std::io;
use std::io::prelude::*;

pub mod args;

fn print_json<S: Serialize>(x: &S) -> Result<()> {
    let mut stdout = io::stdout();
    serde_json::to_writer_pretty(&mut stdout, &x)?;
    stdout.write_all(b"\n")?;
    Ok(())
}

fn print_source_page(list: &SourceList) -> Result<()> {
    let mut stdout = io::stdout();
    for source in &list.sources {
        let label = format!("{} {}", source.name.green(), source.version.yellow());
        let jobs = format!(
            "{}/{} unfinished",
            source.unfinished_jobs, source.total_jobs
        );
        if writeln!(stdout, "{:-50} {:-24} => {}", label, source.group, jobs).is_err() {
            break;
        }
    }
    writeln!(
        stdout,
        "page {} of {} matching sources{}{}",
        list.page,
        list.total,
        if list.has_prev { " <prev" } else { "" },
        if list.has_next { " next>" } else { "" },
    )?;
    Ok(())
}

fn print_job_line(stdout: &mut io::Stdout, job: &JobItem) -> io::Result<()> {
    let label = format!("{} {} {}", job.check.bold(), job.source, job.version);
    let place = if let Some(builder) = &job.builder {
        builder.clone().yellow()
    } else {
        "unassigned".blue()
    };
    writeln!(stdout, "{:-50} {} on {}", label, job.state.fancy(), place)
}

async fn show_status(client: &Client) -> Result<()> {
    let dashboard = client.dashboard().await?;
    let mut stdout = io::stdout();

    writeln!(stdout, "{} jobs waiting for a builder", dashboard.pending_jobs)?;

    writeln!(stdout, "{}", "active jobs".bold())?;
    for job in &dashboard.active_jobs {
        if print_job_line(&mut stdout, job).is_err() {
            break;
        }
    }

    writeln!(stdout, "{}", "groups".bold())?;
    for (name, stats) in &dashboard.groups {
        let label = if stats.failed > 0 {
            name.clone().red()
        } else if stats.unfinished > 0 {
            name.clone().yellow()
        } else {
            name.clone().green()
        };
        writeln!(
            stdout,
            "{:-40} => {}/{} unfinished, {} failed",
            label, stats.unfinished, stats.total, stats.failed
        )?;
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let logging = match args.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    env_logger::init_from_env(Env::default().default_filter_or(logging));

    if args.color {
        debug!("Bypass tty detection and always use colors");
        colored::control::set_override(true);
    }

    let config =
        debileweb_common::config::load(args.config).context("Failed to load config file")?;
    let mut client = Client::new(config, args.endpoint)?;

    match args.subcommand {
        SubCommand::Status => show_status(&client).await?,
        SubCommand::Sources(Sources::Ls(args)) => {
            let list = client
                .list_sources(&ListSources {
                    filter: args.filter,
                    prefix: args.prefix,
                    maintainer: args.maintainer,
                    name: args.name,
                    group: args.group,
                    page: Some(args.page),
                })
                .await?;
            if args.json {
                print_json(&list)?;
            } else {
                print_source_page(&list)?;
            }
        }
        SubCommand::Sources(Sources::Show(args)) => {
            let detail = client
                .get_source(
                    &args.group,
                    &args.name,
                    &SourceQuery {
                        version: args.version,
                        run: args.run,
                    },
                )
                .await?;
            if args.json {
                print_json(&detail)?;
            } else {
                let mut stdout = io::stdout();
                writeln!(
                    stdout,
                    "{} {} (run {}) by {}, {}/{} jobs unfinished",
                    detail.source.name.green(),
                    detail.source.version.yellow(),
                    detail.source.run,
                    detail.source.uploader,
                    detail.unfinished,
                    detail.total,
                )?;
                for job in detail.source_jobs.iter().chain(&detail.binary_jobs) {
                    if print_job_line(&mut stdout, job).is_err() {
                        break;
                    }
                }
            }
        }
        SubCommand::Jobs(Jobs::Ls(args)) => {
            let list = client
                .list_jobs(&ListJobs {
                    builder: args.builder,
                    state: args.state,
                    check: args.check,
                    page: Some(args.page),
                })
                .await?;
            if args.json {
                print_json(&list)?;
            } else {
                let mut stdout = io::stdout();
                for job in &list.jobs {
                    if print_job_line(&mut stdout, job).is_err() {
                        break;
                    }
                }
                writeln!(stdout, "page {} of {} matching jobs", list.page, list.total)?;
            }
        }
        SubCommand::Jobs(Jobs::Show(args)) => {
            let report = client.get_job(args.id).await?;
            if args.json {
                print_json(&report)?;
            } else {
                let mut stdout = io::stdout();
                print_job_line(&mut stdout, &report.job)?;
                if let Some(runtime) = &report.runtime {
                    writeln!(stdout, "runtime: {}", runtime)?;
                }
                for dependency in &report.dependencies {
                    writeln!(stdout, "waits for: {}", dependency)?;
                }
                for result in &report.results {
                    writeln!(stdout, "result ({}): {}", result.kind, result.path)?;
                }
            }
        }
        SubCommand::Jobs(Jobs::Log(args)) => {
            let log = client.fetch_log(args.id).await?;
            io::stdout().write_all(&log)?;
        }
        SubCommand::Builders(Builders::Ls(args)) => {
            let builders = client.list_builders().await?;
            if args.json {
                print_json(&builders)?;
            } else {
                let mut stdout = io::stdout();
                for builder in builders {
                    let label = format!("{} ({})", builder.name.green(), builder.address.yellow());
                    let status = if !builder.online {
                        "offline".red()
                    } else if let Some(status) = builder.status {
                        status.bold()
                    } else {
                        "idle".blue()
                    };
                    if writeln!(stdout, "{:-40} => {}", label, status).is_err() {
                        break;
                    }
                }
            }
        }
        SubCommand::Builders(Builders::Show(args)) => {
            let detail = client.get_builder(&args.name).await?;
            if args.json {
                print_json(&detail)?;
            } else {
                let mut stdout = io::stdout();
                writeln!(
                    stdout,
                    "{} ({}), {} active jobs",
                    detail.builder.name.green(),
                    detail.builder.address.yellow(),
                    detail.active_jobs.len(),
                )?;
                for job in &detail.active_jobs {
                    if print_job_line(&mut stdout, job).is_err() {
                        break;
                    }
                }
            }
        }
        SubCommand::Import(args) => {
            let buf = fs::read_to_string(&args.file)
                .with_context(|| anyhow!("Failed to read from file: {:?}", args.file))?;
            let import = serde_json::from_str::<ImportRequest>(&buf)
                .context("Failed to parse farm state file")?;
            info!("Sending farm state to api...");
            client
                .with_auth_cookie()?
                .import(&import)
                .await
                .context("Failed to send import to daemon")?;
        }
        SubCommand::Completions(completions) => gen_completions(&completions)?,
    }

    Ok(())
}
