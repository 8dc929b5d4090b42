mod args;

use crate::args::Args;
use clap::Parser;
use debileweb::config;
use debileweb::db;
use debileweb_common::errors::*;
use env_logger::Env;

#[actix_web::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let logging = match args.verbose {
        0 => "actix_web=debug,info",
        1 => "actix_web=debug,debileweb=debug,debileweb_common=debug,info",
        2 => "debug",
        3 => "debileweb=trace,debileweb_common=trace,debug",
        _ => "trace",
    };

    env_logger::init_from_env(Env::default().default_filter_or(logging));

    dotenvy::dotenv().ok();
    let config = config::load(args.config.as_deref())?;
    if args.check_config {
        println!("{:#?}", config);
    } else {
        let database = args
            .database
            .to_str()
            .ok_or_else(|| format_err!("Database path is not valid utf-8: {:?}", args.database))?;
        let pool = db::setup_pool(database)?;
        debileweb::run_config(pool, config).await?;
    }
    Ok(())
}
