/*
 * Monthly billing documents for a freelance engagement.
 *
 * Reads settings.json (client name, hourly rate, billing year/month, task
 * list) and produces two drafts under data/:
 * - 請求書 (invoice): the xlsx template with the period dates and one row
 *   per task filled in
 * - 作業報告書 (work report): the unpacked docx skeleton re-archived around
 *   a freshly rendered body
 *
 * Expected inputs under data/template/: 請求書.xlsx, document.xml and the
 * docx/ tree. A failure in one document never blocks the other; only a
 * missing or unparsable settings file stops the run.
 */

mod calendar;
mod cli;
mod layout;
mod report;
mod run;
mod settings;
mod spreadsheet;

use clap::Parser;
use crate::cli::Opts;

fn main() {
    pretty_env_logger::init();

    let opts = Opts::parse();

    if let Err(error) = run::run(opts.subcommand, &opts.settings) {
        eprintln!("{}", error);
        std::process::exit(1);
    }
}
