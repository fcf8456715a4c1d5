use clap::{crate_version, App, Arg};
use seihon::build;
use seihon::config::SiteConfig;
use seihon::log;
use std::path::Path;

fn main() {
    if let Err(e) = run() {
        log!("error"; "{:#}", e);
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let matches = App::new("seihon")
        .version(crate_version!())
        .about(
            "Renders a directory of markdown chapters into a static HTML site",
        )
        .arg(Arg::with_name("root").index(1).help(
            "The project root directory (defaults to the current directory)",
        ))
        .get_matches();

    let root = Path::new(matches.value_of("root").unwrap_or("."));
    let config = SiteConfig::load(root)?;
    build::build_site(&config)?;
    Ok(())
}
