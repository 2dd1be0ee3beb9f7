use bramble::build::build_site;
use bramble::config::Config;
use clap::{App, Arg};
use std::path::Path;

fn main() {
    let matches = App::new("bramble")
        .about("Builds the blog into a directory of static HTML pages")
        .arg(
            Arg::with_name("output")
                .short("o")
                .long("output")
                .value_name("DIR")
                .help("The directory into which the site is built")
                .takes_value(true)
                .required(true),
        )
        .arg(
            Arg::with_name("project")
                .value_name("PROJECT_DIR")
                .help("The project directory; defaults to the current directory")
                .index(1),
        )
        .get_matches();

    let project_dir = matches.value_of("project").unwrap_or(".");
    let output_dir = matches.value_of("output").unwrap(); // required by clap

    if let Err(err) = run(Path::new(project_dir), Path::new(output_dir)) {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

fn run(project_dir: &Path, output_dir: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_directory(project_dir, output_dir)?;
    build_site(&config)?;
    Ok(())
}
