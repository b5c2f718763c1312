//! Glossa catalog compiler
//!
//! Offline companion to the runtime engine: converts gettext `.po`
//! translation catalogs into the JSON data format the engine loads.
//!
//! ## Usage
//!
//! ```bash
//! glossa compile --locale-dir locale --domain messages --output translations.json
//! ```

mod compile;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use colored::Colorize;

use crate::compile::compile;

#[derive(Parser)]
#[command(name = "glossa")]
#[command(about = "Glossa translation catalog utility", long_about = None)]
#[command(version)]
struct Cli {
	#[command(subcommand)]
	command: Commands,
}

#[derive(Subcommand)]
enum Commands {
	/// Compile gettext .po catalogs into the runtime JSON data format
	Compile {
		/// Directory with one subdirectory per locale
		/// (expects <dir>/<locale>/LC_MESSAGES/<domain>.po)
		#[arg(long, default_value = "locale")]
		locale_dir: PathBuf,

		/// Gettext textdomain (the .po file name without extension)
		#[arg(long, default_value = "messages")]
		domain: String,

		/// Output JSON file
		#[arg(short, long, default_value = "translations.json")]
		output: PathBuf,

		/// Placeholder pattern embedded in the catalog config
		#[arg(long, default_value = glossa_i18n::DEFAULT_PATTERN)]
		pattern: String,
	},
}

fn main() {
	let cli = Cli::parse();

	match cli.command {
		Commands::Compile {
			locale_dir,
			domain,
			output,
			pattern,
		} => match compile(&locale_dir, &domain, &output, &pattern) {
			Ok(compiled) => {
				for locale in &compiled {
					println!(
						"{} {} ({} messages)",
						"compiled".green().bold(),
						locale.name,
						locale.messages
					);
				}
				println!(
					"{} {} locale(s) -> {}",
					"wrote".green().bold(),
					compiled.len(),
					output.display()
				);
			}
			Err(err) => {
				eprintln!("{} {err}", "error:".red().bold());
				process::exit(1);
			}
		},
	}
}
