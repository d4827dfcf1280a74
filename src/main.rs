//! Command-line interface for warscribe

#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};

#[cfg(feature = "cli")]
use std::fs;
#[cfg(feature = "cli")]
use std::path::PathBuf;

#[cfg(feature = "cli")]
use warscribe::catalogue::{
    parse_battle_trait_cat_xml, parse_cat_xml, parse_regiments_of_renown_cat_xml,
};
#[cfg(feature = "cli")]
use warscribe::cheatsheet::build_cheat_sheet;

#[cfg(feature = "cli")]
#[derive(Parser, Debug)]
#[command(name = "warscribe")]
#[command(author, version, about = "BattleScribe catalogue to card-record conversion tool", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[cfg(feature = "cli")]
#[derive(Subcommand, Debug)]
enum Commands {
    /// Parse a Library catalogue into warscroll records
    Units {
        /// Path to the .cat file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Pretty print the output
        #[arg(short, long)]
        pretty: bool,
    },

    /// Parse a battle-trait catalogue into trait records
    Traits {
        /// Path to the .cat file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Path to the shared Lores catalogue for link resolution
        #[arg(short, long)]
        lores: Option<PathBuf>,

        /// Pretty print the output
        #[arg(short, long)]
        pretty: bool,
    },

    /// Parse the Regiments of Renown catalogue
    Regiments {
        /// Path to the .cat file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Restrict to a single regiment by exact name
        #[arg(short, long)]
        regiment: Option<String>,

        /// Pretty print the output
        #[arg(short, long)]
        pretty: bool,
    },

    /// Build a cheat sheet from a Library and an optional trait catalogue
    Cheatsheet {
        /// Path to the Library .cat file
        #[arg(value_name = "LIBRARY")]
        library: PathBuf,

        /// Path to the battle-trait .cat file
        #[arg(short, long)]
        traits: Option<PathBuf>,

        /// Pretty print the output
        #[arg(short, long)]
        pretty: bool,
    },
}

#[cfg(feature = "cli")]
fn to_json<T: serde::Serialize>(value: &T, pretty: bool) -> warscribe::Result<String> {
    Ok(if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    })
}

#[cfg(feature = "cli")]
fn run() -> warscribe::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Units { file, pretty } => {
            let xml = fs::read_to_string(&file)?;
            let parsed = parse_cat_xml(&xml);
            println!("{}", to_json(&parsed.units, pretty)?);
        }
        Commands::Traits { file, lores, pretty } => {
            let xml = fs::read_to_string(&file)?;
            let lores_xml = match lores {
                Some(path) => Some(fs::read_to_string(&path)?),
                None => None,
            };
            let parsed = parse_battle_trait_cat_xml(&xml, lores_xml.as_deref());
            println!("{}", to_json(&parsed.traits, pretty)?);
        }
        Commands::Regiments { file, regiment, pretty } => {
            let xml = fs::read_to_string(&file)?;
            let parsed = parse_regiments_of_renown_cat_xml(&xml, regiment.as_deref());
            let out = serde_json::json!({
                "traits": parsed.traits,
                "regimentMapping": parsed.regiment_mapping,
            });
            println!("{}", to_json(&out, pretty)?);
        }
        Commands::Cheatsheet { library, traits, pretty } => {
            let xml = fs::read_to_string(&library)?;
            let parsed = parse_cat_xml(&xml);
            let trait_records = match traits {
                Some(path) => {
                    let trait_xml = fs::read_to_string(&path)?;
                    parse_battle_trait_cat_xml(&trait_xml, None).traits
                }
                None => Vec::new(),
            };
            let sheet = build_cheat_sheet(&parsed.units, &trait_records);
            println!("{}", to_json(&sheet, pretty)?);
        }
    }

    Ok(())
}

#[cfg(feature = "cli")]
fn main() {
    if let Err(e) = run() {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("warscribe was built without the 'cli' feature");
    std::process::exit(1);
}
