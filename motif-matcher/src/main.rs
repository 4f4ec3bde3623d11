use clap::{Parser, Subcommand};
use jaspar_rs::error::JasparError;
use jaspar_rs::jaspar;
use jaspar_rs::scoring::{score_query, QueryOutcome};
use jaspar_rs::store::MotifStore;
use jaspar_rs::translate::TranslationMode;
use jaspar_rs::types::Motif;

#[derive(thiserror::Error, Debug)]
pub enum MatcherError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("database error: {0}")]
    Database(#[from] JasparError),
}

#[derive(Parser)]
#[command(
    name = "motif-matcher",
    about = "Queries a JASPAR motif database and scores nucleotide sequences against its binding-site matrices",
    long_about = "A tool for working with JASPAR transcription factor binding profiles. \
                  It loads a JASPAR flat-file dump from disk or straight from the JASPAR \
                  download server, then lists motifs, shows single records, scores DNA or \
                  RNA sequences against every motif of matching length, and back-translates \
                  protein sequences into their candidate DNA encodings.",
    version,
    after_help = "Example usage:\n    \
                  motif-matcher --db motifs.txt score CACGTG\n    \
                  motif-matcher --db motifs.txt translate MIVK\n    \
                  motif-matcher show MA0004.1",
    color = clap::ColorChoice::Always
)]
struct Args {
    /// Path or URL of a JASPAR flat-file dump
    /// Defaults to the JASPAR 2024 CORE non-redundant collection
    #[arg(long, default_value = jaspar::JASPAR_CORE_URL, value_name = "DB")]
    db: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print every motif in the database
    List,

    /// Print a single motif by its identifier
    Show {
        /// Motif identifier, e.g. MA0004.1
        motif_id: String,
    },

    /// Score a DNA, RNA or protein sequence against the database
    Score {
        /// Raw sequence; proteins are expanded to candidate DNA sequences
        sequence: String,

        /// Fail on amino-acid letters outside the standard genetic code
        /// instead of skipping them
        #[arg(long)]
        strict: bool,
    },

    /// Back-translate a protein sequence into all encoding DNA sequences
    Translate {
        /// Amino-acid sequence in single-letter codes
        protein: String,

        /// Fail on amino-acid letters outside the standard genetic code
        /// instead of skipping them
        #[arg(long)]
        strict: bool,
    },
}

fn print_motif(motif: &Motif) -> Result<(), MatcherError> {
    let record = motif.to_record()?;
    println!("Motif ID: {}", record.motif_id);
    println!("TF Name: {}", record.tf_name);
    println!("PFM:");
    println!("A: {:?}", record.pfm.a);
    println!("C: {:?}", record.pfm.c);
    println!("G: {:?}", record.pfm.g);
    println!("T: {:?}", record.pfm.t);
    Ok(())
}

fn translation_mode(strict: bool) -> TranslationMode {
    if strict {
        TranslationMode::Strict
    } else {
        TranslationMode::Lenient
    }
}

fn run(args: Args) -> Result<(), MatcherError> {
    if let Command::Translate { protein, strict } = &args.command {
        let candidates =
            jaspar_rs::translate::back_translate(protein, translation_mode(*strict))?;
        println!("{} candidate DNA sequences:", candidates.len());
        for candidate in candidates {
            println!("{candidate}");
        }
        return Ok(());
    }

    println!("loading motif database from {}", args.db);
    let motifs = jaspar::read_motif_source(&args.db)?;
    let store = MotifStore::from_motifs(motifs);
    println!("{} motifs loaded", store.len());

    match args.command {
        Command::List => {
            for motif in store.all() {
                print_motif(&motif)?;
                println!();
            }
        }
        Command::Show { motif_id } => {
            print_motif(&store.get(&motif_id)?)?;
        }
        Command::Score { sequence, strict } => {
            match score_query(&sequence, &store, translation_mode(strict))? {
                QueryOutcome::Ranked { warning, report } => {
                    if let Some(warning) = warning {
                        println!("WARNING: {warning}");
                    }
                    println!(
                        "Given sequence: {}. Number of motifs analyzed: {}",
                        sequence, report.motifs_scored
                    );
                    for entry in &report.scores {
                        println!("{}\t{}", entry.motif_id, entry.score);
                    }
                }
                QueryOutcome::Candidates {
                    warning,
                    dna_sequences,
                } => {
                    if let Some(warning) = warning {
                        println!("WARNING: {warning}");
                    }
                    println!(
                        "Choose one of the following {} DNA sequences and retry to get the score:",
                        dna_sequences.len()
                    );
                    for candidate in dna_sequences {
                        println!("{candidate}");
                    }
                }
            }
        }
        Command::Translate { .. } => unreachable!("handled before the database load"),
    }

    Ok(())
}

fn main() {
    let args = Args::parse();
    if let Err(e) = run(args) {
        eprintln!("ERROR: {e}");
        std::process::exit(1);
    }
}
