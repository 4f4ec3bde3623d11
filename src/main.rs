use jaspar_rs::jaspar;
use jaspar_rs::scoring::{score_query, QueryOutcome};
use jaspar_rs::store::MotifStore;
use jaspar_rs::translate::TranslationMode;

fn main() {
    let motifs = jaspar::load_motif_db("tests/data/motifs.txt").unwrap();
    let store = MotifStore::from_motifs(motifs);
    println!("{} motifs loaded", store.len());

    if let QueryOutcome::Ranked { report, .. } =
        score_query("CACGTG", &store, TranslationMode::Lenient).unwrap()
    {
        for entry in &report.scores {
            println!("{}\t{}", entry.motif_id, entry.score);
        }
    }
}
