use clap::Parser;

use keras_replay::codec;
use keras_replay::features::BigramVocab;
use keras_replay::Model;

/// Replay a Keras-exported model over a feature sequence.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Combined model document (structure + weights) in JSON
    #[arg(long)]
    model: String,

    /// Feature file: one timestep per line, space-separated floats
    #[arg(long, conflicts_with = "text")]
    data: Option<String>,

    /// Bigram vocabulary file (tab-separated, first field is the bigram)
    #[arg(long, requires = "text")]
    bigrams: Option<String>,

    /// Raw text to featurize with --bigrams instead of reading --data
    #[arg(long, requires = "bigrams")]
    text: Option<String>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();

    let mut model = Model::load(&args.model)?;

    let sequence = if let Some(data_path) = &args.data {
        let contents = std::fs::read_to_string(data_path)
            .map_err(|e| format!("Failed to read feature file {}: {}", data_path, e))?;
        codec::sequence_from_str(&contents)?
    } else if let (Some(bigram_path), Some(text)) = (&args.bigrams, &args.text) {
        let vocab = BigramVocab::load(bigram_path)?;
        vocab.featurize(text)
    } else {
        return Err("either --data or --bigrams/--text must be given".into());
    };

    if sequence.is_empty() {
        return Err("input sequence is empty".into());
    }

    let output = model.evaluate(&sequence)?;
    let first = output
        .first()
        .ok_or("model produced an empty output sequence")?;

    let rendered: Vec<String> = first.iter().map(|v| v.to_string()).collect();
    println!("{}", rendered.join(" "));

    Ok(())
}
