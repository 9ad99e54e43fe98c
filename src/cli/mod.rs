// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// Parses arguments with clap and routes to a use case.
// All console output of results happens here.
//
// Two commands are supported:
//   1. `train`    — trains the model, prints samples, saves the artifact
//   2. `generate` — loads the artifact and continues a seed phrase

pub mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, GenerateArgs, TrainArgs};

use crate::ml::Device;

#[derive(Parser, Debug)]
#[command(
    name = "char-rnn",
    version = "0.1.0",
    about = "Train a character-level LSTM on a text corpus, then sample new text from it."
)]
pub struct Cli {
    /// The subcommand to run (train or generate)
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Match on the subcommand and dispatch to the correct use case.
    pub fn run(self) -> Result<()> {
        let device = Device::default();
        tracing::info!("Using device: {:?}", device);

        match self.command {
            Commands::Train(args)    => run_train(args, device),
            Commands::Generate(args) => run_generate(args, device),
        }
    }
}

fn run_train(args: TrainArgs, device: Device) -> Result<()> {
    use crate::application::train_use_case::TrainUseCase;

    let summary = TrainUseCase::new(args.into(), device).execute()?;

    println!(
        "\nVocabulary: {} characters | {} train / {} evaluation sequences",
        summary.vocab_size, summary.train_sequences, summary.eval_sequences,
    );
    println!("\nGenerated text:");
    for (seed, text) in &summary.samples {
        println!("\nSeed: '{}'", seed);
        println!("Text: {}", text);
    }
    if let Some(best) = summary.best_epoch() {
        println!(
            "\nBest epoch: {} (eval_loss={:.4}, accuracy={:.4})",
            best.epoch, best.eval_loss, best.eval_accuracy,
        );
    }
    println!("\nModel saved to {}", summary.artifact.display());
    Ok(())
}

fn run_generate(args: GenerateArgs, device: Device) -> Result<()> {
    use crate::application::generate_use_case::GenerateUseCase;

    let use_case = GenerateUseCase::new(&args.checkpoint_dir, device)?;
    tracing::info!("Sampling over {} characters", use_case.vocab_size());
    let text     = use_case.generate(&args.seed_text, args.max_length, rand::thread_rng())?;
    println!("{}", text);
    Ok(())
}
