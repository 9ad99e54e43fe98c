// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Defines the two subcommands, `train` and `generate`, and
// their flags. Every flag has a default, so a bare `train`
// reproduces the standard run over data/HPBook1..7.txt.
//
// Reference: Rust Book §12 (Building a CLI Program)

use clap::{Args, Subcommand};
use crate::application::train_use_case::TrainConfig;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Train the character model on the text corpus
    Train(TrainArgs),

    /// Sample text from a trained artifact
    Generate(GenerateArgs),
}

/// All arguments for the `train` command.
#[derive(Args, Debug)]
pub struct TrainArgs {
    /// Directory containing the numbered corpus files
    #[arg(long, default_value = "data")]
    pub data_dir: String,

    /// Corpus files are named <prefix><n>.txt
    #[arg(long, default_value = "HPBook")]
    pub file_prefix: String,

    /// Highest file number to look for (starting at 1)
    #[arg(long, default_value_t = 7)]
    pub file_count: usize,

    /// Directory for the artifact, config and metrics
    #[arg(long, default_value = "checkpoints")]
    pub checkpoint_dir: String,

    /// Characters per training window
    #[arg(long, default_value_t = 50)]
    pub seq_len: usize,

    /// Windows per gradient step
    #[arg(long, default_value_t = 32)]
    pub batch_size: usize,

    /// Full passes over the training windows
    #[arg(long, default_value_t = 5)]
    pub epochs: usize,

    /// Adam learning rate
    #[arg(long, default_value_t = 1e-3)]
    pub lr: f64,

    /// Embedding and LSTM width
    #[arg(long, default_value_t = 128)]
    pub hidden_size: usize,

    /// Leading fraction of windows used for training
    #[arg(long, default_value_t = 0.8)]
    pub train_fraction: f64,

    /// Maximum characters generated per seed phrase
    #[arg(long, default_value_t = 100)]
    pub max_length: usize,

    /// Phrases to continue after training (repeatable)
    #[arg(
        long = "seed-phrase",
        default_values = ["harry potter", "the boy", "magic was", "dumbledore"]
    )]
    pub seed_phrases: Vec<String>,

    /// Fix weight initialisation and sampling for a reproducible run
    #[arg(long)]
    pub seed: Option<u64>,
}

impl From<TrainArgs> for TrainConfig {
    fn from(a: TrainArgs) -> Self {
        TrainConfig {
            data_dir:       a.data_dir,
            file_prefix:    a.file_prefix,
            file_count:     a.file_count,
            checkpoint_dir: a.checkpoint_dir,
            seq_len:        a.seq_len,
            batch_size:     a.batch_size,
            epochs:         a.epochs,
            lr:             a.lr,
            hidden_size:    a.hidden_size,
            train_fraction: a.train_fraction,
            max_length:     a.max_length,
            seed_phrases:   a.seed_phrases,
            seed:           a.seed,
        }
    }
}

/// All arguments for the `generate` command
#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Text to continue
    #[arg(long, default_value = "harry potter")]
    pub seed_text: String,

    /// Maximum number of characters to append
    #[arg(long, default_value_t = 100)]
    pub max_length: usize,

    /// Directory where `train` saved the artifact
    #[arg(long, default_value = "checkpoints")]
    pub checkpoint_dir: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Cli;
    use clap::Parser;

    #[test]
    fn test_train_defaults_match_config_defaults() {
        let cli = Cli::try_parse_from(["char-rnn", "train"]).unwrap();
        let Commands::Train(args) = cli.command else {
            panic!("expected train");
        };
        assert_eq!(TrainConfig::from(args), TrainConfig::default());
    }

    #[test]
    fn test_seed_phrases_override() {
        let cli = Cli::try_parse_from([
            "char-rnn", "train",
            "--seed-phrase", "hogwarts",
            "--seed-phrase", "the elder wand",
            "--seed", "3",
        ])
        .unwrap();
        let Commands::Train(args) = cli.command else {
            panic!("expected train");
        };
        let cfg = TrainConfig::from(args);
        assert_eq!(cfg.seed_phrases, vec!["hogwarts", "the elder wand"]);
        assert_eq!(cfg.seed, Some(3));
    }
}
