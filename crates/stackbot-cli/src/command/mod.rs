use std::path::PathBuf;

use clap::{Parser, Subcommand};
use log::LevelFilter;
use stackbot_engine::Field;
use stackbot_search::{SearchConfig, WeightVector};

use crate::{logger, util};

use self::{auto_play::AutoPlayArg, bench::BenchArg, best_move::BestMoveArg};

mod auto_play;
mod bench;
mod best_move;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// Log level for search diagnostics (off, error, warn, info, debug, trace)
    #[arg(long, global = true, default_value_t = LevelFilter::Warn)]
    log_level: LevelFilter,
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Find the best placement for a piece, looking one piece ahead
    BestMove(#[clap(flatten)] BestMoveArg),
    /// Time sequential and pooled searches on the same position
    Bench(#[clap(flatten)] BenchArg),
    /// Let the search play a headless game
    AutoPlay(#[clap(flatten)] AutoPlayArg),
}

/// Options shared by every command that runs a search.
#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct SearchArg {
    /// Search configuration file (JSON)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Weight model file (JSON); replaces the configured weights
    #[arg(long)]
    model: Option<PathBuf>,
    /// Number of worker threads; overrides the configuration
    #[arg(long)]
    threads: Option<usize>,
}

impl SearchArg {
    /// Loads the configuration and picks the weights every search call of this run uses.
    ///
    /// In training mode the model file supplies the per-call weights; otherwise it replaces
    /// the fixed weight vector.
    fn resolve(&self) -> anyhow::Result<(SearchConfig, WeightVector)> {
        let mut config = match &self.config {
            Some(path) => util::read_config_file(path)?,
            None => SearchConfig::default(),
        };
        if let Some(threads) = self.threads {
            config.num_threads = threads;
        }
        let mut per_call = None;
        if let Some(path) = &self.model {
            let weights = util::read_weight_model_file(path)?;
            if config.training_mode {
                per_call = Some(weights);
            } else {
                config.fixed_weight_vector = weights;
            }
        }
        let weights = config.weights_for_call(per_call.as_ref())?.into_owned();
        Ok((config, weights))
    }
}

fn load_field(path: Option<&PathBuf>) -> anyhow::Result<Field> {
    match path {
        Some(path) => util::read_field_file(path),
        None => Ok(Field::EMPTY),
    }
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    logger::init(args.log_level)?;
    match args.mode {
        Mode::BestMove(arg) => best_move::run(&arg)?,
        Mode::Bench(arg) => bench::run(&arg)?,
        Mode::AutoPlay(arg) => auto_play::run(&arg)?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::{fs, path::Path};

    use stackbot_search::{SearchError, WeightModel};

    use super::*;

    fn temp_file(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("stackbot-{}-{name}", std::process::id()));
        fs::write(&path, contents).unwrap();
        path
    }

    fn model_file(name: &str, weights: &WeightVector) -> PathBuf {
        let model = WeightModel::from_weights("test", weights).unwrap();
        temp_file(name, &serde_json::to_string(&model).unwrap())
    }

    fn remove(path: &Path) {
        let _ = fs::remove_file(path);
    }

    #[test]
    fn test_parse_log_level() {
        let args =
            CommandArgs::try_parse_from(["stackbot", "best-move", "T", "--log-level", "debug"])
                .unwrap();
        assert_eq!(args.log_level, LevelFilter::Debug);
        assert!(matches!(args.mode, Mode::BestMove(_)));

        let args = CommandArgs::try_parse_from(["stackbot", "auto-play"]).unwrap();
        assert_eq!(args.log_level, LevelFilter::Warn);

        assert!(
            CommandArgs::try_parse_from(["stackbot", "bench", "--log-level", "loud"]).is_err()
        );
    }

    #[test]
    fn test_resolve_defaults() {
        let (config, weights) = SearchArg::default().resolve().unwrap();
        assert_eq!(config, SearchConfig::default());
        assert_eq!(weights, WeightVector::default());
    }

    #[test]
    fn test_resolve_threads_override_config() {
        let config = temp_file("threads.json", r#"{ "num_threads": 2 }"#);
        let arg = SearchArg {
            config: Some(config.clone()),
            threads: Some(6),
            ..SearchArg::default()
        };
        let (resolved, _) = arg.resolve().unwrap();
        assert_eq!(resolved.num_threads, 6);
        remove(&config);
    }

    #[test]
    fn test_resolve_model_replaces_fixed_weights() {
        let trained = WeightVector::unit().scaled(3.0);
        let model = model_file("fixed-model.json", &trained);
        let arg = SearchArg {
            model: Some(model.clone()),
            ..SearchArg::default()
        };
        let (config, weights) = arg.resolve().unwrap();
        assert_eq!(config.fixed_weight_vector, trained);
        assert_eq!(weights, trained);
        remove(&model);
    }

    #[test]
    fn test_resolve_model_in_training_mode() {
        let trained = WeightVector::unit().scaled(0.5);
        let model = model_file("training-model.json", &trained);
        let config = temp_file("training.json", r#"{ "training_mode": true }"#);
        let arg = SearchArg {
            config: Some(config.clone()),
            model: Some(model.clone()),
            ..SearchArg::default()
        };
        let (resolved, weights) = arg.resolve().unwrap();
        assert_eq!(resolved.fixed_weight_vector, WeightVector::default());
        assert_eq!(weights, trained);

        let without_model = SearchArg {
            config: Some(config.clone()),
            ..SearchArg::default()
        };
        let err = without_model.resolve().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SearchError>(),
            Some(SearchError::MissingTrainingWeights)
        ));
        remove(&model);
        remove(&config);
    }

    #[test]
    fn test_resolve_rejects_bad_config() {
        let config = temp_file("short.json", r#"{ "fixed_weight_vector": [1.0, 2.0] }"#);
        let arg = SearchArg {
            config: Some(config.clone()),
            ..SearchArg::default()
        };
        let err = arg.resolve().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SearchError>(),
            Some(SearchError::ConfigurationMismatch { actual: 2, .. })
        ));
        remove(&config);

        let missing = SearchArg {
            config: Some(std::env::temp_dir().join("stackbot-no-such-config.json")),
            ..SearchArg::default()
        };
        assert!(missing.resolve().is_err());
    }
}
