use clap::{Parser, Subcommand};
use log::info;
use netadvisor::config::AdvisorConfig;
use netadvisor::network::{load_features_from_path, load_samples_from_path};
use netadvisor::placement::load_geo_features_from_path;
use netadvisor::sample_data::write_scenario_files;
use netadvisor::{
    analyze_energy_efficiency, AdvisorError, AnalysisContext, AnalysisMode, AnalysisReport,
    NodePlacementAdvisor, UptimePredictor,
};
use std::fs;
use std::path::PathBuf;

/// Predict network uptime from measured conditions and suggest where to place new nodes.
#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    /// TOML configuration file
    #[arg(long, global = true, env = "NETADVISOR_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the seeded sample network and school-location files
    Generate {
        #[arg(default_value = "data/sample_network_data")]
        out_dir: PathBuf,

        #[arg(long)]
        seed: Option<u64>,
    },

    /// Train the uptime model on a labelled CSV and save it
    Train {
        data: PathBuf,

        #[arg(long)]
        seed: Option<u64>,

        /// Where to save the model (defaults to the configured model path)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Predict uptime for every row of a CSV with a saved model
    Predict {
        data: PathBuf,

        #[arg(long)]
        model: Option<PathBuf>,
    },

    /// Average and total energy usage of a labelled CSV
    Energy { data: PathBuf },

    /// Run one analysis flow on an uploaded file
    Analyze {
        data: PathBuf,

        #[arg(long, value_enum, default_value = "network-analysis")]
        mode: AnalysisMode,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,

        /// Persist the model trained by a network analysis
        #[arg(long)]
        save_model: bool,
    },

    /// Suggest node sites for a GeoJSON feature collection
    Place {
        data: PathBuf,

        /// Write a Leaflet HTML map
        #[arg(long)]
        html: Option<PathBuf>,

        /// Write the markers as GeoJSON
        #[arg(long)]
        geojson: Option<PathBuf>,
    },
}

fn main() -> Result<(), AdvisorError> {
    let cli = Cli::parse();
    let config = AdvisorConfig::load(cli.config.as_deref())?;

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.log_level.as_str()),
    )
    .init();

    match cli.command {
        Commands::Generate { out_dir, seed } => {
            let seed = seed.unwrap_or(config.training.seed);
            for path in write_scenario_files(&out_dir, seed)? {
                println!("{}", path.display());
            }
        }

        Commands::Train { data, seed, output } => {
            let mut training = config.training.clone();
            if let Some(seed) = seed {
                training = training.with_seed(seed);
            }
            let samples = load_samples_from_path(&data)?;
            let mut predictor = UptimePredictor::new(training);
            predictor.train(&samples)?;
            let metrics = predictor.evaluate(&samples)?;

            let path = output.unwrap_or_else(|| config.model_path.clone());
            predictor.save(&path)?;
            println!(
                "trained on {} rows: rmse {:.4}, mae {:.4}, r2 {:.4}",
                samples.len(),
                metrics.rmse,
                metrics.mae,
                metrics.r_squared
            );
            println!("model saved to {}", path.display());
        }

        Commands::Predict { data, model } => {
            let path = model.unwrap_or_else(|| config.model_path.clone());
            let predictor = UptimePredictor::from_artifact_or_untrained(&path, config.training.clone());
            let features = load_features_from_path(&data)?;
            for prediction in predictor.predict(&features)? {
                println!("{:.6}", prediction);
            }
        }

        Commands::Energy { data } => {
            let estimate = analyze_energy_efficiency(&load_samples_from_path(&data)?)?;
            println!("avg energy usage:   {:.4}", estimate.avg_energy_usage);
            println!("total energy usage: {:.4}", estimate.total_energy_usage);
        }

        Commands::Analyze {
            data,
            mode,
            json,
            save_model,
        } => {
            let name = data
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            let bytes = fs::read(&data)?;
            let mut predictor =
                UptimePredictor::from_artifact_or_untrained(&config.model_path, config.training.clone());

            info!("running {} on {}", mode, data.display());
            let context = AnalysisContext::new(mode, config.clone());
            let report = context.analyze_bytes(&mut predictor, &name, &bytes)?;

            if json {
                let text = serde_json::to_string_pretty(&report)
                    .map_err(|e| AdvisorError::Io(e.into()))?;
                println!("{}", text);
            } else {
                println!("{}", report);
            }
            if save_model && matches!(report, AnalysisReport::Network(_)) {
                predictor.save(&config.model_path)?;
            }
        }

        Commands::Place {
            data,
            html,
            geojson,
        } => {
            let advisor = NodePlacementAdvisor::new();
            let features = load_geo_features_from_path(&data)?;
            let candidates = advisor.suggest_placements(&features)?;
            let map = advisor.render_markers(&candidates);

            for (i, c) in candidates.iter().enumerate() {
                println!("Node {}: {:.6}, {:.6}", i + 1, c.latitude, c.longitude);
            }
            if let Some(path) = html {
                fs::write(&path, map.to_html())?;
                info!("map written to {}", path.display());
            }
            if let Some(path) = geojson {
                fs::write(&path, map.to_geojson().to_string())?;
                info!("markers written to {}", path.display());
            }
        }
    }
    Ok(())
}
