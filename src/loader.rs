//! Build a [`PredictionService`] from configuration.

use std::sync::Arc;

use tracing::info;

use crate::config::{Config, EncoderConfig};
use crate::labels::LabelSet;
use crate::model::{Device, ModelSource, default_cache_dir};
use crate::precautions::PrecautionTable;
use crate::providers::onnx_encoder::DEFAULT_ENCODER_REPO;
use crate::providers::{
    FastEmbedEncoder, OnnxClassifier, OnnxClassifierOptions, OnnxEncoder, OnnxEncoderOptions,
};
use crate::service::PredictionService;
use crate::traits::{DiseaseClassifier, TextEncoder};
use crate::Result;

/// Load every artifact named in `config` and assemble the service.
///
/// Runs once at startup. Any missing or malformed artifact fails here.
pub fn build_service(config: &Config) -> Result<PredictionService> {
    let models = &config.models;
    let device = Device::from_name(&models.device)?;
    let cache_dir = models.models_dir.clone().unwrap_or_else(default_cache_dir);

    info!(device = device.name(), cache_dir = %cache_dir.display(), "loading prediction artifacts");

    let encoder: Arc<dyn TextEncoder> = match &models.encoder {
        EncoderConfig::FastEmbed { model } => Arc::new(FastEmbedEncoder::new(*model, &cache_dir)?),
        EncoderConfig::Onnx {
            repo_id,
            model_dir,
            max_length,
            token_type_ids,
            output_name,
        } => {
            let source = match (model_dir, repo_id) {
                (Some(dir), _) => ModelSource::local(dir),
                (None, Some(repo)) => ModelSource::huggingface(repo),
                (None, None) => ModelSource::huggingface(DEFAULT_ENCODER_REPO),
            };
            let options = OnnxEncoderOptions {
                max_length: *max_length,
                token_type_ids: *token_type_ids,
                output_name: output_name.clone(),
            };
            Arc::new(OnnxEncoder::new(&source, options, device, &cache_dir)?)
        }
    };

    let classifier_config = &models.classifier;
    let classifier: Arc<dyn DiseaseClassifier> = Arc::new(OnnxClassifier::new(
        OnnxClassifierOptions {
            model_path: classifier_config.model_path.clone(),
            input_width: classifier_config.input_width,
            input_name: classifier_config.input_name.clone(),
            output_name: classifier_config.output_name.clone(),
            output: classifier_config.output,
        },
        device,
    )?);

    let labels = LabelSet::load(&models.labels_path)?;
    let precautions = PrecautionTable::load(&config.precautions.path)?;

    PredictionService::builder()
        .encoder(encoder)
        .classifier(classifier)
        .labels(labels)
        .precautions(precautions)
        .cutoff(config.precautions.cutoff)
        .build()
}
