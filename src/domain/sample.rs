//! Sampled price curves returned by the sampling layer.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::fill::FillData;
use super::money::Amount;
use super::source::LiquiditySource;

/// One checkpoint of a cumulative curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SamplePoint {
    pub input: Amount,
    pub output: Amount,
}

/// Cumulative output of one route at ascending input checkpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampledCurve {
    pub source: LiquiditySource,
    pub fill_data: Arc<FillData>,
    pub points: Vec<SamplePoint>,
}

impl SampledCurve {
    /// Pair an input grid with the outputs sampled for it.
    ///
    /// Extra entries on either side are ignored.
    #[must_use]
    pub fn from_grid(
        source: LiquiditySource,
        fill_data: FillData,
        inputs: &[Amount],
        outputs: &[Amount],
    ) -> Self {
        let points = inputs
            .iter()
            .zip(outputs)
            .map(|(input, output)| SamplePoint {
                input: *input,
                output: *output,
            })
            .collect();
        Self {
            source,
            fill_data: Arc::new(fill_data),
            points,
        }
    }

    /// A curve with no checkpoints, standing in for a failed sample.
    #[must_use]
    pub fn empty(source: LiquiditySource) -> Self {
        Self {
            source,
            fill_data: Arc::new(FillData::Plain),
            points: Vec::new(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.iter().all(|point| point.output.is_zero())
    }
}
