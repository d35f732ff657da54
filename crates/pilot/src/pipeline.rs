//! Frame-to-command drive pipeline

use std::time::Instant;

use command_gate::{CommandGate, CommandTransport, DispatchStats, GateVerdict};
use histogram::{Histogram, HistogramAccumulator};
use metrics::counter;
use segmentation::{FrameSegmenter, LabelGrid};
use serde::Serialize;
use steering::{DecisionResult, DriveState, FrameEvidence, HistogramJudge, Method, SteeringArbiter};
use tracing::{debug, info, warn};
use vision_primitives::{Frame, RoiConfig};

use crate::{PilotConfig, PilotError};

/// What one frame produced
#[derive(Debug, Clone, Serialize)]
pub struct FrameReport {
    pub sequence: u32,
    #[serde(flatten)]
    pub decision: DecisionResult,
    pub verdict: GateVerdict,
    pub drive_state: DriveState,
    pub histogram: Histogram,
}

/// Pipeline summary
#[derive(Debug, Serialize)]
pub struct PipelineStatus {
    pub version: String,
    pub frames_processed: u64,
    pub degenerate_frames: u64,
    pub uptime_seconds: u64,
    pub drive_state: DriveState,
    pub dispatch: DispatchStats,
}

/// ROI extraction, segmentation, histogram, judge, arbiter, gate and
/// transport, run synchronously once per frame
pub struct DrivePipeline<T: CommandTransport> {
    roi: RoiConfig,
    segmenter: FrameSegmenter,
    accumulator: HistogramAccumulator,
    judge: HistogramJudge,
    arbiter: SteeringArbiter,
    gate: CommandGate,
    transport: T,
    frames_processed: u64,
    degenerate_frames: u64,
    start_time: Instant,
}

impl<T: CommandTransport> DrivePipeline<T> {
    pub fn new(config: &PilotConfig, transport: T) -> Result<Self, PilotError> {
        config.validate()?;
        info!("Creating drive pipeline");

        Ok(Self {
            roi: config.roi.clone(),
            segmenter: FrameSegmenter::new(config.segmenter.clone())?,
            accumulator: HistogramAccumulator::new(config.histogram.clone()),
            judge: HistogramJudge::new(config.judge.clone()),
            arbiter: SteeringArbiter::new(config.arbiter.clone())?,
            gate: CommandGate::new(config.gate.clone())?,
            transport,
            frames_processed: 0,
            degenerate_frames: 0,
            start_time: Instant::now(),
        })
    }

    /// Decode an encoded image and process it; undecodable input stops
    pub fn process_encoded(&mut self, bytes: &[u8], sequence: u32) -> FrameReport {
        match Frame::decode(bytes, sequence) {
            Ok(frame) => self.process_frame(&frame),
            Err(e) => {
                warn!(seq = sequence, "Dropping undecodable frame: {}", e);
                let empty = LabelGrid::new(0, 0);
                self.run(sequence, &empty, None)
            }
        }
    }

    pub fn process_frame(&mut self, frame: &Frame) -> FrameReport {
        let bottom = self.segment_band(frame, self.roi.bottom(frame.width, frame.height));
        let lookahead = self.segment_band(frame, self.roi.lookahead(frame.width, frame.height));
        let lookahead = lookahead.filter(|grid| !grid.is_empty());

        match bottom {
            Some(grid) => self.run(frame.sequence, &grid, lookahead.as_ref()),
            None => self.run(frame.sequence, &LabelGrid::new(0, 0), None),
        }
    }

    fn segment_band(&self, frame: &Frame, roi: vision_primitives::Roi) -> Option<LabelGrid> {
        match frame.crop(roi) {
            Ok(band) => Some(self.segmenter.segment(&band)),
            Err(e) => {
                warn!(seq = frame.sequence, "ROI extraction failed: {}", e);
                None
            }
        }
    }

    fn run(&mut self, sequence: u32, grid: &LabelGrid, lookahead: Option<&LabelGrid>) -> FrameReport {
        let histogram = self.accumulator.accumulate(grid);
        let judgement = self.judge.judge(&histogram);
        let horizontal_lines = if self.arbiter.config().corner.signal.uses_lines() {
            self.segmenter.horizontal_line_ratio(grid)
        } else {
            None
        };

        let decision = self.arbiter.decide(&FrameEvidence {
            grid,
            histogram,
            confidence: judgement.confidence,
            horizontal_lines,
            lookahead,
        });
        if decision.method == Method::DegenerateInput {
            warn!(seq = sequence, "Degenerate frame, stopping");
            self.degenerate_frames += 1;
            counter!("lane_pilot_degenerate_frames_total").increment(1);
        }

        let verdict = self.gate.dispatch(&decision, &mut self.transport);
        self.frames_processed += 1;

        debug!(
            seq = sequence,
            command = %decision.command,
            method = %decision.method,
            ?verdict,
            "frame processed"
        );

        FrameReport {
            sequence,
            decision,
            verdict,
            drive_state: self.arbiter.drive_state(),
            histogram,
        }
    }

    pub fn status(&self) -> PipelineStatus {
        PipelineStatus {
            version: env!("CARGO_PKG_VERSION").to_string(),
            frames_processed: self.frames_processed,
            degenerate_frames: self.degenerate_frames,
            uptime_seconds: self.start_time.elapsed().as_secs(),
            drive_state: self.arbiter.drive_state(),
            dispatch: self.gate.stats().clone(),
        }
    }

    pub fn arbiter(&self) -> &SteeringArbiter {
        &self.arbiter
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }
}
