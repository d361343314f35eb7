//! Per-stage progress display for batch runs

use crate::io::configuration::{MAX_INDIVIDUAL_PROGRESS_BARS, PIPELINE_STAGES};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::path::Path;
use std::time::Duration;

/// Pipeline stage reported for a file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Decoding and resizing the input
    Load,
    /// Partitioning and matching cells
    Match,
    /// Writing the mosaic to disk
    Export,
    /// Computing fidelity metrics
    Evaluate,
}

impl Stage {
    /// Number of stages completed once this stage has finished
    pub const fn position(self) -> usize {
        match self {
            Self::Load => 1,
            Self::Match => 2,
            Self::Export => 3,
            Self::Evaluate => PIPELINE_STAGES,
        }
    }

    /// Short label shown next to the bar
    pub const fn label(self) -> &'static str {
        match self {
            Self::Load => "load",
            Self::Match => "match",
            Self::Export => "export",
            Self::Evaluate => "evaluate",
        }
    }
}

// Display state of one input file
#[derive(Debug, Clone)]
struct FileState {
    name: String,
    label: &'static str,
    completed: usize,
}

/// Terminal progress for a batch run
///
/// Each of the most recent files gets a lane showing its pipeline stage.
/// Batches larger than the lane count also get an overall file counter.
pub struct ProgressManager {
    multi_progress: MultiProgress,
    overall: Option<ProgressBar>,
    lanes: Vec<ProgressBar>,
    files: Vec<Option<FileState>>,
    file_count: usize,
}

impl Default for ProgressManager {
    fn default() -> Self {
        Self::new()
    }
}

fn lane_style() -> ProgressStyle {
    ProgressStyle::with_template("{msg:>8} {bar:24.green/white} {prefix}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("=> ")
}

fn overall_style() -> ProgressStyle {
    ProgressStyle::with_template("{elapsed:>4} images {pos}/{len} {wide_bar}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
}

impl ProgressManager {
    /// Create a manager with no bars; call [`ProgressManager::initialize`] next
    pub fn new() -> Self {
        Self {
            multi_progress: MultiProgress::new(),
            overall: None,
            lanes: Vec::new(),
            files: Vec::new(),
            file_count: 0,
        }
    }

    /// Create the lanes, plus the overall counter for large batches
    pub fn initialize(&mut self, file_count: usize) {
        self.file_count = file_count;
        self.files = vec![None; file_count];

        if file_count > MAX_INDIVIDUAL_PROGRESS_BARS {
            let overall = ProgressBar::new(file_count as u64).with_style(overall_style());
            self.overall = Some(self.multi_progress.add(overall));
        }

        self.lanes = (0..file_count.min(MAX_INDIVIDUAL_PROGRESS_BARS))
            .map(|_| {
                let lane = ProgressBar::new(PIPELINE_STAGES as u64).with_style(lane_style());
                self.multi_progress.add(lane)
            })
            .collect();
    }

    /// Number of files announced to [`ProgressManager::initialize`]
    pub const fn file_count(&self) -> usize {
        self.file_count
    }

    /// Show a file as queued
    pub fn start_file(&mut self, index: usize, path: &Path) {
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        if index >= self.files.len() {
            self.files.resize(index + 1, None);
        }
        if let Some(slot) = self.files.get_mut(index) {
            *slot = Some(FileState {
                name,
                label: "queued",
                completed: 0,
            });
        }
        self.render();
    }

    /// Report a finished pipeline stage
    pub fn finish_stage(&mut self, index: usize, stage: Stage) {
        if let Some(Some(state)) = self.files.get_mut(index) {
            state.label = stage.label();
            state.completed = stage.position();
        }
        self.render();
    }

    /// Mark a file done with its wall time
    pub fn complete_file(&mut self, index: usize, elapsed: Duration) {
        if let Some(overall) = &self.overall {
            overall.inc(1);
        }
        if let Some(Some(state)) = self.files.get_mut(index) {
            state.name = format!("{} ({} ms)", state.name, elapsed.as_millis());
            state.label = "done";
            state.completed = PIPELINE_STAGES;
        }
        self.render();
    }

    /// Remove every bar from the terminal
    pub fn finish(&self) {
        if let Some(overall) = &self.overall {
            overall.finish();
        }
        let _ = self.multi_progress.clear();
    }

    // Lanes show the most recently started files, oldest first
    fn render(&self) {
        let started: Vec<&FileState> = self.files.iter().flatten().collect();
        let visible = &started[started.len().saturating_sub(self.lanes.len())..];

        for (position, lane) in self.lanes.iter().enumerate() {
            match visible.get(position) {
                Some(state) => {
                    lane.set_position(state.completed as u64);
                    lane.set_message(state.label);
                    lane.set_prefix(state.name.clone());
                }
                None => {
                    lane.set_position(0);
                    lane.set_message("");
                    lane.set_prefix("");
                }
            }
        }
    }
}
