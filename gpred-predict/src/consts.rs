pub const DEFAULT_OUT_DIR: &str = "pred_out";
pub const DEFAULT_THRESHOLD: f32 = 0.5;

/// Sub-directory of the output directory holding per-sequence tracks.
pub const TRACK_DIR: &str = "bigwig";
