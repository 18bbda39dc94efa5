// Website availability: two-stage classifier plus the shared latest verdict.

mod classifier;
mod monitor;

pub use classifier::{
    NOTE_NO_STATUS_LINE, NOTE_PING_ONLY, ProbeTimeouts, SiteClassifier, https_active, stage_one,
};
pub use monitor::SiteMonitor;
