pub mod metals_live;

pub use metals_live::MetalsLiveProvider;
