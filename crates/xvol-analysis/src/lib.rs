//! xvol-analysis
//!
//! Crossing analysis over intraday series:
//! - [`count_crossings`]: sign changes of "price above reference" in one session
//! - [`RollingWindowAggregator`]: the same count over a trailing window of
//!   trading days, summarised as [`AggregateStats`]
//! - [`close_variation_series`]: close-to-next-close percentage changes
//! - [`run_session_batch`] / [`run_window_batch`]: one ticker universe at a time
//!
//! Dates come from an `xvol_calendar::TradingCalendar` and prices from an
//! `xvol_md::PriceDataSource`; both are passed in explicitly. Nothing here
//! reads configuration or global state.

mod batch;
mod crossing;
mod error;
mod reference;
mod session;
mod stats;
mod variation;
mod window;

pub use batch::{run_session_batch, run_window_batch, SessionBatch, WindowBatch};
pub use crossing::{count_crossings, count_crossings_in, CrossingResult};
pub use error::{AnalysisError, DayError};
pub use reference::{
    default_analysis_date, default_previous_date, resolve_analysis_date, resolve_reference_close,
};
pub use session::{analyze_session, SessionRow, SkipRecord};
pub use stats::{AggregateStats, DailySummaryRow};
pub use variation::{close_variation_series, pct_change, VariationPoint, VariationSeries};
pub use window::{RollingWindowAggregator, WindowOutcome, WindowParams, WindowReport};
