pub mod geometry;
pub mod label;
pub mod mtics;
pub mod primitives;
pub mod scale;
pub mod solver;
pub mod tic;
pub mod tic_set;
pub mod types;

pub use geometry::{Anchors, FreeSpace, TitleAllocation};
pub use label::{LabelFormatter, LabelStyle};
pub use mtics::MtickDeriver;
pub use scale::{AxisLine, CoordinateMapper, MappedPoint, MappingSpace};
pub use solver::{
    LineLengthProbe, LinearScaleSolver, LogScaleSolver, ScaleCandidate, ScaleRequest,
    ScaleSolution, ScaleSolver, SearchState, SolveOutcome, SolveStatus, SolverLimits,
};
pub use tic::{LabelAlign, Tic, TicKind, TicSpaceProbe, TicStyle};
pub use tic_set::{
    ReconcileReport, ReconcileRequest, TicId, TicProgression, TicSet, TicSetReconciler,
    TolerancePolicy, ValueMatcher,
};
pub use types::{
    Allocation, Borders, LabelSize, Orientation, PixelPoint, Side, SideSpace, SizeRequest,
    Viewport,
};
