//! Roof Mapper - interactive roof outline drawing with live measurements.
//!
//! The library is the drawing and measurement engine. It turns pointer
//! events into closed polygons, keeps area and perimeter in step with every
//! edit and produces labels and render data for a map host. The binary in
//! `main.rs` is one such host, built on eframe.

pub mod drawing;
pub mod error;
pub mod geo;
pub mod labels;
pub mod measure;
pub mod render;
pub mod session;
pub mod settings;
pub mod visibility;

pub use crate::geo::{MapProjection, Position, Ring, ScreenPos, ScreenProjection};
pub use drawing::{
    AddPointOutcome, DraftPolygonBuilder, HandleId, PointerSample, PolygonEditor, SnapHit,
    VertexHandle,
};
pub use error::DrawingError;
pub use labels::{Label, LabelGenerator, LabelKind};
pub use measure::{Measurement, MeasurementStore, PolygonId, PolygonProperties, RoofPolygon};
pub use render::{RenderFrame, RenderedPolygon};
pub use session::{DrawMode, MappingSession, Notice, NoticeLevel};
pub use settings::{BearingMode, DrawingSettings};
pub use visibility::{BaseLayer, ImageryPolicy, ImageryStatus, ImageryWatcher};
