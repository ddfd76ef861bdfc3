mod timeline;
mod train_event;

pub use timeline::{TimelineData, TimelineEntry, WireTimeRange};
pub use train_event::{EventType, TrainEvent, TrainTimeline};
