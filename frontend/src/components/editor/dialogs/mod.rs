mod merge;
mod radio;

pub use merge::merge_dialog;
pub use radio::radio_dialog;
