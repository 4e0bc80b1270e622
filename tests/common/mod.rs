pub mod synthetic_track;
