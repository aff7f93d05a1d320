pub mod synthetic_video;
