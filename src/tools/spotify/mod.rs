pub mod format;
pub mod params;
pub mod play;
pub mod playlist;
pub mod read;
pub mod tool_router;
