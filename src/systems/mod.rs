pub mod audio;
pub mod colors;
pub mod interaction;
pub mod ui;
